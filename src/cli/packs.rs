//! Packs command: graphics packs of a game installation

use std::process::ExitCode;

use super::{Context, EXIT_ERROR};
use crate::packs::discover;

/// Execute the packs command
pub fn run_packs(ctx: &Context) -> Result<(), ExitCode> {
    let root = ctx.game_root()?;
    let packs = match discover(root) {
        Ok(packs) => packs,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Err(ExitCode::from(EXIT_ERROR));
        }
    };

    if packs.is_empty() {
        println!("No graphics packs found in {}", root.join(crate::packs::GFX_DIR).display());
        return Ok(());
    }

    println!("Graphics packs in {}:", root.display());
    for pack in &packs {
        let note = if pack.has_config { "" } else { "  (no tile_config.json)" };
        println!("  {}{}", pack.name, note);
    }
    Ok(())
}
