//! List command: tile identifiers grouped by owning sheet

use std::process::ExitCode;

use super::{Context, TilesetArgs, EXIT_ERROR};

/// Execute the list command
pub fn run_list(
    ctx: &Context,
    source: &TilesetArgs,
    sheet: Option<&str>,
    search: Option<&str>,
) -> Result<(), ExitCode> {
    let tileset = ctx.load(source)?;
    let membership = tileset.search(search.unwrap_or(""), ctx.settings.search.case_sensitive);

    if let Some(sheet) = sheet {
        if tileset.range(sheet).is_none() {
            eprintln!("Error: Sheet '{}' is not declared in this tileset", sheet);
            return Err(ExitCode::from(EXIT_ERROR));
        }
    }

    let mut shown = 0;
    for (file, ids) in membership.iter() {
        if sheet.is_some_and(|s| s != file) {
            continue;
        }
        println!("{} ({})", file, ids.len());
        for id in ids {
            println!("  {}", id);
        }
        shown += ids.len();
    }

    if shown == 0 {
        eprintln!("No tiles found");
    }
    Ok(())
}
