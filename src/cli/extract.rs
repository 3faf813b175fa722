//! Extract command: compose a tile and save it as PNG

use std::path::Path;
use std::process::ExitCode;

use super::{Context, TilesetArgs, EXIT_ERROR};
use crate::compose::Composer;
use crate::output::{save_png, scale_image, tile_output_path};

/// Execute the extract command
pub fn run_extract(
    ctx: &Context,
    source: &TilesetArgs,
    tile: &str,
    output: Option<&Path>,
) -> Result<(), ExitCode> {
    let tileset = ctx.load(source)?;
    let extract = &ctx.settings.extract;

    let mut composer = Composer::new(&tileset, tileset.image_source(), extract.compose_options());
    let composed = match composer.compose(tile) {
        Ok(composed) => composed,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Err(ExitCode::from(EXIT_ERROR));
        }
    };

    for warning in &composed.warnings {
        eprintln!("Warning: {}", warning);
    }
    if ctx.strict && !composed.warnings.is_empty() {
        eprintln!("Error: {} sprite(s) could not be drawn (strict mode)", composed.warnings.len());
        return Err(ExitCode::from(EXIT_ERROR));
    }

    let image = scale_image(composed.image, extract.scale);
    let path = tile_output_path(tile, output);
    if let Err(e) = save_png(&image, &path) {
        eprintln!("Error: Failed to save {}: {}", path.display(), e);
        return Err(ExitCode::from(EXIT_ERROR));
    }

    println!("Saved {} ({} sprite(s)) to {}", tile, composed.drawn, path.display());
    Ok(())
}
