//! Show command: the sprite references of one tile

use std::process::ExitCode;

use super::{Context, TilesetArgs, EXIT_ERROR};

/// Execute the show command
pub fn run_show(ctx: &Context, source: &TilesetArgs, tile: &str, json: bool) -> Result<(), ExitCode> {
    let tileset = ctx.load(source)?;

    let Some(sprites) = tileset.sprites(tile) else {
        eprintln!("Error: Tile '{}' not found", tile);
        return Err(ExitCode::from(EXIT_ERROR));
    };

    if json {
        match serde_json::to_string_pretty(sprites) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                return Err(ExitCode::from(EXIT_ERROR));
            }
        }
        return Ok(());
    }

    println!("{} ({} sprite(s))", tile, sprites.len());
    for (layer, sprite) in sprites.iter().enumerate() {
        let (x, y, w, h) = sprite.pixel_rect();
        println!(
            "  [{}] #{} {} row {} col {} ({}x{} at {},{})",
            layer, sprite.global_index, sprite.sheet, sprite.row, sprite.column, w, h, x, y
        );
    }
    Ok(())
}
