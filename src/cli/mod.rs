//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod extract;
mod info;
mod list;
mod packs;
mod show;

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::config::{load_config, merge_cli_overrides, CliOverrides, TileviewConfig};
use crate::packs::config_path;
use crate::tileset::{load_tileset, Tileset};

pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Tileview - inspect sprite-sheet tilesets and extract tile images
#[derive(Parser)]
#[command(name = "tileview")]
#[command(about = "Tileview - resolve tile_config.json tilesets into sprite-sheet regions")]
#[command(version)]
pub struct Cli {
    /// Treat load diagnostics (missing sheets, bad entries) as errors
    #[arg(long, global = true)]
    pub strict: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to tileview.toml (default: discovered from the working directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where to load a tileset from: a document path, or a graphics pack of a game install.
#[derive(Args, Debug, Clone)]
pub struct TilesetArgs {
    /// Path to tile_config.json
    #[arg(required_unless_present = "pack")]
    pub tileset: Option<PathBuf>,

    /// Load the named graphics pack from the game directory instead
    #[arg(long, conflicts_with = "tileset")]
    pub pack: Option<String>,

    /// Game directory containing gfx/ (overrides [cdda] root)
    #[arg(long)]
    pub game_root: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the global sprite index range of every sheet
    Info {
        #[command(flatten)]
        source: TilesetArgs,

        /// Print ranges as JSON
        #[arg(long)]
        json: bool,
    },
    /// List tile identifiers grouped by sheet
    List {
        #[command(flatten)]
        source: TilesetArgs,

        /// Only list tiles on this sheet
        #[arg(long)]
        sheet: Option<String>,

        /// Only list identifiers containing this text
        #[arg(short, long)]
        search: Option<String>,

        /// Match --search case-sensitively
        #[arg(long)]
        case_sensitive: bool,
    },
    /// Show the sprite references of one tile
    Show {
        #[command(flatten)]
        source: TilesetArgs,

        /// Tile identifier
        #[arg(long = "id")]
        tile: String,

        /// Print sprites as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compose a tile's sprites and save them as PNG
    Extract {
        #[command(flatten)]
        source: TilesetArgs,

        /// Tile identifier
        #[arg(long = "id")]
        tile: String,

        /// Output file or directory (default: {tile}.png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Scale output by integer factor (1-128)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=128))]
        scale: Option<u32>,

        /// Gap between sprites in pixels (0-4096)
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=4096))]
        spacing: Option<u32>,

        /// Border around the strip in pixels (0-4096)
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=4096))]
        margin: Option<u32>,
    },
    /// List graphics packs of a game installation
    Packs {
        /// Game directory containing gfx/ (overrides [cdda] root)
        game_root: Option<PathBuf>,
    },
}

/// Install the stderr log subscriber.
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    // A subscriber may already be installed when running inside tests
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Settings and flags shared by every command.
pub struct Context {
    pub settings: TileviewConfig,
    pub strict: bool,
}

impl Context {
    fn new(cli: &Cli, overrides: &CliOverrides) -> Result<Self, ExitCode> {
        let mut settings = match load_config(cli.config.as_deref()) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Error: {}", e);
                return Err(ExitCode::from(EXIT_ERROR));
            }
        };
        merge_cli_overrides(&mut settings, overrides);
        Ok(Self { settings, strict: cli.strict })
    }

    /// Game root from the command line or the config file.
    pub fn game_root(&self) -> Result<&Path, ExitCode> {
        match self.settings.cdda.root.as_deref() {
            Some(root) => Ok(root),
            None => {
                eprintln!("Error: No game directory given. Pass --game-root or set [cdda] root in tileview.toml");
                Err(ExitCode::from(EXIT_INVALID_ARGS))
            }
        }
    }

    /// Load the tileset named by `source`, printing diagnostics.
    ///
    /// In strict mode any diagnostic fails the command.
    pub fn load(&self, source: &TilesetArgs) -> Result<Tileset, ExitCode> {
        let path = match (&source.tileset, &source.pack) {
            (Some(path), _) => path.clone(),
            (None, Some(pack)) => match config_path(self.game_root()?, pack) {
                Ok(path) => path,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return Err(ExitCode::from(EXIT_ERROR));
                }
            },
            (None, None) => {
                eprintln!("Error: No tileset given");
                return Err(ExitCode::from(EXIT_INVALID_ARGS));
            }
        };

        let tileset = match load_tileset(&path) {
            Ok(tileset) => tileset,
            Err(e) => {
                eprintln!("Error loading {}: {}", path.display(), e);
                return Err(ExitCode::from(EXIT_ERROR));
            }
        };

        for diagnostic in &tileset.diagnostics {
            eprintln!("Warning: {}", diagnostic);
        }
        if self.strict && !tileset.diagnostics.is_empty() {
            eprintln!(
                "Error: {} diagnostic(s) in {} (strict mode)",
                tileset.diagnostics.len(),
                path.display()
            );
            return Err(ExitCode::from(EXIT_ERROR));
        }
        Ok(tileset)
    }
}

/// Parse arguments and run the selected command.
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let overrides = match &cli.command {
        Commands::Info { source, .. } | Commands::List { source, .. } | Commands::Show { source, .. } => {
            CliOverrides { cdda_root: source.game_root.clone(), ..Default::default() }
        }
        Commands::Extract { source, scale, spacing, margin, .. } => CliOverrides {
            cdda_root: source.game_root.clone(),
            scale: *scale,
            spacing: *spacing,
            margin: *margin,
            ..Default::default()
        },
        Commands::Packs { game_root } => {
            CliOverrides { cdda_root: game_root.clone(), ..Default::default() }
        }
    };
    let overrides = match &cli.command {
        Commands::List { case_sensitive: true, .. } => {
            CliOverrides { case_sensitive: Some(true), ..overrides }
        }
        _ => overrides,
    };

    let ctx = match Context::new(&cli, &overrides) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let result = match &cli.command {
        Commands::Info { source, json } => info::run_info(&ctx, source, *json),
        Commands::List { source, sheet, search, .. } => {
            list::run_list(&ctx, source, sheet.as_deref(), search.as_deref())
        }
        Commands::Show { source, tile, json } => show::run_show(&ctx, source, tile, *json),
        Commands::Extract { source, tile, output, .. } => {
            extract::run_extract(&ctx, source, tile, output.as_deref())
        }
        Commands::Packs { .. } => packs::run_packs(&ctx),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(code) => code,
    }
}
