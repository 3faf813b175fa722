//! Tileview - command-line tool for inspecting sprite-sheet tilesets

use std::process::ExitCode;

use tileview::cli;

fn main() -> ExitCode {
    cli::run()
}
