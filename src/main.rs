//! ptv - command-line trait viewer for 24x24 pixel-art sprites

use std::process::ExitCode;

use pixeltraits::cli;

fn main() -> ExitCode {
    cli::run()
}
