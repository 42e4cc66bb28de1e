/// Offaxis Terminal - Viewing Conditions Diagram
///
/// Top-down view of a stereo display, the positions its content was rendered
/// for, and where the viewer actually is, with the hinge stimulus as
/// authored and as perceived.
/// Controls:
///   - A/D, W/S: Viewing angle and distance
///   - J/L, I/K: Projection angle and distance
///   - [ / ]: Eye separation
///   - - / =: Hinge angle
///   - M: Toggle mono/stereo
///   - Q/ESC: Quit
use std::fs::File;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use offaxis_core::DisplayConfig;
use offaxis_terminal::TerminalApp;

#[derive(Debug, Parser)]
#[command(version, about = "Terminal diagram of stereo viewing distortion")]
struct Args {
    /// Display configuration (JSON). Defaults to a 27" 16:9 stereo screen.
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Write logs to this file; the terminal itself is taken by the diagram.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log at debug level instead of info.
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        use simplelog::LevelFilter::{Debug, Info, Off};
        simplelog::WriteLogger::init(
            if args.verbose { Debug } else { Info },
            simplelog::ConfigBuilder::new()
                .set_target_level(Off)
                .set_location_level(Off)
                .build(),
            File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?,
        )
        .context("failed to initialize logging")?;
    }

    let config = match &args.config {
        Some(path) => DisplayConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => DisplayConfig::default(),
    };
    log::info!("starting diagram, stereo = {}", config.stereo);

    let mut app = TerminalApp::new(config)?;
    app.run()?;

    Ok(())
}
