//! silhouette - terminal music player with a mirrored frequency silhouette
//!
//! Run with: cargo run -- song.mp3 other.m4a

mod app;
mod controls;
mod logging;
mod ui;

use std::path::PathBuf;

use clap::Parser;
use tracing::level_filters::LevelFilter;

use app::App;
use controls::TerminalTitle;
use silhouette::{io::CpalBackend, Player, PlayerConfig};

#[derive(Parser, Debug)]
#[command(name = "silhouette")]
#[command(about = "Music player with a perceptually shaped frequency silhouette", long_about = None)]
struct Args {
    /// Audio files to queue, in order
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Fade-in when a song starts or resumes (seconds)
    #[arg(long, value_name = "SECONDS", default_value_t = 0.8)]
    fade_in: f64,

    /// Fade-out when pausing (seconds)
    #[arg(long, value_name = "SECONDS", default_value_t = 0.5)]
    fade_out: f64,

    /// Where to write logs; the terminal is taken by the UI
    #[arg(long, value_name = "PATH", default_value = "silhouette.log")]
    log_file: PathBuf,

    /// Log level used when RUST_LOG is not set
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    let _log_guard = logging::init(&args.log_file, args.log_level)?;

    let config = PlayerConfig::new()
        .fade_in(args.fade_in)
        .fade_out(args.fade_out);
    let mut player = Player::new(config, Box::new(CpalBackend::new()))
        .with_media_controls(TerminalTitle::new());
    player.add_files(&args.files);

    let mut terminal = ratatui::init();
    let result = App::new(player).run(&mut terminal);
    ratatui::restore();
    result
}
