use clap::Parser;
use dual_rasterizer::app::{run_gui, run_headless};
use dual_rasterizer::io::config::Config;
use log::{LevelFilter, info};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "CPU software rasterizer", long_about = None)]
struct Cli {
    /// Scene configuration (TOML). Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Render without a window and log frame timings
    #[arg(long)]
    headless: bool,

    /// Number of frames to render in headless mode
    #[arg(long, default_value_t = 120)]
    frames: usize,

    /// Override the window width
    #[arg(long)]
    width: Option<usize>,

    /// Override the window height
    #[arg(long)]
    height: Option<usize>,
}

fn main() -> Result<(), String> {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Config::load(path).map_err(|e| e.to_string())?
        }
        None => {
            info!("No config file given, using defaults.");
            Config::default()
        }
    };

    if let Some(width) = cli.width {
        config.window.width = width;
    }
    if let Some(height) = cli.height {
        config.window.height = height;
    }

    if cli.headless {
        run_headless(config, cli.frames)
    } else {
        run_gui(config)
    }
}
