use clap::Parser;
use log::{error, info};

use curvefill::RenderConfig;

mod commands;
mod scenes;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, default_value_t = 512)]
    width: u32,
    #[arg(long, default_value_t = 512)]
    height: u32,

    /// Cubic approximation threshold in pixels
    #[arg(short, long, default_value_t = curvefill::config::DEFAULT_PRECISION)]
    precision: f32,

    #[arg(short, long, value_enum, default_value_t = scenes::Scene::Blob)]
    scene: scenes::Scene,
}

#[derive(Parser, Debug)]
enum Commands {
    Render(commands::render::Config),
    Trace(commands::trace::Config),
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let config = RenderConfig::default().with_precision(cli.precision);
    info!(
        "scene {:?} on a {}x{} canvas, precision {}",
        cli.scene, cli.width, cli.height, cli.precision
    );

    let result = match cli.command {
        Commands::Render(cfg) => {
            commands::render::command(cli.scene, cli.width, cli.height, config, cfg)
        }
        Commands::Trace(cfg) => {
            commands::trace::command(cli.scene, cli.width, cli.height, config, cfg)
        }
    };
    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}
