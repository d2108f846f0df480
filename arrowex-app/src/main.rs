//! Arrow motion task: windowed front end

mod app;
pub use app::{App, AppOptions};

use anyhow::Result;
use arrowex_experiment::ExperimentConfig;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "arrowex")]
#[command(version, about = "Arrow motion pointer deviation task", long_about = None)]
pub struct Args {
    /// Experiment configuration (TOML); built-in defaults when omitted
    #[arg(short, long, env = "ARROWEX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Per-round results, one JSON object per line
    #[arg(short, long, default_value = "results.jsonl")]
    pub output: PathBuf,

    /// Pretty JSON summary written at session completion
    #[arg(long, default_value = "experiment_results.json")]
    pub summary: PathBuf,

    /// Kinematics chart written when results are requested
    #[arg(long, default_value = "kinematics.png")]
    pub chart: PathBuf,

    /// Seed for the schedule and stimulus layouts
    #[arg(long)]
    pub seed: Option<u64>,

    /// TTF/OTF font for button labels
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Verbose logging (can be specified multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    info!("arrowex v{}", env!("CARGO_PKG_VERSION"));
    info!("Platform: {} {}", std::env::consts::OS, std::env::consts::ARCH);

    let config = match &args.config {
        Some(path) => ExperimentConfig::load(path)?,
        None => ExperimentConfig::default(),
    };
    tracing::debug!("Config: {:?}", config);

    let options = AppOptions {
        results: args.output,
        summary: args.summary,
        chart: args.chart,
        seed: args.seed,
        font: args.font,
    };
    App::new(config, options)?.run()
}

fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

fn init_logging(verbose: u8) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "arrowex={level},arrowex_app={level},arrowex_experiment={level},arrowex_render={level},arrowex_timing={level},wgpu=warn,warn",
            level = log_level(verbose)
        ))
    });
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}
