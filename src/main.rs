use clap::Parser;
use env_logger::{Builder, Env};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use tidewater::config::Config;
use tidewater::estimator::EstimatorSet;
use tidewater::retrieval::WaterProcessor;
use tidewater::scene::Scene;
use tidewater::utils;
use tidewater::writers;

#[derive(Parser, Debug)]
#[command(name = "tidewater")]
#[command(about = "Water constituent and atmospheric correction retrieval for MERIS L1b scenes")]
struct Args {
    /// Processing configuration (JSON)
    #[arg(short, long)]
    config: PathBuf,

    /// Worker threads, overrides the configuration file
    #[arg(short, long)]
    threads: Option<usize>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = Config::from_file(&args.config)?;
    if let Some(threads) = args.threads {
        config.set_threads(threads)?;
    }

    if let Some(threads) = config.threads() {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }
    log::info!(
        "Processing {} with {} threads",
        config.scene_directory().display(),
        rayon::current_num_threads()
    );

    let estimators = EstimatorSet::from_file(config.estimators())?;
    let processor = WaterProcessor::new(config.processing().clone(), estimators);
    let scene = Scene::load(config.scene_directory(), processor.bands())?;

    let cancel = AtomicBool::new(false);
    let processed = processor.process(&scene, &cancel)?;
    utils::log_output_statistics(&processed);

    writers::write_product(&processed, &scene, config.output_directory())?;

    Ok(())
}
