use anyhow::{Context, Result};
use clap::Parser;
use i2b2prep::corpus;
use i2b2prep::{Config, RunOptions};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "i2b2prep")]
#[command(about = "Flatten i2b2 TLINK annotations into train.txt / test.txt")]
struct Args {
    /// Config file (defaults to $I2B2PREP_CONFIG, then ./i2b2prep.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load(args.config.as_deref())?;

    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", config.prep.log_level.as_str())
    ).init();

    let options = RunOptions::from(&config.corpus);

    let train_out = config.train_output();
    log::info!("Training corpus: {}", config.corpus.train_dir.display());
    let train = corpus::run(&config.corpus.train_dir, &train_out, &options)
        .with_context(|| format!("Failed to build {}", train_out.display()))?;

    let test_out = config.test_output();
    log::info!("Test corpus: {}", config.corpus.test_dir.display());
    let test = corpus::run(&config.corpus.test_dir, &test_out, &options)
        .with_context(|| format!("Failed to build {}", test_out.display()))?;

    log::info!("=== Flattening Complete ===");
    log::info!("Train rows: {} ({} files)", train.total_rows(), train.files.len());
    log::info!("Test rows: {} ({} files)", test.total_rows(), test.files.len());

    Ok(())
}
