//! OncoDetect Daemon - cancer-risk prediction service
//!
//! Accepts an image plus optional clinical context, forwards it to the
//! configured predictor and answers with one normalized risk result.

use anyhow::Result;
use clap::Parser;
use oncod::config::Config;
use oncod::{logging, server};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "oncod", version, about = "OncoDetect prediction daemon")]
struct Args {
    /// Config file to use instead of the default search paths
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_default_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::default().to_toml()?);
        return Ok(());
    }

    logging::init_tracing("info");
    info!("OncoDetect Daemon v{} starting", env!("CARGO_PKG_VERSION"));

    let mut config = match &args.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load(),
    };
    config.apply_env(|var| std::env::var(var).ok())?;

    server::run(config).await
}
