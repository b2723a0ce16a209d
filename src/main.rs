//! tradfile - stage PDF documents and translate them in batches
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;

use clap::Parser;
use tradfile_app::config::resolve_config_dir;
use tradfile_core::prelude::*;

/// tradfile - stage PDF documents and translate them in batches
#[derive(Parser, Debug)]
#[command(name = "tradfile")]
#[command(
    about = "Stage PDF documents and translate them in batches",
    long_about = "Reads commands from stdin, one per line, and reports state changes \
                  as newline-delimited JSON on stdout."
)]
struct Args {
    /// Directory holding config.toml and the preferences store
    /// (default: $TRADFILE_CONFIG_DIR, then the platform config dir)
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    tradfile_core::logging::init()?;

    let config_dir = resolve_config_dir(args.config_dir)?;
    info!("Using config dir {}", config_dir.display());

    match tradfile::run_headless(&config_dir).await {
        Err(e) if e.is_fatal() => Err(e.into()),
        Err(e) => {
            error!("Headless session ended early: {}", e);
            Ok(())
        }
        Ok(()) => Ok(()),
    }
}
