//! unirip - export game assets from decoded object dumps
//!
//! `unirip <archive> <out_dir> <manifest>` always tries to write the manifest;
//! the exit code is 0 only when it reports `ok: true`.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use unirip::{AssetEntry, DumpSource, Manifest};

mod cli;
mod config;

use cli::Args;
use config::Config;

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(usage_status(&e));
        }
    };

    let config = Config::load(args.config.as_deref());
    let log_level = config.as_ref().ok().and_then(|c| c.log_level.as_deref());
    init_logging(args.verbose, log_level);

    let pretty = args.pretty || config.as_ref().map(|c| c.pretty_manifest).unwrap_or(false);
    let manifest = match config {
        Ok(config) => run(&args, &config),
        Err(e) => failure(e),
    };

    ExitCode::from(finish(&manifest, &args.manifest, pretty))
}

/// Exit status for an argument parse error; --help and --version are not usage errors
fn usage_status(e: &clap::Error) -> u8 {
    if e.use_stderr() {
        1
    } else {
        0
    }
}

/// Persist the manifest and pick the exit status: 0 only for a written `ok: true` manifest
fn finish(manifest: &Manifest, path: &Path, pretty: bool) -> u8 {
    if let Err(e) = manifest.write(path, pretty) {
        tracing::error!("Failed to write manifest {}: {}", path.display(), e);
        return 1;
    }

    tracing::info!("Done. {} assets extracted.", manifest.assets().len());

    if manifest.ok {
        0
    } else {
        1
    }
}

fn init_logging(verbose: bool, log_level: Option<&str>) {
    let default = if verbose {
        "debug"
    } else {
        log_level.unwrap_or("info")
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Run the extraction and fold any fatal error into a failure manifest
fn run(args: &Args, config: &Config) -> Manifest {
    match extract_all(args, config) {
        Ok(assets) => Manifest::success(assets),
        Err(e) => failure(e),
    }
}

fn failure(e: anyhow::Error) -> Manifest {
    tracing::error!("{:#}", e);
    Manifest::failure(format!("{:#}", e), format!("{:?}", e))
}

fn extract_all(args: &Args, config: &Config) -> Result<Vec<AssetEntry>> {
    tracing::info!("Loading: {}", args.archive.display());
    let source = DumpSource::load(&args.archive)
        .with_context(|| format!("Failed to open {}", args.archive.display()))?;
    tracing::info!("Loaded {} objects. Iterating objects...", source.len());

    let options = config.extract_options(&args.exclude_type);
    let extraction = unirip::extract(&source, &args.out_dir, &options).with_context(|| {
        format!(
            "Failed to prepare output directory {}",
            args.out_dir.display()
        )
    })?;

    Ok(extraction.assets)
}
