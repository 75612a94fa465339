//! CLI argument definitions for unirip

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "unirip")]
#[command(about = "Export game assets from decoded object dumps, with a JSON manifest")]
#[command(version)]
pub struct Args {
    /// Object dump file, or directory of dump files
    pub archive: PathBuf,

    /// Output directory for exported assets
    pub out_dir: PathBuf,

    /// Path of the JSON manifest to write
    pub manifest: PathBuf,

    /// Config file (default: <config dir>/unirip/config.toml)
    #[arg(long, env = "UNIRIP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip type tags matching this glob (can specify multiple)
    #[arg(short = 'x', long)]
    pub exclude_type: Vec<String>,

    /// Pretty-print the manifest
    #[arg(long)]
    pub pretty: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
