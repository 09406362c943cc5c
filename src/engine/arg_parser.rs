use clap::Parser;
use std::path::PathBuf;

use crate::utils::config::PackagePaths;

struct DefaultArgs;

impl DefaultArgs {
    pub const DIR: &'static str = ".";
}

/// Directory-watching record ingester.
#[derive(Clone, Parser)]
#[command(name = "linetap")]
#[command(
    about = "Watch a directory; decode each file's lines into typed records on stdout, failures on stderr."
)]
pub struct Cli {
    /// Directory to watch. Default: current directory.
    #[arg(value_name = "DIR", default_value = DefaultArgs::DIR)]
    pub dir: PathBuf,

    /// Path to the config file carrying the record schema. Default:
    /// `.linetap.toml` in DIR.
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Filename glob; only matching files are ingested (e.g. `*.csv`).
    #[arg(long, short)]
    pub pattern: Option<String>,

    /// Scan interval in milliseconds.
    #[arg(long, short)]
    pub interval: Option<u64>,

    /// Worker threads (one file per worker). Default: derived from CPU count
    /// and the FD limit.
    #[arg(long, short)]
    pub workers: Option<usize>,

    /// File signature scheme for duplicate detection: `mtime-size` or `content`.
    #[arg(long, short)]
    pub signature: Option<String>,

    /// Scan subdirectories too.
    #[arg(long, short = 'r', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub recursive: Option<bool>,

    /// Re-emit files on every scan instead of suppressing duplicates.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub no_dedupe: Option<bool>,

    /// Scan once, drain every dispatched file, and exit.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub once: Option<bool>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,
}

impl Cli {
    /// Get the config file path, defaulting to the package config filename
    /// in the watched directory.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| self.dir.join(PackagePaths::get().config_filename()))
    }
}
