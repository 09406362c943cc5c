//! Linetap CLI: watch a directory and decode delimiter-separated records
//! from dropped files.

use anyhow::Result;
use clap::Parser;
use linetap::engine::Cli;
use linetap::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
