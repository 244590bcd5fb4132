//! # nanofinder
//!
//! Command-line tool for NanoFinder SMD scan files.
//!
//! ## Usage
//!
//! ```bash
//! # Summarise a scan
//! nanofinder info scan.smd
//!
//! # Export spectra (Raman shift header) and grid coordinates
//! nanofinder export scan.smd -o out --units raman_shift --mapcoords
//!
//! # Export every scan in a directory, skipping unreadable files
//! nanofinder export scans/ -o out --skip-errors
//!
//! # Convert values between spectral units
//! nanofinder convert 520 560 --from nm --to raman_shift --laser 532
//! ```

mod cli;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
