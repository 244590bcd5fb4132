use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use nanofinder::units::SpectralUnit;

mod config;
mod convert;
mod export;
mod info;

/// nanofinder - NanoFinder SMD scan file tool
#[derive(Parser)]
#[command(name = "nanofinder")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Batch dispatch flags for directory inputs
#[derive(Args, Debug, Default)]
pub struct BatchArgs {
    /// Load in parallel once the directory holds more than N files
    #[arg(long, value_name = "N", conflicts_with_all = ["sequential", "parallel"])]
    parallel_threshold: Option<usize>,

    /// Always load files one after another
    #[arg(long, conflicts_with = "parallel")]
    sequential: bool,

    /// Always load files in parallel (requires the parallel feature)
    #[arg(long)]
    parallel: bool,

    /// Skip files that fail to load instead of aborting
    #[arg(long)]
    skip_errors: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Display information about an SMD file
    Info {
        /// Input SMD file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,

        /// Channel to report acquisition details for
        #[arg(long, default_value_t = 0)]
        channel: usize,
    },

    /// Export spectra and grid coordinates to CSV
    Export {
        /// Input SMD file or directory of SMD files
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output directory (defaults to the current directory)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// File stem for a single-file export
        #[arg(long, value_name = "STEM")]
        filename: Option<String>,

        /// Spectral unit of the header (nm, cm_1, eV, raman_shift)
        #[arg(short, long)]
        units: Option<SpectralUnit>,

        /// Also write the grid coordinates table
        #[arg(long)]
        mapcoords: bool,

        /// Channel whose spectral axis heads the table
        #[arg(long)]
        channel: Option<usize>,

        #[command(flatten)]
        batch: BatchArgs,
    },

    /// Convert values between spectral units
    Convert {
        /// Values to convert
        #[arg(value_name = "VALUE", required = true, allow_negative_numbers = true)]
        values: Vec<f64>,

        /// Unit of the input values
        #[arg(long)]
        from: SpectralUnit,

        /// Unit to convert to
        #[arg(long)]
        to: SpectralUnit,

        /// Laser wavelength in nm, for Raman shift
        #[arg(long, default_value_t = nanofinder::units::DEFAULT_LASER_WAVELENGTH_NM)]
        laser: f64,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => config::Config::from_file(path)?,
        None => config::Config::default(),
    };

    match cli.command {
        Commands::Info {
            file,
            json,
            channel,
        } => info::run(file, json, channel),
        Commands::Export {
            input,
            output,
            filename,
            units,
            mapcoords,
            channel,
            batch,
        } => export::run(
            input,
            output,
            export::ExportArgs {
                filename,
                units,
                mapcoords,
                channel,
            },
            batch,
            config,
        ),
        Commands::Convert {
            values,
            from,
            to,
            laser,
        } => convert::run(values, from, to, laser),
    }
}
