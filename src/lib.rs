//! # nanofinder - NanoFinder SMD scan files
//!
//! `nanofinder` reads the `.smd` map files written by NanoFinder Raman /
//! photoluminescence microscopes and exposes each scan as a typed, read-only
//! [`Mapping`](mapping::Mapping).
//!
//! ## Key Features
//!
//! - **Dual-format reader**: splits the XML header from the trailing
//!   little-endian `f32` payload without copying the payload twice.
//!
//! - **Typed header**: frame, optics, stage geometry and per-channel
//!   calibration, with errors that name the offending file and tag path.
//!
//! - **Spectral units**: exact conversion between nm, cm⁻¹, eV and Raman
//!   shift, routed through wavenumber.
//!
//! - **Export**: row-aligned spectra and grid-coordinate tables, written to
//!   CSV.
//!
//! - **Batch loading**: whole directories, sequential or parallel, with an
//!   explicit failure policy.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use nanofinder::prelude::*;
//!
//! let mapping = load_smd("Raman_BLG.smd")?;
//! println!("{}", mapping.summary(0)?);
//!
//! let options = ExportOptions {
//!     spectral_units: Some(SpectralUnit::RamanShift),
//!     save_mapcoords: true,
//!     ..Default::default()
//! };
//! write_csv(&mapping, Path::new("out"), &options)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`smd`]: file reader, header tree, schema mapper, payload decoder and
//!   best-effort writer
//! - [`models`]: typed header hierarchy
//! - [`units`]: spectral unit conversion
//! - [`mapping`]: the loaded scan and its derived metrics
//! - [`export`]: tabular export and CSV sink
//! - [`batch`]: directory loading

#![deny(rustdoc::missing_crate_level_docs)]

pub mod batch;
pub mod export;
pub mod mapping;
pub mod models;
pub mod smd;
pub mod units;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::batch::{
        find_smd_files, iter_smd_folder, load_files, load_smd_folder, BatchConfig, BatchOutcome,
        Dispatch, FailurePolicy,
    };
    pub use crate::export::{
        write_csv, CoordinatesTable, ExportError, ExportOptions, GridCoordinate, SpectraTable,
    };
    pub use crate::mapping::{GridView, Mapping, MappingError, MappingSummary};
    pub use crate::models::{
        Axis, Channel, ChannelAxisUnit, ChannelInfo, DataCalibration, FrameHeader, FrameOptions,
        ScannedFrameParameters, Stage3DParameters, StageAxes, VendorStamp,
    };
    pub use crate::smd::{load_smd, load_smd_bytes, write_smd, SmdError, SpectraMatrix};
    pub use crate::units::{
        convert_spectral_units, convert_spectral_units_str, SpectralUnit, UnitError,
    };
}
