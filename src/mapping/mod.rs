//! # Mapping Aggregate
//!
//! A [`Mapping`] is one loaded SMD scan: the typed header together with the
//! spectra matrix decoded from the payload. It is built once by the loader
//! and never mutated afterwards; every query below is derived on demand.
//!
//! ## Features
//!
//! - **Geometry**: step sizes, grid dimensions and physical map extent
//! - **Acquisition**: laser, timing and per-channel acquisition notes
//! - **Spectral axis**: the stored axis (always nm) and its conversion to
//!   any [`SpectralUnit`]
//! - **Grid view**: spectra addressed by `(x, y)` grid position
//!
//! ## Example
//!
//! ```rust,no_run
//! use nanofinder::prelude::*;
//!
//! let mapping = load_smd("scan.smd")?;
//! let [nx, ny, _] = mapping.map_steps();
//! println!("{} x {} grid, laser {} nm", nx, ny, mapping.laser_wavelength());
//!
//! let shift = mapping.to_spectral_units(Some(SpectralUnit::RamanShift), 0)?;
//! println!("Raman shift range: {:?} .. {:?}", shift.first(), shift.last());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod grid;
mod summary;


pub use error::MappingError;
pub use grid::GridView;
pub use summary::MappingSummary;

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use log::warn;

use crate::models::{Channel, ChannelAxisUnit, ScannedFrameParameters, VendorStamp};
use crate::smd::{SmdError, SpectraMatrix};
use crate::units::{convert_spectral_units, SpectralUnit};

/// One loaded SMD scan
#[derive(Debug, Clone, PartialEq)]
pub struct Mapping {
    stamp: VendorStamp,
    parameters: ScannedFrameParameters,
    data: SpectraMatrix,
    source: Option<PathBuf>,
}

impl Mapping {
    /// Assemble a mapping from a mapped header and its decoded payload
    ///
    /// The spectra must be exactly as wide as the first declared channel.
    pub fn from_parts(
        stamp: VendorStamp,
        parameters: ScannedFrameParameters,
        data: SpectraMatrix,
    ) -> Result<Self, SmdError> {
        let first = parameters
            .data_calibration
            .channels
            .first()
            .ok_or_else(|| SmdError::NoChannels("DataCalibration".to_string()))?;
        if first.channel_size != data.row_width() {
            return Err(SmdError::PayloadSizeMismatch {
                values: data.as_slice().len(),
                row_width: first.channel_size,
            });
        }
        Ok(Self {
            stamp,
            parameters,
            data,
            source: None,
        })
    }

    /// Record the file this mapping was loaded from
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    /// File this mapping was loaded from, if any
    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Root vendor stamp
    pub fn stamp(&self) -> &VendorStamp {
        &self.stamp
    }

    pub fn vendor(&self) -> &str {
        &self.stamp.vendor
    }

    pub fn version(&self) -> &str {
        &self.stamp.version
    }

    pub fn scanned_frame_parameters(&self) -> &ScannedFrameParameters {
        &self.parameters
    }

    /// Spectra, one row per scan position
    pub fn data(&self) -> &SpectraMatrix {
        &self.data
    }

    /// Number of spectra in the payload
    pub fn spectra_count(&self) -> usize {
        self.data.n_rows()
    }

    // --- Channels ---

    pub fn channels(&self) -> &[Channel] {
        &self.parameters.data_calibration.channels
    }

    pub fn channel_count(&self) -> usize {
        self.channels().len()
    }

    pub fn has_multiple_channels(&self) -> bool {
        self.channel_count() > 1
    }

    /// Channel by position in the declared channel list
    pub fn channel(&self, index: usize) -> Result<&Channel, MappingError> {
        self.channels()
            .get(index)
            .ok_or(MappingError::ChannelNotFound {
                index,
                available: self.channel_count(),
            })
    }

    /// Stored spectral axis of a channel, in nm
    pub fn spectral_axis(&self, channel: usize) -> Result<&[f64], MappingError> {
        Ok(&self.channel(channel)?.channel_axis_array)
    }

    /// Number of points per spectrum for a channel
    pub fn spectral_axis_len(&self, channel: usize) -> Result<usize, MappingError> {
        Ok(self.channel(channel)?.channel_size)
    }

    /// Exposure time in seconds, when recorded
    pub fn exposure_time(&self, channel: usize) -> Result<Option<f64>, MappingError> {
        Ok(self.channel(channel)?.channel_info.exposure_time_s)
    }

    /// Accumulation count, when the channel was acquired in accumulate mode
    pub fn accumulation_number(&self, channel: usize) -> Result<Option<u32>, MappingError> {
        Ok(self.channel(channel)?.channel_info.accumulation_number)
    }

    /// Unit label declared for a channel axis
    ///
    /// For reporting only: the stored axis is nm whatever this says.
    pub fn channel_axis_unit(&self, channel: usize) -> Result<ChannelAxisUnit, MappingError> {
        Ok(self.channel(channel)?.channel_axis_unit)
    }

    // --- Acquisition ---

    /// Frame-level laser wavelength in nm
    pub fn laser_wavelength(&self) -> f64 {
        self.parameters.frame_options.laser_wavelength_nm
    }

    /// Laser power in mW
    pub fn laser_power(&self) -> f64 {
        self.parameters.frame_options.current_power
    }

    pub fn datetime(&self) -> NaiveDateTime {
        self.parameters.frame_header.datetime()
    }

    pub fn date(&self) -> NaiveDate {
        self.parameters.frame_header.date
    }

    // --- Geometry ---

    /// Step size along (x, y, z)
    pub fn step_size(&self) -> [f64; 3] {
        self.parameters.stage_3d_parameters.stage_axes.step_size()
    }

    /// Step units along (x, y, z)
    pub fn step_units(&self) -> [&str; 3] {
        self.parameters.stage_3d_parameters.stage_axes.step_units()
    }

    /// Grid points along (x, y, z)
    pub fn map_steps(&self) -> [usize; 3] {
        self.parameters.stage_3d_parameters.map_steps()
    }

    /// Distance from the first to the last sampled point along (x, y, z)
    pub fn map_size(&self) -> [f64; 3] {
        let step = self.step_size();
        let steps = self.map_steps();
        std::array::from_fn(|i| step[i] * (steps[i] as f64 - 1.0))
    }

    // --- Spectral axis ---

    /// Laser line used for Raman shift conversions on `channel`
    ///
    /// The channel's own reference when it is usable, else the frame laser.
    pub fn reference_laser_wavelength(&self, channel: usize) -> Result<f64, MappingError> {
        let laser = self.channel(channel)?.channel_axis_laser_wavelength_nm;
        if laser.is_finite() && laser > 0.0 {
            Ok(laser)
        } else {
            warn!(
                "Channel {} has no usable laser reference ({}); using the frame laser",
                channel, laser
            );
            Ok(self.laser_wavelength())
        }
    }

    /// Spectral axis of `channel` in `unit`, or as stored when `unit` is `None`
    pub fn to_spectral_units(
        &self,
        unit: Option<SpectralUnit>,
        channel: usize,
    ) -> Result<Vec<f64>, MappingError> {
        let axis = self.spectral_axis(channel)?.to_vec();
        match unit {
            None | Some(SpectralUnit::Nanometer) => Ok(axis),
            Some(unit) => Ok(convert_spectral_units(
                axis,
                SpectralUnit::Nanometer,
                unit,
                self.reference_laser_wavelength(channel)?,
            )),
        }
    }

    /// [`Mapping::to_spectral_units`] with the unit given as a token
    pub fn to_spectral_units_str(
        &self,
        unit: Option<&str>,
        channel: usize,
    ) -> Result<Vec<f64>, MappingError> {
        let unit = unit.map(str::parse::<SpectralUnit>).transpose()?;
        self.to_spectral_units(unit, channel)
    }

    // --- Grid ---

    /// Spectra of `channel` addressed as an `(x, y)` grid
    ///
    /// Reinterprets the rows as `axis_size_x` blocks of `axis_size_y` spectra.
    /// Only the first channel has spectra in the payload.
    pub fn reshape_to_grid(&self, channel: usize) -> Result<GridView<'_>, MappingError> {
        let grid = self.loaded_channel(channel).and_then(|_| {
            let [nx, ny, _] = self.map_steps();
            GridView::new(&self.data, nx, ny)
        });
        grid.map_err(|e| self.tag_source(e))
    }

    /// Channel whose spectra fill the rows of [`Mapping::data`]
    pub(crate) fn loaded_channel(&self, channel: usize) -> Result<&Channel, MappingError> {
        let ch = self.channel(channel)?;
        if channel != 0 || ch.channel_size != self.data.row_width() {
            return Err(MappingError::ChannelNotLoaded {
                index: channel,
                channel_size: ch.channel_size,
                row_width: self.data.row_width(),
            });
        }
        Ok(ch)
    }

    /// Attach the source file to `err`, when this mapping was loaded from disk
    pub(crate) fn tag_source(&self, err: MappingError) -> MappingError {
        match &self.source {
            Some(path) => err.in_file(path),
            None => err,
        }
    }
}
