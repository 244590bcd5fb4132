use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use super::{Mapping, MappingError};

/// Summary of a loaded mapping
#[derive(Debug, Clone, Serialize)]
pub struct MappingSummary {
    /// File the mapping was loaded from
    pub source: Option<String>,
    pub vendor: String,
    pub version: String,
    /// Acquisition start
    pub datetime: NaiveDateTime,
    /// Frame laser wavelength in nm
    pub laser_wavelength_nm: f64,
    /// Laser power in mW
    pub laser_power: f64,
    /// Grid points along (x, y, z)
    pub map_steps: [usize; 3],
    pub step_size: [f64; 3],
    pub step_units: [String; 3],
    /// First-to-last point distance along (x, y, z)
    pub map_size: [f64; 3],
    pub spectra_count: usize,
    pub channel_count: usize,
    /// Points per spectrum of the summarised channel
    pub spectral_points: usize,
    /// Spectral range (min, max) in nm
    pub spectral_range_nm: Option<(f64, f64)>,
    pub exposure_time_s: Option<f64>,
    pub accumulation_number: Option<u32>,
}

impl Mapping {
    /// Summarise the mapping, reporting acquisition details for `channel`
    pub fn summary(&self, channel: usize) -> Result<MappingSummary, MappingError> {
        let axis = self.spectral_axis(channel)?;
        let spectral_range_nm = if axis.is_empty() {
            None
        } else {
            let min = axis.iter().copied().fold(f64::INFINITY, f64::min);
            let max = axis.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            Some((min, max))
        };

        Ok(MappingSummary {
            source: self.source_path().map(|p| p.display().to_string()),
            vendor: self.vendor().to_string(),
            version: self.version().to_string(),
            datetime: self.datetime(),
            laser_wavelength_nm: self.laser_wavelength(),
            laser_power: self.laser_power(),
            map_steps: self.map_steps(),
            step_size: self.step_size(),
            step_units: self.step_units().map(str::to_string),
            map_size: self.map_size(),
            spectra_count: self.spectra_count(),
            channel_count: self.channel_count(),
            spectral_points: self.spectral_axis_len(channel)?,
            spectral_range_nm,
            exposure_time_s: self.exposure_time(channel)?,
            accumulation_number: self.accumulation_number(channel)?,
        })
    }
}

impl fmt::Display for MappingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            writeln!(f, "File:          {}", source)?;
        }
        writeln!(f, "Vendor:        {} {}", self.vendor, self.version)?;
        writeln!(f, "Acquired:      {}", self.datetime)?;
        writeln!(
            f,
            "Laser:         {} nm, {} mW",
            self.laser_wavelength_nm, self.laser_power
        )?;
        writeln!(
            f,
            "Grid:          {} x {} x {}",
            self.map_steps[0], self.map_steps[1], self.map_steps[2]
        )?;
        writeln!(
            f,
            "Step size:     {} {}, {} {}, {} {}",
            self.step_size[0],
            self.step_units[0],
            self.step_size[1],
            self.step_units[1],
            self.step_size[2],
            self.step_units[2]
        )?;
        writeln!(
            f,
            "Map size:      {:.3} x {:.3} x {:.3}",
            self.map_size[0], self.map_size[1], self.map_size[2]
        )?;
        writeln!(
            f,
            "Spectra:       {} ({} points each)",
            self.spectra_count, self.spectral_points
        )?;
        writeln!(f, "Channels:      {}", self.channel_count)?;
        if let Some((min, max)) = self.spectral_range_nm {
            writeln!(f, "Spectral axis: {:.2} - {:.2} nm", min, max)?;
        }
        if let Some(exposure) = self.exposure_time_s {
            writeln!(f, "Exposure:      {} s", exposure)?;
        }
        if let Some(n) = self.accumulation_number {
            writeln!(f, "Accumulations: {}", n)?;
        }
        Ok(())
    }
}
