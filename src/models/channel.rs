use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::VendorStamp;
use crate::units::SpectralUnit;

/// Spectral unit a channel claims for its axis
///
/// This is a reporting label only. NanoFinder stores the axis array in nm
/// whatever this field says.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChannelAxisUnit {
    #[serde(rename = "nm")]
    Nanometer,
    #[serde(rename = "cm-1")]
    Wavenumber,
    #[serde(rename = "eV")]
    ElectronVolt,
}

impl ChannelAxisUnit {
    /// Token used in SMD files
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelAxisUnit::Nanometer => "nm",
            ChannelAxisUnit::Wavenumber => "cm-1",
            ChannelAxisUnit::ElectronVolt => "eV",
        }
    }

    /// Matching conversion unit
    pub fn spectral_unit(&self) -> SpectralUnit {
        match self {
            ChannelAxisUnit::Nanometer => SpectralUnit::Nanometer,
            ChannelAxisUnit::Wavenumber => SpectralUnit::Wavenumber,
            ChannelAxisUnit::ElectronVolt => SpectralUnit::ElectronVolt,
        }
    }
}

impl fmt::Display for ChannelAxisUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelAxisUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "nm" => Ok(ChannelAxisUnit::Nanometer),
            "cm-1" | "cm_1" | "1/cm" => Ok(ChannelAxisUnit::Wavenumber),
            "eV" | "ev" => Ok(ChannelAxisUnit::ElectronVolt),
            other => Err(other.to_string()),
        }
    }
}

/// Acquisition details recovered from a channel's free-text notes
///
/// Every field is optional; firmware versions differ in which notes they write.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChannelInfo {
    /// CCD temperature in °C
    pub temperature: Option<f64>,
    /// Exposure time of one acquisition in seconds
    pub exposure_time_s: Option<f64>,
    /// Full cycle time of one acquisition in seconds
    pub cycle_time_s: Option<f64>,
    /// Lower-cased acquisition mode (e.g. `"accumulate"`, `"single"`)
    pub acquisition_mode: Option<String>,
    /// Number of summed exposures in accumulate mode
    pub accumulation_number: Option<u32>,
}

impl ChannelInfo {
    pub fn is_empty(&self) -> bool {
        *self == ChannelInfo::default()
    }
}

/// One detector channel: its spectral axis and acquisition settings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Channel {
    /// `N` in the `Channel<N>` tag this channel was read from
    pub index: usize,
    pub device_guid: String,
    pub device_name: String,
    /// e.g. `"Photons"`
    pub data_channel_name: String,
    /// e.g. `"Counts"`
    pub data_channel_unit: String,
    /// Number of points in each spectrum
    pub channel_size: usize,
    /// e.g. `"Wavelength"`
    pub channel_axis_name: String,
    pub channel_axis_unit: ChannelAxisUnit,
    /// Excitation wavelength recorded with this channel, in nm
    pub channel_axis_laser_wavelength_nm: f64,
    /// Spectral axis, always in nm
    pub channel_axis_array: Vec<f64>,
    pub channel_info: ChannelInfo,
}

/// Calibration block holding the channel definitions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataCalibration {
    pub stamp: VendorStamp,
    /// Channels ordered by their index
    pub channels: Vec<Channel>,
}
