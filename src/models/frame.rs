use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use super::VendorStamp;

/// Acquisition header of a frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameHeader {
    pub stamp: VendorStamp,
    /// Acquisition date (`YYYY/MM/DD` in the file)
    pub date: NaiveDate,
    /// Acquisition time of day (`HH:MM:SS` in the file)
    pub time: NaiveTime,
    pub information: String,
    pub system_name: String,
    pub positioning_system_name: String,
    pub detection_system_name: String,
    pub scanned_data_name: String,
}

impl FrameHeader {
    /// Date and time of the measurement, without timezone
    pub fn datetime(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}

/// Optical settings used for a frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameOptions {
    pub stamp: VendorStamp,
    /// Excitation laser wavelength in nm
    pub laser_wavelength_nm: f64,
    /// Laser power setting in mW
    pub current_power: f64,
    /// Grating groove density, as recorded (e.g. `"1800"`)
    pub grating_groove: String,
    /// Spectrometer centre wavelength in nm
    pub central_wavelength_nm: f64,
    /// Confocal pinhole size in µm
    pub pinhole_size_um: f64,
}
