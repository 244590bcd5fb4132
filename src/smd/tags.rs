//! Tag names used in NanoFinder SMD headers
//!
//! Each module lists the tags read for one typed block. Several tags are
//! misspelled by the instrument software (`Dimentions`); the correctly
//! spelled form is accepted as an alias.

#![allow(non_snake_case)]

/// Vendor stamp present on most blocks
pub const VENDOR: &str = "Vendor";
pub const VERSION: &str = "Version";

/// Conventional root element
pub const ROOT: &str = "SCANDATA";

pub mod SCANNED_FRAME {
    pub const TAG: &str = "ScannedFrameParameters";
    pub const SCAN_REPEAT_NUMBER: &str = "ScanRepeatNumber";
    pub const DATA_BLOCK_SIZE_BYTES: &str = "DataBlockSizeBytes";
}

pub mod FRAME_HEADER {
    pub const TAG: &str = "FrameHeader";
    pub const DATE: &str = "Date";
    pub const TIME: &str = "Time";
    pub const INFORMATION: &str = "Information";
    pub const SYSTEM_NAME: &str = "SystemName";
    pub const POSITIONING_SYSTEM_NAME: &str = "PositioningSysName";
    pub const DETECTION_SYSTEM_NAME: &str = "DetectionSysName";
    pub const SCANNED_DATA_NAME: &str = "ScannedDataName";
}

pub mod FRAME_OPTIONS {
    pub const TAG: &str = "FrameOptions";
    pub const LASER_WAVELENGTH_NM: &str = "OmuLaserWLnm";
    pub const CURRENT_POWER: &str = "OmuCurPower";
    pub const GRATING_GROOVE: &str = "OmuGratingGroove";
    pub const CENTRAL_WAVELENGTH_NM: &str = "OmuCentralWaveLengthNM";
    pub const PINHOLE_SIZE: &str = "OmuPinHoleSize";
}

pub mod STAGE_3D {
    pub const TAG: &str = "Stage3DParameters";
    pub const AXIS_SIZE_X: &str = "AxisSizeX";
    pub const AXIS_SIZE_Y: &str = "AxisSizeY";
    pub const AXIS_SIZE_Z: &str = "AxisSizeZ";
    /// Spelling written by the instrument first, then the corrected one
    pub const STAGE_AXES: [&str; 2] = ["StageAxesDimentions", "StageAxesDimensions"];
    pub const AXIS_X: &str = "AxisX";
    pub const AXIS_Y: &str = "AxisY";
    pub const AXIS_Z: &str = "AxisZ";
}

pub mod AXIS {
    pub const IN_USE: &str = "AxisIsInUse";
    pub const INVERSED: &str = "AxisIsInversed";
    pub const NAME: &str = "AxisName";
    pub const UNIT_NAME: &str = "AxisUnitName";
    pub const COUNT_STEP: &str = "AxisCountStep";
    pub const SCALE_FLOAT: &str = "AxisScaleFloat";
}

pub mod CALIBRATION {
    pub const TAG: &str = "DataCalibration";
    pub const DATA_DIMENSIONS: [&str; 2] = ["DataDimentions", "DataDimensions"];
    /// Channel blocks are named `Channel0`, `Channel1`, ...
    pub const CHANNEL_PREFIX: &str = "Channel";
}

pub mod CHANNEL {
    pub const DEVICE_GUID: &str = "DeviceGuid";
    pub const DEVICE_NAME: &str = "DeviceName";
    pub const DATA_CHANNEL_NAME: &str = "DataChannelName";
    pub const DATA_CHANNEL_UNIT: &str = "DataChannelUnit";
    pub const CHANNEL_SIZE: &str = "ChannelSize";
    pub const AXIS_NAME: &str = "ChannelAxisName";
    pub const AXIS_UNIT: &str = "ChannelAxisUnit";
    pub const AXIS_LASER_WL: &str = "ChannelAxisLaserWl";
    pub const AXIS_ARRAY: &str = "ChannelAxisArray";
    pub const INFO: &str = "ChannelInfo";
}

/// Index `N` of a `Channel<N>` tag, if `tag` is one
pub fn channel_index(tag: &str) -> Option<usize> {
    let digits = tag.strip_prefix(CALIBRATION::CHANNEL_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
