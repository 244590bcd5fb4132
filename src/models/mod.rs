//! Typed model of an SMD scan header
//!
//! The header of an SMD file decodes into a tree rooted at
//! [`ScannedFrameParameters`]:
//!
//! ```text
//! ScannedFrameParameters
//! ├── FrameHeader          (date, time, system names)
//! ├── FrameOptions         (laser, grating, pinhole)
//! ├── Stage3DParameters    (grid size + per-axis step geometry)
//! │   └── StageAxes { x, y, z: Axis }
//! └── DataCalibration
//!     └── Channel*         (spectral axis, acquisition notes)
//!         └── ChannelInfo
//! ```
//!
//! Every block carries a [`VendorStamp`]; stamps are descriptive only and are
//! never checked against a list of known firmware.

mod channel;
mod frame;
mod stage;


pub use channel::{Channel, ChannelAxisUnit, ChannelInfo, DataCalibration};
pub use frame::{FrameHeader, FrameOptions};
pub use stage::{Axis, Stage3DParameters, StageAxes};

use serde::Serialize;

/// Vendor/version pair attached to each header block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VendorStamp {
    /// Vendor name
    pub vendor: String,
    /// Firmware or format version
    pub version: String,
}

impl VendorStamp {
    /// Create a stamp from its two parts
    pub fn new(vendor: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            vendor: vendor.into(),
            version: version.into(),
        }
    }
}

/// Everything the instrument recorded about one scanned frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScannedFrameParameters {
    /// Block stamp (empty when the file does not record one here)
    pub stamp: VendorStamp,
    /// Number of times the frame was scanned
    pub scan_repeat_number: i64,
    /// Declared size of the binary payload, when recorded
    pub data_block_size_bytes: Option<u64>,
    pub frame_header: FrameHeader,
    pub frame_options: FrameOptions,
    pub stage_3d_parameters: Stage3DParameters,
    pub data_calibration: DataCalibration,
}
