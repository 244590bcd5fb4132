//! NanoFinder SMD file format
//!
//! An SMD file is a single XML element followed by a raw block of 32-bit
//! little-endian floats:
//!
//! ```text
//! <?xml version="1.0" encoding="utf-8"?>
//! <SCANDATA>
//!   <Vendor/> <Version/>
//!   <ScannedFrameParameters>
//!     <FrameHeader/> <FrameOptions/>
//!     <Stage3DParameters>
//!       <StageAxesDimentions> <AxisX/> <AxisY/> <AxisZ/> </StageAxesDimentions>
//!     </Stage3DParameters>
//!     <DataCalibration>
//!       <DataDimentions> <Channel0/> <Channel1/> ... </DataDimentions>
//!     </DataCalibration>
//!   </ScannedFrameParameters>
//! </SCANDATA>
//! [f32 LE] x (spectra * ChannelSize)
//! ```
//!
//! Loading goes reader → document → schema → binary, and the two halves are
//! assembled into a [`Mapping`]. Every error raised while loading from disk is
//! tagged with the file path ([`SmdError::InFile`]).

pub mod binary;
pub mod channel_info;
pub mod document;
mod error;
pub mod reader;
pub mod schema;
pub mod tags;
pub mod writer;

#[cfg(test)]
pub(crate) mod tests;

pub use binary::{decode_payload, SpectraMatrix};
pub use document::{ScanDocument, XmlNode};
pub use error::SmdError;
pub use reader::{read_binary_part, read_xml_part, SmdLayout};
pub use schema::map_document;
pub use writer::{to_smd_bytes, write_smd};

use std::path::Path;

use log::{debug, info, warn};

use crate::mapping::Mapping;

/// Load one SMD file
pub fn load_smd<P: AsRef<Path>>(path: P) -> Result<Mapping, SmdError> {
    let path = path.as_ref();
    debug!("Loading {}", path.display());
    let load = || -> Result<Mapping, SmdError> {
        let bytes = std::fs::read(path)?;
        Ok(load_smd_bytes(&bytes)?.with_source(path))
    };
    let mapping = load().map_err(|e| e.in_file(path))?;
    info!(
        "Loaded {}: {} spectra x {} points",
        path.display(),
        mapping.spectra_count(),
        mapping.data().row_width()
    );
    Ok(mapping)
}

/// Load an SMD file already held in memory
pub fn load_smd_bytes(bytes: &[u8]) -> Result<Mapping, SmdError> {
    let layout = SmdLayout::locate(bytes)?;
    let document = ScanDocument::parse(layout.xml(bytes)?)?;
    let (stamp, parameters) = map_document(&document)?;

    let payload = layout.binary(bytes);
    if let Some(declared) = parameters.data_block_size_bytes {
        if declared != payload.len() as u64 {
            warn!(
                "DataBlockSizeBytes declares {} bytes but the payload has {}",
                declared,
                payload.len()
            );
        }
    }

    let channels = &parameters.data_calibration.channels;
    let first = channels
        .first()
        .ok_or_else(|| SmdError::NoChannels(tags::CALIBRATION::TAG.to_string()))?;
    if channels.len() > 1 {
        warn!(
            "{} channels declared; only Channel{} is read from the payload",
            channels.len(),
            first.index
        );
    }

    let row_width = first.channel_size;
    let data = decode_payload(payload, row_width)?;
    Mapping::from_parts(stamp, parameters, data)
}
