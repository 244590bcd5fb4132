//! Binary payload decoding
//!
//! The payload of an SMD file is a flat run of IEEE-754 32-bit little-endian
//! floats: one spectrum after another, each `channel_size` values wide. It is
//! decoded in a single pass into one contiguous buffer; the row structure is
//! recorded alongside rather than materialised.

use byteorder::{ByteOrder, LittleEndian};

use super::SmdError;

/// Bytes per stored value
pub const VALUE_SIZE: usize = 4;

/// Spectra stored row-major: one row per spectrum, one column per channel
#[derive(Debug, Clone, PartialEq)]
pub struct SpectraMatrix {
    values: Vec<f32>,
    row_width: usize,
}

impl SpectraMatrix {
    /// Wrap decoded values as rows of `row_width`
    pub fn from_values(values: Vec<f32>, row_width: usize) -> Result<Self, SmdError> {
        if row_width == 0 || values.len() % row_width != 0 {
            return Err(SmdError::PayloadSizeMismatch {
                values: values.len(),
                row_width,
            });
        }
        Ok(Self { values, row_width })
    }

    /// Number of spectra
    pub fn n_rows(&self) -> usize {
        self.values.len() / self.row_width
    }

    /// Number of points per spectrum
    pub fn row_width(&self) -> usize {
        self.row_width
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.row_width)
    }

    /// One spectrum
    pub fn row(&self, index: usize) -> Option<&[f32]> {
        let start = index.checked_mul(self.row_width)?;
        self.values.get(start..start + self.row_width)
    }

    /// Iterate spectra in storage order
    pub fn rows(&self) -> std::slice::ChunksExact<'_, f32> {
        self.values.chunks_exact(self.row_width)
    }

    /// All values, row after row
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f32> {
        self.values
    }

    /// Encode back into the on-disk byte layout
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; self.values.len() * VALUE_SIZE];
        LittleEndian::write_f32_into(&self.values, &mut bytes);
        bytes
    }
}

/// Decode a binary payload into spectra of `row_width` points
///
/// Fails with [`SmdError::MisalignedPayload`] when the payload is not a whole
/// number of floats, and with [`SmdError::PayloadSizeMismatch`] when the float
/// count is not a multiple of `row_width`.
pub fn decode_payload(bytes: &[u8], row_width: usize) -> Result<SpectraMatrix, SmdError> {
    if bytes.len() % VALUE_SIZE != 0 {
        return Err(SmdError::MisalignedPayload { bytes: bytes.len() });
    }
    let count = bytes.len() / VALUE_SIZE;
    if row_width == 0 || count % row_width != 0 {
        return Err(SmdError::PayloadSizeMismatch {
            values: count,
            row_width,
        });
    }

    let mut values = vec![0f32; count];
    LittleEndian::read_f32_into(bytes, &mut values);
    SpectraMatrix::from_values(values, row_width)
}
