//! # Tabular Export
//!
//! A mapping exports as two row-aligned tables:
//!
//! - [`SpectraTable`]: one row per spectrum, one column per spectral-axis value
//! - [`CoordinatesTable`]: the `(x, y)` grid position of the same row
//!
//! Rows follow the instrument's convention of `y` starting from the bottom of
//! the scan area: `y` descending, then `x` ascending. [`write_csv`] sends both
//! tables to CSV files.

mod error;
mod sink;


pub use sink::{export_paths, write_csv};
pub use error::ExportError;

use serde::{Deserialize, Serialize};

use crate::mapping::{Mapping, MappingError};
use crate::smd::SpectraMatrix;
use crate::units::SpectralUnit;

/// How a mapping is exported
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Unit of the spectral header; stored unit (nm) when `None`
    pub spectral_units: Option<SpectralUnit>,
    /// Also write the coordinates table
    pub save_mapcoords: bool,
    /// Channel whose spectral axis heads the spectra table
    pub channel: usize,
    /// File stem; any extension is dropped
    pub filename: Option<String>,
}

/// Integer grid position of one spectrum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridCoordinate {
    pub x: usize,
    pub y: usize,
}

/// Spectra in export order, borrowing the mapping's matrix
#[derive(Debug, Clone)]
pub struct SpectraTable<'a> {
    columns: Vec<f64>,
    unit: Option<SpectralUnit>,
    data: &'a SpectraMatrix,
    order: Vec<usize>,
}

impl<'a> SpectraTable<'a> {
    /// Column headers: the spectral axis in [`SpectraTable::unit`]
    pub fn columns(&self) -> &[f64] {
        &self.columns
    }

    /// Unit of the column headers; `None` means as stored
    pub fn unit(&self) -> Option<SpectralUnit> {
        self.unit
    }

    pub fn n_rows(&self) -> usize {
        self.order.len()
    }

    /// Matrix row shown at table row `index`
    pub fn source_row(&self, index: usize) -> Option<usize> {
        self.order.get(index).copied()
    }

    pub fn row(&self, index: usize) -> Option<&'a [f32]> {
        self.data.row(*self.order.get(index)?)
    }

    /// Rows in export order
    pub fn rows(&self) -> impl Iterator<Item = &'a [f32]> + '_ {
        let data = self.data;
        self.order.iter().filter_map(move |&i| data.row(i))
    }
}

/// Grid positions, row-aligned with a [`SpectraTable`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoordinatesTable {
    pub rows: Vec<GridCoordinate>,
}

impl CoordinatesTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Grid positions in raster order (x fastest), paired with their raster index,
/// sorted by y descending then x ascending
pub fn raster_coordinates(axis_size_x: usize, axis_size_y: usize) -> Vec<(usize, GridCoordinate)> {
    // an empty axis means an empty grid, however long the other one is
    let points = axis_size_x.checked_mul(axis_size_y).unwrap_or(0);
    let mut coords: Vec<(usize, GridCoordinate)> = (0..points)
        .map(|i| {
            (
                i,
                GridCoordinate {
                    x: i % axis_size_x,
                    y: i / axis_size_x,
                },
            )
        })
        .collect();
    coords.sort_by(|(_, a), (_, b)| b.y.cmp(&a.y).then(a.x.cmp(&b.x)));
    coords
}

impl Mapping {
    /// Build the spectra and coordinates tables for `channel`
    ///
    /// Fails with [`MappingError::ChannelNotLoaded`] for any channel but the
    /// first, and with [`MappingError::GridSizeMismatch`] when the declared
    /// x/y grid does not account for every spectrum. Both are tagged with the
    /// source file when known.
    pub fn export_tables(
        &self,
        spectral_units: Option<SpectralUnit>,
        channel: usize,
    ) -> Result<(SpectraTable<'_>, CoordinatesTable), MappingError> {
        self.build_tables(spectral_units, channel)
            .map_err(|e| self.tag_source(e))
    }

    fn build_tables(
        &self,
        spectral_units: Option<SpectralUnit>,
        channel: usize,
    ) -> Result<(SpectraTable<'_>, CoordinatesTable), MappingError> {
        self.loaded_channel(channel)?;
        let columns = self.to_spectral_units(spectral_units, channel)?;
        let [nx, ny, _] = self.map_steps();
        let spectra = self.spectra_count();
        if nx.checked_mul(ny) != Some(spectra) {
            return Err(MappingError::GridSizeMismatch {
                axis_size_x: nx,
                axis_size_y: ny,
                spectra,
            });
        }

        let (order, rows): (Vec<usize>, Vec<GridCoordinate>) =
            raster_coordinates(nx, ny).into_iter().unzip();

        Ok((
            SpectraTable {
                columns,
                unit: spectral_units,
                data: self.data(),
                order,
            },
            CoordinatesTable { rows },
        ))
    }
}
