use super::MappingError;
use crate::smd::SpectraMatrix;

/// Spectra addressed by grid position, without copying the matrix
///
/// Row `x * axis_size_y + y` of the matrix is the spectrum at `(x, y)`.
#[derive(Debug, Clone, Copy)]
pub struct GridView<'a> {
    data: &'a SpectraMatrix,
    axis_size_x: usize,
    axis_size_y: usize,
}

impl<'a> GridView<'a> {
    pub(crate) fn new(
        data: &'a SpectraMatrix,
        axis_size_x: usize,
        axis_size_y: usize,
    ) -> Result<Self, MappingError> {
        let spectra = data.n_rows();
        if axis_size_x.checked_mul(axis_size_y) != Some(spectra) {
            return Err(MappingError::GridSizeMismatch {
                axis_size_x,
                axis_size_y,
                spectra,
            });
        }
        Ok(Self {
            data,
            axis_size_x,
            axis_size_y,
        })
    }

    /// `(axis_size_x, axis_size_y, points per spectrum)`
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.axis_size_x, self.axis_size_y, self.data.row_width())
    }

    /// Spectrum at grid position `(x, y)`
    pub fn spectrum(&self, x: usize, y: usize) -> Option<&'a [f32]> {
        if x >= self.axis_size_x || y >= self.axis_size_y {
            return None;
        }
        self.data.row(x * self.axis_size_y + y)
    }

    /// All spectra along y for a fixed x
    pub fn column(&self, x: usize) -> impl Iterator<Item = &'a [f32]> + 'a {
        let view = *self;
        (0..self.axis_size_y).filter_map(move |y| view.spectrum(x, y))
    }
}
