use std::path::{Path, PathBuf};

use crate::units::UnitError;

/// Errors raised by queries on a loaded mapping
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    /// The requested channel is not declared in the file
    #[error("Channel {index} not found ({available} channel(s) available)")]
    ChannelNotFound { index: usize, available: usize },

    /// The channel is declared but its spectra are not in the payload
    #[error("Channel {index} has no spectra loaded ({channel_size} points declared, rows are {row_width} wide)")]
    ChannelNotLoaded {
        index: usize,
        channel_size: usize,
        row_width: usize,
    },

    /// The declared grid does not match the number of spectra
    #[error("Grid {axis_size_x} x {axis_size_y} does not match {spectra} spectra")]
    GridSizeMismatch {
        axis_size_x: usize,
        axis_size_y: usize,
        spectra: usize,
    },

    /// Spectral unit conversion failed
    #[error("Unit error: {0}")]
    Unit(#[from] UnitError),

    /// Any of the above, tagged with the file the mapping was loaded from
    #[error("{}: {source}", path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<MappingError>,
    },
}

impl MappingError {
    /// Tag this error with the file the mapping came from
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            MappingError::InFile { .. } => self,
            other => MappingError::InFile {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }

    /// The underlying error, without any file tag
    pub fn root(&self) -> &MappingError {
        match self {
            MappingError::InFile { source, .. } => source.root(),
            other => other,
        }
    }

    /// File the error was raised for, when known
    pub fn path(&self) -> Option<&Path> {
        match self {
            MappingError::InFile { path, .. } => Some(path),
            _ => None,
        }
    }
}
