use std::path::PathBuf;

use crate::mapping::MappingError;

/// Errors that can occur while exporting a mapping
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV writing error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// The tables could not be built from the mapping
    #[error("Mapping error: {0}")]
    MappingError(#[from] MappingError),

    /// Writing one output file failed
    #[error("{}: {source}", path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<ExportError>,
    },
}

impl ExportError {
    /// Tag this error with the file being written
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            ExportError::InFile { .. } => self,
            other => ExportError::InFile {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }

    /// The underlying error, without any file tag
    pub fn root(&self) -> &ExportError {
        match self {
            ExportError::InFile { source, .. } => source.root(),
            other => other,
        }
    }
}
