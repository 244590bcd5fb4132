use std::path::PathBuf;

/// Errors that can occur while reading an SMD file
#[derive(Debug, thiserror::Error)]
pub enum SmdError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing the XML header
    #[error("XML parsing error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// UTF-8 encoding error in the XML header
    #[error("UTF-8 encoding error: {0}")]
    Utf8Error(#[from] std::str::Utf8Error),

    /// The file has no content at all
    #[error("File is empty")]
    EmptyFile,

    /// The XML header could not be delimited
    #[error("Malformed SMD file: {0}")]
    MalformedFile(String),

    /// A required tag is absent
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// A tag holds a value that does not parse as its declared type
    #[error("Invalid value for {field}: '{value}'")]
    InvalidValue { field: String, value: String },

    /// A header date or time does not match `YYYY/MM/DD` / `HH:MM:SS`
    #[error("Invalid date or time in {field}: '{value}'")]
    InvalidDateOrTime { field: String, value: String },

    /// The spectral axis array does not match its declared size
    #[error("Malformed array in {field}: {reason}")]
    MalformedArray { field: String, reason: String },

    /// The header declares no `Channel<N>` block
    #[error("No channel definitions found in {0}")]
    NoChannels(String),

    /// The binary region is not a whole number of 32-bit floats
    #[error("Binary payload of {bytes} bytes is not a multiple of 4")]
    MisalignedPayload { bytes: usize },

    /// The float count does not divide into rows of the channel size
    #[error("Payload of {values} values does not divide into rows of {row_width}")]
    PayloadSizeMismatch { values: usize, row_width: usize },

    /// Any of the above, tagged with the file it came from
    #[error("{}: {source}", path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<SmdError>,
    },
}

impl SmdError {
    /// Tag this error with the file it was raised for
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            SmdError::InFile { .. } => self,
            other => SmdError::InFile {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }

    /// The underlying error, without any file tag
    pub fn root(&self) -> &SmdError {
        match self {
            SmdError::InFile { source, .. } => source.root(),
            other => other,
        }
    }

    /// File the error was raised for, when known
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            SmdError::InFile { path, .. } => Some(path),
            _ => None,
        }
    }
}
