use serde::{Deserialize, Serialize};

/// Default number of files above which a batch is loaded in parallel
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 10;

/// Extension of instrument scan files
pub const SMD_EXTENSION: &str = "smd";

/// How the files of a batch are dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dispatch {
    /// One file after another on the calling thread
    Sequential,
    /// One task per file on the rayon pool
    Parallel,
    /// Parallel only when the batch has more than this many files
    Threshold(usize),
}

impl Default for Dispatch {
    fn default() -> Self {
        Dispatch::Threshold(DEFAULT_PARALLEL_THRESHOLD)
    }
}

impl Dispatch {
    /// Whether a batch of `n_files` runs in parallel
    pub fn is_parallel(&self, n_files: usize) -> bool {
        match *self {
            Dispatch::Sequential => false,
            Dispatch::Parallel => true,
            Dispatch::Threshold(threshold) => n_files > threshold,
        }
    }
}

/// What a batch does when one file fails to load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Fail the whole batch with the first error in file order
    #[default]
    Abort,
    /// Record the failure and keep loading the rest
    Skip,
}

/// Configuration for batch loading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub dispatch: Dispatch,
    pub on_error: FailurePolicy,
    /// File extension to pick up, compared case-insensitively
    pub extension: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            dispatch: Dispatch::default(),
            on_error: FailurePolicy::default(),
            extension: SMD_EXTENSION.to_string(),
        }
    }
}
