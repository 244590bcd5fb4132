//! # Batch Loading
//!
//! Loads every SMD file of a directory. Files are taken in name order and
//! each is parsed independently, so results always come back in that order
//! whatever the dispatch.
//!
//! Failure handling is explicit ([`FailurePolicy`]):
//!
//! - `Abort` (default): the batch fails with the first error in file order.
//!   Sequential runs stop at that file; parallel runs finish the in-flight
//!   files and then report it.
//! - `Skip`: every file is attempted; failures are returned alongside the
//!   loaded mappings in [`BatchOutcome::failed`].
//!
//! Parallel dispatch needs the `parallel` feature; without it batches run
//! sequentially and a warning is logged when parallelism was requested.

mod config;

#[cfg(test)]
mod tests;

pub use config::{BatchConfig, Dispatch, FailurePolicy, DEFAULT_PARALLEL_THRESHOLD, SMD_EXTENSION};

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::mapping::Mapping;
use crate::smd::{load_smd, SmdError};

/// Result of a batch load, in file-name order
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Files that loaded, with their mapping
    pub loaded: Vec<(PathBuf, Mapping)>,
    /// Files that failed, with their error (only under [`FailurePolicy::Skip`])
    pub failed: Vec<(PathBuf, SmdError)>,
}

impl BatchOutcome {
    /// Loaded mappings, dropping their paths
    pub fn into_mappings(self) -> Vec<Mapping> {
        self.loaded.into_iter().map(|(_, m)| m).collect()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Files in `dir` with `extension`, sorted by path
pub fn find_smd_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>, SmdError> {
    let dir = dir.as_ref();
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| SmdError::from(e).in_file(dir))? {
        let path = entry.map_err(|e| SmdError::from(e).in_file(dir))?.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    debug!("Found {} .{} files in {}", files.len(), extension, dir.display());
    Ok(files)
}

/// Load every matching file in `dir`
pub fn load_smd_folder<P: AsRef<Path>>(dir: P, config: &BatchConfig) -> Result<BatchOutcome, SmdError> {
    let files = find_smd_files(dir, &config.extension)?;
    load_files(&files, config)
}

/// Lazily load the SMD files of `dir` one at a time, in name order
pub fn iter_smd_folder<P: AsRef<Path>>(
    dir: P,
) -> Result<impl Iterator<Item = Result<Mapping, SmdError>>, SmdError> {
    let files = find_smd_files(dir, SMD_EXTENSION)?;
    Ok(files.into_iter().map(load_smd))
}

/// Load `files` according to `config`
///
/// Results keep the order of `files`.
pub fn load_files(files: &[PathBuf], config: &BatchConfig) -> Result<BatchOutcome, SmdError> {
    let parallel = config.dispatch.is_parallel(files.len());
    info!(
        "Loading {} file(s) {}",
        files.len(),
        if parallel { "in parallel" } else { "sequentially" }
    );

    let results = if parallel {
        load_parallel(files, config.on_error)
    } else {
        load_sequential(files, config.on_error)
    };

    let mut outcome = BatchOutcome::default();
    for (path, result) in files.iter().zip(results) {
        match result {
            Ok(mapping) => outcome.loaded.push((path.clone(), mapping)),
            Err(e) => match config.on_error {
                FailurePolicy::Abort => return Err(e),
                FailurePolicy::Skip => {
                    warn!("Skipping {}: {}", path.display(), e.root());
                    outcome.failed.push((path.clone(), e));
                }
            },
        }
    }

    info!(
        "Loaded {} file(s), {} failed",
        outcome.loaded.len(),
        outcome.failed.len()
    );
    Ok(outcome)
}

/// Results for a prefix of `files`; under `Abort` it stops after the first error
fn load_sequential(files: &[PathBuf], policy: FailurePolicy) -> Vec<Result<Mapping, SmdError>> {
    let mut results = Vec::with_capacity(files.len());
    for path in files {
        let result = load_smd(path);
        let failed = result.is_err();
        results.push(result);
        if failed && policy == FailurePolicy::Abort {
            break;
        }
    }
    results
}

fn load_parallel(files: &[PathBuf], policy: FailurePolicy) -> Vec<Result<Mapping, SmdError>> {
    #[cfg(feature = "parallel")]
    let results = {
        let _ = policy;
        files.par_iter().map(load_smd).collect()
    };

    #[cfg(not(feature = "parallel"))]
    let results = {
        warn!("Parallel loading requested but built without the parallel feature; loading sequentially.");
        load_sequential(files, policy)
    };

    results
}
