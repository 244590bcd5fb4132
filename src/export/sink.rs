//! CSV sink for the export tables

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::{CoordinatesTable, ExportError, ExportOptions, SpectraTable};
use crate::mapping::Mapping;

const DEFAULT_DATA_FILE: &str = "data.csv";
const DEFAULT_COORDS_FILE: &str = "mapcoords.csv";

/// Destination files for an export into `dir`
///
/// Returns `(spectra path, coordinates path)`. Without a stem the files are
/// `data.csv` and `mapcoords.csv`. With a stem (extension dropped) they are
/// `<stem>_data.csv` and `<stem>_mapcoords.csv` when coordinates are saved,
/// otherwise just `<stem>.csv`.
pub fn export_paths(dir: &Path, options: &ExportOptions) -> (PathBuf, PathBuf) {
    let stem = options
        .filename
        .as_deref()
        .filter(|f| !f.is_empty())
        .map(|f| Path::new(f).with_extension(""));

    match stem {
        None => (dir.join(DEFAULT_DATA_FILE), dir.join(DEFAULT_COORDS_FILE)),
        Some(stem) => {
            let stem = stem.to_string_lossy();
            let data = if options.save_mapcoords {
                format!("{}_data.csv", stem)
            } else {
                format!("{}.csv", stem)
            };
            (dir.join(data), dir.join(format!("{}_mapcoords.csv", stem)))
        }
    }
}

/// Export `mapping` to CSV files in `dir`
///
/// Returns the paths written, spectra first.
pub fn write_csv(
    mapping: &Mapping,
    dir: &Path,
    options: &ExportOptions,
) -> Result<Vec<PathBuf>, ExportError> {
    let (spectra, coords) = mapping.export_tables(options.spectral_units, options.channel)?;
    let (data_path, coords_path) = export_paths(dir, options);

    let mut written = Vec::with_capacity(2);
    File::create(&data_path)
        .map_err(ExportError::from)
        .and_then(|file| write_spectra(&spectra, file))
        .map_err(|e| e.in_file(&data_path))?;
    debug!("Wrote {} spectra to {}", spectra.n_rows(), data_path.display());
    written.push(data_path);

    if options.save_mapcoords {
        File::create(&coords_path)
            .map_err(ExportError::from)
            .and_then(|file| write_coordinates(&coords, file))
            .map_err(|e| e.in_file(&coords_path))?;
        debug!("Wrote {} coordinates to {}", coords.len(), coords_path.display());
        written.push(coords_path);
    }

    info!(
        "Exported {} to {}",
        mapping
            .source_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "mapping".to_string()),
        dir.display()
    );
    Ok(written)
}

/// Header of spectral-axis values, then one record per spectrum
pub fn write_spectra<W: Write>(table: &SpectraTable<'_>, out: W) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(table.columns().iter().map(|c| c.to_string()))?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|v| format_value(*v)))?;
    }
    writer.flush()?;
    Ok(())
}

/// `x,y` header, then one record per spectrum
pub fn write_coordinates<W: Write>(table: &CoordinatesTable, out: W) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(out);
    for coord in &table.rows {
        writer.serialize(coord)?;
    }
    writer.flush()?;
    Ok(())
}

fn format_value(value: f32) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        value.to_string()
    }
}
