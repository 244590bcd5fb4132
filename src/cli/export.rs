use anyhow::{Context, Result};
use log::{info, warn};
use std::path::{Path, PathBuf};

use nanofinder::batch::{load_smd_folder, BatchConfig, Dispatch, FailurePolicy};
use nanofinder::export::{write_csv, ExportOptions};
use nanofinder::smd::load_smd;
use nanofinder::units::SpectralUnit;

use super::config::Config;
use super::BatchArgs;

/// Export flags that override the config file
pub struct ExportArgs {
    pub filename: Option<String>,
    pub units: Option<SpectralUnit>,
    pub mapcoords: bool,
    pub channel: Option<usize>,
}

/// Export one SMD file, or every SMD file of a directory, to CSV
pub fn run(
    input: PathBuf,
    output: Option<PathBuf>,
    args: ExportArgs,
    batch: BatchArgs,
    config: Config,
) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input does not exist: {}", input.display());
    }

    let options = merge_export_options(config.export, args);
    let output = output.unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))?;

    info!("Input:  {}", input.display());
    info!("Output: {}", output.display());

    if input.is_dir() {
        let batch_config = merge_batch_config(config.batch, &batch);
        run_folder(&input, &output, &options, &batch_config)
    } else {
        let mapping = load_smd(&input).context("Failed to load SMD file")?;
        let written = write_csv(&mapping, &output, &options).context("Failed to export CSV")?;
        for path in &written {
            println!("Wrote {}", path.display());
        }
        Ok(())
    }
}

fn run_folder(
    input: &Path,
    output: &Path,
    options: &ExportOptions,
    batch_config: &BatchConfig,
) -> Result<()> {
    let outcome = load_smd_folder(input, batch_config)
        .with_context(|| format!("Failed to load SMD files from {}", input.display()))?;

    let mut exported = 0usize;
    for (path, mapping) in &outcome.loaded {
        let file_options = ExportOptions {
            filename: Some(batch_stem(options.filename.as_deref(), path)),
            ..options.clone()
        };
        write_csv(mapping, output, &file_options)
            .with_context(|| format!("Failed to export {}", path.display()))?;
        exported += 1;
    }

    for (path, err) in &outcome.failed {
        warn!("{}: {}", path.display(), err.root());
    }

    print_summary(exported, outcome.failed.len());
    Ok(())
}

/// Output stem for one file of a batch: its own stem, behind the prefix when given
fn batch_stem(prefix: Option<&str>, path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mapping".to_string());
    match prefix.filter(|p| !p.is_empty()) {
        Some(prefix) => format!("{}_{}", Path::new(prefix).with_extension("").display(), stem),
        None => stem,
    }
}

fn merge_export_options(mut options: ExportOptions, args: ExportArgs) -> ExportOptions {
    if args.filename.is_some() {
        options.filename = args.filename;
    }
    if args.units.is_some() {
        options.spectral_units = args.units;
    }
    if let Some(channel) = args.channel {
        options.channel = channel;
    }
    options.save_mapcoords |= args.mapcoords;
    options
}

fn merge_batch_config(mut config: BatchConfig, args: &BatchArgs) -> BatchConfig {
    if args.sequential {
        config.dispatch = Dispatch::Sequential;
    } else if args.parallel {
        config.dispatch = Dispatch::Parallel;
    } else if let Some(threshold) = args.parallel_threshold {
        config.dispatch = Dispatch::Threshold(threshold);
    }
    if args.skip_errors {
        config.on_error = FailurePolicy::Skip;
    }
    config
}

fn print_summary(exported: usize, failed: usize) {
    #[cfg(feature = "colorized_output")]
    {
        use console::{style, Emoji};
        let mark = if failed == 0 {
            Emoji("✓ ", "")
        } else {
            Emoji("⚠ ", "")
        };
        println!(
            "{}{}: {} exported, {} failed",
            mark,
            style("Summary").bold(),
            style(exported).green(),
            if failed == 0 {
                style(failed).dim()
            } else {
                style(failed).red()
            }
        );
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("Summary: {} exported, {} failed", exported, failed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_stem() {
        assert_eq!(batch_stem(None, Path::new("scans/a.smd")), "a");
        assert_eq!(batch_stem(Some("run.csv"), Path::new("scans/a.smd")), "run_a");
    }

    #[test]
    fn test_flags_override_config() {
        let config = ExportOptions {
            spectral_units: Some(SpectralUnit::ElectronVolt),
            channel: 1,
            ..Default::default()
        };
        let merged = merge_export_options(
            config,
            ExportArgs {
                filename: None,
                units: Some(SpectralUnit::RamanShift),
                mapcoords: true,
                channel: None,
            },
        );
        assert_eq!(merged.spectral_units, Some(SpectralUnit::RamanShift));
        assert_eq!(merged.channel, 1);
        assert!(merged.save_mapcoords);
    }

    #[test]
    fn test_batch_flags() {
        let args = BatchArgs {
            parallel_threshold: Some(3),
            skip_errors: true,
            ..Default::default()
        };
        let merged = merge_batch_config(BatchConfig::default(), &args);
        assert_eq!(merged.dispatch, Dispatch::Threshold(3));
        assert_eq!(merged.on_error, FailurePolicy::Skip);

        let args = BatchArgs {
            sequential: true,
            ..Default::default()
        };
        assert_eq!(
            merge_batch_config(BatchConfig::default(), &args).dispatch,
            Dispatch::Sequential
        );
    }
}
