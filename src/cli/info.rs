use anyhow::{Context, Result};
use std::path::PathBuf;

use nanofinder::smd::load_smd;

/// Display information about an SMD file
pub fn run(file: PathBuf, json: bool, channel: usize) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let mapping = load_smd(&file).context("Failed to load SMD file")?;
    let summary = mapping
        .summary(channel)
        .with_context(|| format!("Failed to summarise channel {}", channel))?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
        );
        return Ok(());
    }

    println!("NanoFinder Scan Information");
    println!("===========================");
    print!("{}", summary);

    if mapping.has_multiple_channels() {
        println!();
        println!("Channels:");
        for ch in mapping.channels() {
            println!(
                "  Channel{}: {} ({} points, declared unit {})",
                ch.index, ch.device_name, ch.channel_size, ch.channel_axis_unit
            );
        }
    }

    Ok(())
}
