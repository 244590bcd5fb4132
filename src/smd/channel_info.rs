//! Decoding of the free-text notes in `ChannelInfo`
//!
//! NanoFinder writes acquisition details as sentences rather than key/value
//! pairs, e.g.:
//!
//! ```text
//! Temperature = -60
//! Exposure time = 1.0 s, Cycle time = 1.1 s
//! Acquisition mode: Accumulate. Number = 5
//! ```
//!
//! Each note is matched against [`RULES`] by substring; the first matching
//! rule extracts its fields. Unrecognised notes are skipped so that new
//! annotations from newer firmware do not break parsing.

use log::{debug, warn};

use crate::models::ChannelInfo;

/// Extracts fields from one note into the channel info
pub type Extractor = fn(&str, &mut ChannelInfo) -> Option<()>;

/// Ordered `(trigger, extractor)` rules applied to each note
pub const RULES: &[(&str, Extractor)] = &[
    ("Temperature", extract_temperature),
    ("Exposure time", extract_exposure),
    ("Acquisition mode", extract_acquisition_mode),
];

/// Acquisition mode names that carry an accumulation count
const ACCUMULATE_MODES: [&str; 2] = ["accumulate", "accomulate"];

/// Decode a set of notes into [`ChannelInfo`]
pub fn parse_channel_info<'a, I>(notes: I) -> ChannelInfo
where
    I: IntoIterator<Item = &'a str>,
{
    let mut info = ChannelInfo::default();
    for note in notes {
        match RULES.iter().find(|(trigger, _)| note.contains(trigger)) {
            Some((trigger, extract)) => {
                if extract(note, &mut info).is_none() {
                    warn!("Could not decode '{}' note: {:?}", trigger, note);
                }
            }
            None => debug!("Ignoring unrecognised channel note: {:?}", note),
        }
    }
    info
}

fn extract_temperature(note: &str, info: &mut ChannelInfo) -> Option<()> {
    info.temperature = Some(number_after_eq(note, 1)?);
    Some(())
}

/// `Exposure time = <e>, Cycle time = <c>`; either number may be absent
fn extract_exposure(note: &str, info: &mut ChannelInfo) -> Option<()> {
    let exposure = number_after_eq(note, 1);
    let cycle = number_after_eq(note, 2);
    if exposure.is_some() {
        info.exposure_time_s = exposure;
    }
    if cycle.is_some() {
        info.cycle_time_s = cycle;
    }
    exposure.or(cycle).map(|_| ())
}

/// `Acquisition mode: <Mode>. Number = <n>`
fn extract_acquisition_mode(note: &str, info: &mut ChannelInfo) -> Option<()> {
    let (_, rest) = note.split_once(':')?;
    let (mode, tail) = match rest.split_once('.') {
        Some((mode, tail)) => (mode, Some(tail)),
        None => (rest, None),
    };
    let mode = mode.trim().to_lowercase();
    if mode.is_empty() {
        return None;
    }

    if ACCUMULATE_MODES.contains(&mode.as_str()) {
        info.acquisition_mode = Some(ACCUMULATE_MODES[0].to_string());
        info.accumulation_number = Some(integer_after_eq(tail?)?);
    } else {
        info.acquisition_mode = Some(mode);
    }
    Some(())
}

/// Text following the `nth` (1-based) `=` sign
fn after_nth_eq(text: &str, nth: usize) -> Option<&str> {
    let mut parts = text.splitn(nth + 1, '=');
    for _ in 0..nth {
        parts.next()?;
    }
    parts.next()
}

/// First decimal number following the `nth` `=` sign
fn number_after_eq(text: &str, nth: usize) -> Option<f64> {
    let rest = after_nth_eq(text, nth)?.trim_start();
    let candidate: &str = {
        let end = rest
            .find(|c: char| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
            .unwrap_or(rest.len());
        &rest[..end]
    };
    // Shrink until it parses so that trailing unit letters ("1.0e") are dropped
    (1..=candidate.len())
        .rev()
        .find_map(|len| candidate[..len].parse::<f64>().ok())
}

fn integer_after_eq(text: &str) -> Option<u32> {
    let rest = after_nth_eq(text, 1)?.trim_start();
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse().ok()
}
