//! Mapping of the decoded header tree onto the typed model
//!
//! Every block is read through [`Fields`], which resolves tags by exact name
//! relative to a block and reports failures with the full tag path
//! (`SCANDATA/ScannedFrameParameters/FrameOptions/OmuLaserWLnm`).

use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use log::{debug, warn};

use super::channel_info::parse_channel_info;
use super::document::{ScanDocument, XmlNode};
use super::tags::{self, AXIS, CALIBRATION, CHANNEL, FRAME_HEADER, FRAME_OPTIONS, SCANNED_FRAME, STAGE_3D};
use super::SmdError;
use crate::models::*;

/// Typed view of one block of the header
pub(crate) struct Fields<'a> {
    node: &'a XmlNode,
    path: String,
}

impl<'a> Fields<'a> {
    pub(crate) fn root(node: &'a XmlNode) -> Self {
        Self {
            node,
            path: node.name().to_string(),
        }
    }

    fn path_of(&self, tag: &str) -> String {
        format!("{}/{}", self.path, tag)
    }

    fn node(&self, tag: &str) -> Result<&'a XmlNode, SmdError> {
        self.node
            .child(tag)
            .ok_or_else(|| SmdError::MissingField(self.path_of(tag)))
    }

    /// Nested block
    fn section(&self, tag: &str) -> Result<Fields<'a>, SmdError> {
        Ok(Fields {
            node: self.node(tag)?,
            path: self.path_of(tag),
        })
    }

    /// Nested block that may appear under any of several spellings
    fn section_any(&self, aliases: &[&str]) -> Result<Fields<'a>, SmdError> {
        aliases
            .iter()
            .find_map(|tag| self.section(tag).ok())
            .ok_or_else(|| SmdError::MissingField(self.path_of(aliases[0])))
    }

    fn text(&self, tag: &str) -> Result<&'a str, SmdError> {
        Ok(self.node(tag)?.text())
    }

    fn string(&self, tag: &str) -> Result<String, SmdError> {
        self.text(tag).map(str::to_string)
    }

    fn optional_string(&self, tag: &str) -> String {
        self.node
            .child(tag)
            .map(|n| n.text().to_string())
            .unwrap_or_default()
    }

    /// Numeric field; `str::parse` is locale-independent
    fn parse<T: FromStr>(&self, tag: &str) -> Result<T, SmdError> {
        let value = self.text(tag)?;
        value.parse().map_err(|_| SmdError::InvalidValue {
            field: self.path_of(tag),
            value: value.to_string(),
        })
    }

    fn optional<T: FromStr>(&self, tag: &str) -> Result<Option<T>, SmdError> {
        match self.node.child(tag) {
            Some(_) => self.parse(tag).map(Some),
            None => Ok(None),
        }
    }

    /// `0`/`1` or `true`/`false`, case-insensitive
    fn boolean(&self, tag: &str) -> Result<bool, SmdError> {
        let value = self.text(tag)?;
        parse_bool(value).ok_or_else(|| SmdError::InvalidValue {
            field: self.path_of(tag),
            value: value.to_string(),
        })
    }

    fn date(&self, tag: &str) -> Result<NaiveDate, SmdError> {
        let value = self.text(tag)?;
        parse_date(value).ok_or_else(|| SmdError::InvalidDateOrTime {
            field: self.path_of(tag),
            value: value.to_string(),
        })
    }

    fn time(&self, tag: &str) -> Result<NaiveTime, SmdError> {
        let value = self.text(tag)?;
        parse_time(value).ok_or_else(|| SmdError::InvalidDateOrTime {
            field: self.path_of(tag),
            value: value.to_string(),
        })
    }

    fn stamp(&self) -> Result<VendorStamp, SmdError> {
        Ok(VendorStamp::new(
            self.string(tags::VENDOR)?,
            self.string(tags::VERSION)?,
        ))
    }

    fn optional_stamp(&self) -> VendorStamp {
        VendorStamp::new(
            self.optional_string(tags::VENDOR),
            self.optional_string(tags::VERSION),
        )
    }
}

/// Map a decoded header onto the typed model
///
/// Returns the root vendor stamp (empty when absent) and the frame
/// parameters.
pub fn map_document(document: &ScanDocument) -> Result<(VendorStamp, ScannedFrameParameters), SmdError> {
    let root = Fields::root(document.root());
    if document.root().name() != tags::ROOT {
        debug!("Unexpected root element <{}>", document.root().name());
    }
    let stamp = root.optional_stamp();
    let frame = scanned_frame_parameters(&root.section(SCANNED_FRAME::TAG)?)?;
    Ok((stamp, frame))
}

fn scanned_frame_parameters(fields: &Fields<'_>) -> Result<ScannedFrameParameters, SmdError> {
    Ok(ScannedFrameParameters {
        stamp: fields.optional_stamp(),
        scan_repeat_number: fields.parse(SCANNED_FRAME::SCAN_REPEAT_NUMBER)?,
        data_block_size_bytes: fields.optional(SCANNED_FRAME::DATA_BLOCK_SIZE_BYTES)?,
        frame_header: frame_header(&fields.section(FRAME_HEADER::TAG)?)?,
        frame_options: frame_options(&fields.section(FRAME_OPTIONS::TAG)?)?,
        stage_3d_parameters: stage_3d_parameters(&fields.section(STAGE_3D::TAG)?)?,
        data_calibration: data_calibration(&fields.section(CALIBRATION::TAG)?)?,
    })
}

fn frame_header(fields: &Fields<'_>) -> Result<FrameHeader, SmdError> {
    Ok(FrameHeader {
        stamp: fields.stamp()?,
        date: fields.date(FRAME_HEADER::DATE)?,
        time: fields.time(FRAME_HEADER::TIME)?,
        information: fields.string(FRAME_HEADER::INFORMATION)?,
        system_name: fields.string(FRAME_HEADER::SYSTEM_NAME)?,
        positioning_system_name: fields.string(FRAME_HEADER::POSITIONING_SYSTEM_NAME)?,
        detection_system_name: fields.string(FRAME_HEADER::DETECTION_SYSTEM_NAME)?,
        scanned_data_name: fields.string(FRAME_HEADER::SCANNED_DATA_NAME)?,
    })
}

fn frame_options(fields: &Fields<'_>) -> Result<FrameOptions, SmdError> {
    Ok(FrameOptions {
        stamp: fields.stamp()?,
        laser_wavelength_nm: fields.parse(FRAME_OPTIONS::LASER_WAVELENGTH_NM)?,
        current_power: fields.parse(FRAME_OPTIONS::CURRENT_POWER)?,
        grating_groove: fields.string(FRAME_OPTIONS::GRATING_GROOVE)?,
        central_wavelength_nm: fields.parse(FRAME_OPTIONS::CENTRAL_WAVELENGTH_NM)?,
        pinhole_size_um: fields.parse(FRAME_OPTIONS::PINHOLE_SIZE)?,
    })
}

fn stage_3d_parameters(fields: &Fields<'_>) -> Result<Stage3DParameters, SmdError> {
    let axes = fields.section_any(&STAGE_3D::STAGE_AXES)?;
    Ok(Stage3DParameters {
        stamp: fields.stamp()?,
        axis_size_x: fields.parse(STAGE_3D::AXIS_SIZE_X)?,
        axis_size_y: fields.parse(STAGE_3D::AXIS_SIZE_Y)?,
        axis_size_z: fields.parse(STAGE_3D::AXIS_SIZE_Z)?,
        stage_axes: StageAxes {
            x: axis(&axes.section(STAGE_3D::AXIS_X)?)?,
            y: axis(&axes.section(STAGE_3D::AXIS_Y)?)?,
            z: axis(&axes.section(STAGE_3D::AXIS_Z)?)?,
        },
    })
}

fn axis(fields: &Fields<'_>) -> Result<Axis, SmdError> {
    Ok(Axis {
        in_use: fields.parse(AXIS::IN_USE)?,
        inversed: fields.boolean(AXIS::INVERSED)?,
        name: fields.string(AXIS::NAME)?,
        unit_name: fields.string(AXIS::UNIT_NAME)?,
        count_step: fields.parse(AXIS::COUNT_STEP)?,
        scale_factor: fields.parse(AXIS::SCALE_FLOAT)?,
    })
}

/// Collect every `Channel<N>` block, ordered by `N`
fn data_calibration(fields: &Fields<'_>) -> Result<DataCalibration, SmdError> {
    // Channels live under DataDimentions; some files put them directly here
    let container = fields.section_any(&CALIBRATION::DATA_DIMENSIONS).unwrap_or(Fields {
        node: fields.node,
        path: fields.path.clone(),
    });

    let mut indexed: Vec<(usize, &XmlNode)> = container
        .node
        .children()
        .iter()
        .filter_map(|child| tags::channel_index(child.name()).map(|n| (n, child)))
        .collect();
    indexed.sort_by_key(|(n, _)| *n);
    indexed.dedup_by(|later, first| {
        let duplicate = later.0 == first.0;
        if duplicate {
            warn!("Duplicate {} in {}; keeping the first", later.1.name(), container.path);
        }
        duplicate
    });

    if indexed.is_empty() {
        return Err(SmdError::NoChannels(container.path.clone()));
    }

    let channels = indexed
        .into_iter()
        .map(|(index, node)| {
            channel(
                index,
                &Fields {
                    node,
                    path: container.path_of(node.name()),
                },
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DataCalibration {
        stamp: fields.stamp()?,
        channels,
    })
}

fn channel(index: usize, fields: &Fields<'_>) -> Result<Channel, SmdError> {
    let channel_size: usize = fields.parse(CHANNEL::CHANNEL_SIZE)?;

    let unit_text = fields.text(CHANNEL::AXIS_UNIT)?;
    let channel_axis_unit: ChannelAxisUnit =
        unit_text.parse().map_err(|_| SmdError::InvalidValue {
            field: fields.path_of(CHANNEL::AXIS_UNIT),
            value: unit_text.to_string(),
        })?;
    if channel_axis_unit != ChannelAxisUnit::Nanometer {
        warn!(
            "{} declares '{}' but the stored axis is read as nm",
            fields.path, channel_axis_unit
        );
    }

    let channel_axis_array = parse_axis_array(
        fields.text(CHANNEL::AXIS_ARRAY)?,
        channel_size,
        &fields.path_of(CHANNEL::AXIS_ARRAY),
    )?;

    // Absent notes are not an error; every ChannelInfo field is optional
    let channel_info = match fields.node.child(CHANNEL::INFO) {
        Some(info) if info.children().is_empty() => {
            parse_channel_info(info.text().lines().map(str::trim).filter(|l| !l.is_empty()))
        }
        Some(info) => parse_channel_info(info.children().iter().map(XmlNode::text)),
        None => ChannelInfo::default(),
    };

    Ok(Channel {
        index,
        device_guid: fields.string(CHANNEL::DEVICE_GUID)?,
        device_name: fields.string(CHANNEL::DEVICE_NAME)?,
        data_channel_name: fields.string(CHANNEL::DATA_CHANNEL_NAME)?,
        data_channel_unit: fields.string(CHANNEL::DATA_CHANNEL_UNIT)?,
        channel_size,
        channel_axis_name: fields.string(CHANNEL::AXIS_NAME)?,
        channel_axis_unit,
        channel_axis_laser_wavelength_nm: fields.parse(CHANNEL::AXIS_LASER_WL)?,
        channel_axis_array,
        channel_info,
    })
}

/// Decode a space-separated float array of exactly `expected` values
pub fn parse_axis_array(text: &str, expected: usize, field: &str) -> Result<Vec<f64>, SmdError> {
    let mut values = Vec::with_capacity(expected);
    for (i, token) in text.split_whitespace().enumerate() {
        let value = token.parse::<f64>().map_err(|_| SmdError::MalformedArray {
            field: field.to_string(),
            reason: format!("token {} ('{}') is not a number", i, token),
        })?;
        values.push(value);
    }
    if values.len() != expected {
        return Err(SmdError::MalformedArray {
            field: field.to_string(),
            reason: format!("expected {} values, found {}", expected, values.len()),
        });
    }
    Ok(values)
}

pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

/// `YYYY/MM/DD`, digits and separators exactly in place
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    if !matches_shape(value, "dddd/dd/dd") {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y/%m/%d").ok()
}

/// `HH:MM:SS`, digits and separators exactly in place
pub(crate) fn parse_time(value: &str) -> Option<NaiveTime> {
    if !matches_shape(value, "dd:dd:dd") {
        return None;
    }
    NaiveTime::parse_from_str(value, "%H:%M:%S").ok()
}

/// `d` in `shape` matches an ASCII digit, anything else matches itself
fn matches_shape(value: &str, shape: &str) -> bool {
    value.len() == shape.len()
        && value.bytes().zip(shape.bytes()).all(|(v, s)| match s {
            b'd' => v.is_ascii_digit(),
            other => v == other,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_axis_array() {
        let values = parse_axis_array(" 500.0 500.5\n501 5.015e2 ", 4, "A").unwrap();
        assert_eq!(values, vec![500.0, 500.5, 501.0, 501.5]);
    }

    #[test]
    fn test_parse_axis_array_count_mismatch() {
        let err = parse_axis_array("1 2 3 4", 5, "X/ChannelAxisArray").unwrap_err();
        match err {
            SmdError::MalformedArray { field, reason } => {
                assert_eq!(field, "X/ChannelAxisArray");
                assert!(reason.contains("expected 5 values, found 4"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_axis_array_bad_token() {
        let err = parse_axis_array("1 2 x 4", 4, "A").unwrap_err();
        assert!(matches!(err, SmdError::MalformedArray { .. }));
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("False"), Some(false));
        assert_eq!(parse_bool("yes"), None);
    }

    #[test]
    fn test_strict_date_and_time() {
        assert_eq!(parse_date("2023/01/31"), NaiveDate::from_ymd_opt(2023, 1, 31));
        assert_eq!(parse_date("2023/1/31"), None);
        assert_eq!(parse_date("2023-01-31"), None);
        assert_eq!(parse_date("2023/02/30"), None);

        assert_eq!(parse_time("09:05:00"), NaiveTime::from_hms_opt(9, 5, 0));
        assert_eq!(parse_time("9:05:00"), None);
        assert_eq!(parse_time("25:00:00"), None);
    }
}
