//! Best-effort reconstruction of an SMD file from a [`Mapping`]
//!
//! The header is rebuilt from the typed model, so tags the reader does not
//! consume are not reproduced. Channel notes are regenerated from the parsed
//! [`ChannelInfo`] fields. A file written here loads back to an equivalent
//! mapping; nothing stronger is promised.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::binary::VALUE_SIZE;
use super::document::{ScanDocument, XmlNode};
use super::tags::{self, AXIS, CALIBRATION, CHANNEL, FRAME_HEADER, FRAME_OPTIONS, SCANNED_FRAME, STAGE_3D};
use super::SmdError;
use crate::mapping::Mapping;
use crate::models::*;

/// Tag names used for regenerated channel notes
const NOTE_TAGS: [&str; 3] = ["Temperature", "ExposureTime", "AcquisitionMode"];

/// Write `mapping` as an SMD file at `path`
pub fn write_smd<P: AsRef<Path>>(mapping: &Mapping, path: P) -> Result<(), SmdError> {
    let path = path.as_ref();
    let bytes = to_smd_bytes(mapping).map_err(|e| e.in_file(path))?;
    let mut out = BufWriter::new(File::create(path).map_err(|e| SmdError::from(e).in_file(path))?);
    out.write_all(&bytes)
        .and_then(|_| out.flush())
        .map_err(|e| SmdError::from(e).in_file(path))?;
    info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

/// Encode `mapping` as SMD bytes: XML header, newline, little-endian f32 payload
pub fn to_smd_bytes(mapping: &Mapping) -> Result<Vec<u8>, SmdError> {
    let document = to_document(mapping);

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    write_node(&mut writer, document.root())?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    bytes.extend_from_slice(&mapping.data().to_le_bytes());
    Ok(bytes)
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &XmlNode) -> Result<(), SmdError> {
    writer.write_event(Event::Start(BytesStart::new(node.name())))?;
    if node.children().is_empty() {
        if !node.text().is_empty() {
            writer.write_event(Event::Text(BytesText::new(node.text())))?;
        }
    } else {
        for child in node.children() {
            write_node(writer, child)?;
        }
    }
    writer.write_event(Event::End(BytesEnd::new(node.name())))?;
    Ok(())
}

/// Rebuild the header tree of `mapping`
pub fn to_document(mapping: &Mapping) -> ScanDocument {
    let parameters = mapping.scanned_frame_parameters();
    let payload_bytes = mapping.data().as_slice().len() * VALUE_SIZE;

    let frame = optionally_stamped(XmlNode::new(SCANNED_FRAME::TAG), &parameters.stamp)
        .with_child(leaf(SCANNED_FRAME::SCAN_REPEAT_NUMBER, parameters.scan_repeat_number))
        .with_child(leaf(SCANNED_FRAME::DATA_BLOCK_SIZE_BYTES, payload_bytes))
        .with_child(frame_header(&parameters.frame_header))
        .with_child(frame_options(&parameters.frame_options))
        .with_child(stage_3d_parameters(&parameters.stage_3d_parameters))
        .with_child(data_calibration(&parameters.data_calibration));

    ScanDocument::from_root(
        optionally_stamped(XmlNode::new(tags::ROOT), mapping.stamp()).with_child(frame),
    )
}

fn leaf(tag: &str, value: impl ToString) -> XmlNode {
    XmlNode::new(tag).with_text(value.to_string())
}

/// Prepend vendor/version tags, even when empty
fn stamped(node: XmlNode, stamp: &VendorStamp) -> XmlNode {
    node.with_child(leaf(tags::VENDOR, &stamp.vendor))
        .with_child(leaf(tags::VERSION, &stamp.version))
}

/// Stamp for the blocks where the reader treats it as optional; empty stamps are omitted
fn optionally_stamped(node: XmlNode, stamp: &VendorStamp) -> XmlNode {
    if stamp.vendor.is_empty() && stamp.version.is_empty() {
        return node;
    }
    stamped(node, stamp)
}

fn frame_header(header: &FrameHeader) -> XmlNode {
    stamped(XmlNode::new(FRAME_HEADER::TAG), &header.stamp)
        .with_child(leaf(FRAME_HEADER::DATE, header.date.format("%Y/%m/%d")))
        .with_child(leaf(FRAME_HEADER::TIME, header.time.format("%H:%M:%S")))
        .with_child(leaf(FRAME_HEADER::INFORMATION, &header.information))
        .with_child(leaf(FRAME_HEADER::SYSTEM_NAME, &header.system_name))
        .with_child(leaf(FRAME_HEADER::POSITIONING_SYSTEM_NAME, &header.positioning_system_name))
        .with_child(leaf(FRAME_HEADER::DETECTION_SYSTEM_NAME, &header.detection_system_name))
        .with_child(leaf(FRAME_HEADER::SCANNED_DATA_NAME, &header.scanned_data_name))
}

fn frame_options(options: &FrameOptions) -> XmlNode {
    stamped(XmlNode::new(FRAME_OPTIONS::TAG), &options.stamp)
        .with_child(leaf(FRAME_OPTIONS::LASER_WAVELENGTH_NM, options.laser_wavelength_nm))
        .with_child(leaf(FRAME_OPTIONS::CURRENT_POWER, options.current_power))
        .with_child(leaf(FRAME_OPTIONS::GRATING_GROOVE, &options.grating_groove))
        .with_child(leaf(FRAME_OPTIONS::CENTRAL_WAVELENGTH_NM, options.central_wavelength_nm))
        .with_child(leaf(FRAME_OPTIONS::PINHOLE_SIZE, options.pinhole_size_um))
}

fn stage_3d_parameters(stage: &Stage3DParameters) -> XmlNode {
    let axes = XmlNode::new(STAGE_3D::STAGE_AXES[0])
        .with_child(axis(STAGE_3D::AXIS_X, &stage.stage_axes.x))
        .with_child(axis(STAGE_3D::AXIS_Y, &stage.stage_axes.y))
        .with_child(axis(STAGE_3D::AXIS_Z, &stage.stage_axes.z));

    stamped(XmlNode::new(STAGE_3D::TAG), &stage.stamp)
        .with_child(leaf(STAGE_3D::AXIS_SIZE_X, stage.axis_size_x))
        .with_child(leaf(STAGE_3D::AXIS_SIZE_Y, stage.axis_size_y))
        .with_child(leaf(STAGE_3D::AXIS_SIZE_Z, stage.axis_size_z))
        .with_child(axes)
}

fn axis(tag: &str, axis: &Axis) -> XmlNode {
    XmlNode::new(tag)
        .with_child(leaf(AXIS::IN_USE, axis.in_use))
        .with_child(leaf(AXIS::INVERSED, u8::from(axis.inversed)))
        .with_child(leaf(AXIS::NAME, &axis.name))
        .with_child(leaf(AXIS::UNIT_NAME, &axis.unit_name))
        .with_child(leaf(AXIS::COUNT_STEP, axis.count_step))
        .with_child(leaf(AXIS::SCALE_FLOAT, axis.scale_factor))
}

fn data_calibration(calibration: &DataCalibration) -> XmlNode {
    let dimensions = calibration
        .channels
        .iter()
        .fold(XmlNode::new(CALIBRATION::DATA_DIMENSIONS[0]), |node, ch| {
            node.with_child(channel(ch))
        });
    stamped(XmlNode::new(CALIBRATION::TAG), &calibration.stamp).with_child(dimensions)
}

fn channel(channel: &Channel) -> XmlNode {
    let axis_array = channel
        .channel_axis_array
        .iter()
        .map(f64::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    let info = channel_notes(&channel.channel_info)
        .into_iter()
        .fold(XmlNode::new(CHANNEL::INFO), |node, (tag, note)| {
            node.with_child(leaf(tag, note))
        });

    XmlNode::new(format!("{}{}", CALIBRATION::CHANNEL_PREFIX, channel.index))
        .with_child(leaf(CHANNEL::DEVICE_GUID, &channel.device_guid))
        .with_child(leaf(CHANNEL::DEVICE_NAME, &channel.device_name))
        .with_child(leaf(CHANNEL::DATA_CHANNEL_NAME, &channel.data_channel_name))
        .with_child(leaf(CHANNEL::DATA_CHANNEL_UNIT, &channel.data_channel_unit))
        .with_child(leaf(CHANNEL::CHANNEL_SIZE, channel.channel_size))
        .with_child(leaf(CHANNEL::AXIS_NAME, &channel.channel_axis_name))
        .with_child(leaf(CHANNEL::AXIS_UNIT, channel.channel_axis_unit))
        .with_child(leaf(CHANNEL::AXIS_LASER_WL, channel.channel_axis_laser_wavelength_nm))
        .with_child(leaf(CHANNEL::AXIS_ARRAY, axis_array))
        .with_child(info)
}

/// Free-text notes in the instrument's wording, for the fields that are set
pub fn channel_notes(info: &ChannelInfo) -> Vec<(&'static str, String)> {
    let mut notes = Vec::new();
    if let Some(t) = info.temperature {
        notes.push((NOTE_TAGS[0], format!("Temperature = {}", t)));
    }
    match (info.exposure_time_s, info.cycle_time_s) {
        (Some(e), Some(c)) => notes.push((NOTE_TAGS[1], format!("Exposure time = {}, Cycle time = {}", e, c))),
        (Some(e), None) => notes.push((NOTE_TAGS[1], format!("Exposure time = {}", e))),
        (None, Some(c)) => notes.push((NOTE_TAGS[1], format!("Exposure time = , Cycle time = {}", c))),
        (None, None) => {}
    }
    if let Some(mode) = &info.acquisition_mode {
        let mode = capitalize(mode);
        let note = match info.accumulation_number {
            Some(n) => format!("Acquisition mode: {}. Number = {}", mode, n),
            None => format!("Acquisition mode: {}.", mode),
        };
        notes.push((NOTE_TAGS[2], note));
    }
    notes
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
