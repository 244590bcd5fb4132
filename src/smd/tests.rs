use super::*;
use crate::models::ChannelAxisUnit;

/// Header of a small synthetic scan
pub(crate) fn sample_xml(nx: usize, ny: usize, channel_size: usize) -> String {
    let axis_array = (0..channel_size)
        .map(|i| format!("{}", 500.0 + i as f64 * 0.5))
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<SCANDATA>
  <Vendor>Tokyo Instruments</Vendor>
  <Version>1.0</Version>
  <ScannedFrameParameters>
    <Vendor>Tokyo Instruments</Vendor>
    <Version>1.0</Version>
    <ScanRepeatNumber>1</ScanRepeatNumber>
    <DataBlockSizeBytes>{block}</DataBlockSizeBytes>
    <FrameHeader>
      <Vendor>TII</Vendor>
      <Version>3.2</Version>
      <Date>2023/05/17</Date>
      <Time>14:03:27</Time>
      <Information>MoS2 flake</Information>
      <SystemName>NanoFinder 30</SystemName>
      <PositioningSysName>Piezo</PositioningSysName>
      <DetectionSysName>CCD</DetectionSysName>
      <ScannedDataName>Spectra</ScannedDataName>
    </FrameHeader>
    <FrameOptions>
      <Vendor>TII</Vendor>
      <Version>3.2</Version>
      <OmuLaserWLnm>532.000006769476</OmuLaserWLnm>
      <OmuCurPower>1.5</OmuCurPower>
      <OmuGratingGroove>1800 gr/mm</OmuGratingGroove>
      <OmuCentralWaveLengthNM>560</OmuCentralWaveLengthNM>
      <OmuPinHoleSize>50</OmuPinHoleSize>
    </FrameOptions>
    <Stage3DParameters>
      <Vendor>TII</Vendor>
      <Version>3.2</Version>
      <AxisSizeX>{nx}</AxisSizeX>
      <AxisSizeY>{ny}</AxisSizeY>
      <AxisSizeZ>1</AxisSizeZ>
      <StageAxesDimentions>
        <AxisX>
          <AxisIsInUse>1</AxisIsInUse>
          <AxisIsInversed>0</AxisIsInversed>
          <AxisName>X</AxisName>
          <AxisUnitName>um</AxisUnitName>
          <AxisCountStep>10</AxisCountStep>
          <AxisScaleFloat>0.01</AxisScaleFloat>
        </AxisX>
        <AxisY>
          <AxisIsInUse>1</AxisIsInUse>
          <AxisIsInversed>true</AxisIsInversed>
          <AxisName>Y</AxisName>
          <AxisUnitName>um</AxisUnitName>
          <AxisCountStep>20</AxisCountStep>
          <AxisScaleFloat>0.01</AxisScaleFloat>
        </AxisY>
        <AxisZ>
          <AxisIsInUse>0</AxisIsInUse>
          <AxisIsInversed>0</AxisIsInversed>
          <AxisName>Z</AxisName>
          <AxisUnitName>nm</AxisUnitName>
          <AxisCountStep>5</AxisCountStep>
          <AxisScaleFloat>2</AxisScaleFloat>
        </AxisZ>
      </StageAxesDimentions>
    </Stage3DParameters>
    <DataCalibration>
      <Vendor>TII</Vendor>
      <Version>3.2</Version>
      <DataDimentions>
        <Channel0>
          <DeviceGuid>{{8A6B5C1E}}</DeviceGuid>
          <DeviceName>Andor iDus</DeviceName>
          <DataChannelName>Photons</DataChannelName>
          <DataChannelUnit>Counts</DataChannelUnit>
          <ChannelSize>{channel_size}</ChannelSize>
          <ChannelAxisName>Wavelength</ChannelAxisName>
          <ChannelAxisUnit>nm</ChannelAxisUnit>
          <ChannelAxisLaserWl>532.000006769476</ChannelAxisLaserWl>
          <ChannelAxisArray>{axis_array}</ChannelAxisArray>
          <ChannelInfo>
            <Info0>Temperature = -60</Info0>
            <Info1>Exposure time = 1.0, Cycle time = 1.1</Info1>
            <Info2>Acquisition mode: Accumulate. Number=5</Info2>
          </ChannelInfo>
        </Channel0>
      </DataDimentions>
    </DataCalibration>
  </ScannedFrameParameters>
</SCANDATA>
"#,
        block = nx * ny * channel_size * 4,
    )
}

/// Payload where every value is its own index
pub(crate) fn sample_payload(count: usize) -> Vec<u8> {
    (0..count).flat_map(|i| (i as f32).to_le_bytes()).collect()
}

/// Complete synthetic SMD file
pub(crate) fn sample_smd_bytes(nx: usize, ny: usize, channel_size: usize) -> Vec<u8> {
    let mut bytes = sample_xml(nx, ny, channel_size).into_bytes();
    bytes.extend(sample_payload(nx * ny * channel_size));
    bytes
}

/// Synthetic SMD file declaring a second channel of a different width
///
/// Only Channel0's spectra are in the payload.
pub(crate) fn two_channel_smd_bytes(nx: usize, ny: usize, size0: usize, size1: usize) -> Vec<u8> {
    let second = sample_xml(nx, ny, size1);
    let start = second.find("<Channel0>").unwrap();
    let end = second.find("</Channel0>").unwrap() + "</Channel0>".len();
    let channel1 = second[start..end].replace("Channel0", "Channel1");

    let xml = sample_xml(nx, ny, size0).replacen(
        "</DataDimentions>",
        &format!("{}\n      </DataDimentions>", channel1),
        1,
    );
    let mut bytes = xml.into_bytes();
    bytes.extend(sample_payload(nx * ny * size0));
    bytes
}

#[test]
fn test_load_sample() {
    let mapping = load_smd_bytes(&sample_smd_bytes(3, 2, 4)).unwrap();
    assert_eq!(mapping.vendor(), "Tokyo Instruments");
    assert_eq!(mapping.data().shape(), (6, 4));
    assert_eq!(mapping.data().row(1).unwrap(), &[4.0, 5.0, 6.0, 7.0]);

    let params = mapping.scanned_frame_parameters();
    assert_eq!(params.scan_repeat_number, 1);
    assert_eq!(params.data_block_size_bytes, Some(96));
    assert_eq!(params.frame_header.information, "MoS2 flake");
    assert_eq!(params.frame_options.grating_groove, "1800 gr/mm");
    assert_eq!(params.stage_3d_parameters.map_steps(), [3, 2, 1]);
    assert!(!params.stage_3d_parameters.stage_axes.x.inversed);
    assert!(params.stage_3d_parameters.stage_axes.y.inversed);

    let channel = &params.data_calibration.channels[0];
    assert_eq!(channel.index, 0);
    assert_eq!(channel.device_guid, "{8A6B5C1E}");
    assert_eq!(channel.channel_axis_unit, ChannelAxisUnit::Nanometer);
    assert_eq!(channel.channel_axis_array, vec![500.0, 500.5, 501.0, 501.5]);
    assert_eq!(channel.channel_info.temperature, Some(-60.0));
    assert_eq!(channel.channel_info.cycle_time_s, Some(1.1));
    assert_eq!(channel.channel_info.accumulation_number, Some(5));
}

#[test]
fn test_missing_field_reports_tag_path() {
    let xml = sample_xml(2, 2, 3).replace("<OmuLaserWLnm>532.000006769476</OmuLaserWLnm>", "");
    let err = load_smd_bytes(xml.as_bytes()).unwrap_err();
    match err {
        SmdError::MissingField(path) => assert_eq!(
            path,
            "SCANDATA/ScannedFrameParameters/FrameOptions/OmuLaserWLnm"
        ),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_invalid_number_reports_value() {
    let xml = sample_xml(2, 2, 3).replace("<OmuCurPower>1.5</OmuCurPower>", "<OmuCurPower>1,5</OmuCurPower>");
    let err = load_smd_bytes(xml.as_bytes()).unwrap_err();
    assert!(matches!(err, SmdError::InvalidValue { ref value, .. } if value == "1,5"));
}

#[test]
fn test_invalid_date() {
    let xml = sample_xml(2, 2, 3).replace("2023/05/17", "17.05.2023");
    let err = load_smd_bytes(xml.as_bytes()).unwrap_err();
    assert!(matches!(err, SmdError::InvalidDateOrTime { .. }));
}

#[test]
fn test_corrected_spelling_accepted() {
    let xml = sample_xml(1, 1, 2)
        .replace("StageAxesDimentions", "StageAxesDimensions")
        .replace("DataDimentions", "DataDimensions");
    let mut bytes = xml.into_bytes();
    bytes.extend(sample_payload(2));
    let mapping = load_smd_bytes(&bytes).unwrap();
    assert_eq!(mapping.channel_count(), 1);
}

#[test]
fn test_channels_sorted_by_index() {
    let xml = sample_xml(1, 1, 2);
    let start = xml.find("<Channel0>").unwrap();
    let end = xml.find("</Channel0>").unwrap() + "</Channel0>".len();
    let channel0 = &xml[start..end];
    let channel2 = channel0.replace("Channel0", "Channel2").replace("Andor iDus", "Second CCD");
    // Channel2 placed before Channel0 in the document
    let xml = xml.replacen("<Channel0>", &format!("{}\n<Channel0>", channel2), 1);

    let mut bytes = xml.into_bytes();
    bytes.extend(sample_payload(2));
    let mapping = load_smd_bytes(&bytes).unwrap();
    let indices: Vec<_> = mapping.channels().iter().map(|c| c.index).collect();
    assert_eq!(indices, vec![0, 2]);
    assert_eq!(mapping.channels()[1].device_name, "Second CCD");
    assert!(mapping.has_multiple_channels());
}

#[test]
fn test_no_channels() {
    let xml = sample_xml(1, 1, 2);
    let start = xml.find("<Channel0>").unwrap();
    let end = xml.find("</Channel0>").unwrap() + "</Channel0>".len();
    let xml = format!("{}{}", &xml[..start], &xml[end..]);
    let err = load_smd_bytes(xml.as_bytes()).unwrap_err();
    assert!(matches!(err, SmdError::NoChannels(_)));
}

#[test]
fn test_axis_array_token_count() {
    let xml = sample_xml(1, 1, 5).replace("<ChannelSize>5</ChannelSize>", "<ChannelSize>6</ChannelSize>");
    let err = load_smd_bytes(xml.as_bytes()).unwrap_err();
    assert!(matches!(err, SmdError::MalformedArray { .. }));
}

#[test]
fn test_payload_not_multiple_of_row() {
    let mut bytes = sample_xml(2, 2, 3).into_bytes();
    bytes.extend(sample_payload(13));
    let err = load_smd_bytes(&bytes).unwrap_err();
    assert!(matches!(
        err,
        SmdError::PayloadSizeMismatch {
            values: 13,
            row_width: 3
        }
    ));
}

#[test]
fn test_missing_channel_info_is_empty() {
    let xml = sample_xml(1, 1, 2);
    let start = xml.find("<ChannelInfo>").unwrap();
    let end = xml.find("</ChannelInfo>").unwrap() + "</ChannelInfo>".len();
    let mut bytes = format!("{}{}", &xml[..start], &xml[end..]).into_bytes();
    bytes.extend(sample_payload(2));
    let mapping = load_smd_bytes(&bytes).unwrap();
    assert!(mapping.channels()[0].channel_info.is_empty());
}

#[test]
fn test_write_back_round_trip() {
    let original = load_smd_bytes(&sample_smd_bytes(3, 2, 4)).unwrap();
    let bytes = to_smd_bytes(&original).unwrap();
    let reloaded = load_smd_bytes(&bytes).unwrap();
    assert_eq!(reloaded, original);
}

#[test]
fn test_write_back_keeps_empty_stamps() {
    let xml = sample_xml(2, 2, 3)
        .replace("<Vendor>TII</Vendor>", "<Vendor/>")
        .replace("<Version>3.2</Version>", "<Version/>");
    let mut bytes = xml.into_bytes();
    bytes.extend(sample_payload(12));

    let original = load_smd_bytes(&bytes).unwrap();
    let header = &original.scanned_frame_parameters().frame_header;
    assert!(header.stamp.vendor.is_empty() && header.stamp.version.is_empty());

    let reloaded = load_smd_bytes(&to_smd_bytes(&original).unwrap()).unwrap();
    assert_eq!(reloaded, original);
}

#[test]
fn test_write_back_two_channels() {
    let original = load_smd_bytes(&two_channel_smd_bytes(2, 2, 4, 3)).unwrap();
    let reloaded = load_smd_bytes(&to_smd_bytes(&original).unwrap()).unwrap();
    assert_eq!(reloaded.channel_count(), 2);
    assert_eq!(reloaded, original);
}

#[test]
fn test_load_smd_tags_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.smd");
    std::fs::write(&path, b"").unwrap();

    let err = load_smd(&path).unwrap_err();
    assert_eq!(err.path(), Some(path.as_path()));
    assert!(matches!(err.root(), SmdError::EmptyFile));
}

#[test]
fn test_load_smd_records_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scan.smd");
    std::fs::write(&path, sample_smd_bytes(2, 2, 3)).unwrap();

    let mapping = load_smd(&path).unwrap();
    assert_eq!(mapping.source_path(), Some(path.as_path()));
}

#[test]
fn test_read_parts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scan.smd");
    let bytes = sample_smd_bytes(2, 1, 3);
    std::fs::write(&path, &bytes).unwrap();

    let (document, offset) = read_xml_part(&path).unwrap();
    assert_eq!(document.root().name(), "SCANDATA");
    let payload = read_binary_part(&path, offset).unwrap();
    assert_eq!(payload, sample_payload(6));
}
