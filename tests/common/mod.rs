//! Synthetic SMD files for integration tests

#![allow(dead_code)]

use std::path::Path;

/// Builder for a minimal single-channel SMD file
pub struct SmdFile {
    nx: usize,
    ny: usize,
    channel_size: usize,
    axis_tokens: usize,
    payload_values: usize,
    laser_nm: f64,
}

impl SmdFile {
    /// A consistent `nx` x `ny` scan with `channel_size` points per spectrum
    pub fn new(nx: usize, ny: usize, channel_size: usize) -> Self {
        Self {
            nx,
            ny,
            channel_size,
            axis_tokens: channel_size,
            payload_values: nx * ny * channel_size,
            laser_nm: 532.0,
        }
    }

    /// Write this many values in ChannelAxisArray regardless of ChannelSize
    pub fn axis_tokens(mut self, n: usize) -> Self {
        self.axis_tokens = n;
        self
    }

    /// Write this many floats in the payload
    pub fn payload_values(mut self, n: usize) -> Self {
        self.payload_values = n;
        self
    }

    pub fn laser(mut self, nm: f64) -> Self {
        self.laser_nm = nm;
        self
    }

    pub fn xml(&self) -> String {
        let axis = (0..self.axis_tokens)
            .map(|i| format!("{}", 540.0 + i as f64))
            .collect::<Vec<_>>()
            .join(" ");
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<SCANDATA>
  <Vendor>Tokyo Instruments</Vendor>
  <Version>1</Version>
  <ScannedFrameParameters>
    <ScanRepeatNumber>1</ScanRepeatNumber>
    <FrameHeader>
      <Vendor>TII</Vendor>
      <Version>1</Version>
      <Date>2024/02/29</Date>
      <Time>08:15:00</Time>
      <Information></Information>
      <SystemName>NanoFinder</SystemName>
      <PositioningSysName>Stage</PositioningSysName>
      <DetectionSysName>CCD</DetectionSysName>
      <ScannedDataName>Raman</ScannedDataName>
    </FrameHeader>
    <FrameOptions>
      <Vendor>TII</Vendor>
      <Version>1</Version>
      <OmuLaserWLnm>{laser}</OmuLaserWLnm>
      <OmuCurPower>2</OmuCurPower>
      <OmuGratingGroove>600</OmuGratingGroove>
      <OmuCentralWaveLengthNM>580</OmuCentralWaveLengthNM>
      <OmuPinHoleSize>100</OmuPinHoleSize>
    </FrameOptions>
    <Stage3DParameters>
      <Vendor>TII</Vendor>
      <Version>1</Version>
      <AxisSizeX>{nx}</AxisSizeX>
      <AxisSizeY>{ny}</AxisSizeY>
      <AxisSizeZ>1</AxisSizeZ>
      <StageAxesDimentions>
        <AxisX><AxisIsInUse>1</AxisIsInUse><AxisIsInversed>0</AxisIsInversed><AxisName>X</AxisName><AxisUnitName>um</AxisUnitName><AxisCountStep>1</AxisCountStep><AxisScaleFloat>0.1</AxisScaleFloat></AxisX>
        <AxisY><AxisIsInUse>1</AxisIsInUse><AxisIsInversed>0</AxisIsInversed><AxisName>Y</AxisName><AxisUnitName>um</AxisUnitName><AxisCountStep>1</AxisCountStep><AxisScaleFloat>0.1</AxisScaleFloat></AxisY>
        <AxisZ><AxisIsInUse>0</AxisIsInUse><AxisIsInversed>0</AxisIsInversed><AxisName>Z</AxisName><AxisUnitName>um</AxisUnitName><AxisCountStep>1</AxisCountStep><AxisScaleFloat>0.1</AxisScaleFloat></AxisZ>
      </StageAxesDimentions>
    </Stage3DParameters>
    <DataCalibration>
      <Vendor>TII</Vendor>
      <Version>1</Version>
      <DataDimentions>
        <Channel0>
          <DeviceGuid>0</DeviceGuid>
          <DeviceName>CCD</DeviceName>
          <DataChannelName>Photons</DataChannelName>
          <DataChannelUnit>Counts</DataChannelUnit>
          <ChannelSize>{channel_size}</ChannelSize>
          <ChannelAxisName>Wavelength</ChannelAxisName>
          <ChannelAxisUnit>nm</ChannelAxisUnit>
          <ChannelAxisLaserWl>{laser}</ChannelAxisLaserWl>
          <ChannelAxisArray>{axis}</ChannelAxisArray>
          <ChannelInfo>
            <Note>Exposure time = 1.0, Cycle time = 1.1</Note>
          </ChannelInfo>
        </Channel0>
      </DataDimentions>
    </DataCalibration>
  </ScannedFrameParameters>
</SCANDATA>
"#,
            laser = self.laser_nm,
            nx = self.nx,
            ny = self.ny,
            channel_size = self.channel_size,
            axis = axis,
        )
    }

    /// Header followed by a payload whose value `i` is `i as f32`
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = self.xml().into_bytes();
        for i in 0..self.payload_values {
            bytes.extend_from_slice(&(i as f32).to_le_bytes());
        }
        bytes
    }

    pub fn write(&self, path: &Path) {
        std::fs::write(path, self.to_bytes()).unwrap();
    }
}
