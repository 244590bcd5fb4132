use serde::Serialize;

use super::VendorStamp;

/// One motorised stage axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub in_use: i64,
    pub inversed: bool,
    pub name: String,
    /// Unit of the step size (usually `"um"`)
    pub unit_name: String,
    /// Number of motor counts per map step
    pub count_step: i64,
    /// Physical length of one motor count
    pub scale_factor: f64,
}

impl Axis {
    /// Distance between two neighbouring map points, in [`Axis::step_units`]
    pub fn step_size(&self) -> f64 {
        self.count_step as f64 * self.scale_factor
    }

    pub fn step_units(&self) -> &str {
        &self.unit_name
    }
}

/// The x/y/z axis triplet of the stage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageAxes {
    pub x: Axis,
    pub y: Axis,
    pub z: Axis,
}

impl StageAxes {
    /// Step size of each axis, in `(x, y, z)` order
    pub fn step_size(&self) -> [f64; 3] {
        [self.x.step_size(), self.y.step_size(), self.z.step_size()]
    }

    /// Step unit of each axis, in `(x, y, z)` order
    pub fn step_units(&self) -> [&str; 3] {
        [self.x.step_units(), self.y.step_units(), self.z.step_units()]
    }
}

/// Scan grid declared for the 3D stage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stage3DParameters {
    pub stamp: VendorStamp,
    /// Number of map points along x
    pub axis_size_x: usize,
    /// Number of map points along y
    pub axis_size_y: usize,
    /// Number of map points along z
    pub axis_size_z: usize,
    pub stage_axes: StageAxes,
}

impl Stage3DParameters {
    /// Number of map points along `(x, y, z)`
    pub fn map_steps(&self) -> [usize; 3] {
        [self.axis_size_x, self.axis_size_y, self.axis_size_z]
    }
}
