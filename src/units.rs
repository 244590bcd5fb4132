//! Spectral unit conversion
//!
//! Converts spectral-axis values between the four units used by NanoFinder
//! exports:
//!
//! | Unit | Token | Quantity |
//! |------|-------|----------|
//! | [`SpectralUnit::Nanometer`] | `nm` | wavelength |
//! | [`SpectralUnit::Wavenumber`] | `cm_1` (or `cm-1`) | absolute wavenumber |
//! | [`SpectralUnit::ElectronVolt`] | `eV` | photon energy |
//! | [`SpectralUnit::RamanShift`] | `raman_shift` | wavenumber offset from the laser line |
//!
//! Every conversion goes through absolute wavenumber (cm⁻¹). Raman shift is
//! `laser_cm1 - value_cm1`, so spectral positions beyond the laser energy map
//! to negative shifts; these are never clamped.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Nanometres per centimetre; `cm⁻¹ = NM_PER_CM / nm`.
pub const NM_PER_CM: f64 = 1e7;

/// Wavenumbers (cm⁻¹) per electronvolt, i.e. `1 / (h·c)` in eV·cm.
pub const WAVENUMBERS_PER_EV: f64 = 8065.544005;

/// Laser line used when a caller has no better reference (532 nm DPSS).
pub const DEFAULT_LASER_WAVELENGTH_NM: f64 = 532.000006769476;

/// Errors raised by unit conversion
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnitError {
    /// Unit token is not one of the four supported units
    #[error("Invalid spectral unit '{0}'. Must be one of nm, cm_1, eV, raman_shift")]
    InvalidUnit(String),
}

/// A unit of the spectral axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpectralUnit {
    /// Wavelength in nanometres
    #[serde(rename = "nm")]
    Nanometer,
    /// Absolute wavenumber in cm⁻¹
    #[serde(rename = "cm_1", alias = "cm-1")]
    Wavenumber,
    /// Photon energy in electronvolts
    #[serde(rename = "eV", alias = "ev")]
    ElectronVolt,
    /// Raman shift in cm⁻¹ relative to the excitation laser
    #[serde(rename = "raman_shift")]
    RamanShift,
}

impl SpectralUnit {
    /// All supported units
    pub const ALL: [SpectralUnit; 4] = [
        SpectralUnit::Nanometer,
        SpectralUnit::Wavenumber,
        SpectralUnit::ElectronVolt,
        SpectralUnit::RamanShift,
    ];

    /// Canonical token for this unit
    pub fn as_str(&self) -> &'static str {
        match self {
            SpectralUnit::Nanometer => "nm",
            SpectralUnit::Wavenumber => "cm_1",
            SpectralUnit::ElectronVolt => "eV",
            SpectralUnit::RamanShift => "raman_shift",
        }
    }
}

impl fmt::Display for SpectralUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpectralUnit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nm" => Ok(SpectralUnit::Nanometer),
            "cm_1" | "cm-1" => Ok(SpectralUnit::Wavenumber),
            "ev" => Ok(SpectralUnit::ElectronVolt),
            "raman_shift" => Ok(SpectralUnit::RamanShift),
            _ => Err(UnitError::InvalidUnit(s.to_string())),
        }
    }
}

/// Values that can be pushed through a spectral conversion
///
/// Scalars convert to scalars and collections convert element-wise to a
/// collection of the same shape.
pub trait SpectralValues: Sized {
    /// Apply `f` to every value
    fn map_values<F: Fn(f64) -> f64>(self, f: F) -> Self;
}

impl SpectralValues for f64 {
    fn map_values<F: Fn(f64) -> f64>(self, f: F) -> Self {
        f(self)
    }
}

impl SpectralValues for f32 {
    fn map_values<F: Fn(f64) -> f64>(self, f: F) -> Self {
        f(self as f64) as f32
    }
}

impl SpectralValues for Vec<f64> {
    fn map_values<F: Fn(f64) -> f64>(mut self, f: F) -> Self {
        for v in self.iter_mut() {
            *v = f(*v);
        }
        self
    }
}

impl SpectralValues for Vec<f32> {
    fn map_values<F: Fn(f64) -> f64>(mut self, f: F) -> Self {
        for v in self.iter_mut() {
            *v = f(*v as f64) as f32;
        }
        self
    }
}

impl<const N: usize> SpectralValues for [f64; N] {
    fn map_values<F: Fn(f64) -> f64>(self, f: F) -> Self {
        self.map(f)
    }
}

/// A resolved conversion between two units for a given laser line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralConversion {
    unit_in: SpectralUnit,
    unit_out: SpectralUnit,
    laser_nm: f64,
    laser_cm1: f64,
}

impl SpectralConversion {
    /// Prepare a conversion, precomputing the laser line in cm⁻¹
    pub fn new(unit_in: SpectralUnit, unit_out: SpectralUnit, laser_wavelength_nm: f64) -> Self {
        Self {
            unit_in,
            unit_out,
            laser_nm: laser_wavelength_nm,
            laser_cm1: NM_PER_CM / laser_wavelength_nm,
        }
    }

    /// Whether this conversion leaves values untouched
    pub fn is_identity(&self) -> bool {
        self.unit_in == self.unit_out
    }

    /// Convert one value
    #[inline]
    pub fn apply(&self, value: f64) -> f64 {
        match (self.unit_in, self.unit_out) {
            (a, b) if a == b => value,
            // scaled form keeps a zero shift on the laser line exactly
            (SpectralUnit::RamanShift, SpectralUnit::Nanometer) => {
                self.laser_nm / (1.0 - value * self.laser_nm / NM_PER_CM)
            }
            _ => self.from_wavenumber(self.to_wavenumber(value)),
        }
    }

    #[inline]
    fn to_wavenumber(&self, value: f64) -> f64 {
        match self.unit_in {
            SpectralUnit::Nanometer => NM_PER_CM / value,
            SpectralUnit::Wavenumber => value,
            SpectralUnit::ElectronVolt => value * WAVENUMBERS_PER_EV,
            SpectralUnit::RamanShift => self.laser_cm1 - value,
        }
    }

    #[inline]
    fn from_wavenumber(&self, cm1: f64) -> f64 {
        match self.unit_out {
            SpectralUnit::Nanometer => NM_PER_CM / cm1,
            SpectralUnit::Wavenumber => cm1,
            SpectralUnit::ElectronVolt => cm1 / WAVENUMBERS_PER_EV,
            SpectralUnit::RamanShift => self.laser_cm1 - cm1,
        }
    }
}

/// Convert spectral values from `unit_in` to `unit_out`
///
/// `laser_wavelength_nm` is only used when either side is
/// [`SpectralUnit::RamanShift`]. Identical units return the input untouched.
/// Scalars are accepted as `f32` or `f64`, so float literals need a suffix.
///
/// # Example
/// ```
/// use nanofinder::units::{convert_spectral_units, SpectralUnit};
///
/// let cm1 = convert_spectral_units(500.0_f64, SpectralUnit::Nanometer, SpectralUnit::Wavenumber, 532.0);
/// assert!((cm1 - 20000.0).abs() < 1e-9);
/// ```
pub fn convert_spectral_units<T: SpectralValues>(
    value: T,
    unit_in: SpectralUnit,
    unit_out: SpectralUnit,
    laser_wavelength_nm: f64,
) -> T {
    if unit_in == unit_out {
        return value;
    }
    let conversion = SpectralConversion::new(unit_in, unit_out, laser_wavelength_nm);
    value.map_values(|v| conversion.apply(v))
}

/// Same as [`convert_spectral_units`], with units given as tokens
///
/// Fails with [`UnitError::InvalidUnit`] for any token outside the four
/// supported units, even when both tokens are identical.
pub fn convert_spectral_units_str<T: SpectralValues>(
    value: T,
    unit_in: &str,
    unit_out: &str,
    laser_wavelength_nm: f64,
) -> Result<T, UnitError> {
    let unit_in: SpectralUnit = unit_in.parse()?;
    let unit_out: SpectralUnit = unit_out.parse()?;
    Ok(convert_spectral_units(
        value,
        unit_in,
        unit_out,
        laser_wavelength_nm,
    ))
}
