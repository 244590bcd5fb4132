use anyhow::Result;
use log::debug;

use nanofinder::units::{convert_spectral_units, SpectralUnit};

/// Convert values between spectral units and print one per line
pub fn run(values: Vec<f64>, from: SpectralUnit, to: SpectralUnit, laser: f64) -> Result<()> {
    let needs_laser = from == SpectralUnit::RamanShift || to == SpectralUnit::RamanShift;
    if needs_laser && !(laser.is_finite() && laser > 0.0) {
        anyhow::bail!("Laser wavelength must be a positive number of nm, got {}", laser);
    }
    debug!("Converting {} value(s) from {} to {} (laser {} nm)", values.len(), from, to, laser);

    let converted = convert_spectral_units(values.clone(), from, to, laser);
    for (value, result) in values.iter().zip(&converted) {
        println!("{} {} = {} {}", value, from, result, to);
    }
    Ok(())
}
