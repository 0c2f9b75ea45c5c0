use std::time::Duration;

use serde::{Serialize, Deserialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SensorOptions {
    /// Live sensor fusion when on, pure sidereal rotation when off
    pub ar_tracking:           bool,
    /// Share of the heading error corrected per sensor update, [0, 1]
    pub smoothing:             f64,
    /// Heading changes below this (degrees) are treated as noise
    pub heading_threshold:     f64,
    /// Slerp fraction of the dome rotation per sensor update, (0, 1]
    pub blend_fraction:        f64,
    pub sample_interval_ms:    u64,
    /// Consecutive heading samples averaged on recalibration
    pub recalibration_samples: usize,
    /// Added to magnetic headings to get true headings, degrees east
    pub magnetic_declination:  f64,
}

impl Default for SensorOptions {
    fn default() -> Self {
        Self {
            ar_tracking:           true,
            smoothing:             0.2,
            heading_threshold:     0.5,
            blend_fraction:        0.1,
            sample_interval_ms:    100,
            recalibration_samples: 5,
            magnetic_declination:  0.0,
        }
    }
}

impl SensorOptions {
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    pub fn check(&self) -> anyhow::Result<()> {
        if !(0.0..=1.0).contains(&self.smoothing) {
            anyhow::bail!("Smoothing factor {} is out of [0, 1]", self.smoothing);
        }
        if !(self.blend_fraction > 0.0 && self.blend_fraction <= 1.0) {
            anyhow::bail!("Blend fraction {} is out of (0, 1]", self.blend_fraction);
        }
        if !(0.0..180.0).contains(&self.heading_threshold) {
            anyhow::bail!("Heading threshold {} is out of [0, 180)", self.heading_threshold);
        }
        if self.sample_interval_ms == 0 {
            anyhow::bail!("Sensor sample interval must be non-zero");
        }
        if !(-180.0..=180.0).contains(&self.magnetic_declination) {
            anyhow::bail!("Magnetic declination {} is out of range", self.magnetic_declination);
        }
        Ok(())
    }
}
