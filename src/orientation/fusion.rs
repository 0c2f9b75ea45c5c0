use std::{collections::HashSet, time::Duration};

use nalgebra::{UnitQuaternion, Vector3};

use crate::{
    error::{Error, Result},
    options::SensorOptions,
    utils::{math::*, throttle::Throttle},
};
use super::sensors::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FusionState {
    /// No valid heading seen since start or since the last recalibration
    Uninitialized,
    Tracking,
}

/// Fidelity of the dome alignment with the sensors that are present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FusionMode {
    /// Compass and tilt (a missing tilt sensor means a level device)
    Full,
    /// No compass: device assumed to face north
    TiltOnly,
    /// Neither: sidereal rotation only
    Static,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrientationState {
    pub state:            FusionState,
    pub mode:             FusionMode,
    pub smoothed_heading: Option<f64>,
    pub raw_heading:      Option<f64>,
    pub tilt:             Tilt,
    pub baseline:         Option<f64>,
    pub rotation:         UnitQuaternion<f64>,
    /// Signed change of the smoothed heading at the last update, degrees
    pub last_correction:  f64,
}

impl Default for OrientationState {
    fn default() -> Self {
        Self {
            state:            FusionState::Uninitialized,
            mode:             FusionMode::Full,
            smoothed_heading: None,
            raw_heading:      None,
            tilt:             Tilt::default(),
            baseline:         None,
            rotation:         UnitQuaternion::identity(),
            last_correction:  0.0,
        }
    }
}

impl OrientationState {
    /// Smoothed heading relative to the calibration baseline
    pub fn relative_heading(&self) -> Option<f64> {
        match (self.baseline, self.smoothed_heading) {
            (Some(baseline), Some(heading)) => Some(shortest_arc(baseline, heading)),
            _ => None,
        }
    }
}

/// Keeps the dome rotation aligned with the real sky from noisy heading
/// and tilt samples. The resulting rotation maps equatorial unit vectors
/// into the device frame (x right, y forward, z up).
pub struct OrientationFusion {
    options:     SensorOptions,
    state:       OrientationState,
    throttle:    Throttle,
    unavailable: HashSet<SensorKind>,
    snapped:     bool,
}

impl OrientationFusion {
    pub fn new(options: &SensorOptions) -> Self {
        Self {
            options:     options.clone(),
            state:       OrientationState::default(),
            throttle:    Throttle::new(options.sample_interval()),
            unavailable: HashSet::new(),
            snapped:     false,
        }
    }

    pub fn state(&self) -> &OrientationState {
        &self.state
    }

    pub fn rotation(&self) -> &UnitQuaternion<f64> {
        &self.state.rotation
    }

    pub fn ar_tracking(&self) -> bool {
        self.options.ar_tracking
    }

    pub fn set_ar_tracking(&mut self, enabled: bool) {
        if self.options.ar_tracking == enabled {
            return;
        }
        self.options.ar_tracking = enabled;
        self.snapped = false;
        self.throttle.force();
        log::info!("AR tracking {}", if enabled { "enabled" } else { "disabled" });
    }

    pub fn is_unavailable(&self, kind: SensorKind) -> bool {
        self.unavailable.contains(&kind)
    }

    /// Advances the sampling throttle and, when due, reads the sensors and
    /// moves the dome rotation toward the new target. `sidereal` is the
    /// equatorial to east-north-up rotation for the current moment.
    /// Returns `true` if the sensors were sampled.
    pub fn update(
        &mut self,
        elapsed:  Duration,
        sensors:  &mut dyn SensorSource,
        sidereal: &UnitQuaternion<f64>,
    ) -> bool {
        if !self.options.ar_tracking {
            self.state.rotation = *sidereal;
            return false;
        }
        if !self.throttle.advance(elapsed) {
            return false;
        }

        self.state.last_correction = 0.0;
        if let Some(heading) = self.read_heading(sensors) {
            self.state.raw_heading = Some(heading);
            match self.state.smoothed_heading {
                Some(smoothed) if self.state.state == FusionState::Tracking => {
                    let diff = shortest_arc(smoothed, heading);
                    if diff.abs() > self.options.heading_threshold {
                        let step = self.options.smoothing * diff;
                        self.state.smoothed_heading = Some(normalize_degrees(smoothed + step));
                        self.state.last_correction = step;
                    }
                }
                _ => {
                    self.state.smoothed_heading = Some(heading);
                    self.state.state = FusionState::Tracking;
                    self.snapped = false;
                    log::debug!("Orientation tracking started at heading {:.1}", heading);
                }
            }
        }
        if let Some(tilt) = self.read_tilt(sensors) {
            self.state.tilt = tilt;
        }
        self.state.mode = self.current_mode();

        self.solve(sidereal);
        true
    }

    /// Resets the baseline from `recalibration_samples` consecutive fresh
    /// headings and snaps the dome to the re-solved target right away.
    /// Returns the new baseline.
    pub fn recalibrate(
        &mut self,
        sensors:  &mut dyn SensorSource,
        sidereal: &UnitQuaternion<f64>,
    ) -> Result<f64> {
        self.state.state = FusionState::Uninitialized;
        self.state.smoothed_heading = None;
        self.state.last_correction = 0.0;
        self.snapped = false;
        self.throttle.force();

        let wanted = self.options.recalibration_samples.max(1);
        let mut samples = Vec::with_capacity(wanted);
        for _ in 0..wanted * 4 {
            if samples.len() == wanted || self.is_unavailable(SensorKind::Compass) {
                break;
            }
            if let Some(heading) = self.read_heading(sensors) {
                samples.push(heading);
            }
        }
        if let Some(tilt) = self.read_tilt(sensors) {
            self.state.tilt = tilt;
        }
        self.state.mode = self.current_mode();

        let baseline = circular_mean(&samples);
        if let Some(baseline) = baseline {
            self.state.baseline = Some(baseline);
            self.state.smoothed_heading = Some(baseline);
            self.state.raw_heading = samples.last().copied();
            self.state.state = FusionState::Tracking;
            log::debug!(
                "Recalibrated from {} heading samples, baseline {:.2}",
                samples.len(), baseline
            );
        }
        self.solve(sidereal);

        baseline.ok_or(Error::SensorUnavailable(SensorKind::Compass))
    }

    fn current_mode(&self) -> FusionMode {
        let no_compass = self.is_unavailable(SensorKind::Compass);
        let no_tilt =
            self.is_unavailable(SensorKind::Gyroscope) &&
            self.is_unavailable(SensorKind::Accelerometer);
        match (no_compass, no_tilt) {
            (false, _)    => FusionMode::Full,
            (true, false) => FusionMode::TiltOnly,
            (true, true)  => FusionMode::Static,
        }
    }

    fn target(&self, sidereal: &UnitQuaternion<f64>) -> UnitQuaternion<f64> {
        let compass = match (self.state.mode, self.state.smoothed_heading) {
            (FusionMode::Full, Some(heading)) =>
                UnitQuaternion::from_axis_angle(&Vector3::z_axis(), degree_to_radian(heading)),
            _ =>
                UnitQuaternion::identity(),
        };
        let tilt = if self.state.mode == FusionMode::Static {
            UnitQuaternion::identity()
        } else {
            // cancels pitch and roll only, yaw stays with the compass
            self.state.tilt.compensation()
        };
        tilt * compass * sidereal
    }

    fn solve(&mut self, sidereal: &UnitQuaternion<f64>) {
        let target = self.target(sidereal);
        if !self.snapped {
            self.state.rotation = target;
            self.snapped = true;
            return;
        }
        self.state.rotation = self.state.rotation
            .try_slerp(&target, self.options.blend_fraction, 1e-9)
            .unwrap_or(target);
    }

    fn read_heading(&mut self, sensors: &mut dyn SensorSource) -> Option<f64> {
        match sensors.read_heading() {
            Ok(sample) if sample.degrees.is_finite() => {
                let degrees = match sample.reference {
                    HeadingReference::True =>
                        sample.degrees,
                    HeadingReference::Magnetic =>
                        sample.degrees + self.options.magnetic_declination,
                };
                Some(normalize_degrees(degrees))
            }
            Ok(sample) => {
                log::debug!("Heading sample {} dropped", sample.degrees);
                None
            }
            Err(err) => {
                self.sensor_failed(SensorKind::Compass, err);
                None
            }
        }
    }

    fn read_tilt(&mut self, sensors: &mut dyn SensorSource) -> Option<Tilt> {
        if !self.is_unavailable(SensorKind::Gyroscope) {
            match sensors.read_attitude() {
                Ok(attitude) => return Some(Tilt::from_attitude(&attitude)),
                Err(err) => self.sensor_failed(SensorKind::Gyroscope, err),
            }
        }
        if self.is_unavailable(SensorKind::Accelerometer) {
            return None;
        }
        match sensors.read_acceleration() {
            Ok(accel) => Tilt::from_gravity(&accel),
            Err(err) => {
                self.sensor_failed(SensorKind::Accelerometer, err);
                None
            }
        }
    }

    fn sensor_failed(&mut self, kind: SensorKind, err: SensorError) {
        match err {
            SensorError::Unsupported => {
                if self.unavailable.insert(kind) {
                    log::warn!("{}, orientation fidelity reduced", Error::SensorUnavailable(kind));
                }
            }
            SensorError::NotReady => {}
            SensorError::Invalid(text) => {
                log::debug!("Invalid {} sample: {}", kind, text);
            }
        }
    }
}
