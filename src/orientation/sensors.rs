use std::{collections::VecDeque, fmt};

use nalgebra::{UnitQuaternion, Vector3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    Compass,
    Accelerometer,
    Gyroscope,
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SensorKind::Compass       => "compass",
            SensorKind::Accelerometer => "accelerometer",
            SensorKind::Gyroscope     => "gyroscope",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SensorError {
    /// The device has no such sensor; retrying is pointless
    Unsupported,
    /// Sensor exists but has no fresh sample yet
    NotReady,
    /// Sample rejected as malformed
    Invalid(String),
}

pub type SensorReading<T> = std::result::Result<T, SensorError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingReference {
    Magnetic,
    True,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingSample {
    pub degrees:   f64, // clockwise from north, [0, 360)
    pub reference: HeadingReference,
}

/// Source of raw device samples. Every read reports its own outcome; the
/// fusion code decides what to do with failures in one place.
pub trait SensorSource {
    fn read_heading(&mut self) -> SensorReading<HeadingSample>;

    /// Raw acceleration in the device frame, gravity included
    fn read_acceleration(&mut self) -> SensorReading<Vector3<f64>>;

    /// Attitude integrated by the platform from the gyroscope
    fn read_attitude(&mut self) -> SensorReading<UnitQuaternion<f64>> {
        Err(SensorError::Unsupported)
    }
}

/// Device tilt in degrees, nalgebra Euler convention without yaw: the
/// device attitude is `R_y(pitch) * R_x(roll)`. Device axes are x right,
/// y forward (top edge), z up out of the screen, so `roll` raises the top
/// edge and `pitch` lowers the right edge.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tilt {
    pub roll:  f64,
    pub pitch: f64,
}

impl Tilt {
    /// Tilt from the accelerometer reading. A device lying flat reads
    /// (0, 0, +g).
    pub fn from_gravity(accel: &Vector3<f64>) -> Option<Tilt> {
        if !accel.iter().all(|v| v.is_finite()) || accel.norm() < 1e-6 {
            return None;
        }
        // up in the device frame is (-sin p, cos p sin r, cos p cos r)
        let roll = f64::atan2(accel.y, accel.z);
        let pitch = f64::atan2(-accel.x, f64::sqrt(accel.y * accel.y + accel.z * accel.z));
        Some(Tilt {
            roll:  roll.to_degrees(),
            pitch: pitch.to_degrees(),
        })
    }

    /// Tilt part of a device-to-world attitude; yaw is left to the compass
    pub fn from_attitude(attitude: &UnitQuaternion<f64>) -> Tilt {
        let (roll, pitch, _yaw) = attitude.euler_angles();
        Tilt {
            roll:  roll.to_degrees(),
            pitch: pitch.to_degrees(),
        }
    }

    /// Rotation taking level-device coordinates into the tilted device frame
    pub fn compensation(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::from_euler_angles(self.roll.to_radians(), self.pitch.to_radians(), 0.0)
            .inverse()
    }
}

/// Sensors of a device without any orientation hardware
pub struct NoSensors;

impl SensorSource for NoSensors {
    fn read_heading(&mut self) -> SensorReading<HeadingSample> {
        Err(SensorError::Unsupported)
    }

    fn read_acceleration(&mut self) -> SensorReading<Vector3<f64>> {
        Err(SensorError::Unsupported)
    }
}

/// Replays queued samples, then repeats the last one. Used by the headless
/// driver and tests.
pub struct ScriptedSensors {
    headings:      VecDeque<SensorReading<HeadingSample>>,
    last_heading:  SensorReading<HeadingSample>,
    accel:         SensorReading<Vector3<f64>>,
    attitude:      SensorReading<UnitQuaternion<f64>>,
}

impl ScriptedSensors {
    pub fn new() -> Self {
        Self {
            headings:     VecDeque::new(),
            last_heading: Err(SensorError::NotReady),
            accel:        Ok(Vector3::new(0.0, 0.0, 9.81)),
            attitude:     Err(SensorError::Unsupported),
        }
    }

    pub fn with_heading(mut self, degrees: f64) -> Self {
        self.last_heading = Ok(HeadingSample { degrees, reference: HeadingReference::True });
        self
    }

    pub fn without_compass(mut self) -> Self {
        self.headings.clear();
        self.last_heading = Err(SensorError::Unsupported);
        self
    }

    pub fn without_accelerometer(mut self) -> Self {
        self.accel = Err(SensorError::Unsupported);
        self
    }

    pub fn push_heading(&mut self, reading: SensorReading<HeadingSample>) {
        self.headings.push_back(reading);
    }

    pub fn set_heading(&mut self, degrees: f64, reference: HeadingReference) {
        self.headings.clear();
        self.last_heading = Ok(HeadingSample { degrees, reference });
    }

    pub fn set_acceleration(&mut self, accel: SensorReading<Vector3<f64>>) {
        self.accel = accel;
    }

    pub fn set_attitude(&mut self, attitude: SensorReading<UnitQuaternion<f64>>) {
        self.attitude = attitude;
    }
}

impl Default for ScriptedSensors {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorSource for ScriptedSensors {
    fn read_heading(&mut self) -> SensorReading<HeadingSample> {
        if let Some(reading) = self.headings.pop_front() {
            self.last_heading = reading;
        }
        self.last_heading.clone()
    }

    fn read_acceleration(&mut self) -> SensorReading<Vector3<f64>> {
        self.accel.clone()
    }

    fn read_attitude(&mut self) -> SensorReading<UnitQuaternion<f64>> {
        self.attitude.clone()
    }
}

#[test]
fn test_tilt_from_gravity() {
    let flat = Tilt::from_gravity(&Vector3::new(0.0, 0.0, 9.81)).unwrap();
    assert!(flat.pitch.abs() < 1e-9 && flat.roll.abs() < 1e-9);

    // top edge raised 30 deg: gravity gains a +y component
    let g = 9.81;
    let raised = Tilt::from_gravity(&Vector3::new(0.0, g * 0.5, g * f64::sqrt(3.0) / 2.0)).unwrap();
    assert!(f64::abs(raised.roll - 30.0) < 1e-9, "{:?}", raised);
    assert!(raised.pitch.abs() < 1e-9, "{:?}", raised);

    // right edge lowered 20 deg
    let a = 20f64.to_radians();
    let lowered = Tilt::from_gravity(&Vector3::new(-g * a.sin(), 0.0, g * a.cos())).unwrap();
    assert!(f64::abs(lowered.pitch - 20.0) < 1e-9, "{:?}", lowered);
    assert!(lowered.roll.abs() < 1e-9, "{:?}", lowered);

    assert!(Tilt::from_gravity(&Vector3::zeros()).is_none());
    assert!(Tilt::from_gravity(&Vector3::new(f64::NAN, 0.0, 1.0)).is_none());
}

#[test]
fn test_tilt_from_attitude() {
    let attitude = UnitQuaternion::from_euler_angles(0.1, -0.2, 1.3);
    let tilt = Tilt::from_attitude(&attitude);
    assert!(f64::abs(tilt.roll - 0.1f64.to_degrees()) < 1e-9);
    assert!(f64::abs(tilt.pitch + 0.2f64.to_degrees()) < 1e-9);
}

#[test]
fn test_tilt_sources_agree() {
    for (roll, pitch, yaw) in [(0.3, -0.2, 1.0), (-0.7, 0.4, -2.5), (0.0, 0.9, 0.2), (1.2, 0.0, 3.0)] {
        let attitude = UnitQuaternion::from_euler_angles(roll, pitch, yaw);
        let accel = attitude.inverse() * Vector3::new(0.0, 0.0, 9.81);
        let from_gyro = Tilt::from_attitude(&attitude);
        let from_accel = Tilt::from_gravity(&accel).unwrap();
        assert!(f64::abs(from_gyro.roll - from_accel.roll) < 1e-9, "{:?} {:?}", from_gyro, from_accel);
        assert!(f64::abs(from_gyro.pitch - from_accel.pitch) < 1e-9, "{:?} {:?}", from_gyro, from_accel);
    }
}

#[test]
fn test_scripted_sensors_replay() {
    let mut sensors = ScriptedSensors::new().with_heading(10.0);
    sensors.push_heading(Err(SensorError::NotReady));
    sensors.push_heading(Ok(HeadingSample { degrees: 20.0, reference: HeadingReference::Magnetic }));
    assert_eq!(sensors.read_heading(), Err(SensorError::NotReady));
    assert_eq!(sensors.read_heading().unwrap().degrees, 20.0);
    assert_eq!(sensors.read_heading().unwrap().degrees, 20.0);
    assert_eq!(NoSensors.read_heading(), Err(SensorError::Unsupported));
}
