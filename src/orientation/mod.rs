pub mod sensors;
pub mod fusion;

pub use sensors::{SensorKind, SensorSource};
pub use fusion::{OrientationFusion, OrientationState, FusionState, FusionMode};
