use crate::orientation::sensors::SensorKind;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Sensor `{0}` is not supported on this device")]
    SensorUnavailable(SensorKind),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;
