pub mod io_utils;
pub mod math;
pub mod sexagesimal;
pub mod throttle;
