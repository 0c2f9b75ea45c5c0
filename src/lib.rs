#![allow(
    clippy::too_many_arguments,
    clippy::upper_case_acronyms,
    clippy::uninlined_format_args,
    clippy::wrong_self_convention
)]

pub mod error;
pub mod log_utils;
pub mod utils;
pub mod options;
pub mod sky_math;
pub mod catalog;
pub mod orientation;
pub mod sky;
