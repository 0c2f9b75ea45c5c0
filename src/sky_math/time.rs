use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::utils::math::normalize_degrees;

/// Julian Date of the J2000 epoch (2000-01-01 12:00 UTC)
pub const J2000_JD: f64 = 2_451_545.0;

pub const DAYS_PER_CENTURY: f64 = 36_525.0;

pub fn j2000() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2000, 1, 1)
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .unwrap_or_default()
}

/// Civil (proleptic Gregorian, UTC) date and time to Julian Date.
///
/// January and February count as months 13 and 14 of the previous year;
/// the Gregorian correction term is applied to every date.
pub fn julian_date(dt: &NaiveDateTime) -> f64 {
    let mut year = dt.year() as i64;
    let mut month = dt.month() as i64;
    if month <= 2 {
        year -= 1;
        month += 12;
    }

    let a = year.div_euclid(100);
    let b = 2 - a + a.div_euclid(4);

    let day_frac =
        (dt.hour() as f64 * 3600.0
        + dt.minute() as f64 * 60.0
        + dt.second() as f64
        + dt.nanosecond() as f64 / 1e9) / 86400.0;

    // integer parts first so J2000 comes out exact
    let days =
        f64::floor(365.25 * (year + 4716) as f64)
        + f64::floor(30.6001 * (month + 1) as f64)
        + dt.day() as f64
        + b as f64;

    days + day_frac - 1524.5
}

/// Julian centuries since J2000
pub fn julian_centuries(jd: f64) -> f64 {
    (jd - J2000_JD) / DAYS_PER_CENTURY
}

/// Greenwich mean sidereal time in degrees, `[0, 360)`
pub fn greenwich_sidereal_time(jd: f64) -> f64 {
    let d = jd - J2000_JD;
    let t = d / DAYS_PER_CENTURY;
    let gmst =
        280.46061837
        + 360.98564736629 * d
        + 0.000387933 * t * t
        - (t * t * t) / 38_710_000.0;
    normalize_degrees(gmst)
}

/// Local mean sidereal time in degrees, `[0, 360)`. East longitude positive.
pub fn local_sidereal_time(dt: &NaiveDateTime, longitude: f64) -> f64 {
    local_sidereal_time_jd(julian_date(dt), longitude)
}

pub fn local_sidereal_time_jd(jd: f64, longitude: f64) -> f64 {
    normalize_degrees(greenwich_sidereal_time(jd) + longitude)
}
