//! Low precision Sun and Moon positions (about 0.01 deg for the Sun,
//! a few tenths of a degree for the Moon). Arguments are Julian centuries
//! since J2000 unless stated otherwise.

use crate::utils::math::*;
use super::coords::{EclCoord, EqCoord, ecliptic_to_equatorial};
use super::time::{DAYS_PER_CENTURY, J2000_JD};

/// Mean anomaly of the Sun, degrees (not normalized)
pub fn sun_mean_anomaly(t: f64) -> f64 {
    357.52911 + 35999.05029 * t - 0.0001537 * t * t
}

/// Geometric mean longitude of the Sun, degrees (not normalized)
pub fn sun_mean_longitude(t: f64) -> f64 {
    280.46646 + 36000.76983 * t + 0.0003032 * t * t
}

/// Equation of the center, degrees
pub fn sun_equation_of_center(t: f64) -> f64 {
    let m = sun_mean_anomaly(t);
    (1.914602 - 0.004817 * t - 0.000014 * t * t) * sin_deg(m)
        + (0.019993 - 0.000101 * t) * sin_deg(2.0 * m)
        + 0.000289 * sin_deg(3.0 * m)
}

pub fn sun_ecliptic(t: f64) -> EclCoord {
    EclCoord {
        lambda: normalize_degrees(sun_mean_longitude(t) + sun_equation_of_center(t)),
        beta:   0.0,
    }
}

pub fn sun_position(jd: f64) -> EqCoord {
    let ecl = sun_ecliptic(centuries(jd));
    ecliptic_to_equatorial(ecl.lambda, ecl.beta, jd)
}

/// Fundamental lunar arguments in degrees, all linear in T
#[derive(Debug, Clone, Copy)]
pub struct LunarArguments {
    /// Mean elongation of the Moon
    pub d:  f64,
    /// Mean anomaly of the Sun
    pub m:  f64,
    /// Mean anomaly of the Moon
    pub mp: f64,
    /// Mean longitude of the Moon
    pub lp: f64,
    /// Argument of latitude of the Moon
    pub f:  f64,
}

impl LunarArguments {
    pub fn new(t: f64) -> Self {
        Self {
            d:  297.8501921 + 445267.1114034 * t,
            m:  357.5291092 + 35999.0502909 * t,
            mp: 134.9633964 + 477198.8675055 * t,
            lp: 218.3164477 + 481267.8812342 * t,
            f:  93.2720950 + 483202.0175233 * t,
        }
    }
}

/// Only the four leading periodic terms of each series are used
pub fn moon_ecliptic(t: f64) -> EclCoord {
    let LunarArguments { d, m: _, mp, lp, f } = LunarArguments::new(t);

    let lambda = lp
        + 6.289 * sin_deg(mp)
        + 1.274 * sin_deg(2.0 * d - mp)
        + 0.658 * sin_deg(2.0 * d)
        + 0.214 * sin_deg(2.0 * mp);

    let beta =
        5.128 * sin_deg(f)
        + 0.281 * sin_deg(mp + f)
        + 0.278 * sin_deg(mp - f)
        + 0.173 * sin_deg(2.0 * d - f);

    EclCoord {
        lambda: normalize_degrees(lambda),
        beta:   clamp_latitude(beta),
    }
}

pub fn moon_position(jd: f64) -> EqCoord {
    let ecl = moon_ecliptic(centuries(jd));
    ecliptic_to_equatorial(ecl.lambda, ecl.beta, jd)
}

/// Phase angle fraction in `[0, 1)`: `((D + M' - M) mod 360) / 360`.
///
/// This is a position along the phase cycle, *not* the illuminated part of
/// the disk; use [`moon_illuminated_fraction`] for that.
pub fn moon_phase(t: f64) -> f64 {
    let LunarArguments { d, m, mp, .. } = LunarArguments::new(t);
    normalize_degrees(d + mp - m) / 360.0
}

/// Illuminated fraction of the lunar disk in `[0, 1]`
pub fn moon_illuminated_fraction(t: f64) -> f64 {
    let LunarArguments { d, m, mp, .. } = LunarArguments::new(t);

    // phase angle, Meeus 48.4
    let i = normalize_degrees(
        180.0 - normalize_degrees(d)
        - 6.289 * sin_deg(mp)
        + 2.100 * sin_deg(m)
        - 1.274 * sin_deg(2.0 * d - mp)
        - 0.658 * sin_deg(2.0 * d)
        - 0.214 * sin_deg(2.0 * mp)
        - 0.110 * sin_deg(d)
    );

    ((1.0 + cos_deg(i)) / 2.0).clamp(0.0, 1.0)
}

fn centuries(jd: f64) -> f64 {
    (jd - J2000_JD) / DAYS_PER_CENTURY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sky_math::time::julian_date;
    use chrono::NaiveDate;

    const SYNODIC_MONTH: f64 = 29.530588;

    fn jd(y: i32, m: u32, d: u32, h: u32) -> f64 {
        julian_date(&NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap())
    }

    fn phase_diff(a: f64, b: f64) -> f64 {
        let diff = (a - b).rem_euclid(1.0);
        diff.min(1.0 - diff)
    }

    #[test]
    fn test_sun_mean_anomaly_at_j2000() {
        assert_eq!(sun_mean_anomaly(0.0), 357.52911);
        assert_eq!(sun_mean_longitude(0.0), 280.46646);
    }

    #[test]
    fn test_sun_meeus_example() {
        // Meeus example 25.a: 1992-10-13 0h TD, true longitude 199.90988,
        // ra 13h13m31.4s, dec -7 deg 47' 06"
        let jd = 2448908.5;
        let t = (jd - J2000_JD) / DAYS_PER_CENTURY;
        assert!(f64::abs(sun_ecliptic(t).lambda - 199.90988) < 1e-3);
        let crd = sun_position(jd);
        assert!(f64::abs(crd.ra - (13.0 + 13.0 / 60.0 + 31.4 / 3600.0)) < 0.01);
        assert!(f64::abs(crd.dec - -(7.0 + 47.0 / 60.0 + 6.0 / 3600.0)) < 0.02);
    }

    #[test]
    fn test_sun_at_equinox_and_solstice() {
        let crd = sun_position(jd(2024, 3, 20, 3));
        assert!(crd.dec.abs() < 0.05);
        let crd = sun_position(jd(2024, 6, 20, 21));
        assert!(f64::abs(crd.dec - 23.44) < 0.05);
        assert!(f64::abs(crd.ra - 6.0) < 0.02);
    }

    #[test]
    fn test_moon_meeus_example() {
        // Meeus example 47.a: 1992-04-12 0h TD, lambda 133.162655,
        // beta -3.229126. Truncated series, so loose tolerance.
        let t = (2448724.5 - J2000_JD) / DAYS_PER_CENTURY;
        let ecl = moon_ecliptic(t);
        assert!(f64::abs(shortest_arc(ecl.lambda, 133.162655)) < 0.5);
        assert!(f64::abs(ecl.beta - -3.229126) < 0.3);
    }

    #[test]
    fn test_moon_phase_range() {
        for day in 0..2000 {
            let t = (day as f64 * 0.37) / DAYS_PER_CENTURY;
            let phase = moon_phase(t);
            assert!((0.0..1.0).contains(&phase));
            let illum = moon_illuminated_fraction(t);
            assert!((0.0..=1.0).contains(&illum));
        }
    }

    #[test]
    fn test_moon_phase_periodic() {
        let step = SYNODIC_MONTH / DAYS_PER_CENTURY;
        for day in [0.0, 17.25, 400.0, 9000.5] {
            let t = day / DAYS_PER_CENTURY;
            assert!(phase_diff(moon_phase(t), moon_phase(t + step)) < 0.02);
            assert!(f64::abs(moon_illuminated_fraction(t) - moon_illuminated_fraction(t + step)) < 0.05);
        }
    }

    #[test]
    fn test_illumination_at_known_phases() {
        // full moon 2024-04-23 23:49 UT, new moon 2024-04-08 18:21 UT
        let full = (jd(2024, 4, 24, 0) - J2000_JD) / DAYS_PER_CENTURY;
        assert!(moon_illuminated_fraction(full) > 0.98);
        let new = (jd(2024, 4, 8, 18) - J2000_JD) / DAYS_PER_CENTURY;
        assert!(moon_illuminated_fraction(new) < 0.02);
    }
}
