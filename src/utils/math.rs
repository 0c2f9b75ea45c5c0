use std::f64::consts::PI;

pub fn radian_to_degree(radian: f64) -> f64 {
    180.0 * radian / PI
}

pub fn degree_to_radian(degree: f64) -> f64 {
    PI * degree / 180.0
}

pub fn radian_to_hour(radian: f64) -> f64 {
    12.0 * radian / PI
}

pub fn hour_to_radian(hour: f64) -> f64 {
    PI * hour / 12.0
}

#[inline(always)]
pub fn sin_deg(degree: f64) -> f64 {
    f64::sin(degree_to_radian(degree))
}

#[inline(always)]
pub fn cos_deg(degree: f64) -> f64 {
    f64::cos(degree_to_radian(degree))
}

/// Wraps `value` into `[0, period)`.
///
/// `rem_euclid` may return exactly `period` for tiny negative inputs
/// (`-1e-20 mod 360 == 360.0` in floating point), so that case is folded
/// back to zero.
#[inline(always)]
pub fn wrap(value: f64, period: f64) -> f64 {
    let result = value.rem_euclid(period);
    if result >= period { 0.0 } else { result }
}

#[inline(always)]
pub fn normalize_degrees(degree: f64) -> f64 {
    wrap(degree, 360.0)
}

#[inline(always)]
pub fn normalize_hours(hour: f64) -> f64 {
    wrap(hour, 24.0)
}

#[inline(always)]
pub fn clamp_latitude(degree: f64) -> f64 {
    degree.clamp(-90.0, 90.0)
}

/// Clamps a sine or cosine value into the domain of `asin`/`acos`.
/// Rounding drift can push such values slightly outside `[-1, 1]`.
#[inline(always)]
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(-1.0, 1.0)
}

pub fn asin_deg(value: f64) -> f64 {
    radian_to_degree(f64::asin(clamp_unit(value)))
}

pub fn acos_deg(value: f64) -> f64 {
    radian_to_degree(f64::acos(clamp_unit(value)))
}

/// Signed shortest arc from `from` to `to` in degrees, in `(-180, 180]`
pub fn shortest_arc(from: f64, to: f64) -> f64 {
    let diff = wrap(to - from, 360.0);
    if diff > 180.0 { diff - 360.0 } else { diff }
}

/// Mean direction of a set of angles (degrees). Returns `None` for an
/// empty set or when the directions cancel out.
pub fn circular_mean(angles: &[f64]) -> Option<f64> {
    if angles.is_empty() {
        return None;
    }
    let (sin_sum, cos_sum) = angles.iter().fold((0.0, 0.0), |(s, c), a| {
        (s + sin_deg(*a), c + cos_deg(*a))
    });
    if sin_sum.abs() < 1e-12 && cos_sum.abs() < 1e-12 {
        return None;
    }
    Some(normalize_degrees(radian_to_degree(f64::atan2(sin_sum, cos_sum))))
}

#[test]
fn test_wrap() {
    assert_eq!(normalize_degrees(360.0), 0.0);
    assert_eq!(normalize_degrees(-1e-20), 0.0);
    assert_eq!(normalize_degrees(-90.0), 270.0);
    assert_eq!(normalize_degrees(725.0), 5.0);
    assert_eq!(normalize_hours(-1.0), 23.0);
    assert_eq!(normalize_hours(24.0), 0.0);
}

#[test]
fn test_clamp_unit() {
    assert_eq!(clamp_unit(1.0000000000000002), 1.0);
    assert_eq!(clamp_unit(-1.0000000000000002), -1.0);
    assert_eq!(clamp_unit(f64::NAN), 0.0);
    assert!(!asin_deg(1.0000000000000002).is_nan());
    assert!(!acos_deg(-1.0000000000000002).is_nan());
}

#[test]
fn test_shortest_arc() {
    assert!(f64::abs(shortest_arc(350.0, 10.0) - 20.0) < 1e-10);
    assert!(f64::abs(shortest_arc(10.0, 350.0) + 20.0) < 1e-10);
    assert!(f64::abs(shortest_arc(0.0, 180.0) - 180.0) < 1e-10);
    assert!(f64::abs(shortest_arc(90.0, 90.0)) < 1e-10);
    assert!(f64::abs(shortest_arc(-720.0, 45.0) - 45.0) < 1e-10);
}

#[test]
fn test_circular_mean() {
    let mean = circular_mean(&[350.0, 10.0]).unwrap();
    assert!(f64::abs(shortest_arc(mean, 0.0)) < 1e-9);
    let mean = circular_mean(&[80.0, 90.0, 100.0]).unwrap();
    assert!(f64::abs(mean - 90.0) < 1e-9);
    assert!(circular_mean(&[]).is_none());
    assert!(circular_mean(&[0.0, 180.0]).is_none());
}
