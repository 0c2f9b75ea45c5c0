use std::fmt::Debug;

use nalgebra::{Matrix3, Rotation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::utils::{math::*, sexagesimal::value_to_sexagesimal};
use super::time::{julian_centuries, local_sidereal_time_jd};

/// How body positions are produced for the renderer
#[derive(Serialize, Deserialize, Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum ViewMode {
    /// Fixed mapping of the celestial sphere, observer horizon ignored
    #[default]
    Center,
    /// Apparent altitude/azimuth from the observer's location
    Horizon,
}

/// Equatorial coordinates
#[derive(Clone, Copy, Default, PartialEq)]
pub struct EqCoord {
    pub ra:  f64, // in hours, [0, 24)
    pub dec: f64, // in degrees, [-90, 90]
}

impl EqCoord {
    pub fn new(ra: f64, dec: f64) -> Self {
        Self {
            ra:  normalize_hours(ra),
            dec: clamp_latitude(dec),
        }
    }

    /// Angular distance in degrees (haversine form)
    pub fn angle_between(crd1: &EqCoord, crd2: &EqCoord) -> f64 {
        let dec1 = degree_to_radian(crd1.dec);
        let dec2 = degree_to_radian(crd2.dec);
        let sin_diff_dec = f64::sin((dec2 - dec1) / 2.0);
        let sin_diff_ra = f64::sin(hour_to_radian(crd2.ra - crd1.ra) / 2.0);
        let root_expr =
            sin_diff_dec * sin_diff_dec +
            f64::cos(dec1) * f64::cos(dec2) * sin_diff_ra * sin_diff_ra;
        radian_to_degree(2.0 * f64::asin(clamp_unit(f64::sqrt(root_expr))))
    }

    pub fn from_unit_vector(pt: &Vector3<f64>) -> Self {
        let dec = f64::atan2(pt.z, f64::sqrt(pt.x * pt.x + pt.y * pt.y));
        let ra = f64::atan2(pt.y, pt.x);
        Self::new(radian_to_hour(ra), radian_to_degree(dec))
    }
}

impl Debug for EqCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EqCoord")
            .field("ra", &value_to_sexagesimal(self.ra, true))
            .field("dec", &value_to_sexagesimal(self.dec, true))
            .finish()
    }
}

/// Ecliptic coordinates, both in degrees
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EclCoord {
    pub lambda: f64,
    pub beta:   f64,
}

/// Horizontal (observer-local) coordinates
#[derive(Clone, Copy, Default, PartialEq)]
pub struct HorizCoord {
    pub alt: f64, // in degrees, [-90, 90]
    pub az:  f64, // in degrees from north through east, [0, 360)
}

impl HorizCoord {
    // East-north-up:
    //  ^Z (up)
    //  |  ^Y (north)
    //  | /
    //  |/
    //  *----->X (east)
    pub fn to_unit_vector(&self) -> Vector3<f64> {
        let r = cos_deg(self.alt);
        Vector3::new(r * sin_deg(self.az), r * cos_deg(self.az), sin_deg(self.alt))
    }

    pub fn from_unit_vector(pt: &Vector3<f64>) -> Self {
        let alt = asin_deg(pt.z / pt.norm().max(f64::MIN_POSITIVE));
        let az = radian_to_degree(f64::atan2(pt.x, pt.y));
        Self { alt: clamp_latitude(alt), az: normalize_degrees(az) }
    }

    pub fn is_above_horizon(&self) -> bool {
        self.alt > 0.0
    }
}

impl Debug for HorizCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HorizCoord")
            .field("alt", &value_to_sexagesimal(self.alt, true))
            .field("az", &value_to_sexagesimal(self.az, true))
            .finish()
    }
}

/// Mean obliquity of the ecliptic in degrees (Meeus 22.2)
pub fn mean_obliquity(jd: f64) -> f64 {
    let t = julian_centuries(jd);
    23.439_291_11
        - 0.013_004_167 * t
        - 1.6389e-7 * t * t
        + 5.0361e-7 * t * t * t
}

pub fn ecliptic_to_equatorial(lambda: f64, beta: f64, jd: f64) -> EqCoord {
    let eps = mean_obliquity(jd);
    let (sin_l, cos_l) = (sin_deg(lambda), cos_deg(lambda));
    let (sin_b, cos_b) = (sin_deg(beta), cos_deg(beta));
    let (sin_e, cos_e) = (sin_deg(eps), cos_deg(eps));

    // atan2 form of tan(ra) = (sin l cos e - tan b sin e) / cos l,
    // multiplied through by cos b to stay finite at the ecliptic poles
    let ra = f64::atan2(sin_l * cos_b * cos_e - sin_b * sin_e, cos_l * cos_b);
    let dec = asin_deg(sin_b * cos_e + cos_b * sin_e * sin_l);

    EqCoord::new(radian_to_hour(ra), dec)
}

/// Direction in the ecliptic frame (x to the equinox, z to the ecliptic
/// north pole) to ecliptic longitude/latitude
pub fn ecliptic_vector_to_coord(pt: &Vector3<f64>) -> EclCoord {
    let beta = f64::atan2(pt.z, f64::sqrt(pt.x * pt.x + pt.y * pt.y));
    let lambda = f64::atan2(pt.y, pt.x);
    EclCoord {
        lambda: normalize_degrees(radian_to_degree(lambda)),
        beta:   clamp_latitude(radian_to_degree(beta)),
    }
}

/// Apparent altitude and azimuth. Latitude and east longitude in degrees.
pub fn equatorial_to_horizontal(
    crd:       &EqCoord,
    jd:        f64,
    latitude:  f64,
    longitude: f64,
) -> HorizCoord {
    let lst = local_sidereal_time_jd(jd, longitude);
    let hour_angle = normalize_degrees(lst - crd.ra * 15.0);

    let (sin_lat, cos_lat) = (sin_deg(latitude), cos_deg(latitude));
    let (sin_dec, cos_dec) = (sin_deg(crd.dec), cos_deg(crd.dec));

    let sin_alt = sin_lat * sin_dec + cos_lat * cos_dec * cos_deg(hour_angle);
    let alt = asin_deg(sin_alt);

    let denom = cos_deg(alt) * cos_lat;
    let az = if denom.abs() < 1e-12 {
        // observer at a pole or body at the zenith: azimuth is undefined
        0.0
    } else {
        let az = acos_deg((sin_dec - sin_deg(alt) * sin_lat) / denom);
        if sin_deg(hour_angle) > 0.0 { 360.0 - az } else { az }
    };

    HorizCoord {
        alt: clamp_latitude(alt),
        az:  normalize_degrees(az),
    }
}

/// Direct spherical-to-Cartesian mapping for the center view.
//  dec:           ra:
//  ^Z             ^Y
//  |   *          |   *
//  |  /           |ra/
//  | /            | /
//  |/ dec         |/
//  *--------XY    O-------->X
pub fn equatorial_to_unit_vector(crd: &EqCoord) -> Vector3<f64> {
    let ra = hour_to_radian(crd.ra);
    let dec = degree_to_radian(crd.dec);
    let rcst = f64::cos(dec);
    Vector3::new(rcst * f64::cos(ra), rcst * f64::sin(ra), f64::sin(dec))
}

/// Rotation taking equatorial unit vectors into the observer's
/// east-north-up frame for the given local sidereal time and latitude
/// (both degrees). Applying it to [`equatorial_to_unit_vector`] gives the
/// same direction as [`equatorial_to_horizontal`].
pub fn equatorial_to_horizon_rotation(lst: f64, latitude: f64) -> UnitQuaternion<f64> {
    // equatorial -> hour-angle frame (x to the meridian, y to the east)
    let sidereal = Rotation3::from_axis_angle(&Vector3::z_axis(), -degree_to_radian(lst));
    let (sin_lat, cos_lat) = (sin_deg(latitude), cos_deg(latitude));
    let to_horizon = Rotation3::from_matrix_unchecked(Matrix3::new(
        0.0,      1.0, 0.0,
        -sin_lat, 0.0, cos_lat,
        cos_lat,  0.0, sin_lat,
    ));
    UnitQuaternion::from_rotation_matrix(&(to_horizon * sidereal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sky_math::time::{J2000_JD, julian_date};
    use chrono::NaiveDate;

    #[test]
    fn test_eq_coord_normalized() {
        let crd = EqCoord::new(-1.0, 95.0);
        assert_eq!(crd.ra, 23.0);
        assert_eq!(crd.dec, 90.0);
        assert_eq!(EqCoord::new(24.0, -91.0), EqCoord { ra: 0.0, dec: -90.0 });
    }

    #[test]
    fn test_unit_vector_round_trip() {
        let test = |crd: EqCoord| {
            let pt = equatorial_to_unit_vector(&crd) * 0.5;
            let crd_from = EqCoord::from_unit_vector(&pt);
            assert!(f64::abs(crd.dec - crd_from.dec) < 1e-8);
            assert!(f64::abs(shortest_arc(crd.ra * 15.0, crd_from.ra * 15.0)) < 1e-8);
        };
        test(EqCoord::new(0.0, 0.0));
        test(EqCoord::new(6.0, 0.0));
        test(EqCoord::new(18.5, -45.0));
        test(EqCoord::new(3.0, 22.5));
        let pole = equatorial_to_unit_vector(&EqCoord::new(7.0, 90.0));
        assert!(f64::abs(pole.z - 1.0) < 1e-12);
    }

    #[test]
    fn test_obliquity_at_j2000() {
        assert!(f64::abs(mean_obliquity(J2000_JD) - 23.4392911) < 1e-7);
    }

    #[test]
    fn test_ecliptic_to_equatorial() {
        // Meeus example 13.a: Pollux, lambda 113.215630, beta 6.684170,
        // eps 23.4392911 -> ra 116.328942 deg, dec 28.026183
        let crd = ecliptic_to_equatorial(113.215630, 6.684170, J2000_JD);
        assert!(f64::abs(crd.ra * 15.0 - 116.328942) < 1e-4);
        assert!(f64::abs(crd.dec - 28.026183) < 1e-4);

        // the equinox maps to itself, the solstice to the tropic
        let crd = ecliptic_to_equatorial(0.0, 0.0, J2000_JD);
        assert!(crd.ra.abs() < 1e-9 && crd.dec.abs() < 1e-9);
        let crd = ecliptic_to_equatorial(90.0, 0.0, J2000_JD);
        assert!(f64::abs(crd.ra - 6.0) < 1e-9);
        assert!(f64::abs(crd.dec - 23.4392911) < 1e-6);

        // ecliptic north pole stays finite
        let crd = ecliptic_to_equatorial(0.0, 90.0, J2000_JD);
        assert!(crd.ra.is_finite() && f64::abs(crd.dec - (90.0 - 23.4392911)) < 1e-6);
    }

    #[test]
    fn test_ecliptic_vector_to_coord() {
        let crd = ecliptic_vector_to_coord(&Vector3::new(0.0, -2.0, 0.0));
        assert!(f64::abs(crd.lambda - 270.0) < 1e-12);
        assert!(crd.beta.abs() < 1e-12);
        let crd = ecliptic_vector_to_coord(&Vector3::new(1.0, 0.0, 1.0));
        assert!(f64::abs(crd.beta - 45.0) < 1e-12);
    }

    #[test]
    fn test_horizontal_pole_star() {
        // celestial pole sits at altitude == latitude, due north
        let jd = julian_date(&NaiveDate::from_ymd_opt(2024, 8, 1).unwrap().and_hms_opt(22, 0, 0).unwrap());
        let horiz = equatorial_to_horizontal(&EqCoord::new(0.0, 90.0), jd, 51.5, -0.1);
        assert!(f64::abs(horiz.alt - 51.5) < 1e-9);
        assert!(horiz.az < 1e-4 || horiz.az > 360.0 - 1e-4);
    }

    #[test]
    fn test_horizontal_meeus_example() {
        // Meeus example 13.b: Venus from Washington (lat 38.921389,
        // lon -77.065556) at 1987-04-10 19:21:00 UT, H = 64.352133 deg
        // -> alt 15.1249, az 68.0337 (Meeus counts az from south).
        // Mean sidereal time is used here, apparent in the book: ~0.0011 deg.
        let venus = EqCoord::new(347.3193375 / 15.0, -6.719892);
        let jd = julian_date(&NaiveDate::from_ymd_opt(1987, 4, 10).unwrap().and_hms_opt(19, 21, 0).unwrap());
        let horiz = equatorial_to_horizontal(&venus, jd, 38.921389, -77.065556);
        assert!(f64::abs(horiz.alt - 15.1249) < 0.01);
        assert!(f64::abs(horiz.az - (68.0337 + 180.0)) < 0.01);
    }

    #[test]
    fn test_horizontal_ranges() {
        let jd = J2000_JD + 1234.567;
        for lat in [-90.0, -45.0, 0.0, 33.3, 90.0] {
            for i in 0..48 {
                for dec in [-90.0, -60.0, -1.0, 0.0, 12.5, 89.9, 90.0] {
                    let crd = EqCoord::new(i as f64 * 0.5, dec);
                    let horiz = equatorial_to_horizontal(&crd, jd, lat, 12.0);
                    assert!((-90.0..=90.0).contains(&horiz.alt), "{:?}", horiz);
                    assert!((0.0..360.0).contains(&horiz.az), "{:?}", horiz);
                }
            }
        }
    }

    #[test]
    fn test_horizontal_ranges_random() {
        for _ in 0..10_000 {
            let crd = EqCoord::new(rand::random::<f64>() * 24.0, rand::random::<f64>() * 180.0 - 90.0);
            let jd = J2000_JD + rand::random::<f64>() * 36525.0;
            let lat = rand::random::<f64>() * 180.0 - 90.0;
            let lon = rand::random::<f64>() * 360.0 - 180.0;
            let horiz = equatorial_to_horizontal(&crd, jd, lat, lon);
            assert!(
                (-90.0..=90.0).contains(&horiz.alt),
                "{:?} jd={} lat={} lon={} -> {:?}", crd, jd, lat, lon, horiz
            );
            assert!(
                (0.0..360.0).contains(&horiz.az),
                "{:?} jd={} lat={} lon={} -> {:?}", crd, jd, lat, lon, horiz
            );
        }
    }

    #[test]
    fn test_azimuth_spans_full_circle() {
        // a star on the equator seen from the equator rises in the east and
        // sets in the west
        let crd = EqCoord::new(0.0, 0.0);
        // hour angle -90 deg
        let rising = equatorial_to_horizontal(&crd, J2000_JD, 0.0, -(280.46061837 + 90.0));
        // hour angle +90 deg
        let setting = equatorial_to_horizontal(&crd, J2000_JD, 0.0, -(280.46061837 - 90.0));
        assert!(f64::abs(rising.az - 90.0) < 1e-6);
        assert!(f64::abs(setting.az - 270.0) < 1e-6);
    }

    #[test]
    fn test_horizon_rotation_matches_alt_az() {
        let jd = J2000_JD + 8765.4321;
        let (lat, lon) = (48.85, 2.35);
        let rot = equatorial_to_horizon_rotation(local_sidereal_time_jd(jd, lon), lat);
        for (ra, dec) in [(0.0, 0.0), (5.5, 20.0), (13.2, -40.0), (20.0, 75.0)] {
            let crd = EqCoord::new(ra, dec);
            let by_rotation = rot * equatorial_to_unit_vector(&crd);
            let by_formula = equatorial_to_horizontal(&crd, jd, lat, lon).to_unit_vector();
            assert!((by_rotation - by_formula).norm() < 1e-9);
        }
    }

    #[test]
    fn test_horiz_unit_vector() {
        let north = HorizCoord { alt: 0.0, az: 0.0 }.to_unit_vector();
        assert!((north - Vector3::y()).norm() < 1e-12);
        let east = HorizCoord { alt: 0.0, az: 90.0 }.to_unit_vector();
        assert!((east - Vector3::x()).norm() < 1e-12);
        let horiz = HorizCoord::from_unit_vector(&Vector3::new(-1.0, 0.0, 1.0));
        assert!(f64::abs(horiz.alt - 45.0) < 1e-9);
        assert!(f64::abs(horiz.az - 270.0) < 1e-9);
    }

    #[test]
    fn test_angle_between() {
        let a = EqCoord::new(0.0, 0.0);
        let b = EqCoord::new(6.0, 0.0);
        assert!(f64::abs(EqCoord::angle_between(&a, &b) - 90.0) < 1e-9);
        let c = EqCoord::new(12.0, 90.0);
        assert!(f64::abs(EqCoord::angle_between(&a, &c) - 90.0) < 1e-9);
    }
}
