//! Two-body Keplerian propagation of the major planets from J2000 mean
//! elements. No perturbations; the Earth is not propagated at all (see
//! [`EARTH_POSITION_AU`]). Good enough to put planets in the right
//! constellation, not for anything finer.

use nalgebra::Vector3;

use crate::utils::math::*;
use super::coords::{EqCoord, ecliptic_to_equatorial, ecliptic_vector_to_coord};
use super::time::J2000_JD;

/// Fixed-point iterations for Kepler's equation. There is no convergence
/// check: for e ≈ 0.2 (Mercury) the residual after 10 steps is below
/// 1e-7 rad, but it grows quickly with eccentricity.
pub const KEPLER_ITERATIONS: usize = 10;

/// Heliocentric position of the Earth used for every query.
///
/// The Earth is pinned at 1 AU on the ecliptic x axis instead of being
/// propagated. Planet directions inherit this, so they are shifted by up to
/// the planet's parallax of the Earth's orbit; moving the Earth would move
/// every planet on the dome.
pub const EARTH_POSITION_AU: [f64; 3] = [1.0, 0.0, 0.0];

/// J2000 mean orbital elements (angles in degrees)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalElements {
    pub semi_major_axis: f64, // AU
    pub eccentricity:    f64,
    pub inclination:     f64,
    pub ascending_node:  f64,
    pub arg_periapsis:   f64,
    pub mean_longitude:  f64, // at epoch
    pub period:          f64, // days
}

impl OrbitalElements {
    /// Mean anomaly in degrees, `[0, 360)`, `days` after J2000
    pub fn mean_anomaly(&self, days: f64) -> f64 {
        let m0 = self.mean_longitude - self.ascending_node - self.arg_periapsis;
        normalize_degrees(m0 + 360.0 * days / self.period)
    }

    /// Heliocentric ecliptic position in AU
    pub fn heliocentric_position(&self, jd: f64) -> Vector3<f64> {
        let m = degree_to_radian(self.mean_anomaly(jd - J2000_JD));
        let e = self.eccentricity;
        let a = self.semi_major_axis;
        let ecc_anomaly = solve_kepler(m, e);

        // position in the orbital plane, x towards periapsis
        let x = a * (f64::cos(ecc_anomaly) - e);
        let y = a * f64::sqrt(1.0 - e * e) * f64::sin(ecc_anomaly);

        let (sin_w, cos_w) = (sin_deg(self.arg_periapsis), cos_deg(self.arg_periapsis));
        let (sin_n, cos_n) = (sin_deg(self.ascending_node), cos_deg(self.ascending_node));
        let (sin_i, cos_i) = (sin_deg(self.inclination), cos_deg(self.inclination));

        Vector3::new(
            (cos_n * cos_w - sin_n * sin_w * cos_i) * x + (-cos_n * sin_w - sin_n * cos_w * cos_i) * y,
            (sin_n * cos_w + cos_n * sin_w * cos_i) * x + (-sin_n * sin_w + cos_n * cos_w * cos_i) * y,
            (sin_w * sin_i) * x + (cos_w * sin_i) * y,
        )
    }

    /// Unit vector from the (fixed) Earth to the planet, ecliptic frame
    pub fn geocentric_direction(&self, jd: f64) -> Vector3<f64> {
        let helio = self.heliocentric_position(jd);
        let earth = Vector3::from(EARTH_POSITION_AU);
        (helio - earth)
            .try_normalize(1e-12)
            .or_else(|| helio.try_normalize(1e-12))
            .unwrap_or_else(Vector3::x)
    }

    pub fn equatorial_position(&self, jd: f64) -> EqCoord {
        let ecl = ecliptic_vector_to_coord(&self.geocentric_direction(jd));
        ecliptic_to_equatorial(ecl.lambda, ecl.beta, jd)
    }
}

/// Eccentric anomaly from mean anomaly (radians) by fixed-point iteration
/// of `E = M + e sin E`. Exactly `M` for a circular orbit.
pub fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> f64 {
    let mut ecc_anomaly = mean_anomaly;
    for _ in 0..KEPLER_ITERATIONS {
        ecc_anomaly = mean_anomaly + eccentricity * f64::sin(ecc_anomaly);
    }
    ecc_anomaly
}

/// Places a unit direction on the planet shell so planets draw in front of
/// the star sphere
pub fn place_on_shell(direction: &Vector3<f64>, shell_radius: f64) -> Vector3<f64> {
    direction * shell_radius
}

#[derive(Debug, Clone, Copy)]
pub struct Planet {
    pub name:     &'static str,
    pub elements: OrbitalElements,
}

/// Mean elements for J2000 (Standish, JPL "Keplerian elements for
/// approximate positions of the major planets", 1800-2050 AD table)
pub const PLANETS: [Planet; 7] = [
    Planet { name: "Mercury", elements: OrbitalElements {
        semi_major_axis: 0.38709927, eccentricity: 0.20563593, inclination: 7.00497902,
        ascending_node: 48.33076593, arg_periapsis: 29.12703035,
        mean_longitude: 252.25032350, period: 87.969,
    }},
    Planet { name: "Venus", elements: OrbitalElements {
        semi_major_axis: 0.72333566, eccentricity: 0.00677672, inclination: 3.39467605,
        ascending_node: 76.67984255, arg_periapsis: 54.92262463,
        mean_longitude: 181.97909950, period: 224.701,
    }},
    Planet { name: "Mars", elements: OrbitalElements {
        semi_major_axis: 1.52371034, eccentricity: 0.09339410, inclination: 1.84969142,
        ascending_node: 49.55953891, arg_periapsis: 286.53683150,
        mean_longitude: -4.55343205, period: 686.980,
    }},
    Planet { name: "Jupiter", elements: OrbitalElements {
        semi_major_axis: 5.20288700, eccentricity: 0.04838624, inclination: 1.30439695,
        ascending_node: 100.47390909, arg_periapsis: 274.25457074,
        mean_longitude: 34.39644051, period: 4332.589,
    }},
    Planet { name: "Saturn", elements: OrbitalElements {
        semi_major_axis: 9.53667594, eccentricity: 0.05386179, inclination: 2.48599187,
        ascending_node: 113.66242448, arg_periapsis: 338.93645383,
        mean_longitude: 49.95424423, period: 10759.22,
    }},
    Planet { name: "Uranus", elements: OrbitalElements {
        semi_major_axis: 19.18916464, eccentricity: 0.04725744, inclination: 0.77263783,
        ascending_node: 74.01692503, arg_periapsis: 96.93735127,
        mean_longitude: 313.23810451, period: 30685.4,
    }},
    Planet { name: "Neptune", elements: OrbitalElements {
        semi_major_axis: 30.06992276, eccentricity: 0.00859048, inclination: 1.77004347,
        ascending_node: 131.78422574, arg_periapsis: 273.18053653,
        mean_longitude: -55.12002969, period: 60189.0,
    }},
];
