use serde::{Deserialize, Serialize};

/// Solar effective temperature, K
pub const SUN_TEMPERATURE: f64 = 5772.0;

/// Absolute visual magnitude of the Sun
pub const SUN_ABS_MAGNITUDE: f64 = 4.83;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpectralType { O, B, A, F, G, K, M }

impl SpectralType {
    pub const ALL: [SpectralType; 7] = [
        SpectralType::O, SpectralType::B, SpectralType::A, SpectralType::F,
        SpectralType::G, SpectralType::K, SpectralType::M,
    ];

    /// Effective temperature range in K, `[lo, hi)`
    pub fn temperature_range(self) -> (f64, f64) {
        match self {
            SpectralType::O => (30_000.0, 45_000.0),
            SpectralType::B => (10_000.0, 30_000.0),
            SpectralType::A => (7_500.0, 10_000.0),
            SpectralType::F => (6_000.0, 7_500.0),
            SpectralType::G => (5_200.0, 6_000.0),
            SpectralType::K => (3_700.0, 5_200.0),
            SpectralType::M => (2_400.0, 3_700.0),
        }
    }

    /// Relative frequency among naked-eye stars
    pub fn weight(self) -> f64 {
        match self {
            SpectralType::O => 0.5,
            SpectralType::B => 10.0,
            SpectralType::A => 22.0,
            SpectralType::F => 15.0,
            SpectralType::G => 14.0,
            SpectralType::K => 31.0,
            SpectralType::M => 7.5,
        }
    }

    /// Picks a type from the weighted distribution, `u` in `[0, 1)`
    pub fn pick(u: f64) -> SpectralType {
        let total: f64 = Self::ALL.iter().map(|t| t.weight()).sum();
        let mut acc = 0.0;
        let target = u.clamp(0.0, 1.0) * total;
        for tp in Self::ALL {
            acc += tp.weight();
            if target < acc {
                return tp;
            }
        }
        SpectralType::M
    }

    pub fn from_temperature(temperature: f64) -> SpectralType {
        Self::ALL.into_iter()
            .find(|tp| temperature >= tp.temperature_range().0)
            .unwrap_or(SpectralType::M)
    }

    pub fn from_class(class: &str) -> Option<SpectralType> {
        match class.chars().next()? {
            'O' => Some(SpectralType::O),
            'B' => Some(SpectralType::B),
            'A' => Some(SpectralType::A),
            'F' => Some(SpectralType::F),
            'G' => Some(SpectralType::G),
            'K' => Some(SpectralType::K),
            'M' => Some(SpectralType::M),
            _   => None,
        }
    }
}

/// Luminosity in solar units from apparent magnitude and distance (pc):
/// distance modulus, then the magnitude scale relative to the Sun
pub fn luminosity_from_magnitude(magnitude: f64, distance_pc: f64) -> f64 {
    let abs_magnitude = magnitude - 5.0 * f64::log10(distance_pc.max(1e-3) / 10.0);
    f64::powf(10.0, (SUN_ABS_MAGNITUDE - abs_magnitude) / 2.5)
}

/// Radius in solar units, Stefan-Boltzmann: `L = R^2 T^4` in solar units
pub fn radius_from_luminosity(luminosity: f64, temperature: f64) -> f64 {
    let t_ratio = SUN_TEMPERATURE / temperature.max(1.0);
    f64::sqrt(luminosity.max(0.0)) * t_ratio * t_ratio
}

/// Display color for an effective temperature
pub fn temperature_to_color(temperature: f64) -> [u8; 3] {
    const TABLE: [(f64, [u8; 3]); 7] = [
        ( 3_700.0, [255, 204, 111]),
        ( 5_200.0, [255, 210, 161]),
        ( 6_000.0, [255, 244, 234]),
        ( 7_500.0, [248, 247, 255]),
        (10_000.0, [202, 215, 255]),
        (30_000.0, [170, 191, 255]),
        (f64::INFINITY, [155, 176, 255]),
    ];
    TABLE.iter()
        .find(|(upper, _)| temperature < *upper)
        .map(|(_, color)| *color)
        .unwrap_or([155, 176, 255])
}

#[test]
fn test_pick_covers_distribution() {
    assert_eq!(SpectralType::pick(0.0), SpectralType::O);
    assert_eq!(SpectralType::pick(0.999_999), SpectralType::M);
    assert_eq!(SpectralType::pick(0.4), SpectralType::F);
    assert_eq!(SpectralType::pick(0.5), SpectralType::G);
    assert_eq!(SpectralType::pick(1.0), SpectralType::M);
}

#[test]
fn test_from_temperature() {
    assert_eq!(SpectralType::from_temperature(5772.0), SpectralType::G);
    assert_eq!(SpectralType::from_temperature(40_000.0), SpectralType::O);
    assert_eq!(SpectralType::from_temperature(3_000.0), SpectralType::M);
    assert_eq!(SpectralType::from_temperature(1_000.0), SpectralType::M);
    for tp in SpectralType::ALL {
        let (lo, hi) = tp.temperature_range();
        assert_eq!(SpectralType::from_temperature(0.5 * (lo + hi)), tp);
    }
}

#[test]
fn test_sun_relations() {
    // the Sun seen from 10 pc has magnitude 4.83
    assert!(f64::abs(luminosity_from_magnitude(4.83, 10.0) - 1.0) < 1e-12);
    assert!(f64::abs(radius_from_luminosity(1.0, SUN_TEMPERATURE) - 1.0) < 1e-12);
    // 5 magnitudes brighter is 100 times more luminous
    assert!(f64::abs(luminosity_from_magnitude(-0.17, 10.0) - 100.0) < 1e-9);
    // inverse square: same magnitude at ten times the distance
    assert!(f64::abs(luminosity_from_magnitude(4.83, 100.0) - 100.0) < 1e-9);
}

#[test]
fn test_temperature_to_color() {
    assert_eq!(temperature_to_color(3_000.0), [255, 204, 111]);
    assert_eq!(temperature_to_color(5_772.0), [255, 244, 234]);
    assert_eq!(temperature_to_color(9_940.0), [202, 215, 255]);
    assert_eq!(temperature_to_color(50_000.0), [155, 176, 255]);
}
