use crate::sky_math::coords::EqCoord;
use crate::utils::math::normalize_hours;
use super::{StarRecord, spectral::*};

/// xorshift64* (Vigna, "An experimental exploration of Marsaglia's
/// xorshift generators, scrambled", 2016), seeded through one splitmix64
/// step. Pure integer arithmetic, so a given seed yields the same stream on
/// every platform.
pub struct XorShift64Star {
    state: u64,
}

impl XorShift64Star {
    const FALLBACK_STATE: u64 = 0x9E37_79B9_7F4A_7C15;

    pub fn new(seed: u64) -> Self {
        let state = Self::splitmix64(seed);
        Self {
            state: if state == 0 { Self::FALLBACK_STATE } else { state },
        }
    }

    fn splitmix64(seed: u64) -> u64 {
        let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    /// Uniform in `[0, 1)` with 53 random bits
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Uniform index in `0..len`, `len` must be non-zero
    pub fn index(&mut self, len: usize) -> usize {
        ((self.next_f64() * len as f64) as usize).min(len - 1)
    }
}

/// Rectangular RA/Dec box around a constellation. `ra_min > ra_max` means
/// the box crosses 0h.
pub struct ConstellationRegion {
    pub abbr:    &'static str,
    pub ra_min:  f64,
    pub ra_max:  f64,
    pub dec_min: f64,
    pub dec_max: f64,
}

impl ConstellationRegion {
    pub fn ra_span(&self) -> f64 {
        if self.ra_min <= self.ra_max {
            self.ra_max - self.ra_min
        } else {
            24.0 - self.ra_min + self.ra_max
        }
    }

    pub fn contains(&self, crd: &EqCoord) -> bool {
        let in_ra = if self.ra_min <= self.ra_max {
            crd.ra >= self.ra_min && crd.ra <= self.ra_max
        } else {
            crd.ra >= self.ra_min || crd.ra <= self.ra_max
        };
        in_ra && crd.dec >= self.dec_min && crd.dec <= self.dec_max
    }

    pub fn sample(&self, rng: &mut XorShift64Star) -> EqCoord {
        let ra = normalize_hours(self.ra_min + rng.next_f64() * self.ra_span());
        let dec = rng.range(self.dec_min, self.dec_max);
        EqCoord::new(ra, dec)
    }
}

macro_rules! region {
    ($abbr:expr, $ra_min:expr, $ra_max:expr, $dec_min:expr, $dec_max:expr) => {
        ConstellationRegion {
            abbr: $abbr, ra_min: $ra_min, ra_max: $ra_max, dec_min: $dec_min, dec_max: $dec_max,
        }
    };
}

#[rustfmt::skip]
pub const REGIONS: &[ConstellationRegion] = &[
    region!("And", 22.95,  2.65,  21.0,  53.0),
    region!("Aql", 18.70, 20.60, -12.0,  19.0),
    region!("Boo", 13.60, 15.80,   7.0,  55.0),
    region!("CMa",  6.20,  7.50, -33.0, -11.0),
    region!("Car",  6.00, 11.30, -76.0, -50.0),
    region!("Cas", 22.95,  3.60,  46.0,  77.0),
    region!("Cen", 11.00, 15.00, -64.0, -30.0),
    region!("Cep", 20.00,  1.00,  53.0,  88.0),
    region!("Cru", 11.90, 12.90, -65.0, -55.0),
    region!("Cyg", 19.10, 22.00,  27.0,  61.0),
    region!("Gem",  6.00,  8.10,  10.0,  35.0),
    region!("Leo",  9.30, 11.90,  -6.0,  33.0),
    region!("Lyr", 18.20, 19.45,  25.0,  48.0),
    region!("Ori",  4.70,  6.40, -11.0,  23.0),
    region!("Peg", 21.10,  0.20,   2.0,  36.0),
    region!("Psc", 22.80,  2.10,  -7.0,  33.0),
    region!("Sco", 15.80, 17.90, -46.0,  -8.0),
    region!("Sgr", 17.70, 20.40, -45.0, -12.0),
    region!("Tau",  3.30,  6.00,   0.0,  31.0),
    region!("UMa",  7.90, 14.50,  28.0,  73.0),
    region!("Vir", 11.60, 15.20, -22.0,  14.0),
];

const MAGNITUDE_RANGE: (f64, f64) = (2.0, 6.5);
const DISTANCE_RANGE: (f64, f64) = (10.0, 1000.0); // pc

/// Generates `count` procedural stars. The draw order per star is fixed:
/// region, ra, dec, spectral type, temperature, magnitude, distance.
pub fn generate_stars(seed: u64, count: usize, first_number: usize) -> Vec<StarRecord> {
    let mut rng = XorShift64Star::new(seed);
    let mut result = Vec::with_capacity(count);
    for i in 0..count {
        let region = &REGIONS[rng.index(REGIONS.len())];
        let crd = region.sample(&mut rng);
        let spectral = SpectralType::pick(rng.next_f64());
        let (t_lo, t_hi) = spectral.temperature_range();
        let temperature = rng.range(t_lo, t_hi);
        let magnitude = rng.range(MAGNITUDE_RANGE.0, MAGNITUDE_RANGE.1);
        let distance = rng.range(DISTANCE_RANGE.0, DISTANCE_RANGE.1);
        let luminosity = luminosity_from_magnitude(magnitude, distance);

        result.push(StarRecord {
            name:          format!("{} {:05}", region.abbr, first_number + i),
            constellation: region.abbr,
            crd,
            magnitude,
            temperature,
            spectral,
            distance,
            luminosity,
            radius:        radius_from_luminosity(luminosity, temperature),
            color:         temperature_to_color(temperature),
            procedural:    true,
        });
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xorshift_reference_stream() {
        let mut rng = XorShift64Star::new(42);
        assert_eq!(rng.next_u64(), 0x31b0_ece7_c4f6_97a2);
        assert_eq!(rng.next_u64(), 0x9008_a3b1_cb68_6f03);
        assert_eq!(rng.next_u64(), 0x7c71_73ab_d97b_e16f);

        let mut rng = XorShift64Star::new(0);
        assert_eq!(rng.next_u64(), 0x7bbc_b40d_5506_82d0);
    }

    #[test]
    fn test_xorshift_ranges() {
        let mut rng = XorShift64Star::new(7);
        for _ in 0..10_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v));
            assert!(rng.index(3) < 3);
            let r = rng.range(-5.0, 5.0);
            assert!((-5.0..5.0).contains(&r));
        }
    }

    #[test]
    fn test_wrapping_region_sampling() {
        let cas = REGIONS.iter().find(|r| r.abbr == "Cas").unwrap();
        assert!(f64::abs(cas.ra_span() - 4.65) < 1e-9);
        let mut rng = XorShift64Star::new(99);
        let mut after_midnight = 0;
        for _ in 0..2000 {
            let crd = cas.sample(&mut rng);
            assert!(cas.contains(&crd), "{:?}", crd);
            assert!((0.0..24.0).contains(&crd.ra));
            if crd.ra < 12.0 { after_midnight += 1; }
        }
        // 3.6 of 4.65 hours lie after 0h
        assert!(after_midnight > 1300 && after_midnight < 1800);
    }

    #[test]
    fn test_regions_are_valid() {
        for region in REGIONS {
            assert!(region.ra_span() > 0.0 && region.ra_span() < 12.0, "{}", region.abbr);
            assert!(region.dec_min < region.dec_max, "{}", region.abbr);
            assert!((0.0..24.0).contains(&region.ra_min) && (0.0..24.0).contains(&region.ra_max));
        }
    }

    #[test]
    fn test_generated_star_fields() {
        let stars = generate_stars(1234, 500, 100);
        assert_eq!(stars.len(), 500);
        assert_eq!(stars[0].name.split(' ').nth(1), Some("00100"));
        for star in &stars {
            let region = REGIONS.iter().find(|r| r.abbr == star.constellation).unwrap();
            assert!(region.contains(&star.crd));
            let (lo, hi) = star.spectral.temperature_range();
            assert!(star.temperature >= lo && star.temperature < hi);
            assert!(star.magnitude >= 2.0 && star.magnitude < 6.5);
            assert!(star.luminosity > 0.0 && star.radius > 0.0);
            assert_eq!(star.color, temperature_to_color(star.temperature));
        }
    }

    #[test]
    fn test_generation_is_reproducible() {
        assert_eq!(generate_stars(2024, 300, 0), generate_stars(2024, 300, 0));
        assert_ne!(generate_stars(2024, 50, 0), generate_stars(2025, 50, 0));
    }
}
