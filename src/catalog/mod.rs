pub mod bright_stars;
pub mod generator;
pub mod spectral;

use itertools::Itertools;

use crate::{
    log_utils::TimeLogger,
    options::CatalogOptions,
    sky_math::{coords::EqCoord, orbits::{OrbitalElements, PLANETS}},
};
use self::{bright_stars::BRIGHT_STARS, spectral::*};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    Star,
    Sun,
    Moon,
    Planet,
}

/// Where a body's position comes from at query time
#[derive(Debug, Clone, PartialEq)]
pub enum BodySource {
    /// Index into [`Catalog::stars`]
    Star(usize),
    Sun,
    Moon,
    Orbit(OrbitalElements),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CelestialBody {
    pub name:   String,
    pub kind:   BodyKind,
    pub source: BodySource,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StarRecord {
    pub name:          String,
    pub constellation: &'static str,
    pub crd:           EqCoord,
    pub magnitude:     f64,
    pub temperature:   f64,      // K
    pub spectral:      SpectralType,
    pub distance:      f64,      // pc
    pub luminosity:    f64,      // solar units
    pub radius:        f64,      // solar units
    pub color:         [u8; 3],
    pub procedural:    bool,
}

/// Immutable set of bodies shown on the dome. Built once and shared as an
/// `Arc<Catalog>` with whoever needs it.
pub struct Catalog {
    stars:  Vec<StarRecord>,
    bodies: Vec<CelestialBody>,
    seed:   u64,
}

impl Catalog {
    pub fn new(options: &CatalogOptions) -> Self {
        let tmr = TimeLogger::start();

        let mut stars: Vec<StarRecord> = BRIGHT_STARS.iter()
            .map(|star| StarRecord {
                name:          star.name.to_string(),
                constellation: star.constellation,
                crd:           EqCoord::new(star.ra, star.dec),
                magnitude:     star.magnitude,
                temperature:   star.temperature,
                spectral:      SpectralType::from_class(star.class)
                    .unwrap_or_else(|| SpectralType::from_temperature(star.temperature)),
                distance:      star.distance,
                luminosity:    star.luminosity,
                radius:        star.radius,
                color:         temperature_to_color(star.temperature),
                procedural:    false,
            })
            .collect();

        let procedural_count = options.target_count.saturating_sub(stars.len());
        stars.extend(generator::generate_stars(options.seed, procedural_count, stars.len()));

        let mut bodies = vec![
            CelestialBody { name: "Sun".to_string(), kind: BodyKind::Sun, source: BodySource::Sun },
            CelestialBody { name: "Moon".to_string(), kind: BodyKind::Moon, source: BodySource::Moon },
        ];
        bodies.extend(PLANETS.iter().map(|planet| CelestialBody {
            name:   planet.name.to_string(),
            kind:   BodyKind::Planet,
            source: BodySource::Orbit(planet.elements),
        }));
        bodies.extend(stars.iter().enumerate().map(|(index, star)| CelestialBody {
            name:   star.name.clone(),
            kind:   BodyKind::Star,
            source: BodySource::Star(index),
        }));

        tmr.log("catalog generation");
        log::info!(
            "Catalog built: {} stars ({} procedural, seed {}), {} bodies total",
            stars.len(), procedural_count, options.seed, bodies.len()
        );

        Self { stars, bodies, seed: options.seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn stars(&self) -> &[StarRecord] {
        &self.stars
    }

    pub fn bodies(&self) -> &[CelestialBody] {
        &self.bodies
    }

    pub fn body_by_name(&self, name: &str) -> Option<(usize, &CelestialBody)> {
        self.bodies.iter()
            .enumerate()
            .find(|(_, body)| body.name.eq_ignore_ascii_case(name))
    }

    pub fn star_by_name(&self, name: &str) -> Option<&StarRecord> {
        self.stars.iter().find(|star| star.name.eq_ignore_ascii_case(name))
    }

    /// Nearest star brighter than `max_mag` and its distance in degrees
    pub fn get_nearest(&self, crd: &EqCoord, max_mag: f64) -> Option<(&StarRecord, f64)> {
        self.stars.iter()
            .filter(|star| star.magnitude < max_mag)
            .map(|star| (star, EqCoord::angle_between(&star.crd, crd)))
            .min_by(|(_, angle1), (_, angle2)| f64::total_cmp(angle1, angle2))
    }

    pub fn brightest(&self, count: usize) -> Vec<&StarRecord> {
        self.stars.iter()
            .sorted_by(|s1, s2| f64::total_cmp(&s1.magnitude, &s2.magnitude))
            .take(count)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(seed: u64, target_count: usize) -> CatalogOptions {
        CatalogOptions { seed, target_count }
    }

    #[test]
    fn test_catalog_reaches_target_count() {
        let catalog = Catalog::new(&options(5, 1000));
        assert_eq!(catalog.stars().len(), 1000);
        assert_eq!(catalog.bodies().len(), 1000 + 2 + PLANETS.len());
        assert_eq!(catalog.stars().iter().filter(|s| !s.procedural).count(), BRIGHT_STARS.len());
    }

    #[test]
    fn test_small_target_keeps_named_stars() {
        let catalog = Catalog::new(&options(5, 3));
        assert_eq!(catalog.stars().len(), BRIGHT_STARS.len());
    }

    #[test]
    fn test_catalog_is_reproducible() {
        let cat1 = Catalog::new(&options(777, 1500));
        let cat2 = Catalog::new(&options(777, 1500));
        assert_eq!(cat1.stars().len(), cat2.stars().len());
        assert_eq!(cat1.stars()[..200], cat2.stars()[..200]);
        assert_eq!(cat1.stars(), cat2.stars());
        assert_eq!(cat1.bodies(), cat2.bodies());
    }

    #[test]
    fn test_lookup() {
        let catalog = Catalog::new(&options(1, 100));
        let vega = catalog.star_by_name("vega").unwrap();
        assert_eq!(vega.spectral, SpectralType::A);
        assert!(!vega.procedural);

        let (index, moon) = catalog.body_by_name("Moon").unwrap();
        assert_eq!(index, 1);
        assert_eq!(moon.kind, BodyKind::Moon);
        let (_, mars) = catalog.body_by_name("mars").unwrap();
        assert!(matches!(mars.source, BodySource::Orbit(_)));

        let (nearest, angle) = catalog.get_nearest(&EqCoord::new(18.6, 38.8), 1.0).unwrap();
        assert_eq!(nearest.name, "Vega");
        assert!(angle < 0.5);

        let brightest = catalog.brightest(2);
        assert_eq!(brightest[0].name, "Sirius");
        assert_eq!(brightest[1].name, "Canopus");
    }
}
