use std::{sync::Arc, time::Duration};

use chrono::NaiveDateTime;
use nalgebra::{UnitQuaternion, Vector3};

use crate::{
    catalog::*,
    error::{Error, Result},
    log_utils::TimeLogger,
    options::{Options, ViewOptions},
    orientation::{OrientationFusion, OrientationState, SensorSource},
    sky_math::{coords::*, ephemeris::*, orbits::place_on_shell, time::julian_centuries},
};
use super::observer::*;

/// Where the renderer puts a body in the current view mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Center view: unit direction and the radius of the sphere it is
    /// drawn on
    Direction { vector: Vector3<f64>, radius: f64 },
    /// Horizon view: apparent position for the observer
    Horizontal(HorizCoord),
}

impl Placement {
    pub fn unit_vector(&self) -> Vector3<f64> {
        match self {
            Placement::Direction { vector, .. } => *vector,
            Placement::Horizontal(horiz) => horiz.to_unit_vector(),
        }
    }

    /// Scene position for the center view
    pub fn render_position(&self) -> Option<Vector3<f64>> {
        match self {
            Placement::Direction { vector, radius } => Some(place_on_shell(vector, *radius)),
            Placement::Horizontal(_) => None,
        }
    }

    fn is_finite(&self) -> bool {
        match self {
            Placement::Direction { vector, radius } =>
                vector.iter().all(|v| v.is_finite()) && radius.is_finite(),
            Placement::Horizontal(horiz) =>
                horiz.alt.is_finite() && horiz.az.is_finite(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BodyPosition {
    /// Index into [`Catalog::bodies`]
    pub index:     usize,
    pub kind:      BodyKind,
    pub placement: Placement,
}

/// Everything the renderer reads for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct SkySnapshot {
    pub time:              NaiveDateTime,
    pub jd:                f64,
    /// Local sidereal time, degrees
    pub lst:               f64,
    pub view_mode:         ViewMode,
    pub bodies:            Vec<BodyPosition>,
    pub dome_rotation:     UnitQuaternion<f64>,
    /// Position in the lunation cycle, `[0, 1)`
    pub moon_phase:        f64,
    /// Lit part of the lunar disk, `[0, 1]`
    pub moon_illumination: f64,
}

fn body_equatorial(catalog: &Catalog, body: &CelestialBody, jd: f64) -> Option<EqCoord> {
    match &body.source {
        BodySource::Star(index) => catalog.stars().get(*index).map(|star| star.crd),
        BodySource::Sun => Some(sun_position(jd)),
        BodySource::Moon => Some(moon_position(jd)),
        BodySource::Orbit(elements) => Some(elements.equatorial_position(jd)),
    }
}

fn compute_snapshot(
    catalog:   &Catalog,
    observer:  &ObserverState,
    view_mode: ViewMode,
    view:      &ViewOptions,
    rotation:  &UnitQuaternion<f64>,
) -> Result<SkySnapshot> {
    let jd = observer.julian_date();
    if !jd.is_finite() {
        return Err(Error::InvalidInput(format!("time {}", observer.utc())));
    }
    let (lat, lon) = (observer.latitude(), observer.longitude());

    let mut bodies = Vec::with_capacity(catalog.bodies().len());
    for (index, body) in catalog.bodies().iter().enumerate() {
        let Some(crd) = body_equatorial(catalog, body, jd) else { continue; };
        let placement = match view_mode {
            ViewMode::Center => {
                let radius = match body.kind {
                    BodyKind::Star => view.star_sphere_radius,
                    _              => view.planet_shell_radius,
                };
                Placement::Direction { vector: equatorial_to_unit_vector(&crd), radius }
            }
            ViewMode::Horizon =>
                Placement::Horizontal(equatorial_to_horizontal(&crd, jd, lat, lon)),
        };
        if !placement.is_finite() {
            return Err(Error::InvalidInput(format!("position of {} at JD {}", body.name, jd)));
        }
        bodies.push(BodyPosition { index, kind: body.kind, placement });
    }

    let t = julian_centuries(jd);
    Ok(SkySnapshot {
        time: observer.utc(),
        jd,
        lst: observer.local_sidereal_time(),
        view_mode,
        bodies,
        dome_rotation: *rotation,
        moon_phase: moon_phase(t),
        moon_illumination: moon_illuminated_fraction(t),
    })
}

/// Single-writer handle driving the whole dome. The host calls
/// [`SkyDome::tick`] once per display update and reads the returned
/// snapshot until the next tick.
pub struct SkyDome {
    options:     Options,
    catalog:     Arc<Catalog>,
    clock:       Box<dyn Clock>,
    sensors:     Box<dyn SensorSource>,
    observer:    ObserverState,
    fusion:      OrientationFusion,
    view_mode:   ViewMode,
    snapshot:    SkySnapshot,
    initialized: bool,
}

impl SkyDome {
    pub fn new(
        options: Options,
        catalog: Arc<Catalog>,
        clock:   Box<dyn Clock>,
        sensors: Box<dyn SensorSource>,
    ) -> Result<Self> {
        let observer = ObserverState::new(&options.site, &options.time, clock.as_ref())?;
        let fusion = OrientationFusion::new(&options.sensors);
        let view_mode = options.view.mode;
        let snapshot = compute_snapshot(
            &catalog, &observer, view_mode, &options.view, fusion.rotation()
        )?;
        Ok(Self {
            options,
            catalog,
            clock,
            sensors,
            observer,
            fusion,
            view_mode,
            snapshot,
            initialized: false,
        })
    }

    /// First full solve: samples the sensors immediately and computes every
    /// body
    pub fn initialize(&mut self) {
        let tmr = TimeLogger::start();
        self.observer.refresh(self.clock.as_ref());
        let sidereal = self.sidereal_rotation();
        self.fusion.update(Duration::ZERO, self.sensors.as_mut(), &sidereal);
        self.recompute();
        self.initialized = true;
        tmr.log("sky dome initialization");
        log::info!(
            "Sky dome initialized: {} bodies, lat={:.4}, lon={:.4}, {:?} at {}",
            self.snapshot.bodies.len(),
            self.observer.latitude(),
            self.observer.longitude(),
            self.view_mode,
            self.observer.utc(),
        );
    }

    pub fn tick(&mut self, elapsed: Duration) -> &SkySnapshot {
        if !self.initialized {
            self.initialize();
            return &self.snapshot;
        }
        self.observer.refresh(self.clock.as_ref());
        let sidereal = self.sidereal_rotation();
        self.fusion.update(elapsed, self.sensors.as_mut(), &sidereal);
        self.recompute();
        &self.snapshot
    }

    pub fn snapshot(&self) -> &SkySnapshot {
        &self.snapshot
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn observer(&self) -> &ObserverState {
        &self.observer
    }

    pub fn orientation(&self) -> &OrientationState {
        self.fusion.state()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if self.view_mode == mode {
            return;
        }
        self.view_mode = mode;
        log::info!("View mode switched to {:?}", mode);
        self.recompute();
    }

    pub fn ar_tracking(&self) -> bool {
        self.fusion.ar_tracking()
    }

    pub fn set_ar_tracking(&mut self, enabled: bool) {
        self.fusion.set_ar_tracking(enabled);
    }

    /// Re-baselines the compass and snaps the dome to the result
    pub fn recalibrate(&mut self) -> Result<f64> {
        let sidereal = self.sidereal_rotation();
        let result = self.fusion.recalibrate(self.sensors.as_mut(), &sidereal);
        match &result {
            Ok(baseline) => log::info!("Recalibrated, heading baseline {:.2}", baseline),
            Err(err) => log::warn!("Recalibration incomplete: {}", err),
        }
        self.snapshot.dome_rotation = *self.fusion.rotation();
        result
    }

    pub fn set_location(&mut self, latitude: f64, longitude: f64) -> Result<()> {
        let result = self.observer.set_location(latitude, longitude);
        self.after_observer_change(result)
    }

    pub fn set_location_str(&mut self, latitude: &str, longitude: &str) -> Result<()> {
        let result = self.observer.set_location_str(latitude, longitude);
        self.after_observer_change(result)
    }

    /// Interprets `text` as UTC or local time as configured
    pub fn set_time_override_str(&mut self, text: &str) -> Result<()> {
        let time = &self.options.time;
        let offset = if time.override_is_local { time.utc_offset_minutes } else { 0 };
        let result = self.observer.set_time_override_str(text, offset);
        self.after_observer_change(result)
    }

    pub fn set_time_override(&mut self, utc: Option<NaiveDateTime>) {
        self.observer.set_time_override(utc);
        self.observer.refresh(self.clock.as_ref());
        self.recompute();
    }

    fn after_observer_change(&mut self, result: Result<()>) -> Result<()> {
        match &result {
            Ok(()) => {
                self.observer.refresh(self.clock.as_ref());
                self.recompute();
            }
            Err(err) => log::warn!("Observer update rejected: {}", err),
        }
        result
    }

    fn sidereal_rotation(&self) -> UnitQuaternion<f64> {
        equatorial_to_horizon_rotation(
            self.observer.local_sidereal_time(),
            self.observer.latitude()
        )
    }

    fn recompute(&mut self) {
        let result = compute_snapshot(
            &self.catalog,
            &self.observer,
            self.view_mode,
            &self.options.view,
            self.fusion.rotation(),
        );
        match result {
            Ok(snapshot) => self.snapshot = snapshot,
            Err(err) => log::warn!("Keeping previous sky snapshot: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        options::CatalogOptions,
        orientation::{FusionMode, sensors::{NoSensors, ScriptedSensors}},
        sky_math::time::{J2000_JD, j2000},
    };
    use chrono::TimeDelta;

    fn catalog() -> Arc<Catalog> {
        Arc::new(Catalog::new(&CatalogOptions { seed: 7, target_count: 120 }))
    }

    fn dome_at(
        options: Options,
        clock:   &FixedClock,
        sensors: Box<dyn SensorSource>
    ) -> SkyDome {
        SkyDome::new(options, catalog(), Box::new(clock.clone()), sensors).unwrap()
    }

    #[test]
    fn test_snapshot_at_j2000() {
        let clock = FixedClock::new(j2000());
        let mut dome = dome_at(Options::default(), &clock, Box::new(NoSensors));
        let snapshot = dome.tick(Duration::ZERO).clone();

        assert_eq!(snapshot.jd, J2000_JD);
        assert_eq!(snapshot.view_mode, ViewMode::Center);
        assert_eq!(snapshot.bodies.len(), dome.catalog().bodies().len());
        assert!((0.0..1.0).contains(&snapshot.moon_phase));
        assert!((0.0..=1.0).contains(&snapshot.moon_illumination));

        for pos in &snapshot.bodies {
            let Placement::Direction { vector, radius } = pos.placement else {
                panic!("horizontal placement in center view");
            };
            assert!(f64::abs(vector.norm() - 1.0) < 1e-9);
            let expected = if pos.kind == BodyKind::Star { 100.0 } else { 110.0 };
            assert_eq!(radius, expected);
        }

        let (sun_index, _) = dome.catalog().body_by_name("sun").unwrap();
        let sun = &snapshot.bodies[sun_index];
        let expected = equatorial_to_unit_vector(&sun_position(J2000_JD));
        assert!((sun.placement.unit_vector() - expected).norm() < 1e-12);
        let rendered = sun.placement.render_position().unwrap();
        assert!(f64::abs(rendered.norm() - 110.0) < 1e-9);
    }

    #[test]
    fn test_view_mode_switch_recomputes_all() {
        let clock = FixedClock::new(j2000());
        let mut dome = dome_at(Options::default(), &clock, Box::new(NoSensors));
        dome.initialize();

        dome.set_view_mode(ViewMode::Horizon);
        let horizon = dome.snapshot().clone();
        assert_eq!(horizon.view_mode, ViewMode::Horizon);
        assert!(horizon.bodies.iter().all(|pos| matches!(pos.placement, Placement::Horizontal(_))));

        dome.set_view_mode(ViewMode::Horizon);
        assert_eq!(dome.snapshot(), &horizon);

        dome.set_view_mode(ViewMode::Center);
        let center = dome.snapshot();
        assert!(center.bodies.iter().all(|pos| matches!(pos.placement, Placement::Direction { .. })));

        // same directions in both modes
        let sidereal = equatorial_to_horizon_rotation(center.lst, 0.0);
        for (c, h) in center.bodies.iter().zip(&horizon.bodies) {
            let diff = sidereal * c.placement.unit_vector() - h.placement.unit_vector();
            assert!(diff.norm() < 1e-4);
        }
    }

    #[test]
    fn test_polaris_altitude_matches_latitude() {
        let clock = FixedClock::new(j2000() + TimeDelta::days(100));
        let mut options = Options::default();
        options.site.latitude = 50.0;
        options.site.longitude = 30.0;
        options.view.mode = ViewMode::Horizon;
        let mut dome = dome_at(options, &clock, Box::new(NoSensors));
        let snapshot = dome.tick(Duration::ZERO).clone();

        let (index, _) = dome.catalog().body_by_name("Polaris").unwrap();
        let Placement::Horizontal(horiz) = snapshot.bodies[index].placement else {
            panic!("center placement in horizon view");
        };
        assert!(f64::abs(horiz.alt - 50.0) < 1.0);
    }

    #[test]
    fn test_clock_drives_sidereal_time() {
        let clock = FixedClock::new(j2000());
        let mut dome = dome_at(Options::default(), &clock, Box::new(NoSensors));
        let lst0 = dome.tick(Duration::ZERO).lst;
        clock.advance(TimeDelta::hours(1));
        let lst1 = dome.tick(Duration::from_secs(3600)).lst;
        assert!(f64::abs(lst1 - lst0 - 15.041) < 1e-2);

        dome.set_time_override_str("2000-01-01 12:00").unwrap();
        assert_eq!(dome.snapshot().jd, J2000_JD);
        assert_eq!(dome.tick(Duration::from_millis(16)).lst, lst0);

        dome.set_time_override(None);
        assert_eq!(dome.snapshot().lst, lst1);
    }

    #[test]
    fn test_invalid_input_keeps_state() {
        let clock = FixedClock::new(j2000());
        let mut dome = dome_at(Options::default(), &clock, Box::new(NoSensors));
        dome.initialize();
        dome.set_location(48.85, 2.35).unwrap();
        let before = dome.snapshot().clone();

        assert!(matches!(dome.set_location(-91.0, 0.0), Err(Error::InvalidInput(_))));
        assert!(dome.set_location_str("1:99", "0").is_err());
        assert!(dome.set_time_override_str("not a date").is_err());
        assert_eq!(dome.observer().latitude(), 48.85);
        assert_eq!(dome.snapshot(), &before);
    }

    #[test]
    fn test_static_fallback_and_ar_toggle() {
        let clock = FixedClock::new(j2000());
        let mut options = Options::default();
        options.site.latitude = 40.0;
        let mut dome = dome_at(options, &clock, Box::new(NoSensors));
        let snapshot = dome.tick(Duration::ZERO).clone();
        assert_eq!(dome.orientation().mode, FusionMode::Static);
        let sidereal = equatorial_to_horizon_rotation(snapshot.lst, 40.0);
        assert!(snapshot.dome_rotation.angle_to(&sidereal) < 1e-9);

        assert!(dome.recalibrate().is_err());

        dome.set_ar_tracking(false);
        dome.set_ar_tracking(false);
        assert!(!dome.ar_tracking());
        clock.advance(TimeDelta::minutes(10));
        let snapshot = dome.tick(Duration::from_secs(600)).clone();
        let sidereal = equatorial_to_horizon_rotation(snapshot.lst, 40.0);
        assert!(snapshot.dome_rotation.angle_to(&sidereal) < 1e-9);
    }

    #[test]
    fn test_recalibrate_with_compass() {
        let clock = FixedClock::new(j2000());
        let sensors = ScriptedSensors::new().with_heading(123.0);
        let mut dome = dome_at(Options::default(), &clock, Box::new(sensors));
        dome.initialize();
        assert_eq!(dome.orientation().mode, FusionMode::Full);
        let baseline = dome.recalibrate().unwrap();
        assert!(f64::abs(baseline - 123.0) < 1e-9);
        assert_eq!(dome.snapshot().dome_rotation, dome.fusion.rotation().clone());
    }
}
