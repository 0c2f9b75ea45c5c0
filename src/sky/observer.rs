use std::{cell::Cell, rc::Rc};

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use crate::{
    error::{Error, Result},
    options::{SiteOptions, TimeOptions},
    sky_math::time::*,
    utils::sexagesimal::sexagesimal_to_value,
};

/// Source of the current UTC time
pub trait Clock {
    fn now_utc(&self) -> NaiveDateTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> NaiveDateTime {
        chrono::Utc::now().naive_utc()
    }
}

/// Manually driven clock. Clones share the same time, so a test can keep
/// one and move the time of a clock it gave away.
#[derive(Clone)]
pub struct FixedClock {
    time: Rc<Cell<NaiveDateTime>>,
}

impl FixedClock {
    pub fn new(time: NaiveDateTime) -> Self {
        Self { time: Rc::new(Cell::new(time)) }
    }

    pub fn set(&self, time: NaiveDateTime) {
        self.time.set(time);
    }

    pub fn advance(&self, delta: TimeDelta) {
        self.time.set(self.time.get() + delta);
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> NaiveDateTime {
        self.time.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeSource {
    Clock,
    /// User supplied moment, already converted to UTC
    Override(NaiveDateTime),
}

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parses a user date/time. A bare date means midnight.
pub fn parse_date_time(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    DATE_TIME_FORMATS.iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?
                .and_hms_opt(0, 0, 0)
        })
}

/// Where and when the sky is observed from
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverState {
    latitude:    f64,
    longitude:   f64,
    time_source: TimeSource,
    utc:         NaiveDateTime,
}

impl ObserverState {
    pub fn new(site: &SiteOptions, time: &TimeOptions, clock: &dyn Clock) -> Result<Self> {
        let mut result = Self {
            latitude:    0.0,
            longitude:   0.0,
            time_source: TimeSource::Clock,
            utc:         clock.now_utc(),
        };
        result.set_location(site.latitude, site.longitude)?;
        if let Some(text) = &time.time_override {
            let offset = if time.override_is_local { time.utc_offset_minutes } else { 0 };
            result.set_time_override_str(text, offset)?;
        }
        Ok(result)
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn time_source(&self) -> TimeSource {
        self.time_source
    }

    pub fn utc(&self) -> NaiveDateTime {
        self.utc
    }

    pub fn julian_date(&self) -> f64 {
        julian_date(&self.utc)
    }

    /// Local sidereal time in degrees
    pub fn local_sidereal_time(&self) -> f64 {
        local_sidereal_time(&self.utc, self.longitude)
    }

    /// Rejected values leave the previous location in place
    pub fn set_location(&mut self, latitude: f64, longitude: f64) -> Result<()> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::InvalidInput(format!("latitude {}", latitude)));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::InvalidInput(format!("longitude {}", longitude)));
        }
        self.latitude = latitude;
        self.longitude = longitude;
        Ok(())
    }

    /// Location as decimal or `DD:MM:SS` strings
    pub fn set_location_str(&mut self, latitude: &str, longitude: &str) -> Result<()> {
        let parse = |text: &str| {
            sexagesimal_to_value(text)
                .ok_or_else(|| Error::InvalidInput(format!("coordinate `{}`", text)))
        };
        self.set_location(parse(latitude)?, parse(longitude)?)
    }

    /// `None` returns to the clock
    pub fn set_time_override(&mut self, utc: Option<NaiveDateTime>) {
        match utc {
            Some(utc) => {
                self.time_source = TimeSource::Override(utc);
                self.utc = utc;
            }
            None =>
                self.time_source = TimeSource::Clock,
        }
    }

    /// Parses a civil date/time. `utc_offset_minutes` is the offset of the
    /// given time from UTC (east positive), zero for UTC input.
    pub fn set_time_override_str(&mut self, text: &str, utc_offset_minutes: i32) -> Result<()> {
        let local = parse_date_time(text)
            .ok_or_else(|| Error::InvalidInput(format!("date/time `{}`", text)))?;
        let utc = local
            .checked_sub_signed(TimeDelta::minutes(utc_offset_minutes as i64))
            .ok_or_else(|| Error::InvalidInput(format!("date/time `{}` out of range", text)))?;
        self.set_time_override(Some(utc));
        Ok(())
    }

    /// Takes the current time from the active source
    pub fn refresh(&mut self, clock: &dyn Clock) {
        self.utc = match self.time_source {
            TimeSource::Clock => clock.now_utc(),
            TimeSource::Override(utc) => utc,
        };
    }
}
