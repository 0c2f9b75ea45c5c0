pub mod site;
pub use site::*;

pub mod time;
pub use time::*;

pub mod view;
pub use view::*;

pub mod sensors;
pub use sensors::*;

pub mod catalog;
pub use catalog::*;

use serde::{Serialize, Deserialize};

/// Application configuration. Never mutated by the update loop; runtime
/// state lives in `sky::SkyDome`.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct Options {
    pub site:    SiteOptions,
    pub time:    TimeOptions,
    pub view:    ViewOptions,
    pub sensors: SensorOptions,
    pub catalog: CatalogOptions,
}

impl Options {
    pub fn check(&self) -> anyhow::Result<()> {
        self.site.check()?;
        self.time.check()?;
        self.view.check()?;
        self.sensors.check()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{sky_math::coords::ViewMode, utils::io_utils::*};

    #[test]
    fn test_default_options_are_valid() {
        assert!(Options::default().check().is_ok());
    }

    #[test]
    fn test_check_rejects_bad_values() {
        let mut opts = Options::default();
        opts.site.latitude = 91.0;
        assert!(opts.check().is_err());

        let mut opts = Options::default();
        opts.sensors.smoothing = 1.5;
        assert!(opts.check().is_err());

        let mut opts = Options::default();
        opts.view.planet_shell_radius = opts.view.star_sphere_radius;
        assert!(opts.check().is_err());

        let mut opts = Options::default();
        opts.sensors.sample_interval_ms = 0;
        assert!(opts.check().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let text = r#"{ "site": { "latitude": 55.75 }, "view": { "mode": "Horizon" } }"#;
        let opts: Options = serde_json::from_str(text).unwrap();
        assert_eq!(opts.site.latitude, 55.75);
        assert_eq!(opts.site.longitude, 0.0);
        assert_eq!(opts.view.mode, ViewMode::Horizon);
        assert_eq!(opts.sensors, SensorOptions::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("sky_dome_test_{}", std::process::id()));
        let mut opts = Options::default();
        opts.site.longitude = -122.4;
        opts.time.time_override = Some("2024-01-01 00:00".to_string());
        save_json_to_dir(&opts, &dir, "options").unwrap();

        let mut loaded = Options::default();
        load_json_from_dir(&mut loaded, &dir, "options").unwrap();
        assert_eq!(loaded, opts);

        // missing file leaves the value untouched
        let mut untouched = Options::default();
        load_json_from_dir(&mut untouched, &dir, "absent").unwrap();
        assert_eq!(untouched, Options::default());

        _ = std::fs::remove_dir_all(&dir);
    }
}
