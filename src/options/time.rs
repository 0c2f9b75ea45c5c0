use serde::{Serialize, Deserialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct TimeOptions {
    /// Fixed date and time ("YYYY-MM-DD HH:MM[:SS]") instead of the system
    /// clock
    pub time_override:       Option<String>,
    /// Treat the override as local civil time rather than UTC
    pub override_is_local:   bool,
    /// Local time offset from UTC, minutes east of Greenwich
    pub utc_offset_minutes:  i32,
}

impl TimeOptions {
    pub fn check(&self) -> anyhow::Result<()> {
        if self.utc_offset_minutes.abs() > 14 * 60 {
            anyhow::bail!("UTC offset {} min is out of range", self.utc_offset_minutes);
        }
        Ok(())
    }
}
