use serde::{Serialize, Deserialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SiteOptions {
    pub latitude:  f64, // in degrees, north positive
    pub longitude: f64, // in degrees, east positive
}

impl SiteOptions {
    pub fn check(&self) -> anyhow::Result<()> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            anyhow::bail!("Site latitude {} is out of range", self.latitude);
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            anyhow::bail!("Site longitude {} is out of range", self.longitude);
        }
        Ok(())
    }
}
