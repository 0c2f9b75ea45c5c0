use serde::{Serialize, Deserialize};

use crate::sky_math::coords::ViewMode;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ViewOptions {
    pub mode:                ViewMode,
    pub star_sphere_radius:  f64,
    pub planet_shell_radius: f64,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            mode:                ViewMode::Center,
            star_sphere_radius:  100.0,
            planet_shell_radius: 110.0,
        }
    }
}

impl ViewOptions {
    pub fn check(&self) -> anyhow::Result<()> {
        if !(self.star_sphere_radius > 0.0) {
            anyhow::bail!("Star sphere radius must be positive");
        }
        if !(self.planet_shell_radius > self.star_sphere_radius) {
            anyhow::bail!(
                "Planet shell radius {} must be beyond the star sphere {}",
                self.planet_shell_radius, self.star_sphere_radius
            );
        }
        Ok(())
    }
}
