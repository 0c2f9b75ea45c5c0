use serde::{Serialize, Deserialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CatalogOptions {
    /// Seed of the procedural part of the catalog
    pub seed:         u64,
    /// Total stars, named ones included
    pub target_count: usize,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            seed:         20_000_101,
            target_count: 2_000,
        }
    }
}
