use crate::terrain::{Terrain, TerrainOptions};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Edge length of a segment in world units.
    pub resolution: u32,
    pub options: TerrainOptions,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            resolution: 64,
            options: TerrainOptions::DEFAULT,
        }
    }
}

impl Terrain {
    pub fn from_config(config: &TerrainConfig) -> Self {
        Self::new(config.options, config.resolution)
    }
}
