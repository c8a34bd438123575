use serde::Deserialize;
use stratum_terrain::{BasePoint, Terrain, TerrainConfig};

/// One lattice point to seed a terrain with.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct BasePointEntry {
    pub x: i32,
    pub z: i32,
    #[serde(default)]
    pub point: BasePoint,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub terrain: TerrainConfig,
    pub base_points: Vec<BasePointEntry>,
}

impl Config {
    pub fn read_file(path: &str) -> Result<Self, ron::Error> {
        let reader = std::fs::File::open(path)?;

        ron::de::from_reader(reader)
    }

    /// Creates a terrain and sets every configured base point, in order.
    pub fn build_terrain(&self) -> Terrain {
        let mut terrain = Terrain::from_config(&self.terrain);
        for entry in self.base_points.iter() {
            terrain.set_base_point(entry.x, entry.z, entry.point);
        }
        log::debug!(
            "Built terrain from {} base points: {} segments",
            self.base_points.len(),
            terrain.segment_count()
        );
        terrain
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝

#[cfg(test)]
mod test {
    use super::*;

    use approx::assert_relative_eq;
    use stratum_terrain::stratum_core::glam::IVec2;
    use stratum_terrain::TerrainOptions;

    const SQUARE: &str = r#"(
        terrain: (resolution: 4, options: 1),
        base_points: [
            (x: 0, z: 0, point: (height: 0.0)),
            (x: 1, z: 0, point: (height: 4.0)),
            (x: 0, z: 1),
            (x: 1, z: 1, point: (height: 4.0, roughness: 2.0)),
        ],
    )"#;

    #[test]
    fn parse_and_build() {
        let config: Config = ron::de::from_str(SQUARE).unwrap();

        assert_eq!(config.terrain.resolution, 4);
        assert_eq!(config.terrain.options, TerrainOptions::SHADED);
        assert_eq!(config.base_points[2].point, BasePoint::default());
        assert_relative_eq!(config.base_points[3].point.roughness, 2.0);
        assert_relative_eq!(config.base_points[3].point.falloff, BasePoint::FALLOFF);

        let terrain = config.build_terrain();
        assert!(terrain.is_shaded());
        assert_eq!(terrain.segment_count(), 1);
        assert!(terrain.segment(IVec2::ZERO).is_some());
        assert_relative_eq!(terrain.height(2.0, 0.0).unwrap(), 2.0);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config: Config = ron::de::from_str("()").unwrap();

        assert_eq!(config.terrain, TerrainConfig::default());
        assert_eq!(config.terrain.resolution, 64);
        assert!(config.base_points.is_empty());
        assert_eq!(config.build_terrain().segment_count(), 0);
    }

    #[test]
    fn read_file_reports_io_errors() {
        assert!(Config::read_file("/nonexistent/stratum/terrain.ron").is_err());

        let path = std::env::temp_dir().join("stratum_read_file_test.ron");
        std::fs::write(&path, SQUARE).unwrap();
        let config = Config::read_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.base_points.len(), 4);
        std::fs::remove_file(&path).unwrap();
    }
}
