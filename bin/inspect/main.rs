use stratum::{Config, Terrain};

use std::process;

const DEFAULT_CONFIG_PATH: &str = "bin/inspect/terrain.ron";

fn main() {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let config = match Config::read_file(&path) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to read {}: {}", path, e);
            process::exit(1);
        }
    };

    let terrain = config.build_terrain();
    print_summary(&terrain);
}

fn print_summary(terrain: &Terrain) {
    println!(
        "resolution {}, shaded {}, {} segments",
        terrain.resolution(),
        terrain.is_shaded(),
        terrain.segment_count()
    );

    let mut segments: Vec<_> = terrain.segments().collect();
    segments.sort_by_key(|s| (s.index().y, s.index().x));

    for segment in segments {
        let (low, high) = segment.corner_height_range();
        let center = segment.rect().center();
        let center_height = terrain.get(center.x, center.y);
        println!(
            "  {:>4} {:>4}  corners {:>8.2} .. {:<8.2} center {:>8.2}{}",
            segment.index().x,
            segment.index().y,
            low,
            high,
            center_height,
            if segment.is_valid() { "" } else { "  (invalid)" }
        );
    }
}
