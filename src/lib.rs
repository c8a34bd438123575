//! Stratum: segmented heightfield terrain.
//!
//! Everything from [`stratum_terrain`] is re-exported here, along with [`Config`] for seeding a [`Terrain`] from a RON file.

mod config;

pub use config::{BasePointEntry, Config};

pub use stratum_terrain::*;
