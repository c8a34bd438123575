//! A segmented heightfield terrain.
//!
//! # Base Points
//!
//! The terrain's shape is controlled by a sparse integer lattice of [`BasePoint`](crate::BasePoint)s. Lattice coordinate
//! `(x, z)` sits at world position `(x * resolution, z * resolution)`.
//!
//! # Segments
//!
//! A [`Segment`](crate::Segment) covers one cell of the lattice and exists once all four of its corner points have been set.
//! Heights inside of a segment are interpolated from its corners and then passed through the
//! [`Modifier`](crate::Modifier)s that overlap it. Segments are never destroyed, and a cell that never receives all four
//! corners stays a hole that samples as [`DEFAULT_LEVEL`](crate::DEFAULT_LEVEL).
//!
//! # Regions and Shaders
//!
//! Modifiers and [`Area`](crate::Area)s are shaped regions that the [`Terrain`](crate::Terrain) tracks per segment. Moving a
//! region only revisits the segments near its old and new bounding boxes. [`Shader`](crate::Shader)s generate a
//! [`Surface`](crate::Surface) for each segment, such as a texture blending mask.

mod area;
mod base_point;
mod config;
mod coordinates;
mod coverage;
mod modifiers;
mod region;
mod segment;
mod segment_grid;
mod shader;
mod terrain;

pub use area::*;
pub use base_point::*;
pub use config::*;
pub use coordinates::*;
pub use coverage::*;
pub use modifiers::*;
pub use region::{
    Area, AreaKey, AreaMembership, CellDiff, Membership, Modifier, ModifierId, ModifierMembership, Region, RegionIndex,
};
pub use segment::*;
pub use segment_grid::*;
pub use shader::{Shader, ShaderId, ShaderRegistry, Surface};
pub use terrain::*;

pub use stratum_core;
