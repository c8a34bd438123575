use serde::{Deserialize, Serialize};
use std::mem;
use std::ops::{Index, IndexMut};
use stratum_core::glam::IVec2;
use stratum_core::static_assertions::const_assert_eq;
use stratum_core::SmallKeyHashMap;

/// The shape of the terrain at one vertex of the integer lattice.
///
/// Only `height` feeds the built-in interpolation. `roughness` and `falloff` are carried through for collaborators that
/// generate finer detail inside a segment.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct BasePoint {
    pub height: f32,
    pub roughness: f32,
    pub falloff: f32,
}

const_assert_eq!(mem::size_of::<BasePoint>(), 12);

impl BasePoint {
    pub const HEIGHT: f32 = 8.0;
    pub const ROUGHNESS: f32 = 1.25;
    pub const FALLOFF: f32 = 0.25;

    pub const fn new(height: f32, roughness: f32, falloff: f32) -> Self {
        Self {
            height,
            roughness,
            falloff,
        }
    }

    pub const fn with_height(height: f32) -> Self {
        Self::new(height, Self::ROUGHNESS, Self::FALLOFF)
    }
}

impl Default for BasePoint {
    fn default() -> Self {
        Self::new(Self::HEIGHT, Self::ROUGHNESS, Self::FALLOFF)
    }
}

/// The four lattice points at the corners of one segment.
///
/// Indexed by `[dx, dz]`, where `[0, 0]` is the corner at the segment's minimum and `[1, 1]` is the corner diagonally
/// opposite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CornerBlock(pub [[BasePoint; 2]; 2]);

impl CornerBlock {
    pub fn splat(point: BasePoint) -> Self {
        Self([[point; 2]; 2])
    }

    pub fn iter(&self) -> impl Iterator<Item = &BasePoint> {
        self.0.iter().flatten()
    }

    /// Bilinear interpolation of the corner heights, with `u` and `v` in `[0, 1]` along X and Z.
    pub fn interpolate_height(&self, u: f32, v: f32) -> f32 {
        let [[h00, h01], [h10, h11]] = self.0.map(|column| column.map(|p| p.height));
        let low = h00 + (h10 - h00) * u;
        let high = h01 + (h11 - h01) * u;
        low + (high - low) * v
    }
}

impl Index<[usize; 2]> for CornerBlock {
    type Output = BasePoint;

    #[inline]
    fn index(&self, [dx, dz]: [usize; 2]) -> &Self::Output {
        &self.0[dx][dz]
    }
}

impl IndexMut<[usize; 2]> for CornerBlock {
    #[inline]
    fn index_mut(&mut self, [dx, dz]: [usize; 2]) -> &mut Self::Output {
        &mut self.0[dx][dz]
    }
}

/// Sparse storage of every [`BasePoint`] that has been set, keyed by lattice coordinates. Points are never removed.
#[derive(Clone, Debug, Default)]
pub struct BasePointGrid {
    points: SmallKeyHashMap<IVec2, BasePoint>,
}

impl BasePointGrid {
    /// Inserts or overwrites the point at `p`.
    pub fn set(&mut self, p: IVec2, point: BasePoint) {
        self.points.insert(p, point);
    }

    pub fn get(&self, p: IVec2) -> Option<BasePoint> {
        self.points.get(&p).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the corners of the segment slot at `segment` if all four lattice points are present.
    ///
    /// A slot on the `i32::MAX` edge of the lattice can never be complete.
    pub fn corners(&self, segment: IVec2) -> Option<CornerBlock> {
        let mut block = CornerBlock::splat(BasePoint::default());
        for dx in 0..2 {
            for dz in 0..2 {
                let x = segment.x.checked_add(dx as i32)?;
                let z = segment.y.checked_add(dz as i32)?;
                block.0[dx][dz] = self.get(IVec2::new(x, z))?;
            }
        }
        Some(block)
    }

    pub fn iter(&self) -> impl Iterator<Item = (IVec2, BasePoint)> + '_ {
        self.points.iter().map(|(p, point)| (*p, *point))
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

    #[test]
    fn corners_require_all_four_points() {
        let mut grid = BasePointGrid::default();
        grid.set(IVec2::new(0, 0), BasePoint::with_height(0.0));
        grid.set(IVec2::new(1, 0), BasePoint::with_height(1.0));
        grid.set(IVec2::new(0, 1), BasePoint::with_height(2.0));

        assert_eq!(grid.corners(IVec2::ZERO), None);

        grid.set(IVec2::new(1, 1), BasePoint::with_height(3.0));
        let block = grid.corners(IVec2::ZERO).unwrap();

        assert_eq!(block[[0, 0]].height, 0.0);
        assert_eq!(block[[1, 0]].height, 1.0);
        assert_eq!(block[[0, 1]].height, 2.0);
        assert_eq!(block[[1, 1]].height, 3.0);
        assert_eq!(grid.corners(IVec2::new(-1, 0)), None);
    }

    #[test]
    fn slot_on_lattice_edge_is_never_complete() {
        let mut grid = BasePointGrid::default();
        grid.set(IVec2::splat(i32::MAX), BasePoint::default());
        grid.set(IVec2::new(i32::MAX - 1, i32::MAX), BasePoint::default());

        assert_eq!(grid.corners(IVec2::splat(i32::MAX)), None);
        assert_eq!(grid.corners(IVec2::new(i32::MAX - 1, i32::MAX)), None);
    }

    #[test]
    fn set_overwrites() {
        let mut grid = BasePointGrid::default();
        grid.set(IVec2::new(-3, 7), BasePoint::with_height(1.0));
        grid.set(IVec2::new(-3, 7), BasePoint::with_height(5.0));

        assert_eq!(grid.len(), 1);
        assert_eq!(grid.get(IVec2::new(-3, 7)).map(|p| p.height), Some(5.0));
        assert_eq!(grid.get(IVec2::new(7, -3)), None);
    }

    #[test]
    fn bilinear_interpolation() {
        let mut block = CornerBlock::splat(BasePoint::with_height(0.0));
        block[[1, 0]].height = 4.0;
        block[[0, 1]].height = 8.0;
        block[[1, 1]].height = 12.0;

        assert_relative_eq!(block.interpolate_height(0.0, 0.0), 0.0);
        assert_relative_eq!(block.interpolate_height(1.0, 1.0), 12.0);
        assert_relative_eq!(block.interpolate_height(0.5, 0.5), 6.0);
        assert_relative_eq!(block.interpolate_height(0.25, 0.0), 1.0);
    }
}
