use crate::base_point::{BasePoint, CornerBlock};
use crate::coordinates::{in_segment, region_segment_range, segment_range_for_rect, SegmentRange};
use crate::segment::Segment;

use stratum_core::allocator::{AllocId32, Allocator32};
use stratum_core::geometry::Rect;
use stratum_core::glam::{IVec2, Vec2};
use stratum_core::units::WorldUnits;
use stratum_core::SmallKeyHashMap;

/// Sparse storage of every materialized [`Segment`], keyed by grid index.
///
/// Segments live in an arena and are never removed, so there is at most one segment per index for the lifetime of the grid.
pub struct SegmentGrid {
    resolution: u32,
    segments: Allocator32<Segment>,
    index: SmallKeyHashMap<IVec2, AllocId32>,
}

impl SegmentGrid {
    pub fn new(resolution: u32) -> Self {
        Self {
            resolution,
            segments: Allocator32::default(),
            index: SmallKeyHashMap::default(),
        }
    }

    #[inline]
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    #[inline]
    fn spacing(&self) -> f32 {
        self.resolution as f32
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn contains(&self, index: IVec2) -> bool {
        self.index.contains_key(&index)
    }

    pub fn get(&self, index: IVec2) -> Option<&Segment> {
        self.index.get(&index).map(|&id| &self.segments[id])
    }

    pub fn get_mut(&mut self, index: IVec2) -> Option<&mut Segment> {
        let id = *self.index.get(&index)?;
        self.segments.get_mut(id)
    }

    /// The segment covering world position `p`, if any.
    pub fn segment_at(&self, p: Vec2) -> Option<&Segment> {
        self.get(in_segment(self.spacing(), WorldUnits(p)).0)
    }

    /// Creates the segment at `index` from its four corners.
    ///
    /// The caller is responsible for having checked that all four corners exist. If a segment is already present at `index`
    /// it is returned untouched.
    pub fn materialize(&mut self, index: IVec2, corners: CornerBlock) -> &mut Segment {
        let Self {
            resolution,
            segments,
            index: segment_index,
        } = self;
        let id = *segment_index.entry(index).or_insert_with(|| {
            log::debug!("Materializing segment {:?}", index);
            segments.insert(Segment::new(index, *resolution, corners))
        });
        &mut segments[id]
    }

    /// Overwrites one corner of an existing segment. Returns `false` if there is no segment at `index`.
    pub fn update_corner(&mut self, index: IVec2, corner: [usize; 2], point: BasePoint) -> bool {
        match self.get_mut(index) {
            Some(segment) => {
                segment.set_corner(corner, point);
                true
            }
            None => false,
        }
    }

    /// The grid indices of segments that may overlap `rect`.
    pub fn range_for_rect(&self, rect: Rect) -> SegmentRange {
        segment_range_for_rect(self.spacing(), WorldUnits(rect)).0
    }

    /// The grid indices of segments that a region with bounding box `bbox` may affect.
    pub fn region_range(&self, bbox: Rect) -> SegmentRange {
        region_segment_range(self.spacing(), WorldUnits(bbox)).0
    }

    /// The materialized subset of `range`.
    pub fn indices_in_range(&self, range: SegmentRange) -> impl Iterator<Item = IVec2> + '_ {
        range.iter().filter(move |p| self.index.contains_key(p))
    }

    /// Calls `visitor` on every existing segment overlapping `rect`.
    pub fn visit_rect(&self, rect: Rect, mut visitor: impl FnMut(&Segment, IVec2)) {
        for p in self.range_for_rect(rect).iter() {
            if let Some(segment) = self.get(p) {
                visitor(segment, p);
            }
        }
    }

    pub fn visit_rect_mut(&mut self, rect: Rect, mut visitor: impl FnMut(&mut Segment, IVec2)) {
        for p in self.range_for_rect(rect).iter() {
            if let Some(segment) = self.get_mut(p) {
                visitor(segment, p);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().map(|(_, s)| s)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Segment> {
        self.segments.iter_mut().map(|(_, s)| s)
    }

    pub fn indices(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.index.keys().copied()
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

    fn flat(height: f32) -> CornerBlock {
        CornerBlock::splat(BasePoint::with_height(height))
    }

    #[test]
    fn materialize_once_per_index() {
        let mut grid = SegmentGrid::new(8);
        grid.materialize(IVec2::new(2, -1), flat(1.0));
        let again = grid.materialize(IVec2::new(2, -1), flat(5.0));

        assert_eq!(again.corners()[[0, 0]].height, 1.0);
        assert_eq!(grid.len(), 1);
        assert!(grid.get(IVec2::new(-1, 2)).is_none());
    }

    #[test]
    fn update_corner_only_touches_existing_segments() {
        let mut grid = SegmentGrid::new(8);
        grid.materialize(IVec2::ZERO, flat(1.0));

        assert!(grid.update_corner(IVec2::ZERO, [1, 0], BasePoint::with_height(9.0)));
        assert!(!grid.update_corner(IVec2::ONE, [1, 0], BasePoint::with_height(9.0)));
        assert!(!grid.contains(IVec2::ONE));

        let corners = grid.get(IVec2::ZERO).unwrap().corners();
        assert_eq!(corners[[1, 0]].height, 9.0);
        assert_eq!(corners[[0, 0]].height, 1.0);
        assert_eq!(corners[[0, 1]].height, 1.0);
        assert_eq!(corners[[1, 1]].height, 1.0);
    }

    #[test]
    fn visit_rect_skips_holes() {
        let mut grid = SegmentGrid::new(10);
        for p in [IVec2::new(0, 0), IVec2::new(1, 1), IVec2::new(3, 0)] {
            grid.materialize(p, flat(0.0));
        }

        let mut visited = Vec::new();
        let rect = Rect::from_min_and_max(Vec2::new(0.0, 0.0), Vec2::new(25.0, 15.0));
        grid.visit_rect(rect, |segment, p| {
            assert_eq!(segment.index(), p);
            visited.push(p);
        });
        visited.sort_by_key(|p| (p.x, p.y));

        assert_eq!(visited, vec![IVec2::new(0, 0), IVec2::new(1, 1)]);
    }

    #[test]
    fn segment_at_world_position() {
        let mut grid = SegmentGrid::new(10);
        grid.materialize(IVec2::new(-1, 0), flat(0.0));

        assert_eq!(grid.segment_at(Vec2::new(-0.1, 9.9)).map(|s| s.index()), Some(IVec2::new(-1, 0)));
        assert!(grid.segment_at(Vec2::new(0.1, 9.9)).is_none());
    }
}
