use stratum_core::geometry::Rect;
use stratum_core::glam::{IVec2, Vec2};
use stratum_core::units::*;

/// The world-space distance by which region bounding boxes are padded before rasterizing. Adjacent segments share an edge, so
/// a region that only touches that edge must reach both of them.
pub const REGION_PADDING: f32 = 1.0;

/// A half-open range of segment indices `[minimum, lub)`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SegmentRange {
    pub minimum: IVec2,
    pub lub: IVec2,
}

impl SegmentRange {
    pub fn is_empty(&self) -> bool {
        self.lub.x <= self.minimum.x || self.lub.y <= self.minimum.y
    }

    pub fn contains(&self, p: IVec2) -> bool {
        p.cmpge(self.minimum).all() && p.cmplt(self.lub).all()
    }

    pub fn iter(&self) -> impl Iterator<Item = IVec2> {
        itertools::iproduct!(self.minimum.x..self.lub.x, self.minimum.y..self.lub.y)
            .map(|(x, z)| IVec2::new(x, z))
    }
}

/// Returns the [`SegmentUnits`] coordinates of the segment that contains `p`.
pub fn in_segment(resolution: f32, p: WorldUnits<Vec2>) -> SegmentUnits<IVec2> {
    SegmentUnits((p.0 / resolution).floor().as_ivec2())
}

/// The world position of the minimum corner of the segment at `index`.
pub fn segment_min(resolution: f32, index: SegmentUnits<IVec2>) -> WorldUnits<Vec2> {
    WorldUnits(index.0.as_vec2() * resolution)
}

/// The closed world extent covered by the segment at `index`.
pub fn segment_rect(resolution: f32, index: SegmentUnits<IVec2>) -> WorldUnits<Rect> {
    segment_min(resolution, index).map(|min| Rect::from_min_and_shape(min, Vec2::splat(resolution)))
}

/// Transforms a [`WorldUnits`] rectangle into the [`SegmentUnits`] range `[floor(min / S), ceil(max / S))`.
pub fn segment_range_for_rect(resolution: f32, rect: WorldUnits<Rect>) -> SegmentUnits<SegmentRange> {
    let WorldUnits(r) = rect;
    SegmentUnits(SegmentRange {
        minimum: (r.min / resolution).floor().as_ivec2(),
        lub: (r.max / resolution).ceil().as_ivec2(),
    })
}

/// Like [`segment_range_for_rect`], after padding `bbox` by [`REGION_PADDING`].
pub fn region_segment_range(resolution: f32, bbox: WorldUnits<Rect>) -> SegmentUnits<SegmentRange> {
    segment_range_for_rect(resolution, bbox.map(|b| b.padded(REGION_PADDING)))
}

/// The segment slots that have lattice point `p` as one of their corners, paired with the corner that `p` occupies in each.
///
/// Slots whose index would fall below `i32::MIN` don't exist and are skipped.
pub fn slots_sharing_lattice_point(p: IVec2) -> impl Iterator<Item = (IVec2, [usize; 2])> {
    [[1, 1], [1, 0], [0, 1], [0, 0]]
        .into_iter()
        .filter_map(move |[dx, dz]: [usize; 2]| {
            let x = p.x.checked_sub(dx as i32)?;
            let z = p.y.checked_sub(dz as i32)?;
            Some((IVec2::new(x, z), [dx, dz]))
        })
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

    #[test]
    fn negative_positions_floor_toward_negative_infinity() {
        assert_eq!(in_segment(64.0, WorldUnits(Vec2::new(-0.5, 63.9))).0, IVec2::new(-1, 0));
        assert_eq!(in_segment(64.0, WorldUnits(Vec2::new(64.0, -64.0))).0, IVec2::new(1, -1));
    }

    #[test]
    fn rect_range_is_half_open() {
        let rect = Rect::from_min_and_max(Vec2::new(10.0, 0.0), Vec2::new(64.0, 65.0));
        let SegmentUnits(range) = segment_range_for_rect(64.0, WorldUnits(rect));

        assert_eq!(range.minimum, IVec2::new(0, 0));
        assert_eq!(range.lub, IVec2::new(1, 2));
        assert_eq!(range.iter().collect::<Vec<_>>(), vec![IVec2::new(0, 0), IVec2::new(0, 1)]);
    }

    #[test]
    fn padding_reaches_neighbour_across_shared_edge() {
        // Touches only the edge x = 64 between segments 0 and 1.
        let bbox = Rect::from_min_and_max(Vec2::new(60.0, 10.0), Vec2::new(64.0, 20.0));

        let SegmentUnits(unpadded) = segment_range_for_rect(64.0, WorldUnits(bbox));
        assert!(!unpadded.contains(IVec2::new(1, 0)));

        let SegmentUnits(padded) = region_segment_range(64.0, WorldUnits(bbox));
        assert!(padded.contains(IVec2::new(0, 0)));
        assert!(padded.contains(IVec2::new(1, 0)));
        assert!(!padded.contains(IVec2::new(2, 0)));
    }

    #[test]
    fn degenerate_rect_range_is_empty() {
        let rect = Rect::from_min_and_max(Vec2::splat(2.0), Vec2::splat(2.0));
        let SegmentUnits(range) = segment_range_for_rect(1.0, WorldUnits(rect));

        assert!(range.is_empty());
        assert_eq!(range.iter().count(), 0);
    }

    #[test]
    fn lattice_point_corners() {
        let p = IVec2::new(3, -2);
        for (slot, [dx, dz]) in slots_sharing_lattice_point(p) {
            assert_eq!(slot + IVec2::new(dx as i32, dz as i32), p);
        }
        assert_eq!(slots_sharing_lattice_point(p).count(), 4);
    }

    #[test]
    fn lattice_point_at_minimum_only_anchors_its_own_slot() {
        let p = IVec2::splat(i32::MIN);
        let slots: Vec<_> = slots_sharing_lattice_point(p).collect();
        assert_eq!(slots, vec![(p, [0, 0])]);

        let edge = IVec2::new(i32::MIN, 5);
        let slots: Vec<_> = slots_sharing_lattice_point(edge).collect();
        assert_eq!(slots, vec![(IVec2::new(i32::MIN, 4), [0, 1]), (edge, [0, 0])]);
    }

    #[test]
    fn segment_rect_covers_closed_extent() {
        let WorldUnits(rect) = segment_rect(16.0, SegmentUnits(IVec2::new(-1, 2)));

        assert_eq!(rect.min, Vec2::new(-16.0, 32.0));
        assert_eq!(rect.max, Vec2::new(0.0, 48.0));
    }
}
