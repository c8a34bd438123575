use crate::coordinates::region_segment_range;
use crate::segment::Segment;
use crate::segment_grid::SegmentGrid;
use crate::shader::{Shader, ShaderId};

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use stratum_core::geometry::Rect;
use stratum_core::glam::IVec2;
use stratum_core::units::WorldUnits;
use stratum_core::{SmallKeyHashMap, SmallKeyHashSet};

/// Identifies a [`Modifier`] in a terrain. One modifier is active per id.
pub type ModifierId = i64;

/// A shaped footprint on the terrain.
pub trait Region: Send + Sync {
    /// A conservative bounding box of the footprint in world units.
    fn bbox(&self) -> Rect;

    /// The exact test of whether this region affects `segment`.
    fn check_intersects(&self, segment: &Segment) -> bool;
}

/// A region that alters terrain height inside of its footprint.
pub trait Modifier: Region {
    /// Returns the new height at world position `(x, z)` given the current `height`.
    fn apply(&self, x: f32, z: f32, height: f32) -> f32;
}

/// A region that tags terrain with a surface material.
pub trait Area: Region {
    /// The [`ShaderId`] of the shader that renders this area.
    fn layer(&self) -> ShaderId;

    /// Binds the shader found for [`layer`](Self::layer) when the area is added to a terrain.
    fn set_shader(&self, shader: Arc<dyn Shader>);
}

/// The identity of an [`Area`] handle. Two handles are the same area iff they point at the same allocation.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct AreaKey(usize);

impl AreaKey {
    pub fn of<A: ?Sized>(area: &Arc<A>) -> Self {
        Self(Arc::as_ptr(area).cast::<()>() as usize)
    }
}

/// How a kind of region is keyed and recorded on a [`Segment`].
pub trait Membership {
    type Key: Copy + Debug + Eq + Hash;
    type Region: Region + ?Sized;

    fn attach(segment: &mut Segment, key: Self::Key, region: &Arc<Self::Region>);

    fn detach(segment: &mut Segment, key: Self::Key);
}

/// Modifiers are keyed by caller-chosen id.
pub enum ModifierMembership {}

impl Membership for ModifierMembership {
    type Key = ModifierId;
    type Region = dyn Modifier;

    fn attach(segment: &mut Segment, key: ModifierId, region: &Arc<dyn Modifier>) {
        segment.update_modifier(key, Some(region.clone()));
    }

    fn detach(segment: &mut Segment, key: ModifierId) {
        segment.update_modifier(key, None);
    }
}

/// Areas are keyed by handle identity.
pub enum AreaMembership {}

impl Membership for AreaMembership {
    type Key = AreaKey;
    type Region = dyn Area;

    fn attach(segment: &mut Segment, _key: AreaKey, region: &Arc<dyn Area>) {
        segment.add_area(region.clone());
    }

    fn detach(segment: &mut Segment, key: AreaKey) {
        segment.remove_area(key);
    }
}

struct RegionEntry<R: ?Sized> {
    region: Arc<R>,
    /// The bounding box that the region's memberships were last computed from.
    bbox: Rect,
}

/// The partition of two sets of segment indices.
#[derive(Debug, Default, PartialEq)]
pub struct CellDiff {
    /// Only in the old set.
    pub removed: Vec<IVec2>,
    /// Only in the new set.
    pub added: Vec<IVec2>,
    /// In both sets.
    pub updated: Vec<IVec2>,
}

impl CellDiff {
    pub fn new(old: &SmallKeyHashSet<IVec2>, new: &SmallKeyHashSet<IVec2>) -> Self {
        let mut diff = CellDiff::default();
        for &p in old.iter() {
            if new.contains(&p) {
                diff.updated.push(p);
            } else {
                diff.removed.push(p);
            }
        }
        diff.added.extend(new.iter().copied().filter(|p| !old.contains(p)));
        diff
    }
}

/// Keeps the region membership of every segment consistent with the current shape of each registered region.
///
/// For each region the index remembers the bounding box it last used. When a region changes, the segments reachable from the
/// old and new (padded) boxes are compared:
///
/// - segments only reachable from the old box lose the region without further testing
/// - segments only reachable from the new box gain it if [`Region::check_intersects`] passes
/// - segments reachable from both are re-tested and gain or lose it accordingly
///
/// So the expensive exact test only runs on segments near the region, and never on segments it has moved away from.
pub struct RegionIndex<M: Membership> {
    entries: SmallKeyHashMap<M::Key, RegionEntry<M::Region>>,
}

impl<M: Membership> Default for RegionIndex<M> {
    fn default() -> Self {
        Self {
            entries: SmallKeyHashMap::default(),
        }
    }
}

impl<M: Membership> RegionIndex<M> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: M::Key) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn get(&self, key: M::Key) -> Option<&Arc<M::Region>> {
        self.entries.get(&key).map(|e| &e.region)
    }

    /// The bounding box that `key` is currently indexed by.
    pub fn indexed_bbox(&self, key: M::Key) -> Option<Rect> {
        self.entries.get(&key).map(|e| e.bbox)
    }

    pub fn keys(&self) -> impl Iterator<Item = M::Key> + '_ {
        self.entries.keys().copied()
    }

    /// Inserts, moves or (when `region` is `None`) removes the region at `key`, updating the membership of every affected
    /// segment. Returns the bounding box that `key` was previously indexed by.
    pub fn upsert(
        &mut self,
        segments: &mut SegmentGrid,
        key: M::Key,
        region: Option<Arc<M::Region>>,
    ) -> Option<Rect> {
        let old_box = self.indexed_bbox(key);
        let old_cells = old_box
            .map(|b| reachable_segments(segments, b))
            .unwrap_or_default();

        let region = match region {
            Some(region) => region,
            None => {
                if self.entries.remove(&key).is_some() {
                    log::debug!("Removing region {:?} from {} segments", key, old_cells.len());
                }
                for p in old_cells.into_iter() {
                    if let Some(segment) = segments.get_mut(p) {
                        M::detach(segment, key);
                    }
                }
                return old_box;
            }
        };

        let new_box = region.bbox();
        self.entries.insert(
            key,
            RegionEntry {
                region: region.clone(),
                bbox: new_box,
            },
        );
        let new_cells = reachable_segments(segments, new_box);

        let CellDiff {
            removed,
            added,
            updated,
        } = CellDiff::new(&old_cells, &new_cells);
        log::debug!(
            "Indexing region {:?}: {} removed, {} added, {} updated",
            key,
            removed.len(),
            added.len(),
            updated.len()
        );

        for p in removed.into_iter() {
            if let Some(segment) = segments.get_mut(p) {
                M::detach(segment, key);
            }
        }
        for p in added.into_iter() {
            if let Some(segment) = segments.get_mut(p) {
                if region.check_intersects(segment) {
                    log::trace!("Attaching region {:?} to segment {:?}", key, p);
                    M::attach(segment, key, &region);
                }
            }
        }
        for p in updated.into_iter() {
            if let Some(segment) = segments.get_mut(p) {
                if region.check_intersects(segment) {
                    M::attach(segment, key, &region);
                } else {
                    log::trace!("Detaching region {:?} from segment {:?}", key, p);
                    M::detach(segment, key);
                }
            }
        }

        old_box
    }

    pub fn remove(&mut self, segments: &mut SegmentGrid, key: M::Key) -> Option<Rect> {
        self.upsert(segments, key, None)
    }

    /// Attaches every registered region that reaches a freshly materialized `segment`.
    pub fn attach_to_new_segment(&self, segment: &mut Segment) {
        let index = segment.index();
        let resolution = segment.resolution() as f32;
        for (&key, entry) in self.entries.iter() {
            let reach = region_segment_range(resolution, WorldUnits(entry.bbox)).0;
            if reach.contains(index) && entry.region.check_intersects(segment) {
                M::attach(segment, key, &entry.region);
            }
        }
    }
}

/// Existing segments reachable from `bbox` after padding.
fn reachable_segments(segments: &SegmentGrid, bbox: Rect) -> SmallKeyHashSet<IVec2> {
    segments
        .indices_in_range(segments.region_range(bbox))
        .collect()
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
