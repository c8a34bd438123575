use crate::base_point::{BasePoint, CornerBlock};
use crate::coordinates::{segment_min, segment_rect};
use crate::region::{Area, AreaKey, Modifier, ModifierId};
use crate::shader::{ShaderId, Surface};

use float_ord::FloatOrd;
use std::collections::BTreeMap;
use std::fmt;
use std::mem;
use std::sync::Arc;
use stratum_core::geometry::Rect;
use stratum_core::glam::{IVec2, Vec2, Vec3};
use stratum_core::units::SegmentUnits;
use stratum_core::SmallKeyHashMap;

/// Distance between the samples used to estimate a surface normal by central differences.
const NORMAL_SAMPLE_DELTA: f32 = 0.5;

/// A square patch of terrain with edge length `resolution`, anchored at its grid index.
///
/// A segment keeps its own copy of the four lattice points at its corners. The height at any point inside is the bilinear
/// interpolation of the corner heights, after which every attached [`Modifier`] is applied in ascending id order.
///
/// Region membership and surfaces are maintained by the [`Terrain`](crate::Terrain); callers only get read access to them.
pub struct Segment {
    index: IVec2,
    resolution: u32,
    corners: CornerBlock,
    surfaces: BTreeMap<ShaderId, Box<dyn Surface>>,
    modifiers: BTreeMap<ModifierId, Arc<dyn Modifier>>,
    areas: SmallKeyHashMap<AreaKey, Arc<dyn Area>>,
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segment")
            .field("index", &self.index)
            .field("resolution", &self.resolution)
            .field("corners", &self.corners)
            .field("surfaces", &self.surfaces.keys().collect::<Vec<_>>())
            .field("modifiers", &self.modifiers.keys().collect::<Vec<_>>())
            .field("areas", &self.areas.len())
            .finish()
    }
}

impl Segment {
    pub(crate) fn new(index: IVec2, resolution: u32, corners: CornerBlock) -> Self {
        Self {
            index,
            resolution,
            corners,
            surfaces: BTreeMap::new(),
            modifiers: BTreeMap::new(),
            areas: SmallKeyHashMap::default(),
        }
    }

    #[inline]
    pub fn index(&self) -> IVec2 {
        self.index
    }

    #[inline]
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// World position of the corner at local `(0, 0)`.
    pub fn min(&self) -> Vec2 {
        segment_min(self.resolution as f32, SegmentUnits(self.index)).0
    }

    /// The closed world extent covered by this segment.
    pub fn rect(&self) -> Rect {
        segment_rect(self.resolution as f32, SegmentUnits(self.index)).0
    }

    pub fn corners(&self) -> &CornerBlock {
        &self.corners
    }

    pub(crate) fn set_corner(&mut self, corner: [usize; 2], point: BasePoint) {
        self.corners[corner] = point;
    }

    /// A segment can only be sampled while all of its corner heights are finite.
    pub fn is_valid(&self) -> bool {
        self.corners.iter().all(|p| p.height.is_finite())
    }

    /// The lowest and highest corner heights.
    pub fn corner_height_range(&self) -> (f32, f32) {
        let heights = || self.corners.iter().map(|p| FloatOrd(p.height));
        let FloatOrd(min) = heights().min().unwrap_or(FloatOrd(f32::NAN));
        let FloatOrd(max) = heights().max().unwrap_or(FloatOrd(f32::NAN));
        (min, max)
    }

    /// Height at the integer sample `(local_x, local_z)`, where `(0, 0)` and `(resolution, resolution)` are opposite corners.
    pub fn get(&self, local_x: i32, local_z: i32) -> f32 {
        self.height(local_x as f32, local_z as f32)
    }

    /// Height at a local position inside of the segment.
    pub fn height(&self, local_x: f32, local_z: f32) -> f32 {
        let res = self.resolution as f32;
        let base = self.corners.interpolate_height(local_x / res, local_z / res);
        let world = self.min() + Vec2::new(local_x, local_z);
        self.modifiers
            .values()
            .fold(base, |h, m| m.apply(world.x, world.y, h))
    }

    /// Height and unit surface normal (Y up) at a local position inside of the segment.
    pub fn height_and_normal(&self, local_x: f32, local_z: f32) -> (f32, Vec3) {
        let d = NORMAL_SAMPLE_DELTA;
        let dh_dx = (self.height(local_x + d, local_z) - self.height(local_x - d, local_z)) / (2.0 * d);
        let dh_dz = (self.height(local_x, local_z + d) - self.height(local_x, local_z - d)) / (2.0 * d);
        let normal = Vec3::new(-dh_dx, 1.0, -dh_dz).normalize();
        (self.height(local_x, local_z), normal)
    }

    pub fn surfaces(&self) -> &BTreeMap<ShaderId, Box<dyn Surface>> {
        &self.surfaces
    }

    pub fn surface(&self, shader: ShaderId) -> Option<&dyn Surface> {
        self.surfaces.get(&shader).map(|s| s.as_ref())
    }

    pub(crate) fn surfaces_mut(&mut self) -> &mut BTreeMap<ShaderId, Box<dyn Surface>> {
        &mut self.surfaces
    }

    /// Recomputes every surface from the current heights.
    pub fn populate_surfaces(&mut self) {
        let mut surfaces = mem::take(&mut self.surfaces);
        for surface in surfaces.values_mut() {
            surface.populate(self);
        }
        self.surfaces = surfaces;
    }

    pub fn modifiers(&self) -> impl Iterator<Item = (ModifierId, &Arc<dyn Modifier>)> {
        self.modifiers.iter().map(|(id, m)| (*id, m))
    }

    pub fn has_modifier(&self, id: ModifierId) -> bool {
        self.modifiers.contains_key(&id)
    }

    /// Attaches `modifier` under `id`, or detaches `id` when `None`. Returns `true` if anything changed.
    pub(crate) fn update_modifier(&mut self, id: ModifierId, modifier: Option<Arc<dyn Modifier>>) -> bool {
        match modifier {
            Some(m) => match self.modifiers.insert(id, m.clone()) {
                Some(old) => !Arc::ptr_eq(&old, &m),
                None => true,
            },
            None => self.modifiers.remove(&id).is_some(),
        }
    }

    pub fn areas(&self) -> impl Iterator<Item = &Arc<dyn Area>> {
        self.areas.values()
    }

    pub fn has_area<A: ?Sized>(&self, area: &Arc<A>) -> bool {
        self.areas.contains_key(&AreaKey::of(area))
    }

    /// Returns `false` if the area was already attached.
    pub(crate) fn add_area(&mut self, area: Arc<dyn Area>) -> bool {
        self.areas.insert(AreaKey::of(&area), area).is_none()
    }

    /// Returns `false` if the area was not attached.
    pub(crate) fn remove_area(&mut self, key: AreaKey) -> bool {
        self.areas.remove(&key).is_some()
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
