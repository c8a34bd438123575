use crate::base_point::{BasePoint, BasePointGrid};
use crate::coordinates::{in_segment, slots_sharing_lattice_point};
use crate::region::{Area, AreaKey, AreaMembership, Modifier, ModifierId, ModifierMembership, RegionIndex};
use crate::segment::Segment;
use crate::segment_grid::SegmentGrid;
use crate::shader::{Shader, ShaderId, ShaderRegistry};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::ops::BitOr;
use std::sync::Arc;
use stratum_core::geometry::Rect;
use stratum_core::glam::{IVec2, Vec2, Vec3};
use stratum_core::units::WorldUnits;

/// The height reported by [`Terrain::get`] wherever there is no valid segment.
pub const DEFAULT_LEVEL: f32 = 8.0;

/// Bit flags that select optional terrain behavior.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TerrainOptions(pub u32);

impl TerrainOptions {
    pub const DEFAULT: Self = Self(0);
    /// Give newly materialized segments surfaces from every intersecting shader.
    pub const SHADED: Self = Self(1);

    pub fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for TerrainOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A heightfield built from a sparse lattice of [`BasePoint`]s.
///
/// # Segments
///
/// The lattice spacing is `resolution` world units. Every cell of the lattice whose four corner points have been set holds a
/// [`Segment`]. Segments are created on demand by [`set_base_point`](Self::set_base_point) and live as long as the terrain.
///
/// # Regions
///
/// [`Modifier`]s and [`Area`]s are shared handles registered with the terrain. Each segment records which of them affect it,
/// and the terrain keeps those records current as regions are added, moved and removed. Moving a region only revisits the
/// segments near its old and new bounding boxes.
///
/// # Shaders
///
/// [`Shader`]s produce one surface per segment. Surfaces are created, but not populated, by the terrain; call
/// [`shade_segment`](Self::shade_segment) once a segment's heights are final.
pub struct Terrain {
    options: TerrainOptions,
    base_points: BasePointGrid,
    segments: SegmentGrid,
    shaders: ShaderRegistry,
    modifiers: RegionIndex<ModifierMembership>,
    areas: RegionIndex<AreaMembership>,
}

impl Terrain {
    pub fn new(options: TerrainOptions, resolution: u32) -> Self {
        Self {
            options,
            base_points: BasePointGrid::default(),
            segments: SegmentGrid::new(resolution),
            shaders: ShaderRegistry::default(),
            modifiers: RegionIndex::default(),
            areas: RegionIndex::default(),
        }
    }

    #[inline]
    pub fn resolution(&self) -> u32 {
        self.segments.resolution()
    }

    pub fn options(&self) -> TerrainOptions {
        self.options
    }

    pub fn is_shaded(&self) -> bool {
        self.options.contains(TerrainOptions::SHADED)
    }

    fn valid_segment_at(&self, x: f32, z: f32) -> Option<&Segment> {
        self.segments.segment_at(Vec2::new(x, z)).filter(|s| s.is_valid())
    }

    /// The height at the integer sample nearest to `(x, z)`, or [`DEFAULT_LEVEL`] if no valid segment covers it.
    pub fn get(&self, x: f32, z: f32) -> f32 {
        match self.valid_segment_at(x, z) {
            Some(segment) => {
                let local = Vec2::new(x, z).round() - segment.min();
                segment.get(local.x as i32, local.y as i32)
            }
            None => DEFAULT_LEVEL,
        }
    }

    /// The interpolated height at `(x, z)`, or `None` if no valid segment covers it.
    pub fn height(&self, x: f32, z: f32) -> Option<f32> {
        let segment = self.valid_segment_at(x, z)?;
        let local = Vec2::new(x, z) - segment.min();
        Some(segment.height(local.x, local.y))
    }

    pub fn height_and_normal(&self, x: f32, z: f32) -> Option<(f32, Vec3)> {
        let segment = self.valid_segment_at(x, z)?;
        let local = Vec2::new(x, z) - segment.min();
        Some(segment.height_and_normal(local.x, local.y))
    }

    pub fn base_point(&self, x: i32, z: i32) -> Option<BasePoint> {
        self.base_points.get(IVec2::new(x, z))
    }

    /// Sets the lattice point at `(x, z)` and propagates it to the (up to four) segments sharing it.
    ///
    /// Existing segments only have the matching corner overwritten. A slot without a segment is materialized as soon as all four
    /// of its corners exist, then picks up the regions and (when shaded) shader surfaces that reach it. Returns the indices of
    /// the segments created by this call.
    pub fn set_base_point(&mut self, x: i32, z: i32, point: BasePoint) -> SmallVec<[IVec2; 4]> {
        let p = IVec2::new(x, z);
        self.base_points.set(p, point);

        let mut created = SmallVec::new();
        for (slot, corner) in slots_sharing_lattice_point(p) {
            if self.segments.update_corner(slot, corner, point) {
                continue;
            }
            let corners = match self.base_points.corners(slot) {
                Some(corners) => corners,
                None => continue,
            };

            let segment = self.segments.materialize(slot, corners);
            self.modifiers.attach_to_new_segment(segment);
            self.areas.attach_to_new_segment(segment);
            if self.options.contains(TerrainOptions::SHADED) {
                self.shaders.attach_initial(segment);
            }
            created.push(slot);
        }

        created
    }

    pub fn segment(&self, index: IVec2) -> Option<&Segment> {
        self.segments.get(index)
    }

    /// The index of the segment slot containing world position `(x, z)`, whether or not it is materialized.
    pub fn segment_index(&self, x: f32, z: f32) -> IVec2 {
        in_segment(self.resolution() as f32, WorldUnits(Vec2::new(x, z))).0
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    /// Populates every surface of the segment at `index` from its current heights. Returns `false` if there is no such
    /// segment.
    pub fn shade_segment(&mut self, index: IVec2) -> bool {
        match self.segments.get_mut(index) {
            Some(segment) => {
                segment.populate_surfaces();
                true
            }
            None => false,
        }
    }

    /// Registers `shader` under `id`, replacing any shader already there, and gives every existing segment a surface from it.
    pub fn add_shader(&mut self, shader: Arc<dyn Shader>, id: ShaderId) -> Option<Arc<dyn Shader>> {
        self.shaders.add(id, shader, &mut self.segments)
    }

    pub fn remove_shader(&mut self, id: ShaderId) -> Option<Arc<dyn Shader>> {
        self.shaders.remove(id, &mut self.segments)
    }

    pub fn shader(&self, id: ShaderId) -> Option<&Arc<dyn Shader>> {
        self.shaders.get(id)
    }

    /// Inserts, moves or (with `None`) removes the modifier at `id`. Returns the bounding box `id` was previously indexed by.
    pub fn update_modifier(&mut self, id: ModifierId, modifier: Option<Arc<dyn Modifier>>) -> Option<Rect> {
        self.modifiers.upsert(&mut self.segments, id, modifier)
    }

    pub fn has_modifier(&self, id: ModifierId) -> bool {
        self.modifiers.contains(id)
    }

    pub fn modifier(&self, id: ModifierId) -> Option<&Arc<dyn Modifier>> {
        self.modifiers.get(id)
    }

    /// Registers `area`, first binding the shader registered for its layer (if any). Adding an area that is already
    /// registered behaves like [`update_area`](Self::update_area).
    pub fn add_area(&mut self, area: Arc<dyn Area>) -> Option<Rect> {
        if let Some(shader) = self.shaders.get(area.layer()) {
            area.set_shader(shader.clone());
        }
        self.areas.upsert(&mut self.segments, AreaKey::of(&area), Some(area))
    }

    /// Re-indexes `area` after its footprint changed, registering it if it is new. Unlike [`add_area`](Self::add_area), no
    /// shader is bound. Returns the bounding box it was previously indexed by.
    pub fn update_area(&mut self, area: Arc<dyn Area>) -> Option<Rect> {
        self.areas.upsert(&mut self.segments, AreaKey::of(&area), Some(area))
    }

    pub fn remove_area<A: ?Sized>(&mut self, area: &Arc<A>) -> Option<Rect> {
        self.areas.remove(&mut self.segments, AreaKey::of(area))
    }

    pub fn has_area<A: ?Sized>(&self, area: &Arc<A>) -> bool {
        self.areas.contains(AreaKey::of(area))
    }

    /// Calls `visitor` on every segment overlapping `rect`.
    pub fn process_segments(&self, rect: Rect, visitor: impl FnMut(&Segment, IVec2)) {
        self.segments.visit_rect(rect, visitor)
    }

    pub fn process_segments_mut(&mut self, rect: Rect, visitor: impl FnMut(&mut Segment, IVec2)) {
        self.segments.visit_rect_mut(rect, visitor)
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
