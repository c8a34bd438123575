use crate::segment::Segment;
use crate::segment_grid::SegmentGrid;

use std::sync::Arc;
use stratum_core::SmallKeyHashMap;

/// Identifies a [`Shader`] in a [`ShaderRegistry`]. An [`Area`](crate::Area)'s layer refers to one of these.
pub type ShaderId = i32;

/// Generates one [`Surface`] per segment.
pub trait Shader: Send + Sync {
    /// Whether this shader has anything to contribute to `segment`. Only consulted when a segment is first materialized.
    fn check_intersect(&self, segment: &Segment) -> bool;

    fn new_surface(&self, segment: &Segment) -> Box<dyn Surface>;
}

/// A per-segment artifact produced by a [`Shader`], e.g. a texture blending mask.
pub trait Surface: Send + Sync {
    /// Recompute the artifact from the segment's current heights.
    fn populate(&mut self, segment: &Segment);

    fn is_populated(&self) -> bool;

    /// Row-major (Z then X) alpha values, one per integer sample of the segment. Empty for surfaces that don't blend.
    fn coverage(&self) -> &[u8] {
        &[]
    }
}

/// The set of shaders applied to a terrain.
#[derive(Default)]
pub struct ShaderRegistry {
    shaders: SmallKeyHashMap<ShaderId, Arc<dyn Shader>>,
}

impl ShaderRegistry {
    pub fn get(&self, id: ShaderId) -> Option<&Arc<dyn Shader>> {
        self.shaders.get(&id)
    }

    pub fn contains(&self, id: ShaderId) -> bool {
        self.shaders.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.shaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shaders.is_empty()
    }

    /// Registers `shader` under `id` and gives every existing segment a fresh surface from it.
    ///
    /// Unlike [`attach_initial`](Self::attach_initial), this does not consult [`Shader::check_intersect`]; every segment gets a
    /// surface. Registering an `id` that is already in use replaces the old shader and its surfaces, and the old shader is
    /// returned.
    pub fn add(
        &mut self,
        id: ShaderId,
        shader: Arc<dyn Shader>,
        segments: &mut SegmentGrid,
    ) -> Option<Arc<dyn Shader>> {
        let old = self.shaders.insert(id, shader.clone());
        if old.is_some() {
            log::warn!("Duplicate use of shader ID {}", id);
        }

        for segment in segments.iter_mut() {
            let surface = shader.new_surface(segment);
            segment.surfaces_mut().insert(id, surface);
        }
        log::debug!("Added shader {} to {} segments", id, segments.len());

        old
    }

    /// Unregisters the shader at `id` and drops its surface from every segment.
    pub fn remove(&mut self, id: ShaderId, segments: &mut SegmentGrid) -> Option<Arc<dyn Shader>> {
        let old = self.shaders.remove(&id);

        let mut dropped = 0;
        for segment in segments.iter_mut() {
            if segment.surfaces_mut().remove(&id).is_some() {
                dropped += 1;
            }
        }
        log::debug!("Removed shader {}, dropping {} surfaces", id, dropped);

        old
    }

    /// Gives a newly materialized `segment` a surface from each shader that intersects it.
    pub fn attach_initial(&self, segment: &mut Segment) {
        if !segment.surfaces().is_empty() {
            log::warn!(
                "Adding surfaces to terrain segment {:?} which already has surfaces",
                segment.index()
            );
            segment.surfaces_mut().clear();
        }

        for (&id, shader) in self.shaders.iter() {
            // Shader doesn't touch this segment.
            if !shader.check_intersect(segment) {
                continue;
            }
            let surface = shader.new_surface(segment);
            segment.surfaces_mut().insert(id, surface);
        }
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::base_point::{BasePoint, CornerBlock};

    use std::sync::atomic::{AtomicUsize, Ordering};
    use stratum_core::glam::IVec2;

    /// A shader that only intersects segments in column `column` and counts how many surfaces it creates.
    #[derive(Default)]
    pub struct ColumnShader {
        pub column: Option<i32>,
        pub surfaces_created: AtomicUsize,
    }

    impl ColumnShader {
        pub fn only(column: i32) -> Self {
            Self {
                column: Some(column),
                ..Default::default()
            }
        }

        pub fn created(&self) -> usize {
            self.surfaces_created.load(Ordering::SeqCst)
        }
    }

    impl Shader for ColumnShader {
        fn check_intersect(&self, segment: &Segment) -> bool {
            self.column.map_or(true, |c| segment.index().x == c)
        }

        fn new_surface(&self, _segment: &Segment) -> Box<dyn Surface> {
            self.surfaces_created.fetch_add(1, Ordering::SeqCst);
            Box::new(CountingSurface::default())
        }
    }

    #[derive(Default)]
    pub struct CountingSurface {
        pub populations: usize,
    }

    impl Surface for CountingSurface {
        fn populate(&mut self, _segment: &Segment) {
            self.populations += 1;
        }

        fn is_populated(&self) -> bool {
            self.populations > 0
        }
    }

    fn grid_with_columns(columns: i32) -> SegmentGrid {
        let mut grid = SegmentGrid::new(4);
        for x in 0..columns {
            grid.materialize(IVec2::new(x, 0), CornerBlock::splat(BasePoint::default()));
        }
        grid
    }

    #[test]
    fn add_covers_every_segment_without_filtering() {
        let mut grid = grid_with_columns(3);
        let mut registry = ShaderRegistry::default();
        let shader = Arc::new(ColumnShader::only(1));

        assert!(registry.add(7, shader.clone(), &mut grid).is_none());

        assert_eq!(shader.created(), 3);
        for segment in grid.iter() {
            assert!(segment.surface(7).is_some());
        }
    }

    #[test]
    fn duplicate_id_replaces_shader() {
        let mut grid = grid_with_columns(2);
        let mut registry = ShaderRegistry::default();
        let first = Arc::new(ColumnShader::default());
        let second = Arc::new(ColumnShader::default());

        registry.add(1, first.clone(), &mut grid);
        let replaced = registry.add(1, second.clone(), &mut grid).unwrap();

        let first_dyn: Arc<dyn Shader> = first;
        assert!(Arc::ptr_eq(&replaced, &first_dyn));
        assert_eq!(second.created(), 2);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_drops_surfaces_and_tolerates_absence() {
        let mut grid = grid_with_columns(2);
        let mut registry = ShaderRegistry::default();
        registry.add(3, Arc::new(ColumnShader::default()), &mut grid);
        registry.add(4, Arc::new(ColumnShader::default()), &mut grid);

        assert!(registry.remove(3, &mut grid).is_some());
        assert!(registry.remove(3, &mut grid).is_none());
        assert!(registry.remove(99, &mut grid).is_none());

        for segment in grid.iter() {
            assert!(segment.surface(3).is_none());
            assert!(segment.surface(4).is_some());
        }
        assert!(!registry.contains(3));
    }

    #[test]
    fn attach_initial_filters_and_regenerates() {
        let mut grid = grid_with_columns(0);
        let mut registry = ShaderRegistry::default();
        let column_one = Arc::new(ColumnShader::only(1));
        let everywhere = Arc::new(ColumnShader::default());
        registry.add(1, column_one.clone(), &mut grid);
        registry.add(2, everywhere.clone(), &mut grid);

        let segment = grid.materialize(IVec2::new(0, 0), CornerBlock::splat(BasePoint::default()));
        registry.attach_initial(segment);
        assert!(segment.surface(1).is_none());
        assert!(segment.surface(2).is_some());

        // Attaching again regenerates instead of stacking.
        registry.attach_initial(segment);
        assert_eq!(segment.surfaces().len(), 1);
        assert_eq!(everywhere.created(), 2);
        assert_eq!(column_one.created(), 0);
    }
}
