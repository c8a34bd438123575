use crate::region::{Area, Region};
use crate::segment::Segment;
use crate::shader::{Shader, ShaderId};

use parking_lot::RwLock;
use std::sync::Arc;
use stratum_core::geometry::{Rect, Shape};

/// An [`Area`] with a movable [`Shape`] footprint.
///
/// Moving the area with [`set_shape`](Self::set_shape) does not update any terrain. Call
/// [`Terrain::update_area`](crate::Terrain::update_area) afterwards.
pub struct ShapedArea {
    shape: RwLock<Shape>,
    layer: ShaderId,
    shader: RwLock<Option<Arc<dyn Shader>>>,
}

impl ShapedArea {
    pub fn new(shape: impl Into<Shape>, layer: ShaderId) -> Self {
        Self {
            shape: RwLock::new(shape.into()),
            layer,
            shader: RwLock::new(None),
        }
    }

    pub fn shape(&self) -> Shape {
        *self.shape.read()
    }

    pub fn set_shape(&self, shape: impl Into<Shape>) {
        *self.shape.write() = shape.into();
    }

    /// The shader bound when this area was added to a terrain that had a shader for its layer.
    pub fn shader(&self) -> Option<Arc<dyn Shader>> {
        self.shader.read().clone()
    }
}

impl Region for ShapedArea {
    fn bbox(&self) -> Rect {
        self.shape.read().bbox()
    }

    fn check_intersects(&self, segment: &Segment) -> bool {
        self.shape.read().intersects_rect(&segment.rect())
    }
}

impl Area for ShapedArea {
    fn layer(&self) -> ShaderId {
        self.layer
    }

    fn set_shader(&self, shader: Arc<dyn Shader>) {
        *self.shader.write() = Some(shader);
    }
}
