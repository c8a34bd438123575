use crate::region::{Modifier, Region};
use crate::segment::Segment;

use stratum_core::geometry::{Rect, Shape};
use stratum_core::glam::Vec2;

/// Flattens the terrain inside of `shape` to a fixed height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelModifier {
    shape: Shape,
    level: f32,
}

impl LevelModifier {
    pub fn new(shape: impl Into<Shape>, level: f32) -> Self {
        Self {
            shape: shape.into(),
            level,
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn level(&self) -> f32 {
        self.level
    }
}

impl Region for LevelModifier {
    fn bbox(&self) -> Rect {
        self.shape.bbox()
    }

    fn check_intersects(&self, segment: &Segment) -> bool {
        self.shape.intersects_rect(&segment.rect())
    }
}

impl Modifier for LevelModifier {
    fn apply(&self, x: f32, z: f32, height: f32) -> f32 {
        if self.shape.contains(Vec2::new(x, z)) {
            self.level
        } else {
            height
        }
    }
}

/// Raises (or with a negative `delta`, lowers) the terrain inside of `shape`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdjustModifier {
    shape: Shape,
    delta: f32,
}

impl AdjustModifier {
    pub fn new(shape: impl Into<Shape>, delta: f32) -> Self {
        Self {
            shape: shape.into(),
            delta,
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn delta(&self) -> f32 {
        self.delta
    }
}

impl Region for AdjustModifier {
    fn bbox(&self) -> Rect {
        self.shape.bbox()
    }

    fn check_intersects(&self, segment: &Segment) -> bool {
        self.shape.intersects_rect(&segment.rect())
    }
}

impl Modifier for AdjustModifier {
    fn apply(&self, x: f32, z: f32, height: f32) -> f32 {
        if self.shape.contains(Vec2::new(x, z)) {
            height + self.delta
        } else {
            height
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
mod test {
    use super::*;

    use stratum_core::geometry::Disc;

    #[test]
    fn level_only_inside_shape() {
        let m = LevelModifier::new(Disc::new(Vec2::ZERO, 2.0), -1.0);

        assert_eq!(m.apply(1.0, 1.0, 10.0), -1.0);
        assert_eq!(m.apply(2.0, 2.0, 10.0), 10.0);
        assert_eq!(m.bbox(), Rect::from_min_and_max(Vec2::splat(-2.0), Vec2::splat(2.0)));
    }

    #[test]
    fn adjust_is_additive() {
        let m = AdjustModifier::new(Rect::from_min_and_max(Vec2::ZERO, Vec2::ONE), 0.5);

        assert_eq!(m.apply(0.5, 0.5, 2.0), 2.5);
        assert_eq!(m.apply(1.5, 0.5, 2.0), 2.0);
        assert_eq!(m.delta(), 0.5);
    }
}
