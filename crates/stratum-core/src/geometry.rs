use crate::glam::Vec2;

/// A closed, axis-aligned box in the horizontal plane. `min.x`/`max.x` span the world X axis and `min.y`/`max.y` span the
/// world Z axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    #[inline]
    pub fn from_min_and_max(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn from_min_and_shape(min: Vec2, shape: Vec2) -> Self {
        Self {
            min,
            max: min + shape,
        }
    }

    pub fn shape(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Empty when the box is inverted on either axis. A degenerate box (zero width) is not empty; it still touches its edge.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Grows the box by `amount` on every side.
    pub fn padded(&self, amount: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(amount),
            max: self.max + Vec2::splat(amount),
        }
    }

    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Boxes that only share an edge or a corner intersect.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }

    /// The closest point to `p` inside of the box.
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        p.max(self.min).min(self.max)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Disc {
    pub center: Vec2,
    pub radius: f32,
}

impl Disc {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        self.center.distance_squared(p) <= self.radius * self.radius
    }

    pub fn intersects_rect(&self, rect: &Rect) -> bool {
        self.contains(rect.clamp(self.center))
    }

    pub fn aabb(&self) -> Rect {
        Rect::from_min_and_shape(Vec2::splat(-self.radius), Vec2::splat(2.0 * self.radius))
            .translated(self.center)
    }
}

/// The footprint of a region in the horizontal plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Rect(Rect),
    Disc(Disc),
}

impl Shape {
    pub fn bbox(&self) -> Rect {
        match self {
            Shape::Rect(r) => *r,
            Shape::Disc(d) => d.aabb(),
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        match self {
            Shape::Rect(r) => r.contains(p),
            Shape::Disc(d) => d.contains(p),
        }
    }

    pub fn intersects_rect(&self, rect: &Rect) -> bool {
        match self {
            Shape::Rect(r) => r.intersects(rect),
            Shape::Disc(d) => d.intersects_rect(rect),
        }
    }

    pub fn translated(&self, offset: Vec2) -> Self {
        match self {
            Shape::Rect(r) => Shape::Rect(r.translated(offset)),
            Shape::Disc(d) => Shape::Disc(Disc::new(d.center + offset, d.radius)),
        }
    }
}

impl From<Rect> for Shape {
    fn from(r: Rect) -> Self {
        Shape::Rect(r)
    }
}

impl From<Disc> for Shape {
    fn from(d: Disc) -> Self {
        Shape::Disc(d)
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
