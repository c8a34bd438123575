use crate::segment::Segment;
use crate::shader::{Shader, Surface};

/// Alpha written for samples inside of a shader's height band.
pub const FULL_COVERAGE: u8 = u8::MAX;

/// A blending mask with one alpha value per integer sample of a segment, i.e. `(resolution + 1)²` values.
///
/// Samples whose height lies in the closed band `[low, high]` are fully covered; all others are transparent.
#[derive(Clone, Debug)]
pub struct CoverageSurface {
    low: f32,
    high: f32,
    edge_samples: usize,
    alpha: Vec<u8>,
}

impl CoverageSurface {
    pub fn new(resolution: u32, low: f32, high: f32) -> Self {
        Self {
            low,
            high,
            edge_samples: resolution as usize + 1,
            alpha: Vec::new(),
        }
    }

    /// Number of samples along one edge of the mask.
    pub fn edge_samples(&self) -> usize {
        self.edge_samples
    }

    /// The alpha at local sample `(x, z)`, or `None` if the mask is unpopulated or the sample is out of bounds.
    pub fn alpha(&self, x: usize, z: usize) -> Option<u8> {
        if x >= self.edge_samples || z >= self.edge_samples {
            return None;
        }
        self.alpha.get(z * self.edge_samples + x).copied()
    }

    fn covers(&self, height: f32) -> bool {
        self.low <= height && height <= self.high
    }
}

impl Surface for CoverageSurface {
    fn populate(&mut self, segment: &Segment) {
        let n = self.edge_samples;
        let mut alpha = Vec::with_capacity(n * n);
        for z in 0..n {
            for x in 0..n {
                let covered = self.covers(segment.get(x as i32, z as i32));
                alpha.push(if covered { FULL_COVERAGE } else { 0 });
            }
        }
        self.alpha = alpha;
    }

    fn is_populated(&self) -> bool {
        !self.alpha.is_empty()
    }

    fn coverage(&self) -> &[u8] {
        &self.alpha
    }
}

/// Covers every segment completely.
#[derive(Clone, Copy, Debug, Default)]
pub struct FillShader;

impl Shader for FillShader {
    fn check_intersect(&self, _segment: &Segment) -> bool {
        true
    }

    fn new_surface(&self, segment: &Segment) -> Box<dyn Surface> {
        Box::new(CoverageSurface::new(
            segment.resolution(),
            f32::NEG_INFINITY,
            f32::INFINITY,
        ))
    }
}

/// Covers the parts of the terrain whose height is between `low` and `high`, e.g. snow above a tree line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightBandShader {
    pub low: f32,
    pub high: f32,
}

impl HeightBandShader {
    pub fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }

    pub fn above(low: f32) -> Self {
        Self::new(low, f32::INFINITY)
    }

    pub fn below(high: f32) -> Self {
        Self::new(f32::NEG_INFINITY, high)
    }
}

impl Shader for HeightBandShader {
    /// Judged from the corner heights only, so a modifier that pushes the interior into the band is not seen.
    fn check_intersect(&self, segment: &Segment) -> bool {
        let (min, max) = segment.corner_height_range();
        min <= self.high && self.low <= max
    }

    fn new_surface(&self, segment: &Segment) -> Box<dyn Surface> {
        Box::new(CoverageSurface::new(segment.resolution(), self.low, self.high))
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
    use crate::base_point::{BasePoint, CornerBlock};

    use stratum_core::glam::IVec2;

    /// Height rises from 0 to 4 along X.
    fn ramp() -> Segment {
        let mut corners = CornerBlock::splat(BasePoint::with_height(0.0));
        corners[[1, 0]].height = 4.0;
        corners[[1, 1]].height = 4.0;
        Segment::new(IVec2::ZERO, 4, corners)
    }

    #[test]
    fn band_mask_follows_heights() {
        let segment = ramp();
        let mut surface = HeightBandShader::new(1.0, 2.5).new_surface(&segment);
        assert!(!surface.is_populated());
        assert!(surface.coverage().is_empty());

        surface.populate(&segment);

        assert!(surface.is_populated());
        assert_eq!(surface.coverage().len(), 25);
        for row in surface.coverage().chunks(5) {
            assert_eq!(row, &[0, FULL_COVERAGE, FULL_COVERAGE, 0, 0]);
        }
    }

    #[test]
    fn fill_covers_everything() {
        let segment = ramp();
        let mut surface = CoverageSurface::new(4, f32::NEG_INFINITY, f32::INFINITY);
        assert_eq!(surface.alpha(0, 0), None);

        surface.populate(&segment);

        assert!(surface.coverage().iter().all(|&a| a == FULL_COVERAGE));
        assert_eq!(surface.alpha(4, 4), Some(FULL_COVERAGE));
        assert_eq!(surface.alpha(5, 0), None);
        assert!(FillShader.check_intersect(&segment));
    }

    #[test]
    fn band_intersection_uses_corner_range() {
        let segment = ramp();

        assert!(HeightBandShader::new(3.0, 10.0).check_intersect(&segment));
        assert!(HeightBandShader::above(4.0).check_intersect(&segment));
        assert!(!HeightBandShader::above(4.5).check_intersect(&segment));
        assert!(!HeightBandShader::below(-0.5).check_intersect(&segment));
    }
}
