/// Running per-axis extents of a set of points.
#[derive(Debug, Clone, PartialEq)]
pub struct Aabb {
    pub min: [f32; 3],
    pub max: [f32; 3],
    empty: bool,
}

impl Aabb {
    pub fn empty() -> Self {
        Self {
            min: [f32::INFINITY; 3],
            max: [f32::NEG_INFINITY; 3],
            empty: true,
        }
    }

    /// Extents of a single point.
    pub fn from_point(point: [f32; 3]) -> Self {
        let mut aabb = Self::empty();
        aabb.expand_with_point(point);
        aabb
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Grows the extents to cover `point`. Points with a non-finite
    /// coordinate are ignored.
    pub fn expand_with_point(&mut self, point: [f32; 3]) {
        if !point.iter().all(|v| v.is_finite()) {
            return;
        }

        if self.empty {
            self.min = point;
            self.max = point;
            self.empty = false;
            return;
        }

        for (axis, &val) in point.iter().enumerate() {
            self.min[axis] = self.min[axis].min(val);
            self.max[axis] = self.max[axis].max(val);
        }
    }

    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = [f32; 3]>,
    {
        let mut aabb = Self::empty();
        for p in points {
            aabb.expand_with_point(p);
        }
        aabb
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

/// A box given by two caller-supplied corners.
///
/// The corners are taken literally: no component-wise reordering happens,
/// so a box whose `corner1` is not below `corner2` on some axis contains
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxRegion {
    pub corner1: [f32; 3],
    pub corner2: [f32; 3],
}

impl BoxRegion {
    pub fn new(corner1: [f32; 3], corner2: [f32; 3]) -> Self {
        Self { corner1, corner2 }
    }

    /// Strict containment: points on a face are outside.
    #[inline]
    pub fn contains(&self, p: &[f32; 3]) -> bool {
        (0..3).all(|axis| p[axis] > self.corner1[axis] && p[axis] < self.corner2[axis])
    }

    /// True when both corners coincide.
    pub fn is_degenerate(&self) -> bool {
        self.corner1 == self.corner2
    }

    /// The same box moved by `offset`.
    pub fn translated(&self, offset: [f32; 3]) -> Self {
        let shift = |c: [f32; 3]| [c[0] + offset[0], c[1] + offset[1], c[2] + offset[2]];
        Self::new(shift(self.corner1), shift(self.corner2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_points_tracks_each_axis() {
        let aabb = Aabb::from_points([[0.0, 5.0, -1.0], [3.0, -2.0, 4.0]]);
        assert_eq!(aabb.min, [0.0, -2.0, -1.0]);
        assert_eq!(aabb.max, [3.0, 5.0, 4.0]);
    }

    #[test]
    fn from_points_skips_non_finite() {
        let aabb = Aabb::from_points([[f32::NAN, 0.0, 0.0], [1.0, 1.0, 1.0]]);
        assert_eq!(aabb, Aabb::from_point([1.0, 1.0, 1.0]));
    }

    #[test]
    fn empty_until_first_finite_point() {
        let mut aabb = Aabb::empty();
        aabb.expand_with_point([f32::INFINITY, 0.0, 0.0]);
        assert!(aabb.is_empty());
        aabb.expand_with_point([1.0, 2.0, 3.0]);
        assert!(!aabb.is_empty());
    }

    #[test]
    fn region_excludes_faces() {
        let region = BoxRegion::new([0.0; 3], [1.0; 3]);
        assert!(region.contains(&[0.5, 0.5, 0.5]));
        assert!(!region.contains(&[0.0, 0.5, 0.5]));
        assert!(!region.contains(&[0.5, 1.0, 0.5]));
    }

    #[test]
    fn inverted_region_is_empty() {
        let region = BoxRegion::new([1.0; 3], [0.0; 3]);
        assert!(!region.contains(&[0.5, 0.5, 0.5]));
    }

    #[test]
    fn region_rejects_nan() {
        let region = BoxRegion::new([-1.0; 3], [1.0; 3]);
        assert!(!region.contains(&[f32::NAN, 0.0, 0.0]));
    }

    #[test]
    fn translated_moves_both_corners() {
        let region = BoxRegion::new([0.0; 3], [1.0; 3]).translated([100.0, 100.0, 0.0]);
        assert_eq!(region.corner1, [100.0, 100.0, 0.0]);
        assert_eq!(region.corner2, [101.0, 101.0, 1.0]);
    }
}
