use serde::{Deserialize, Serialize};

use crate::color::{self, Rgba};
use crate::{Aabb, CoreError, Point, ELEMENT_BYTE_SIZE};

/// An ordered, fixed-size sequence of packed points.
///
/// The number of points is set at construction. Positions are read-only
/// afterwards; only the packed colors can be rewritten, through
/// [`PointCloud::recolor`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointCloud {
    points: Vec<Point>,
}

impl PointCloud {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Builds a cloud pairwise from positions and colors, packing each
    /// color with [`color::encode`]. Colors may be linear floats or 8-bit
    /// RGBA.
    pub fn initialize<C>(positions: &[[f32; 3]], colors: &[C]) -> Result<Self, CoreError>
    where
        C: Copy + Into<Rgba>,
    {
        if positions.len() != colors.len() {
            return Err(CoreError::LengthMismatch {
                positions: positions.len(),
                colors: colors.len(),
            });
        }

        let points = positions
            .iter()
            .zip(colors)
            .map(|(&position, &c)| Point::new(position, color::encode(c.into())))
            .collect();

        Ok(Self { points })
    }

    /// Wraps already packed points.
    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total size in bytes of the packed sequence.
    pub fn byte_len(&self) -> usize {
        self.points.len() * ELEMENT_BYTE_SIZE
    }

    pub fn point(&self, i: usize) -> [f32; 3] {
        self.points[i].position
    }

    pub fn color(&self, i: usize) -> u32 {
        self.points[i].color
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn iter_points(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.points.iter().map(|p| p.position)
    }

    pub fn iter_colors(&self) -> impl Iterator<Item = u32> + '_ {
        self.points.iter().map(|p| p.color)
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(self.iter_points())
    }

    /// The packed sequence as raw bytes, in device buffer layout.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.points)
    }

    /// Rewrites every color in sequence order. `f` receives the point index,
    /// its position and its current color, and returns the new color.
    pub fn recolor<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, &[f32; 3], u32) -> u32,
    {
        for (i, p) in self.points.iter_mut().enumerate() {
            p.color = f(i, &p.position, p.color);
        }
    }
}
