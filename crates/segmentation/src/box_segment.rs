use pcx_core::color::{self, Rgba};
use pcx_core::{Aabb, BoxRegion, PointCloud};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SegmentationError {
    #[error("cannot segment an empty point cloud")]
    EmptyCloud,
}

/// Colors written by a segmentation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// Every point is reset to this before the membership test.
    pub baseline: Rgba,
    /// Points inside the box end up with this color.
    pub highlight: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            baseline: color::BASELINE,
            highlight: color::HIGHLIGHT,
        }
    }
}

/// Outcome of one segmentation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSegmentation {
    /// Number of points found strictly inside the box.
    pub members: usize,
    /// Per-axis extents of every finite point in the cloud.
    pub extents: Aabb,
}

/// Recolors `cloud` by containment in `region` using the default
/// white/magenta palette.
///
/// See [`segment_by_box_with`].
pub fn segment_by_box(
    cloud: &mut PointCloud,
    region: &BoxRegion,
) -> Result<BoxSegmentation, SegmentationError> {
    segment_by_box_with(cloud, region, &Palette::default())
}

/// Recolors `cloud` by containment in `region`.
///
/// # Algorithm
///
/// 1. Seed the extents from the first point.
/// 2. For every point in order:
///    - reset its color to `palette.baseline`,
///    - grow the extents on each axis by that axis' own coordinate,
///    - if the point lies strictly inside `region`, recolor it to
///      `palette.highlight` and count it.
///
/// Positions and point count never change. Because every point starts from
/// the baseline, running the same box twice gives the same colors.
pub fn segment_by_box_with(
    cloud: &mut PointCloud,
    region: &BoxRegion,
    palette: &Palette,
) -> Result<BoxSegmentation, SegmentationError> {
    if cloud.is_empty() {
        return Err(SegmentationError::EmptyCloud);
    }

    let baseline = color::encode(palette.baseline);
    let highlight = color::encode(palette.highlight);

    let mut extents = Aabb::from_point(cloud.point(0));
    let mut members = 0;

    cloud.recolor(|_, position, _| {
        extents.expand_with_point(*position);

        if region.contains(position) {
            members += 1;
            highlight
        } else {
            baseline
        }
    });

    log::debug!(
        "segmented {} points, {} inside {:?}..{:?}",
        cloud.len(),
        members,
        region.corner1,
        region.corner2
    );

    Ok(BoxSegmentation { members, extents })
}
