use std::time::Duration;

use pcx_core::BoxRegion;
use pcx_gpu::GpuDevice;
use pcx_segmentation::BoxSegmentation;

use crate::{HostError, PointCloudRenderer};

/// Scheduled task that slides the segmentation box at a fixed interval.
///
/// The host feeds it frame times; every elapsed `period` moves both corners
/// by `offset` and delivers the new box to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxAnimator {
    period: Duration,
    offset: [f32; 3],
    elapsed: Duration,
}

impl Default for BoxAnimator {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), [100.0, 100.0, 0.0])
    }
}

impl BoxAnimator {
    /// # Panics
    ///
    /// Panics if `period` is zero.
    pub fn new(period: Duration, offset: [f32; 3]) -> Self {
        assert!(!period.is_zero(), "animation period must be positive");
        Self {
            period,
            offset,
            elapsed: Duration::ZERO,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn offset(&self) -> [f32; 3] {
        self.offset
    }

    /// Advances the clock by `dt`. Returns `region` shifted once per
    /// completed period, or `None` if no period completed.
    pub fn tick(&mut self, dt: Duration, region: &BoxRegion) -> Option<BoxRegion> {
        self.elapsed = self.elapsed.saturating_add(dt);

        let period = self.period.as_nanos();
        let steps = self.elapsed.as_nanos() / period;
        if steps == 0 {
            return None;
        }

        // The remainder is below `period`, which itself fits a Duration.
        self.elapsed = Duration::from_nanos((self.elapsed.as_nanos() % period) as u64);

        let n = steps as f32;
        Some(region.translated([
            self.offset[0] * n,
            self.offset[1] * n,
            self.offset[2] * n,
        ]))
    }

    /// Ticks against the renderer's current box and, when it moves, sends
    /// the box changed event.
    pub fn drive<D: GpuDevice>(
        &mut self,
        renderer: &mut PointCloudRenderer<D>,
        dt: Duration,
    ) -> Result<Option<BoxSegmentation>, HostError> {
        let current = renderer.settings().region();
        let Some(next) = self.tick(dt, &current) else {
            return Ok(None);
        };

        log::debug!("moving segmentation box to {:?}..{:?}", next.corner1, next.corner2);
        Ok(renderer.set_region(next)?.cloned())
    }
}
