use nalgebra::Matrix4;
use pcx_core::BoxRegion;
use pcx_gpu::{BufferHandle, GpuDevice, GpuPointCloud};
use pcx_segmentation::BoxSegmentation;

use crate::{HostError, RendererSettings};

/// Primitive used to draw each point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawStyle {
    /// One raw point primitive per element.
    Points,
    /// Each point expanded into a disk of the given size.
    Disks { size: f32 },
}

/// Everything a host renderer needs to issue one procedural point draw.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub style: DrawStyle,
    pub buffer: BufferHandle,
    /// Number of elements to draw, taken from the buffer.
    pub count: usize,
    pub tint: [f32; 4],
    pub transform: Matrix4<f32>,
}

/// Receives draw calls, e.g. a wrapper around a render pass.
pub trait DrawSink {
    fn draw(&mut self, call: &DrawCall);
}

impl DrawSink for Vec<DrawCall> {
    fn draw(&mut self, call: &DrawCall) {
        self.push(call.clone());
    }
}

/// Scene-object glue around a [`GpuPointCloud`].
///
/// The host calls the lifecycle hooks; this type decides when to segment
/// and which buffer a draw should use.
pub struct PointCloudRenderer<D: GpuDevice> {
    source: Option<GpuPointCloud<D>>,
    external_buffer: Option<BufferHandle>,
    settings: RendererSettings,
    transform: Matrix4<f32>,
    new_segment: bool,
    last_segmentation: Option<BoxSegmentation>,
}

impl<D: GpuDevice> PointCloudRenderer<D> {
    pub fn new(settings: RendererSettings) -> Self {
        let mut settings = settings;
        settings.validate();
        Self {
            source: None,
            external_buffer: None,
            settings,
            transform: Matrix4::identity(),
            new_segment: false,
            last_segmentation: None,
        }
    }

    pub fn with_source(mut self, source: GpuPointCloud<D>) -> Self {
        self.set_source(Some(source));
        self
    }

    /// Replaces the point source. The previous one is returned; dropping it
    /// frees its buffer.
    pub fn set_source(&mut self, source: Option<GpuPointCloud<D>>) -> Option<GpuPointCloud<D>> {
        self.new_segment = false;
        self.last_segmentation = None;
        std::mem::replace(&mut self.source, source)
    }

    pub fn source(&self) -> Option<&GpuPointCloud<D>> {
        self.source.as_ref()
    }

    /// A buffer supplied by someone else, drawn instead of the source's own
    /// buffer unless a fresh segmentation is pending.
    pub fn set_external_buffer(&mut self, buffer: Option<BufferHandle>) {
        self.external_buffer = buffer;
    }

    pub fn settings(&self) -> &RendererSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut RendererSettings {
        &mut self.settings
    }

    pub fn set_transform(&mut self, transform: Matrix4<f32>) {
        self.transform = transform;
    }

    /// Result of the most recent segmentation pass.
    pub fn last_segmentation(&self) -> Option<&BoxSegmentation> {
        self.last_segmentation.as_ref()
    }

    /// True when the next draw will re-upload the source's colors.
    pub fn has_pending_segment(&self) -> bool {
        self.new_segment
    }

    /// Enable hook. The buffer stays lazy, so there is nothing to do.
    pub fn on_enable(&mut self) {}

    /// Settings changed hook: clamps the point size and re-segments when the
    /// box is non-degenerate.
    pub fn on_validate(&mut self) -> Result<Option<&BoxSegmentation>, HostError> {
        self.settings.validate();

        let region = self.settings.region();
        if region.is_degenerate() {
            return Ok(None);
        }

        let Some(source) = self.source.as_mut() else {
            return Ok(None);
        };

        let result = source.segment_by_box(&region)?;
        log::info!(
            "segmented point cloud: {} of {} points inside box",
            result.members,
            source.len()
        );

        self.new_segment = true;
        let result: &BoxSegmentation = self.last_segmentation.insert(result);
        Ok(Some(result))
    }

    /// Box changed event: stores the new corners and re-segments.
    pub fn set_region(&mut self, region: BoxRegion) -> Result<Option<&BoxSegmentation>, HostError> {
        self.settings.set_region(region);
        self.on_validate()
    }

    /// Describes the draw for this frame, or `None` when there is nothing to
    /// draw.
    ///
    /// After a segmentation the source buffer is re-uploaded first. Otherwise
    /// an external buffer takes precedence over the source's own.
    pub fn draw_call(&mut self) -> Result<Option<DrawCall>, HostError> {
        let buffer = match (self.source.as_ref(), self.external_buffer) {
            (Some(source), _) if self.new_segment => source.recompute_buffer()?,
            (_, Some(external)) => external,
            (Some(source), None) => source.acquire_buffer()?,
            (None, None) => {
                log::warn!("draw requested with neither point source nor external buffer");
                return Ok(None);
            }
        };
        self.new_segment = false;

        let style = if self.settings.point_size == 0.0 {
            DrawStyle::Points
        } else {
            DrawStyle::Disks {
                size: self.settings.point_size,
            }
        };

        Ok(Some(DrawCall {
            style,
            buffer,
            count: buffer.count,
            tint: self.settings.tint,
            transform: self.transform,
        }))
    }

    /// Builds this frame's draw call and hands it to `sink`.
    pub fn render(&mut self, sink: &mut impl DrawSink) -> Result<bool, HostError> {
        match self.draw_call()? {
            Some(call) => {
                sink.draw(&call);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Disable hook: frees the source's device buffer.
    pub fn on_disable(&mut self) {
        if let Some(source) = self.source.as_ref() {
            source.release();
        }
    }

    /// Destroy hook: frees the source's device buffer.
    pub fn on_destroy(&mut self) {
        self.on_disable();
    }
}
