use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pcx_core::color::Rgba;
use pcx_core::{BoxRegion, CoreError, PointCloud, ELEMENT_BYTE_SIZE};
use pcx_segmentation::{segment_by_box_with, BoxSegmentation, Palette, SegmentationError};
use thiserror::Error;

use crate::device::{BufferHandle, DeviceError, GpuDevice};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error(transparent)]
    Segmentation(#[from] SegmentationError),
    #[error(transparent)]
    Device(#[from] DeviceError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Contents {
    /// Allocated but never written.
    Uninitialized,
    /// Byte-identical to the point sequence.
    Current,
    /// Colors changed in memory since the last upload.
    Stale,
}

#[derive(Debug)]
struct Mirror {
    handle: BufferHandle,
    contents: Contents,
}

/// A point cloud together with its lazily created device-side mirror.
///
/// The mirror is allocated on first use, kept until [`release`] or drop, and
/// never resized. Buffer access goes through a lock, so renderers sharing a
/// `&GpuPointCloud` observe a single allocation.
///
/// [`release`]: GpuPointCloud::release
pub struct GpuPointCloud<D: GpuDevice> {
    cloud: PointCloud,
    device: Arc<D>,
    mirror: Mutex<Option<Mirror>>,
    palette: Palette,
}

impl<D: GpuDevice> GpuPointCloud<D> {
    pub fn new(cloud: PointCloud, device: Arc<D>) -> Self {
        Self {
            cloud,
            device,
            mirror: Mutex::new(None),
            palette: Palette::default(),
        }
    }

    /// Builds the point cloud from parallel position and color lists. No
    /// device memory is touched.
    pub fn initialize<C>(
        device: Arc<D>,
        positions: &[[f32; 3]],
        colors: &[C],
    ) -> Result<Self, CoreError>
    where
        C: Copy + Into<Rgba>,
    {
        Ok(Self::new(PointCloud::initialize(positions, colors)?, device))
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn cloud(&self) -> &PointCloud {
        &self.cloud
    }

    pub fn device(&self) -> &Arc<D> {
        &self.device
    }

    pub fn len(&self) -> usize {
        self.cloud.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cloud.is_empty()
    }

    /// The current buffer handle, without allocating.
    pub fn buffer(&self) -> Option<BufferHandle> {
        self.lock().as_ref().map(|m| m.handle)
    }

    /// True when the mirror exists but does not hold the latest colors.
    pub fn is_stale(&self) -> bool {
        matches!(
            self.lock().as_ref().map(|m| m.contents),
            Some(Contents::Stale | Contents::Uninitialized)
        )
    }

    /// Returns the device buffer, allocating and uploading it on first call.
    ///
    /// Later calls return the same handle without uploading again, even if
    /// colors have changed since; use [`recompute_buffer`] for that.
    ///
    /// [`recompute_buffer`]: GpuPointCloud::recompute_buffer
    pub fn acquire_buffer(&self) -> Result<BufferHandle, DeviceError> {
        let mut guard = self.lock();

        if let Some(mirror) = guard.as_mut() {
            if mirror.contents == Contents::Uninitialized {
                self.device.write_buffer(&mirror.handle, self.cloud.as_bytes())?;
                mirror.contents = Contents::Current;
            }
            return Ok(mirror.handle);
        }

        let handle = self.allocate()?;
        if let Err(err) = self.device.write_buffer(&handle, self.cloud.as_bytes()) {
            self.device.destroy_buffer(&handle);
            return Err(err);
        }
        log::debug!("uploaded {} points into buffer {:?}", self.cloud.len(), handle.id);

        *guard = Some(Mirror {
            handle,
            contents: Contents::Current,
        });
        Ok(handle)
    }

    /// Uploads the whole point sequence, allocating the buffer if needed.
    ///
    /// On success the device contents equal [`PointCloud::as_bytes`].
    pub fn recompute_buffer(&self) -> Result<BufferHandle, DeviceError> {
        let mut guard = self.lock();
        let fresh = guard.is_none();
        let mirror = self.ensure_allocated(&mut guard)?;

        if let Err(err) = self.device.write_buffer(&mirror.handle, self.cloud.as_bytes()) {
            // A buffer allocated by this call is never left behind unwritten.
            if fresh {
                self.device.destroy_buffer(&mirror.handle);
                *guard = None;
            }
            return Err(err);
        }
        mirror.contents = Contents::Current;
        log::debug!("re-uploaded {} points into buffer {:?}", self.cloud.len(), mirror.handle.id);

        Ok(mirror.handle)
    }

    /// Destroys the device buffer if there is one. Safe to call repeatedly.
    pub fn release(&self) {
        if let Some(mirror) = self.lock().take() {
            self.device.destroy_buffer(&mirror.handle);
            log::debug!("released buffer {:?}", mirror.handle.id);
        }
    }

    /// Recolors points by containment in `region` and makes sure a device
    /// buffer exists. The buffer is not written; it is marked stale until the
    /// next [`recompute_buffer`].
    ///
    /// [`recompute_buffer`]: GpuPointCloud::recompute_buffer
    pub fn segment_by_box(&mut self, region: &BoxRegion) -> Result<BoxSegmentation, StoreError> {
        let result = segment_by_box_with(&mut self.cloud, region, &self.palette)?;

        let mut guard = self.lock();
        let mirror = self.ensure_allocated(&mut guard)?;
        if mirror.contents == Contents::Current {
            mirror.contents = Contents::Stale;
        }

        Ok(result)
    }

    /// Consumes the store, releasing any device buffer.
    pub fn into_cloud(mut self) -> PointCloud {
        self.release();
        std::mem::take(&mut self.cloud)
    }

    fn ensure_allocated<'g>(
        &self,
        slot: &'g mut Option<Mirror>,
    ) -> Result<&'g mut Mirror, DeviceError> {
        let mirror = match slot.take() {
            Some(mirror) if mirror.handle.count == self.cloud.len() => mirror,
            previous => {
                // Element count is fixed per allocation; never resize in place.
                if let Some(previous) = previous {
                    self.device.destroy_buffer(&previous.handle);
                }
                Mirror {
                    handle: self.allocate()?,
                    contents: Contents::Uninitialized,
                }
            }
        };

        Ok(slot.insert(mirror))
    }

    fn allocate(&self) -> Result<BufferHandle, DeviceError> {
        let handle = self.device.create_buffer(self.cloud.len(), ELEMENT_BYTE_SIZE)?;
        log::debug!(
            "allocated buffer {:?} for {} points ({} bytes)",
            handle.id,
            handle.count,
            handle.byte_len()
        );
        Ok(handle)
    }

    fn lock(&self) -> MutexGuard<'_, Option<Mirror>> {
        self.mirror.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<D: GpuDevice> Drop for GpuPointCloud<D> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<D: GpuDevice> std::fmt::Debug for GpuPointCloud<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpuPointCloud")
            .field("points", &self.cloud.len())
            .field("buffer", &self.buffer())
            .finish()
    }
}
