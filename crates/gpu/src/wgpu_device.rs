use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::device::{BufferHandle, BufferId, DeviceError, GpuDevice};

/// A [`GpuDevice`] that allocates real `wgpu` storage buffers.
///
/// Buffers are created with `STORAGE | VERTEX | COPY_DST` usage so a point
/// shader can read them either as a structured buffer or as vertex input.
pub struct WgpuDevice {
    device: wgpu::Device,
    queue: wgpu::Queue,
    buffers: Mutex<HashMap<BufferId, wgpu::Buffer>>,
    next_id: AtomicU64,
}

impl WgpuDevice {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self {
            device,
            queue,
            buffers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Runs `f` with the live `wgpu::Buffer` behind `handle`, e.g. to build a
    /// bind group for a draw.
    pub fn with_buffer<R>(
        &self,
        handle: &BufferHandle,
        f: impl FnOnce(&wgpu::Buffer) -> R,
    ) -> Option<R> {
        self.lock().get(&handle.id).map(f)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<BufferId, wgpu::Buffer>> {
        self.buffers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl GpuDevice for WgpuDevice {
    fn create_buffer(&self, count: usize, stride: usize) -> Result<BufferHandle, DeviceError> {
        let limit = self.device.limits().max_buffer_size as usize;
        let requested = count
            .checked_mul(stride)
            .filter(|&bytes| bytes <= limit)
            .ok_or(DeviceError::TooLarge {
                requested: count.saturating_mul(stride),
                limit,
            })?;

        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("pcx point buffer"),
            size: requested as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::VERTEX
                | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let id = BufferId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.lock().insert(id, buffer);

        Ok(BufferHandle { id, count, stride })
    }

    fn write_buffer(&self, handle: &BufferHandle, bytes: &[u8]) -> Result<(), DeviceError> {
        let buffers = self.lock();
        let buffer = buffers
            .get(&handle.id)
            .ok_or(DeviceError::UnknownBuffer(handle.id))?;

        if buffer.size() as usize != bytes.len() {
            return Err(DeviceError::SizeMismatch {
                expected: buffer.size() as usize,
                actual: bytes.len(),
            });
        }

        self.queue.write_buffer(buffer, 0, bytes);
        Ok(())
    }

    fn destroy_buffer(&self, handle: &BufferHandle) {
        if let Some(buffer) = self.lock().remove(&handle.id) {
            buffer.destroy();
        }
    }
}
