use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::device::{BufferHandle, BufferId, DeviceError, GpuDevice};

/// A [`GpuDevice`] backed by host memory.
///
/// Useful headless and in tests: it enforces an optional byte budget, counts
/// allocations and uploads, and lets callers inspect buffer contents.
#[derive(Debug)]
pub struct HostDevice {
    capacity: Option<usize>,
    buffers: Mutex<HashMap<BufferId, Vec<u8>>>,
    next_id: AtomicU64,
    allocations: AtomicUsize,
    uploads: AtomicUsize,
}

impl HostDevice {
    /// A device with unlimited memory.
    pub fn new() -> Self {
        Self {
            capacity: None,
            buffers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            allocations: AtomicUsize::new(0),
            uploads: AtomicUsize::new(0),
        }
    }

    /// A device that refuses allocations once `bytes` are live.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            capacity: Some(bytes),
            ..Self::new()
        }
    }

    /// Copy of the current contents of `handle`, if it is live.
    pub fn contents(&self, handle: &BufferHandle) -> Option<Vec<u8>> {
        self.lock().get(&handle.id).cloned()
    }

    pub fn is_live(&self, handle: &BufferHandle) -> bool {
        self.lock().contains_key(&handle.id)
    }

    pub fn live_buffers(&self) -> usize {
        self.lock().len()
    }

    pub fn live_bytes(&self) -> usize {
        self.lock().values().map(Vec::len).sum()
    }

    /// Number of successful `create_buffer` calls so far.
    pub fn allocation_count(&self) -> usize {
        self.allocations.load(Ordering::SeqCst)
    }

    /// Number of successful `write_buffer` calls so far.
    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<BufferId, Vec<u8>>> {
        self.buffers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for HostDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl GpuDevice for HostDevice {
    fn create_buffer(&self, count: usize, stride: usize) -> Result<BufferHandle, DeviceError> {
        let requested = count.checked_mul(stride).ok_or(DeviceError::TooLarge {
            requested: usize::MAX,
            limit: self.capacity.unwrap_or(usize::MAX),
        })?;

        let mut buffers = self.lock();
        if let Some(capacity) = self.capacity {
            let live: usize = buffers.values().map(Vec::len).sum();
            let available = capacity.saturating_sub(live);
            if requested > available {
                return Err(DeviceError::OutOfMemory {
                    requested,
                    available,
                });
            }
        }

        let id = BufferId(self.next_id.fetch_add(1, Ordering::SeqCst));
        buffers.insert(id, vec![0; requested]);
        self.allocations.fetch_add(1, Ordering::SeqCst);

        Ok(BufferHandle { id, count, stride })
    }

    fn write_buffer(&self, handle: &BufferHandle, bytes: &[u8]) -> Result<(), DeviceError> {
        let mut buffers = self.lock();
        let buffer = buffers
            .get_mut(&handle.id)
            .ok_or(DeviceError::UnknownBuffer(handle.id))?;

        if buffer.len() != bytes.len() {
            return Err(DeviceError::SizeMismatch {
                expected: buffer.len(),
                actual: bytes.len(),
            });
        }

        buffer.copy_from_slice(bytes);
        self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn destroy_buffer(&self, handle: &BufferHandle) {
        self.lock().remove(&handle.id);
    }
}
