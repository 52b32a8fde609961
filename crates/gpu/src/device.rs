use thiserror::Error;

/// Identifies one allocation on a [`GpuDevice`]. Ids are never reused by a
/// device, so a handle from a released buffer never aliases a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u64);

/// A device-resident structured buffer of fixed element count and stride.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle {
    pub id: BufferId,
    pub count: usize,
    pub stride: usize,
}

impl BufferHandle {
    pub fn byte_len(&self) -> usize {
        self.count * self.stride
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    #[error("out of device memory: requested {requested} bytes, {available} available")]
    OutOfMemory { requested: usize, available: usize },
    #[error("buffer of {requested} bytes exceeds the device limit of {limit}")]
    TooLarge { requested: usize, limit: usize },
    #[error("unknown buffer {0:?}")]
    UnknownBuffer(BufferId),
    #[error("upload of {actual} bytes into a {expected} byte buffer")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("device error: {0}")]
    Backend(String),
}

/// The graphics subsystem a point store uploads into.
///
/// Calls are synchronous. Implementations must tolerate `destroy_buffer` on
/// a handle they no longer know.
pub trait GpuDevice: Send + Sync {
    /// Allocates an uninitialized buffer of `count` elements of `stride` bytes.
    fn create_buffer(&self, count: usize, stride: usize) -> Result<BufferHandle, DeviceError>;

    /// Overwrites the whole buffer. `bytes` must be exactly `handle.byte_len()` long.
    fn write_buffer(&self, handle: &BufferHandle, bytes: &[u8]) -> Result<(), DeviceError>;

    fn destroy_buffer(&self, handle: &BufferHandle);
}

impl<D: GpuDevice + ?Sized> GpuDevice for std::sync::Arc<D> {
    fn create_buffer(&self, count: usize, stride: usize) -> Result<BufferHandle, DeviceError> {
        (**self).create_buffer(count, stride)
    }

    fn write_buffer(&self, handle: &BufferHandle, bytes: &[u8]) -> Result<(), DeviceError> {
        (**self).write_buffer(handle, bytes)
    }

    fn destroy_buffer(&self, handle: &BufferHandle) {
        (**self).destroy_buffer(handle)
    }
}
