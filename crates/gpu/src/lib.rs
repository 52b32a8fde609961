#![forbid(unsafe_code)]

pub mod device;
pub mod host;
pub mod store;
#[cfg(feature = "wgpu")]
pub mod wgpu_device;

pub use device::{BufferHandle, BufferId, DeviceError, GpuDevice};
pub use host::HostDevice;
pub use store::{GpuPointCloud, StoreError};
#[cfg(feature = "wgpu")]
pub use wgpu_device::WgpuDevice;
