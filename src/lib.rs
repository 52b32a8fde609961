//! Packed point clouds with a lazily mirrored device buffer and box
//! segmentation.
//!
//! ```
//! use std::sync::Arc;
//! use pcx_rs::{BoxRegion, GpuPointCloud, HostDevice};
//!
//! let device = Arc::new(HostDevice::new());
//! let mut cloud = GpuPointCloud::initialize(
//!     device,
//!     &[[0.0, 0.0, 0.0], [2.0, 2.0, 2.0]],
//!     &[[1.0f32, 1.0, 1.0, 1.0]; 2],
//! )
//! .unwrap();
//!
//! let result = cloud.segment_by_box(&BoxRegion::new([1.0; 3], [3.0; 3])).unwrap();
//! assert_eq!(result.members, 1);
//! let buffer = cloud.recompute_buffer().unwrap();
//! assert_eq!(buffer.count, 2);
//! ```

#![forbid(unsafe_code)]

pub use pcx_core;
pub use pcx_gpu;
pub use pcx_host;
pub use pcx_io;
pub use pcx_segmentation;

pub use pcx_core::color::{decode, encode, Rgba};
pub use pcx_core::{Aabb, BoxRegion, CoreError, Point, PointCloud, ELEMENT_BYTE_SIZE};
pub use pcx_gpu::{BufferHandle, DeviceError, GpuDevice, GpuPointCloud, HostDevice, StoreError};
pub use pcx_host::{BoxAnimator, DrawCall, DrawStyle, PointCloudRenderer, RendererSettings};
pub use pcx_io::{read_pcx, write_pcx};
pub use pcx_segmentation::{segment_by_box, BoxSegmentation, Palette, SegmentationError};
