//! Device mirror lifecycle: lazy allocation, identity, refresh, release and
//! recovery from allocation failure.

use pcx_core::{BoxRegion, ELEMENT_BYTE_SIZE};
use pcx_gpu::{BufferHandle, DeviceError, GpuDevice, GpuPointCloud, HostDevice, StoreError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn grid(n: usize) -> Vec<[f32; 3]> {
    (0..n)
        .map(|i| [(i % 10) as f32, (i / 10 % 10) as f32, (i / 100) as f32])
        .collect()
}

/// Wraps a host device and fails every upload while `fail_writes` is set.
struct FlakyDevice {
    inner: HostDevice,
    fail_writes: AtomicBool,
}

impl GpuDevice for FlakyDevice {
    fn create_buffer(&self, count: usize, stride: usize) -> Result<BufferHandle, DeviceError> {
        self.inner.create_buffer(count, stride)
    }

    fn write_buffer(&self, handle: &BufferHandle, bytes: &[u8]) -> Result<(), DeviceError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DeviceError::Backend("device lost".into()));
        }
        self.inner.write_buffer(handle, bytes)
    }

    fn destroy_buffer(&self, handle: &BufferHandle) {
        self.inner.destroy_buffer(handle)
    }
}

#[test]
fn buffer_size_matches_point_count() {
    let device = Arc::new(HostDevice::new());
    let positions = grid(250);
    let store =
        GpuPointCloud::initialize(Arc::clone(&device), &positions, &vec![[0.5f32; 3]; 250]).unwrap();

    let handle = store.acquire_buffer().unwrap();
    assert_eq!(handle.count, 250);
    assert_eq!(handle.byte_len(), 250 * ELEMENT_BYTE_SIZE);
    assert_eq!(device.live_bytes(), 250 * ELEMENT_BYTE_SIZE);
}

#[test]
fn out_of_memory_then_retry_after_freeing() {
    let device = Arc::new(HostDevice::with_capacity(100 * ELEMENT_BYTE_SIZE));
    let hog = device.create_buffer(60, ELEMENT_BYTE_SIZE).unwrap();

    let store =
        GpuPointCloud::initialize(Arc::clone(&device), &grid(50), &vec![[1.0f32; 3]; 50]).unwrap();
    assert!(matches!(
        store.acquire_buffer(),
        Err(DeviceError::OutOfMemory { .. })
    ));
    assert_eq!(store.buffer(), None);

    device.destroy_buffer(&hog);
    let handle = store.acquire_buffer().unwrap();
    assert_eq!(device.contents(&handle).unwrap(), store.cloud().as_bytes());
}

#[test]
fn failed_first_upload_frees_the_allocation() {
    let device = Arc::new(FlakyDevice {
        inner: HostDevice::new(),
        fail_writes: AtomicBool::new(true),
    });
    let store =
        GpuPointCloud::initialize(Arc::clone(&device), &grid(8), &vec![[1.0f32; 3]; 8]).unwrap();

    assert!(matches!(store.acquire_buffer(), Err(DeviceError::Backend(_))));
    assert_eq!(store.buffer(), None);
    assert_eq!(device.inner.live_buffers(), 0);

    device.fail_writes.store(false, Ordering::SeqCst);
    let handle = store.acquire_buffer().unwrap();
    assert_eq!(device.inner.contents(&handle).unwrap(), store.cloud().as_bytes());
}

#[test]
fn failed_first_recompute_frees_the_allocation() {
    let device = Arc::new(FlakyDevice {
        inner: HostDevice::new(),
        fail_writes: AtomicBool::new(true),
    });
    let store =
        GpuPointCloud::initialize(Arc::clone(&device), &grid(4), &vec![[1.0f32; 3]; 4]).unwrap();

    assert!(matches!(store.recompute_buffer(), Err(DeviceError::Backend(_))));
    assert_eq!(store.buffer(), None);
    assert_eq!(device.inner.live_buffers(), 0);

    device.fail_writes.store(false, Ordering::SeqCst);
    let handle = store.recompute_buffer().unwrap();
    assert_eq!(device.inner.contents(&handle).unwrap(), store.cloud().as_bytes());
    assert_eq!(device.inner.live_buffers(), 1);
}

#[test]
fn failed_refresh_keeps_buffer_stale() {
    let device = Arc::new(FlakyDevice {
        inner: HostDevice::new(),
        fail_writes: AtomicBool::new(false),
    });
    let mut store =
        GpuPointCloud::initialize(Arc::clone(&device), &grid(8), &vec![[1.0f32; 3]; 8]).unwrap();
    let handle = store.acquire_buffer().unwrap();

    store.segment_by_box(&BoxRegion::new([-1.0; 3], [3.0; 3])).unwrap();
    device.fail_writes.store(true, Ordering::SeqCst);
    assert!(store.recompute_buffer().is_err());
    assert!(store.is_stale());
    assert_eq!(store.buffer(), Some(handle));

    device.fail_writes.store(false, Ordering::SeqCst);
    assert_eq!(store.recompute_buffer().unwrap(), handle);
    assert!(!store.is_stale());
}

#[test]
fn segmentation_error_leaves_buffer_untouched() {
    let device = Arc::new(HostDevice::new());
    let mut store = GpuPointCloud::initialize(
        Arc::clone(&device),
        &[] as &[[f32; 3]],
        &[] as &[[f32; 3]],
    )
    .unwrap();
    assert!(matches!(
        store.segment_by_box(&BoxRegion::new([0.0; 3], [1.0; 3])),
        Err(StoreError::Segmentation(_))
    ));
    assert_eq!(store.buffer(), None);
}

#[test]
fn many_stores_share_a_device() {
    let device = Arc::new(HostDevice::new());
    let stores: Vec<_> = (1..=5)
        .map(|n| {
            GpuPointCloud::initialize(Arc::clone(&device), &grid(n), &vec![[1.0f32; 3]; n]).unwrap()
        })
        .collect();

    let ids: Vec<_> = stores.iter().map(|s| s.acquire_buffer().unwrap().id).collect();
    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), ids.len());

    drop(stores);
    assert_eq!(device.live_buffers(), 0);
}
