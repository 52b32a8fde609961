use pcx_gpu::{DeviceError, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Device(#[from] DeviceError),
    #[error("invalid renderer settings: {0}")]
    Settings(#[from] serde_json::Error),
}
