#![forbid(unsafe_code)]

pub mod animator;
pub mod error;
pub mod renderer;
pub mod settings;

pub use animator::BoxAnimator;
pub use error::HostError;
pub use renderer::{DrawCall, DrawSink, DrawStyle, PointCloudRenderer};
pub use settings::RendererSettings;
