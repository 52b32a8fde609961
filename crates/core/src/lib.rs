#![deny(unsafe_code)]

pub mod bbox;
pub mod cloud;
pub mod color;
pub mod error;
pub mod point;

pub use bbox::{Aabb, BoxRegion};
pub use cloud::PointCloud;
pub use color::Rgba;
pub use error::CoreError;
pub use point::{Point, ELEMENT_BYTE_SIZE};
