// `derive(Pod, Zeroable)` expands to `unsafe impl`s in this module.
#![allow(unsafe_code)]

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use static_assertions::const_assert_eq;

/// Byte size of one [`Point`] as laid out in a device buffer.
pub const ELEMENT_BYTE_SIZE: usize = 16;

const_assert_eq!(std::mem::size_of::<Point>(), ELEMENT_BYTE_SIZE);

/// A position with a packed color token, laid out for direct GPU upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Point {
    pub position: [f32; 3],
    pub color: u32,
}

impl Point {
    pub fn new(position: [f32; 3], color: u32) -> Self {
        Self { position, color }
    }
}
