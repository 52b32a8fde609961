#![forbid(unsafe_code)]

pub mod box_segment;

pub use box_segment::{
    segment_by_box, segment_by_box_with, BoxSegmentation, Palette, SegmentationError,
};
