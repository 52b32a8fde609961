#![forbid(unsafe_code)]

pub mod pcx;

pub use pcx::{read_pcx, read_pcx_from, write_pcx, write_pcx_to};
