//! Binary persistence of a packed point sequence.
//!
//! Layout, all little-endian:
//!
//! ```text
//! "PCX1"        4 bytes magic
//! count         u32
//! count × { x: f32, y: f32, z: f32, color: u32 }
//! ```
//!
//! Only the points are stored. Device buffers are derived state and never
//! written.

use pcx_core::{Point, PointCloud, ELEMENT_BYTE_SIZE};
use std::fs;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

const MAGIC: &[u8; 4] = b"PCX1";

/// Writes `cloud` to a `.pcx` file.
pub fn write_pcx(path: impl AsRef<Path>, cloud: &PointCloud) -> io::Result<()> {
    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_pcx_to(&mut writer, cloud)?;
    writer.flush()
}

/// Reads a `.pcx` file.
pub fn read_pcx(path: impl AsRef<Path>) -> io::Result<PointCloud> {
    let file = fs::File::open(path)?;
    read_pcx_from(BufReader::new(file))
}

pub fn write_pcx_to<W: Write>(mut writer: W, cloud: &PointCloud) -> io::Result<()> {
    let count = u32::try_from(cloud.len()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} points do not fit a PCX header", cloud.len()),
        )
    })?;

    writer.write_all(MAGIC)?;
    writer.write_all(&count.to_le_bytes())?;

    let mut record = [0u8; ELEMENT_BYTE_SIZE];
    for p in cloud.points() {
        record[0..4].copy_from_slice(&p.position[0].to_le_bytes());
        record[4..8].copy_from_slice(&p.position[1].to_le_bytes());
        record[8..12].copy_from_slice(&p.position[2].to_le_bytes());
        record[12..16].copy_from_slice(&p.color.to_le_bytes());
        writer.write_all(&record)?;
    }

    Ok(())
}

pub fn read_pcx_from<R: Read>(mut reader: R) -> io::Result<PointCloud> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "not a PCX file (bad magic)",
        ));
    }

    let mut count = [0u8; 4];
    reader.read_exact(&mut count)?;
    let count = u32::from_le_bytes(count) as usize;

    // Cap the up-front reservation; a corrupt header should not allocate gigabytes.
    let mut points = Vec::with_capacity(count.min(1 << 20));
    let mut record = [0u8; ELEMENT_BYTE_SIZE];
    for i in 0..count {
        reader.read_exact(&mut record).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("PCX file truncated at point {} of {}", i, count),
                )
            } else {
                e
            }
        })?;
        points.push(Point::new(
            [f32_at(&record, 0), f32_at(&record, 4), f32_at(&record, 8)],
            u32::from_le_bytes([record[12], record[13], record[14], record[15]]),
        ));
    }

    Ok(PointCloud::from_points(points))
}

#[inline]
fn f32_at(buf: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes([buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3]])
}
