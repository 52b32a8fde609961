//! RGBM-style packing of linear HDR colors into 32-bit tokens.
//!
//! A token stores three 8-bit channels scaled by a shared 8-bit brightness
//! byte: `r | g << 8 | b << 16 | m << 24`. Channels are quantized by
//! truncation, the same way a plain integer cast would.

/// Ceiling of encodable brightness. Channels above this saturate.
pub const MAX_BRIGHTNESS: f32 = 16.0;

/// Opaque white, the color every point is reset to before segmentation.
pub const BASELINE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

/// Opaque magenta, used to mark points inside a segmentation box.
pub const HIGHLIGHT: Rgba = Rgba::new(1.0, 0.0, 1.0, 1.0);

/// Linear HDR color. Channels are unbounded above 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Converts an 8-bit color to the 0..1 range.
    pub fn from_rgba8(c: [u8; 4]) -> Self {
        Self::new(
            c[0] as f32 / 255.0,
            c[1] as f32 / 255.0,
            c[2] as f32 / 255.0,
            c[3] as f32 / 255.0,
        )
    }
}

impl From<[f32; 4]> for Rgba {
    fn from(c: [f32; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

impl From<[u8; 4]> for Rgba {
    fn from(c: [u8; 4]) -> Self {
        Self::from_rgba8(c)
    }
}

impl From<[f32; 3]> for Rgba {
    fn from(c: [f32; 3]) -> Self {
        Self::rgb(c[0], c[1], c[2])
    }
}

/// Packs `color` into a 32-bit token.
///
/// Negative and non-finite channels are clamped to zero, so the function is
/// total. Alpha is accepted but not stored.
pub fn encode(color: Rgba) -> u32 {
    let r = sanitize(color.r);
    let g = sanitize(color.g);
    let b = sanitize(color.b);

    let y = r.max(g).max(b);
    // Zero is excluded so decoding never scales by zero.
    let y = (y * 255.0 / MAX_BRIGHTNESS).ceil().clamp(1.0, 255.0);

    let scale = 255.0 * 255.0 / (y * MAX_BRIGHTNESS);

    quantize(r * scale) | quantize(g * scale) << 8 | quantize(b * scale) << 16 | (y as u32) << 24
}

/// Packs an 8-bit color.
pub fn encode_rgba8(c: [u8; 4]) -> u32 {
    encode(c.into())
}

/// Recovers the linear RGB channels of a token.
pub fn decode(token: u32) -> [f32; 3] {
    let y = (token >> 24) as f32;
    let scale = y * MAX_BRIGHTNESS / (255.0 * 255.0);
    [
        (token & 0xff) as f32 * scale,
        ((token >> 8) & 0xff) as f32 * scale,
        ((token >> 16) & 0xff) as f32 * scale,
    ]
}

/// Largest per-channel error `decode(token)` can carry relative to the
/// color that produced it.
pub fn quantization_step(token: u32) -> f32 {
    (token >> 24) as f32 * MAX_BRIGHTNESS / (255.0 * 255.0)
}

#[inline]
fn sanitize(v: f32) -> f32 {
    if v.is_finite() {
        v.max(0.0)
    } else if v == f32::INFINITY {
        MAX_BRIGHTNESS
    } else {
        0.0
    }
}

#[inline]
fn quantize(v: f32) -> u32 {
    v.clamp(0.0, 255.0) as u32
}
