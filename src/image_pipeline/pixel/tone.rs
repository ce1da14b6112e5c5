//! sRGB transfer curves and the Reinhard exposure compressor.
//!
//! All functions work on normalized samples. The inverse curve clamps its
//! input to [0, 1]; the tone map accepts any non-negative value.

/// Encoded value at which the inverse sRGB curve switches from linear to power.
pub const SRGB_ENCODED_BREAKPOINT: f32 = 0.04045;

/// Linear value at which the forward sRGB curve switches from linear to power.
pub const SRGB_LINEAR_BREAKPOINT: f32 = 0.0031308;

const SRGB_SLOPE: f32 = 12.92;
const SRGB_OFFSET: f32 = 0.055;
const SRGB_SCALE: f32 = 1.055;
const SRGB_GAMMA: f32 = 2.4;

/// Forward sRGB transfer function (linear -> encoded).
#[inline]
pub fn srgb_encode(linear: f32) -> f32 {
    let linear = linear.clamp(0.0, 1.0);
    if linear <= SRGB_LINEAR_BREAKPOINT {
        SRGB_SLOPE * linear
    } else {
        SRGB_SCALE * linear.powf(1.0 / SRGB_GAMMA) - SRGB_OFFSET
    }
}

/// Inverse sRGB transfer function (encoded -> linear).
#[inline]
pub fn srgb_decode(srgb: f32) -> f32 {
    let srgb = srgb.clamp(0.0, 1.0);
    if srgb <= SRGB_ENCODED_BREAKPOINT {
        srgb / SRGB_SLOPE
    } else {
        ((srgb + SRGB_OFFSET) / SRGB_SCALE).powf(SRGB_GAMMA)
    }
}

/// Reinhard compression `x / (1 + x)` applied after scaling by `exposure`.
#[inline]
pub fn reinhard(value: f32, exposure: f32) -> f32 {
    let exposed = value * exposure;
    exposed / (1.0 + exposed)
}
