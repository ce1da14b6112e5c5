//! RAW image data types

use crate::image_pipeline::raw::geometry::SensorGeometry;

/// Two-by-two Bayer arrangements the develop stage can demosaic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BayerPattern {
    Rggb,
    Bggr,
    Grbg,
    Gbrg,
}

impl BayerPattern {
    /// Builds the pattern from the colors of the top-left 2x2 tile
    /// (0 = red, 1 = green, 2 = blue, 3 = second green).
    pub fn from_tile(tile: [[usize; 2]; 2]) -> Option<Self> {
        let green = |c: usize| c == 1 || c == 3;
        match tile {
            [[0, a], [b, 2]] if green(a) && green(b) => Some(BayerPattern::Rggb),
            [[2, a], [b, 0]] if green(a) && green(b) => Some(BayerPattern::Bggr),
            [[a, 0], [2, b]] if green(a) && green(b) => Some(BayerPattern::Grbg),
            [[a, 2], [0, b]] if green(a) && green(b) => Some(BayerPattern::Gbrg),
            _ => None,
        }
    }

    /// Pattern seen by a crop whose origin is `(x, y)` in this pattern.
    pub fn shifted(self, x: usize, y: usize) -> Self {
        let flip_x = x % 2 == 1;
        let flip_y = y % 2 == 1;
        match (self, flip_x, flip_y) {
            (p, false, false) => p,
            (BayerPattern::Rggb, true, false) => BayerPattern::Grbg,
            (BayerPattern::Rggb, false, true) => BayerPattern::Gbrg,
            (BayerPattern::Rggb, true, true) => BayerPattern::Bggr,
            (BayerPattern::Bggr, true, false) => BayerPattern::Gbrg,
            (BayerPattern::Bggr, false, true) => BayerPattern::Grbg,
            (BayerPattern::Bggr, true, true) => BayerPattern::Rggb,
            (BayerPattern::Grbg, true, false) => BayerPattern::Rggb,
            (BayerPattern::Grbg, false, true) => BayerPattern::Bggr,
            (BayerPattern::Grbg, true, true) => BayerPattern::Gbrg,
            (BayerPattern::Gbrg, true, false) => BayerPattern::Bggr,
            (BayerPattern::Gbrg, false, true) => BayerPattern::Rggb,
            (BayerPattern::Gbrg, true, true) => BayerPattern::Grbg,
        }
    }
}

/// How the sensor samples are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorLayout {
    /// One sample per photosite behind a Bayer color filter
    Bayer(BayerPattern),
    /// Three samples per pixel, already demosaiced
    Rgb,
}

/// Unpacked sensor data plus the metadata the develop stage needs.
///
/// Produced by a [`RawDecoder`](crate::image_pipeline::raw::RawDecoder) before
/// any processing takes place, so the geometry can be inspected and a
/// processing region chosen.
#[derive(Debug, Clone)]
pub struct SensorImage {
    pub geometry: SensorGeometry,
    pub layout: SensorLayout,
    /// Row-major sensor samples covering `raw_width x raw_height`
    pub data: Vec<u16>,
    /// Black level per CFA color (R, G, B, G2)
    pub black_levels: [u16; 4],
    /// White level per CFA color (R, G, B, G2)
    pub white_levels: [u16; 4],
    /// As-shot white balance multipliers (R, G, B, G2)
    pub wb_coeffs: [f32; 4],
    /// Camera XYZ -> camera space matrix, all zero when unknown
    pub xyz_to_cam: [[f32; 3]; 4],
}

impl SensorImage {
    pub fn samples_per_pixel(&self) -> usize {
        match self.layout {
            SensorLayout::Bayer(_) => 1,
            SensorLayout::Rgb => 3,
        }
    }
}

/// Processed raster produced by the develop stage.
///
/// Samples are interleaved by channel, row-major; 16-bit samples are stored
/// in native byte order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFrame {
    pub width: usize,
    pub height: usize,
    pub channels: u16,
    pub bits: u16,
    pub data: Vec<u8>,
}

impl RawFrame {
    pub fn from_u16(width: usize, height: usize, channels: u16, samples: &[u16]) -> Self {
        Self {
            width,
            height,
            channels,
            bits: 16,
            data: samples.iter().flat_map(|s| s.to_ne_bytes()).collect(),
        }
    }

    pub fn from_u8(width: usize, height: usize, channels: u16, samples: Vec<u8>) -> Self {
        Self {
            width,
            height,
            channels,
            bits: 8,
            data: samples,
        }
    }

    /// Buffer length implied by the header fields.
    pub fn expected_len(&self) -> usize {
        self.width * self.height * self.channels as usize * (self.bits as usize).div_ceil(8)
    }
}
