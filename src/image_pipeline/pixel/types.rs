//! Types for the pixel conversion stage

use crate::image_pipeline::common::error::{ConversionError, Result};

/// How processed decoder samples are interpreted before storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Undo the decoder's sRGB encoding so the EXR holds linear light
    #[default]
    SrgbToLinear,
    /// Store the decoder's sRGB-encoded values unchanged
    Passthrough,
}

/// Per-run pixel settings, shared read-only by every file of a batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionOptions {
    pub color_mode: ColorMode,
    /// Exposure multiplier feeding the Reinhard tone map. 1.0 disables it.
    pub exposure: f32,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::SrgbToLinear,
            exposure: 1.0,
        }
    }
}

impl ConversionOptions {
    pub fn new(color_mode: ColorMode, exposure: f32) -> Result<Self> {
        let options = Self {
            color_mode,
            exposure,
        };
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.exposure.is_finite() || self.exposure <= 0.0 {
            return Err(ConversionError::Argument(format!(
                "exposure must be a positive number, got {}",
                self.exposure
            )));
        }
        Ok(())
    }

    /// True when the tone map stage must run at all.
    #[inline]
    pub fn tone_maps(&self) -> bool {
        self.exposure != 1.0
    }
}

/// Channel arrangement of a processed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    Gray,
    Rgb,
}

impl ChannelLayout {
    pub fn channels(self) -> usize {
        match self {
            ChannelLayout::Gray => 1,
            ChannelLayout::Rgb => 3,
        }
    }
}

/// Storage width of one processed sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleDepth {
    Eight,
    Sixteen,
}

impl SampleDepth {
    pub fn bytes(self) -> usize {
        match self {
            SampleDepth::Eight => 1,
            SampleDepth::Sixteen => 2,
        }
    }

    /// Full-scale value used to normalize samples into [0, 1].
    pub fn full_scale(self) -> f32 {
        match self {
            SampleDepth::Eight => u8::MAX as f32,
            SampleDepth::Sixteen => u16::MAX as f32,
        }
    }

    /// Reads sample `index` from a native-endian byte buffer and normalizes it.
    #[inline]
    pub fn normalize(self, data: &[u8], index: usize) -> f32 {
        match self {
            SampleDepth::Eight => data[index] as f32 / self.full_scale(),
            SampleDepth::Sixteen => {
                let offset = index * 2;
                let sample = u16::from_ne_bytes([data[offset], data[offset + 1]]);
                sample as f32 / self.full_scale()
            }
        }
    }
}

/// The only layouts the conversion loop understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormat {
    pub layout: ChannelLayout,
    pub depth: SampleDepth,
}

impl PixelFormat {
    pub fn from_frame(channels: u16, bits: u16) -> Result<Self> {
        let layout = match channels {
            1 => ChannelLayout::Gray,
            3 => ChannelLayout::Rgb,
            _ => return Err(ConversionError::UnsupportedFormat { channels, bits }),
        };
        let depth = match bits {
            8 => SampleDepth::Eight,
            16 => SampleDepth::Sixteen,
            _ => return Err(ConversionError::UnsupportedFormat { channels, bits }),
        };
        Ok(Self { layout, depth })
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.layout.channels() * self.depth.bytes()
    }
}

/// Floating-point RGBA image handed to the EXR writer.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatRaster {
    pub width: usize,
    pub height: usize,
    /// Row-major RGBA pixels
    pub pixels: Vec<[f32; 4]>,
}

impl FloatRaster {
    pub fn pixel(&self, x: usize, y: usize) -> [f32; 4] {
        self.pixels[y * self.width + x]
    }
}
