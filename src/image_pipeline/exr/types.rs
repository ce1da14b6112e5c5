//! EXR output and conversion configuration types

use std::fmt;
use std::str::FromStr;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::pixel::{ColorMode, ConversionOptions};

/// EXR compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExrCompression {
    /// No compression (fastest, largest file)
    None,
    /// Run-length encoding (fast, weak on noisy data)
    Rle,
    /// Zip over blocks of 16 scanlines (default)
    Zip,
    /// Wavelet compression, good for grainy photographic data
    Piz,
}

impl fmt::Display for ExrCompression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExrCompression::None => "none",
            ExrCompression::Rle => "rle",
            ExrCompression::Zip => "zip",
            ExrCompression::Piz => "piz",
        };
        f.write_str(name)
    }
}

impl FromStr for ExrCompression {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(ExrCompression::None),
            "rle" => Ok(ExrCompression::Rle),
            "zip" => Ok(ExrCompression::Zip),
            "piz" => Ok(ExrCompression::Piz),
            other => Err(format!(
                "unknown compression '{}' (expected none, rle, zip or piz)",
                other
            )),
        }
    }
}

/// Storage type of the RGBA channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExrPrecision {
    /// 32-bit float samples
    Full,
    /// 16-bit half float samples
    Half,
}

/// Configuration for a 3FR to EXR batch run
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Color mode and exposure applied to every pixel
    pub options: ConversionOptions,
    /// Compression method to use
    pub compression: ExrCompression,
    /// Sample type written to the file
    pub precision: ExrPrecision,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            options: ConversionOptions::default(),
            compression: ExrCompression::Zip,
            precision: ExrPrecision::Full,
        }
    }
}

impl ConversionConfig {
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder::default()
    }
}

/// Builder for ConversionConfig
#[derive(Default)]
pub struct ConversionConfigBuilder {
    color_mode: Option<ColorMode>,
    exposure: Option<f32>,
    compression: Option<ExrCompression>,
    precision: Option<ExrPrecision>,
}

impl ConversionConfigBuilder {
    pub fn color_mode(mut self, color_mode: ColorMode) -> Self {
        self.color_mode = Some(color_mode);
        self
    }

    pub fn exposure(mut self, exposure: f32) -> Self {
        self.exposure = Some(exposure);
        self
    }

    pub fn compression(mut self, compression: ExrCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn precision(mut self, precision: ExrPrecision) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Fails with an argument error when the exposure is not a positive number.
    pub fn build(self) -> Result<ConversionConfig> {
        let default = ConversionConfig::default();
        let options = ConversionOptions::new(
            self.color_mode.unwrap_or(default.options.color_mode),
            self.exposure.unwrap_or(default.options.exposure),
        )?;
        Ok(ConversionConfig {
            options,
            compression: self.compression.unwrap_or(default.compression),
            precision: self.precision.unwrap_or(default.precision),
        })
    }
}
