//! Pixel conversion module
//!
//! Turns a processed 8/16-bit gray or RGB frame into the floating-point RGBA
//! raster stored in the EXR file.

mod convert;
pub mod tone;
pub mod types;


pub use convert::{convert_frame, transform};
pub use types::{
    ChannelLayout, ColorMode, ConversionOptions, FloatRaster, PixelFormat, SampleDepth,
};
