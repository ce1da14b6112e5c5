use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::pixel::tone::{reinhard, srgb_decode};
use crate::image_pipeline::pixel::types::{
    ChannelLayout, ColorMode, ConversionOptions, FloatRaster, PixelFormat,
};
use crate::image_pipeline::raw::RawFrame;

/// Converts a processed frame into a floating-point RGBA raster.
///
/// Every color sample goes through the same three steps: normalize by the
/// bit depth's full scale, optionally undo the sRGB curve, optionally apply
/// the exposure tone map. Gray frames are replicated into R, G and B; alpha
/// is always 1.0.
pub fn convert_frame(frame: &RawFrame, options: &ConversionOptions) -> Result<FloatRaster> {
    let format = PixelFormat::from_frame(frame.channels, frame.bits)?;

    let expected = frame.width * frame.height * format.bytes_per_pixel();
    if frame.data.len() != expected {
        return Err(ConversionError::ImageCreation(format!(
            "frame buffer holds {} bytes, expected {} for {}x{}",
            frame.data.len(),
            expected,
            frame.width,
            frame.height
        )));
    }

    debug!(
        ?format,
        color_mode = ?options.color_mode,
        exposure = options.exposure,
        "Converting {}x{} frame",
        frame.width,
        frame.height
    );

    let channels = format.layout.channels();
    let pixel_count = frame.width * frame.height;
    let mut pixels = Vec::with_capacity(pixel_count);

    for index in 0..pixel_count {
        let base = index * channels;
        let sample = |c: usize| transform(format.depth.normalize(&frame.data, base + c), options);

        let pixel = match format.layout {
            ChannelLayout::Rgb => [sample(0), sample(1), sample(2), 1.0],
            ChannelLayout::Gray => {
                let gray = sample(0);
                [gray, gray, gray, 1.0]
            }
        };
        pixels.push(pixel);
    }

    Ok(FloatRaster {
        width: frame.width,
        height: frame.height,
        pixels,
    })
}

/// Color-space and tone decisions for one normalized sample.
#[inline]
pub fn transform(value: f32, options: &ConversionOptions) -> f32 {
    let value = match options.color_mode {
        ColorMode::SrgbToLinear => srgb_decode(value),
        ColorMode::Passthrough => value,
    };

    if options.tone_maps() {
        reinhard(value, options.exposure)
    } else {
        value
    }
}
