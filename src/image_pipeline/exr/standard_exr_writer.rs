use std::io::Write;

use exr::compression::Compression;
use exr::prelude::{Encoding, Image, Layer, LayerAttributes, SpecificChannels, Vec2, WritableImage, f16};
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::exr::types::{ConversionConfig, ExrCompression, ExrPrecision};
use crate::image_pipeline::exr::writer::{ExrOutput, ExrWriter};
use crate::image_pipeline::pixel::FloatRaster;

const LAYER_NAME: &str = "main";

/// Writes a single RGBA scanline layer using the `exr` crate.
///
/// Blocks are encoded straight into the output; no copy of the file is kept
/// in memory.
pub struct StandardExrWriter;

impl ExrWriter for StandardExrWriter {
    fn write_exr(&self, raster: &FloatRaster, output: &mut dyn ExrOutput, config: &ConversionConfig) -> Result<()> {
        debug!("Encoding EXR image: {}x{}", raster.width, raster.height);

        if raster.pixels.len() != raster.width * raster.height {
            return Err(ConversionError::Write(format!(
                "raster holds {} pixels, expected {}x{}",
                raster.pixels.len(),
                raster.width,
                raster.height
            )));
        }

        let compression = match config.compression {
            ExrCompression::None => Compression::Uncompressed,
            ExrCompression::Rle => Compression::RLE,
            ExrCompression::Zip => Compression::ZIP16,
            ExrCompression::Piz => Compression::PIZ,
        };
        let encoding = Encoding {
            compression,
            ..Encoding::UNCOMPRESSED
        };

        let size = (raster.width, raster.height);
        let width = raster.width;

        let written = match config.precision {
            ExrPrecision::Full => {
                let channels = SpecificChannels::rgba(|Vec2(x, y): Vec2<usize>| {
                    let [r, g, b, a] = raster.pixels[y * width + x];
                    (r, g, b, a)
                });
                let layer = Layer::new(size, LayerAttributes::named(LAYER_NAME), encoding, channels);
                Image::from_layer(layer).write().to_buffered(&mut *output)
            }
            ExrPrecision::Half => {
                let channels = SpecificChannels::rgba(|Vec2(x, y): Vec2<usize>| {
                    let [r, g, b, a] = raster.pixels[y * width + x];
                    (f16::from_f32(r), f16::from_f32(g), f16::from_f32(b), f16::from_f32(a))
                });
                let layer = Layer::new(size, LayerAttributes::named(LAYER_NAME), encoding, channels);
                Image::from_layer(layer).write().to_buffered(&mut *output)
            }
        };
        written.map_err(|e| ConversionError::Write(e.to_string()))?;
        output
            .flush()
            .map_err(|e| ConversionError::Write(e.to_string()))?;

        debug!("EXR encoding complete");
        Ok(())
    }
}
