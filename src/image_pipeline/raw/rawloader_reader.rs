//! RAW decoder implementation using the rawloader library.
//!
//! rawloader unpacks Hasselblad 3FR (and most other Bayer formats) into a
//! full-sensor sample buffer together with the crop the camera considers
//! visible. Development (demosaic, white balance, color) is done by
//! [`CpuDeveloper`] over whatever region the caller selected.

use std::io::Cursor;

use rawloader::RawImageData as RawloaderImageData;
use tracing::{debug, info};

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::develop::CpuDeveloper;
use crate::image_pipeline::raw::geometry::{ProcessingRegion, SensorGeometry};
use crate::image_pipeline::raw::reader::RawDecoder;
use crate::image_pipeline::raw::types::{BayerPattern, RawFrame, SensorImage, SensorLayout};

/// RAW decoder backed by rawloader and the CPU develop stage.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawLoaderDecoder;

impl RawLoaderDecoder {
    fn sensor_layout(decoded: &rawloader::RawImage) -> Result<SensorLayout> {
        match decoded.cpp {
            1 => {
                let tile = [
                    [decoded.cfa.color_at(0, 0), decoded.cfa.color_at(0, 1)],
                    [decoded.cfa.color_at(1, 0), decoded.cfa.color_at(1, 1)],
                ];
                BayerPattern::from_tile(tile)
                    .map(SensorLayout::Bayer)
                    .ok_or_else(|| {
                        ConversionError::DecodeUnpack(format!(
                            "unsupported color filter layout '{}'",
                            decoded.cfa.name
                        ))
                    })
            }
            3 => Ok(SensorLayout::Rgb),
            cpp => Err(ConversionError::DecodeUnpack(format!(
                "unsupported component count per pixel: {}",
                cpp
            ))),
        }
    }
}

impl RawDecoder for RawLoaderDecoder {
    /// Decodes the container and unpacks the sensor samples without developing them.
    ///
    /// Integer samples are kept as-is; float samples (normalized 0.0-1.0) are
    /// scaled to the u16 range and the levels reset to match.
    fn open(&self, data: &[u8]) -> Result<SensorImage> {
        debug!("Decoding RAW image, {} bytes", data.len());

        let decoded = rawloader::decode(&mut Cursor::new(data))
            .map_err(|e| ConversionError::DecodeOpen(e.to_string()))?;

        info!(
            make = %decoded.make,
            model = %decoded.model,
            "Decoded RAW container"
        );

        let layout = Self::sensor_layout(&decoded)?;
        let geometry = SensorGeometry::from_crops(decoded.width, decoded.height, decoded.crops);

        info!(
            "Raw sensor size: {}x{}, visible area: {}x{} (top margin {}, left margin {})",
            geometry.raw_width,
            geometry.raw_height,
            geometry.visible_width,
            geometry.visible_height,
            geometry.top_margin,
            geometry.left_margin
        );

        let (samples, black_levels, white_levels) = match decoded.data {
            RawloaderImageData::Integer(values) => {
                (values, decoded.blacklevels, decoded.whitelevels)
            }
            RawloaderImageData::Float(values) => {
                let scaled = values
                    .iter()
                    .map(|&v| (v.clamp(0.0, 1.0) * u16::MAX as f32) as u16)
                    .collect();
                (scaled, [0; 4], [u16::MAX; 4])
            }
        };

        let expected = decoded.width * decoded.height * decoded.cpp;
        if samples.len() < expected {
            return Err(ConversionError::DecodeUnpack(format!(
                "sensor buffer holds {} samples, expected {}",
                samples.len(),
                expected
            )));
        }

        debug!(
            "Levels: black {:?}, white {:?}, wb {:?}",
            black_levels, white_levels, decoded.wb_coeffs
        );

        Ok(SensorImage {
            geometry,
            layout,
            data: samples,
            black_levels,
            white_levels,
            wb_coeffs: decoded.wb_coeffs,
            xyz_to_cam: decoded.xyz_to_cam,
        })
    }

    fn process(&self, image: SensorImage, region: &ProcessingRegion) -> Result<RawFrame> {
        region.validate(&image.geometry)?;

        let frame = CpuDeveloper::new()
            .process(&image, region)
            .map_err(|e| ConversionError::DecodeProcess(e.to_string()))?;

        info!(
            "Processed image: {}x{} with {} colors, {}-bit",
            frame.width, frame.height, frame.channels, frame.bits
        );
        Ok(frame)
    }
}
