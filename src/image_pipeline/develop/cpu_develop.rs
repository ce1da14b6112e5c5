use std::borrow::Cow;
use std::io::{self, Read};

use anyhow::{Result, anyhow, bail};
use bayer::{BayerDepth, CFA, Demosaic, RasterDepth, RasterMut};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::image_pipeline::develop::color::{self, Matrix3};
use crate::image_pipeline::pixel::tone::srgb_encode;
use crate::image_pipeline::raw::{BayerPattern, ProcessingRegion, RawFrame, SensorImage, SensorLayout};

/// Develops unpacked sensor data into a 16-bit, sRGB-encoded RGB frame.
///
/// Camera white balance, no auto brightness, no highlight recovery (clip),
/// no rotation.
pub struct CpuDeveloper {
    algorithm: Demosaic,
}

impl Default for CpuDeveloper {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuDeveloper {
    pub fn new() -> Self {
        Self {
            algorithm: Demosaic::Cubic,
        }
    }

    pub fn with_algorithm(algorithm: Demosaic) -> Self {
        Self { algorithm }
    }

    pub fn process(&self, image: &SensorImage, region: &ProcessingRegion) -> Result<RawFrame> {
        let width = region.width;
        let height = region.height;
        info!(
            "Developing {}x{} region at ({}, {})",
            width, height, region.left, region.top
        );

        let cropped = crop(image, region);

        // 16-bit RGB, native byte order; demosaiced into, then developed in place.
        let mut data = match image.layout {
            SensorLayout::Bayer(pattern) => {
                let pattern = pattern.shifted(region.left, region.top);
                self.demosaic(&cropped, width, height, pattern)?
            }
            SensorLayout::Rgb => cropped.iter().flat_map(|v| v.to_ne_bytes()).collect(),
        };
        drop(cropped);

        let cam_to_srgb = color::camera_to_srgb(&image.xyz_to_cam);
        let levels = Levels::new(image);
        debug!("Camera to sRGB matrix: {:?}", cam_to_srgb);

        data.par_chunks_exact_mut(6).for_each(|pixel| {
            let src = [0, 1, 2].map(|c| u16::from_ne_bytes([pixel[2 * c], pixel[2 * c + 1]]));
            let developed = develop_pixel(src, &levels, &cam_to_srgb);
            for (c, value) in developed.iter().enumerate() {
                pixel[2 * c..2 * c + 2].copy_from_slice(&value.to_ne_bytes());
            }
        });

        Ok(RawFrame {
            width,
            height,
            channels: 3,
            bits: 16,
            data,
        })
    }

    /// Demosaics into a `width x height` 16-bit RGB byte buffer.
    fn demosaic(
        &self,
        samples: &[u16],
        width: usize,
        height: usize,
        pattern: BayerPattern,
    ) -> Result<Vec<u8>> {
        let cfa = match pattern {
            BayerPattern::Rggb => CFA::RGGB,
            BayerPattern::Bggr => CFA::BGGR,
            BayerPattern::Grbg => CFA::GRBG,
            BayerPattern::Gbrg => CFA::GBRG,
        };

        let expected = width * height * 3 * 2;
        let mut output_buf = vec![0u8; expected];

        debug!(
            "Running demosaic with CFA={:?}, algo={:?}, {} samples",
            pattern,
            self.algorithm,
            samples.len()
        );

        {
            let mut reader = SampleReader::new(samples);
            let mut output_raster =
                RasterMut::new(width, height, RasterDepth::Depth16, &mut output_buf);
            bayer::run_demosaic(
                &mut reader,
                BayerDepth::Depth16LE,
                cfa,
                self.algorithm,
                &mut output_raster,
            )
            .map_err(|e| anyhow!("Demosaic failed: {:?}", e))?;
        }

        if output_buf.len() != expected {
            bail!(
                "demosaic produced {} bytes, expected {}",
                output_buf.len(),
                expected
            );
        }
        Ok(output_buf)
    }
}

/// Streams u16 samples as little-endian bytes without materializing them.
struct SampleReader<'a> {
    samples: &'a [u16],
    /// Byte offset into the little-endian stream
    pos: usize,
}

impl<'a> SampleReader<'a> {
    fn new(samples: &'a [u16]) -> Self {
        Self { samples, pos: 0 }
    }
}

impl Read for SampleReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let total = self.samples.len() * 2;
        let mut written = 0;
        while written < buf.len() && self.pos < total {
            let bytes = self.samples[self.pos / 2].to_le_bytes();
            let offset = self.pos % 2;
            let n = (2 - offset).min(buf.len() - written);
            buf[written..written + n].copy_from_slice(&bytes[offset..offset + n]);
            written += n;
            self.pos += n;
        }
        Ok(written)
    }
}

/// The region's samples, tightly packed. Borrows the sensor buffer when the
/// region covers all of it.
fn crop<'a>(image: &'a SensorImage, region: &ProcessingRegion) -> Cow<'a, [u16]> {
    let spp = image.samples_per_pixel();
    let stride = image.geometry.raw_width * spp;
    let full_sensor = region.left == 0
        && region.top == 0
        && region.width == image.geometry.raw_width
        && region.height == image.geometry.raw_height;
    if full_sensor {
        return Cow::Borrowed(&image.data[..stride * region.height]);
    }

    let row_len = region.width * spp;
    let mut out = Vec::with_capacity(row_len * region.height);
    for row in region.top..region.top + region.height {
        let start = row * stride + region.left * spp;
        out.extend_from_slice(&image.data[start..start + row_len]);
    }
    Cow::Owned(out)
}

/// Black/white levels and white balance per output channel.
struct Levels {
    black: [f32; 3],
    range: [f32; 3],
    wb: [f32; 3],
}

impl Levels {
    fn new(image: &SensorImage) -> Self {
        let black = [0, 1, 2].map(|c| image.black_levels[c] as f32);
        let range = [0, 1, 2].map(|c| (image.white_levels[c] as f32 - black[c]).max(1.0));

        let [r, g, b, _] = image.wb_coeffs;
        let wb = if g.is_finite() && g > 0.0 && r.is_finite() && b.is_finite() && r > 0.0 && b > 0.0
        {
            [r / g, 1.0, b / g]
        } else {
            [1.0, 1.0, 1.0]
        };

        Self { black, range, wb }
    }
}

#[inline]
fn develop_pixel(src: [u16; 3], levels: &Levels, cam_to_srgb: &Matrix3) -> [u16; 3] {
    let camera = [0, 1, 2].map(|c| {
        let normalized = (src[c] as f32 - levels.black[c]).max(0.0) / levels.range[c];
        (normalized * levels.wb[c]).min(1.0)
    });
    color::apply(cam_to_srgb, camera)
        .map(|linear| (srgb_encode(linear) * u16::MAX as f32).round() as u16)
}
