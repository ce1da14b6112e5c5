use std::io::BufWriter;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{info, instrument};

use crate::image_pipeline::{
    common::error::{ConversionError, Result},
    conversions::timing::PipelineTimings,
    exr::{ConversionConfig, ExrOutput, ExrWriter, StandardExrWriter},
    pixel::convert_frame,
    raw::{GeometryOverride, RawDecoder, RawFrame, RawLoaderDecoder, SensorImage},
};

/// Per-file 3FR to EXR conversion: decode, force the full sensor area,
/// develop, convert pixels, encode.
pub struct RawToExrPipeline<D: RawDecoder, W: ExrWriter> {
    decoder: D,
    writer: W,
    config: ConversionConfig,
}

impl RawToExrPipeline<RawLoaderDecoder, StandardExrWriter> {
    pub fn new(config: ConversionConfig) -> Self {
        Self {
            decoder: RawLoaderDecoder,
            writer: StandardExrWriter,
            config,
        }
    }
}

impl<D: RawDecoder, W: ExrWriter> RawToExrPipeline<D, W> {
    pub fn with_custom(decoder: D, writer: W, config: ConversionConfig) -> Self {
        Self {
            decoder,
            writer,
            config,
        }
    }

    fn validate_frame(&self, frame: &RawFrame) -> Result<()> {
        if frame.width == 0 || frame.height == 0 {
            return Err(ConversionError::ImageCreation(format!(
                "decoder produced an empty {}x{} image",
                frame.width, frame.height
            )));
        }

        Ok(())
    }

    #[instrument(skip(self, input_data, output), fields(input_size = input_data.len()))]
    pub fn convert(&self, input_data: &[u8], output: &mut dyn ExrOutput) -> Result<()> {
        self.convert_with_timings(input_data, output).map(|_| ())
    }

    pub fn convert_with_timings(
        &self,
        input_data: &[u8],
        output: &mut dyn ExrOutput,
    ) -> Result<PipelineTimings> {
        let mut timings = PipelineTimings::new();
        let sensor = self.decode(input_data, &mut timings)?;
        self.develop_and_encode(sensor, output, &mut timings)?;
        Ok(timings)
    }

    fn decode(&self, input_data: &[u8], timings: &mut PipelineTimings) -> Result<SensorImage> {
        info!("Starting 3FR to EXR conversion");

        timings.measure("decode_raw", || {
            let _span = tracing::info_span!("decode_raw").entered();
            self.decoder.open(input_data)
        })
    }

    /// Runs everything after unpacking. The sensor data is released once the
    /// frame is developed and the frame once the float raster exists.
    fn develop_and_encode(
        &self,
        sensor: SensorImage,
        output: &mut dyn ExrOutput,
        timings: &mut PipelineTimings,
    ) -> Result<()> {
        // The region must be fixed before the develop stage touches any pixel.
        let directive = GeometryOverride::full_sensor(&sensor.geometry)?;

        let frame = timings.measure("develop", || {
            let _span = tracing::info_span!("develop").entered();
            self.decoder.process(sensor, directive.region())
        })?;

        {
            let _span = tracing::info_span!(
                "validate_frame",
                width = frame.width,
                height = frame.height
            )
            .entered();
            self.validate_frame(&frame)?;
        }

        info!(
            color_mode = ?self.config.options.color_mode,
            exposure = self.config.options.exposure,
            "Converting {}x{} frame with {} colors, {}-bit",
            frame.width,
            frame.height,
            frame.channels,
            frame.bits
        );

        let raster = timings.measure("convert_pixels", || {
            let _span = tracing::info_span!("convert_pixels").entered();
            convert_frame(&frame, &self.config.options)
        })?;
        drop(frame);

        timings.measure("encode_exr", || {
            let _span = tracing::info_span!("encode_exr").entered();
            self.writer.write_exr(&raster, output, &self.config)
        })?;

        info!(
            width = raster.width,
            height = raster.height,
            "Conversion complete in {:.3}ms",
            timings.total_duration().as_secs_f64() * 1000.0
        );
        Ok(())
    }

    #[instrument(skip(self, input_path, output_path))]
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<()> {
        self.convert_file_with_timings(input_path, output_path)
            .map(|_| ())
    }

    /// Converts one file. The EXR is encoded into a temporary file next to
    /// `output_path` and renamed over it on success, so failed conversions
    /// leave nothing behind.
    pub fn convert_file_with_timings<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<PipelineTimings> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Converting file"
        );

        let mut timings = PipelineTimings::new();

        let input_data = timings.measure("read_input_file", || {
            std::fs::read(input_path).map_err(|e| {
                ConversionError::DecodeOpen(format!("{}: {}", input_path.display(), e))
            })
        })?;

        let sensor = self.decode(&input_data, &mut timings)?;
        drop(input_data);

        let mut staged = stage_output(output_path)?;
        {
            let mut writer = BufWriter::new(staged.as_file_mut());
            self.develop_and_encode(sensor, &mut writer, &mut timings)?;
        }

        timings.measure("write_output_file", || {
            staged.persist(output_path).map(|_| ()).map_err(|e| {
                ConversionError::Write(format!("{}: {}", output_path.display(), e.error))
            })
        })?;

        Ok(timings)
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }
}

/// Creates the temporary file an EXR is encoded into before it is renamed to
/// `output_path`. It is deleted when dropped without being persisted.
fn stage_output(output_path: &Path) -> Result<NamedTempFile> {
    let dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let write_error =
        |e: std::io::Error| ConversionError::Write(format!("{}: {}", output_path.display(), e));

    let staged = tempfile::Builder::new()
        .prefix(".")
        .suffix(".exr.partial")
        .tempfile_in(dir)
        .map_err(write_error)?;

    // Temporary files are created owner-only; outputs get regular file permissions.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        staged
            .as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))
            .map_err(write_error)?;
    }

    Ok(staged)
}
