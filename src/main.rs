use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tfr_exr_rs::image_pipeline::{
    BatchRunner, ColorMode, ConversionConfig, ExrCompression, ExrPrecision, RawToExrPipeline,
};
use tfr_exr_rs::logger;

use tracing::{error, info};

#[derive(Parser)]
#[command(name = "batch_3fr_to_exr")]
#[command(version, about = "Batch converter from Hasselblad 3FR raw files to OpenEXR", long_about = None)]
struct Cli {
    /// Directory containing the .3fr files; results go to <INPUT_DIR>/EXR
    #[arg(value_name = "INPUT_DIR")]
    input_dir: PathBuf,

    /// Store the decoder's values as-is instead of undoing the sRGB curve
    #[arg(long)]
    linear: bool,

    /// Exposure multiplier; any value other than 1.0 applies Reinhard tone mapping
    #[arg(long, value_name = "VALUE", default_value = "1.0")]
    exposure: f32,

    /// EXR compression (none, rle, zip or piz)
    #[arg(long, value_name = "METHOD", default_value = "zip")]
    compression: ExrCompression,

    /// Write 16-bit half floats instead of 32-bit floats
    #[arg(long)]
    half: bool,

    /// Number of files converted in parallel (at least 1)
    #[arg(short = 'j', long, value_name = "N", default_value = "1")]
    jobs: NonZeroUsize,

    /// Print each file's per-step timings
    #[arg(long)]
    timings: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version are reported on stdout and are not failures
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    logger::init("info");

    info!("Hasselblad 3FR to EXR batch converter");

    let config = ConversionConfig::builder()
        .color_mode(if cli.linear {
            ColorMode::Passthrough
        } else {
            ColorMode::SrgbToLinear
        })
        .exposure(cli.exposure)
        .compression(cli.compression)
        .precision(if cli.half {
            ExrPrecision::Half
        } else {
            ExrPrecision::Full
        })
        .build();
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Input directory: {}", cli.input_dir.display());
    info!(
        "EXR compression: {}, precision: {:?}",
        config.compression, config.precision
    );

    let pipeline = RawToExrPipeline::new(config);
    let runner = BatchRunner::new(&pipeline)
        .with_jobs(cli.jobs)
        .with_timings(cli.timings);

    match runner.run(&cli.input_dir) {
        Ok(summary) => {
            summary.print();
            ExitCode::from(summary.exit_code())
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
