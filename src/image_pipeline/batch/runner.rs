use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{error, info, warn};

use crate::image_pipeline::batch::discovery::{
    check_input_dir, ensure_output_dir, find_inputs, output_dir_for, output_path_for,
};
use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::conversions::{PipelineTimings, RawToExrPipeline};
use crate::image_pipeline::exr::ExrWriter;
use crate::image_pipeline::pixel::ColorMode;
use crate::image_pipeline::raw::RawDecoder;

/// Result of converting one input file.
#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub result: Result<PipelineTimings>,
}

impl FileOutcome {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// Tally of a batch run, in input order.
#[derive(Debug)]
pub struct BatchSummary {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub outcomes: Vec<FileOutcome>,
}

impl BatchSummary {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &ConversionError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.input.as_path(), e)))
    }

    /// 0 when every file converted (or there was nothing to convert), 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.failed() > 0 { 1 } else { 0 }
    }

    pub fn print(&self) {
        if self.outcomes.is_empty() {
            println!("No 3FR files found in directory: {}", self.input_dir.display());
            return;
        }

        println!();
        println!("Batch conversion completed!");
        println!("Successfully converted: {} files", self.succeeded());
        println!("Failed conversions: {} files", self.failed());
        for (input, err) in self.failures() {
            println!("  {}: {}", display_name(input), err);
        }
        println!("Output directory: {}", self.output_dir.display());
    }
}

/// Drives a pipeline over every 3FR file of a directory.
///
/// A failing file is logged and tallied; it never stops the batch. Only
/// directory problems abort the run.
pub struct BatchRunner<'a, D: RawDecoder, W: ExrWriter> {
    pipeline: &'a RawToExrPipeline<D, W>,
    jobs: NonZeroUsize,
    print_timings: bool,
}

impl<'a, D, W> BatchRunner<'a, D, W>
where
    D: RawDecoder + Sync,
    W: ExrWriter + Sync,
{
    pub fn new(pipeline: &'a RawToExrPipeline<D, W>) -> Self {
        Self {
            pipeline,
            jobs: NonZeroUsize::MIN,
            print_timings: false,
        }
    }

    /// Number of files converted concurrently; 1 keeps the run sequential.
    pub fn with_jobs(mut self, jobs: NonZeroUsize) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn with_timings(mut self, print_timings: bool) -> Self {
        self.print_timings = print_timings;
        self
    }

    pub fn run(&self, input_dir: &Path) -> Result<BatchSummary> {
        check_input_dir(input_dir)?;
        let output_dir = output_dir_for(input_dir);
        let inputs = find_inputs(input_dir)?;

        if inputs.is_empty() {
            warn!("No 3FR files found in directory: {}", input_dir.display());
            return Ok(BatchSummary {
                input_dir: input_dir.to_path_buf(),
                output_dir,
                outcomes: Vec::new(),
            });
        }

        ensure_output_dir(&output_dir)?;

        info!("Found {} 3FR file(s) to process", inputs.len());
        for input in &inputs {
            info!("  {}", display_name(input));
        }

        let options = &self.pipeline.config().options;
        info!(
            "Processing mode: {}",
            match options.color_mode {
                ColorMode::SrgbToLinear => "sRGB->Linear conversion",
                ColorMode::Passthrough => "Linear (no conversion)",
            }
        );
        info!("Exposure multiplier: {}", options.exposure);

        let outcomes = if self.jobs.get() > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.jobs.get())
                .build()
                .map_err(|e| {
                    ConversionError::Argument(format!("failed to start worker pool: {}", e))
                })?;
            info!("Using {} worker threads", self.jobs);
            pool.install(|| {
                inputs
                    .par_iter()
                    .map(|input| self.convert_one(input, &output_dir))
                    .collect()
            })
        } else {
            inputs
                .iter()
                .map(|input| self.convert_one(input, &output_dir))
                .collect()
        };

        Ok(BatchSummary {
            input_dir: input_dir.to_path_buf(),
            output_dir,
            outcomes,
        })
    }

    fn convert_one(&self, input: &Path, output_dir: &Path) -> FileOutcome {
        let output = output_path_for(input, output_dir);
        let input_name = display_name(input);

        info!("Converting: {} -> {}", input_name, display_name(&output));

        let result = self.pipeline.convert_file_with_timings(input, &output);
        match &result {
            Ok(timings) => {
                info!("Successfully converted {}", input_name);
                timings.log_summary(&input_name);
                if self.print_timings {
                    timings.print_summary(&input_name);
                }
            }
            Err(e) => error!("Failed to convert {}: {}", input_name, e),
        }

        FileOutcome {
            input: input.to_path_buf(),
            output,
            result,
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
