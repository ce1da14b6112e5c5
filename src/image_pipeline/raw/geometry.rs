//! Sensor geometry and the full-sensor processing override.
//!
//! Decoders crop to a vendor-defined visible rectangle by default. The
//! converter keeps the whole sensor array instead, border and calibration
//! pixels included, so the processing region is always rewritten to the raw
//! dimensions with zero margins before the develop stage runs.

use tracing::info;

use crate::image_pipeline::common::error::{ConversionError, Result};

/// Sensor dimensions as reported by the decoder before processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorGeometry {
    pub raw_width: usize,
    pub raw_height: usize,
    pub visible_width: usize,
    pub visible_height: usize,
    pub top_margin: usize,
    pub left_margin: usize,
}

impl SensorGeometry {
    /// Builds the geometry from a rawloader-style crop `[top, right, bottom, left]`.
    pub fn from_crops(raw_width: usize, raw_height: usize, crops: [usize; 4]) -> Self {
        let [top, right, bottom, left] = crops;
        Self {
            raw_width,
            raw_height,
            visible_width: raw_width.saturating_sub(left + right),
            visible_height: raw_height.saturating_sub(top + bottom),
            top_margin: top,
            left_margin: left,
        }
    }
}

/// Rectangle of the sensor handed to the develop stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingRegion {
    pub left: usize,
    pub top: usize,
    pub width: usize,
    pub height: usize,
}

impl ProcessingRegion {
    /// Checks that the region lies inside the sensor and is not empty.
    pub fn validate(&self, geometry: &SensorGeometry) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConversionError::DecodeProcess(format!(
                "empty processing region {}x{}",
                self.width, self.height
            )));
        }
        if self.left + self.width > geometry.raw_width
            || self.top + self.height > geometry.raw_height
        {
            return Err(ConversionError::DecodeProcess(format!(
                "processing region {}x{}+{}+{} exceeds sensor {}x{}",
                self.width,
                self.height,
                self.left,
                self.top,
                geometry.raw_width,
                geometry.raw_height
            )));
        }
        Ok(())
    }
}

/// Directive forcing the develop stage onto the whole sensor array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryOverride {
    region: ProcessingRegion,
}

impl GeometryOverride {
    /// Ignores the visible crop and selects `raw_width x raw_height` at (0, 0).
    ///
    /// Zero raw dimensions mean the decoder misread the file; that is reported
    /// as a decode failure rather than patched up.
    pub fn full_sensor(geometry: &SensorGeometry) -> Result<Self> {
        if geometry.raw_width == 0 || geometry.raw_height == 0 {
            return Err(ConversionError::DecodeUnpack(format!(
                "decoder reported invalid sensor size {}x{}",
                geometry.raw_width, geometry.raw_height
            )));
        }

        info!(
            raw_width = geometry.raw_width,
            raw_height = geometry.raw_height,
            visible_width = geometry.visible_width,
            visible_height = geometry.visible_height,
            top_margin = geometry.top_margin,
            left_margin = geometry.left_margin,
            "Forcing full sensor area"
        );

        Ok(Self {
            region: ProcessingRegion {
                left: 0,
                top: 0,
                width: geometry.raw_width,
                height: geometry.raw_height,
            },
        })
    }

    pub fn region(&self) -> &ProcessingRegion {
        &self.region
    }
}
