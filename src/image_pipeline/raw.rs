//! RAW image decoding module
//!
//! Unpacks sensor data, exposes its geometry, and develops a chosen region
//! into a processed RGB frame.

mod reader;
mod rawloader_reader;
pub mod geometry;
pub mod types;

pub use reader::RawDecoder;
pub use rawloader_reader::RawLoaderDecoder;
pub use geometry::{GeometryOverride, ProcessingRegion, SensorGeometry};
pub use types::{BayerPattern, RawFrame, SensorImage, SensorLayout};
