//! Shared error type used by every pipeline stage.

pub mod error;

pub use error::{ConversionError, Result};
