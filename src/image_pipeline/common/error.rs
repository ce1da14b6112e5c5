use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Failed to open RAW file: {0}")]
    DecodeOpen(String),

    #[error("Failed to unpack RAW data: {0}")]
    DecodeUnpack(String),

    #[error("Failed to process RAW data: {0}")]
    DecodeProcess(String),

    #[error("Failed to create processed image: {0}")]
    ImageCreation(String),

    #[error("Unsupported image format: {channels} channels, {bits} bits")]
    UnsupportedFormat { channels: u16, bits: u16 },

    #[error("Failed to write EXR file: {0}")]
    Write(String),

    #[error("Directory error: {0}")]
    Directory(String),

    #[error("Invalid arguments: {0}")]
    Argument(String),
}

pub type Result<T> = std::result::Result<T, ConversionError>;
