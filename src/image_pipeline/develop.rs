//! Develop stage: turns unpacked Bayer sensor data into a processed RGB frame
//! (demosaic, black level, white balance, camera to sRGB, sRGB encoding).

pub mod color;
pub mod cpu_develop;

pub use cpu_develop::CpuDeveloper;
