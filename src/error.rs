use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while extracting a palette
#[derive(Debug, Error)]
pub enum Error {
    /// The input path does not point at an existing file
    #[error("File not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// The file exists but could not be decoded as an image
    #[error("{0}")]
    Decode(#[from] image::ImageError),

    /// A sample coordinate fell outside the image
    #[error("Sample out of range: ({x}, {y})")]
    SampleOutOfRange {
        /// Column of the sample
        x: u32,
        /// Row of the sample
        y: u32,
    },
}
