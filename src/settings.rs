//! Fixed tuning of the extraction pipeline

/// Width of a quantization bucket on each channel
pub const BUCKET_SIZE: u8 = 16;

/// Only every `SAMPLE_STEP`th pixel is read, on both axes
pub const SAMPLE_STEP: u32 = 5;

/// Pixels with an alpha below this value count as transparent
pub const MIN_ALPHA: u8 = 128;

/// Maximum number of colors in a palette
pub const PALETTE_SIZE: usize = 8;

/// Minimum Manhattan distance between any two palette colors
pub const MIN_DISTANCE: u32 = 60;
