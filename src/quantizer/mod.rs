use image::{GenericImageView, Pixel, Rgb};

mod bucket;

pub use bucket::Bucket;

use crate::settings::BUCKET_SIZE;

/// Color with population
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub struct Color {
    /// Color
    pub color: Rgb<u8>,
    /// Population
    pub population: usize,
}

impl Color {
    /// Manhattan distance between the RGB channels of two colors
    pub fn distance(&self, other: &Color) -> u32 {
        self.color
            .0
            .iter()
            .zip(other.color.0.iter())
            .map(|(a, b)| u32::from(a.abs_diff(*b)))
            .sum()
    }
}

/// Snaps a channel value to the center of its bucket
///
/// ```
/// assert_eq!(dominant::bucket(50), 56);
/// assert_eq!(dominant::bucket(255), 248);
/// ```
pub fn bucket(value: u8) -> u8 {
    (value / BUCKET_SIZE) * BUCKET_SIZE + BUCKET_SIZE / 2
}

/// Quantizer trait
pub trait Quantizer {
    /// Counts the quantized colors of the image, most frequent first
    fn quantize<I, P>(&self, image: &I) -> Vec<Color>
    where
        P: Pixel<Subpixel = u8> + 'static,
        I: GenericImageView<Pixel = P>;
}
