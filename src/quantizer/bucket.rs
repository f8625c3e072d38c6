use std::cmp::Reverse;

use image::{GenericImageView, Pixel, Rgba};
use itertools::Itertools;

use crate::settings::{BUCKET_SIZE, MIN_ALPHA, SAMPLE_STEP};
use crate::{Color, Error, Quantizer};

/// Bits per channel of a bucket index, 256 / `BUCKET_SIZE` levels
const BITS: usize = 4;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
struct Rgb<T> {
    r: T,
    g: T,
    b: T,
}

impl<T> Rgb<T> {
    fn map<O>(self, mut f: impl FnMut(T) -> O) -> Rgb<O> {
        Rgb {
            r: f(self.r),
            g: f(self.g),
            b: f(self.b),
        }
    }
}

impl Rgb<u8> {
    fn into_image_rgb(self) -> image::Rgb<u8> {
        image::Rgb([self.r, self.g, self.b])
    }
}

#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
struct Quantized(u8);

impl Quantized {
    fn from_color(color: u8) -> Self {
        Self(color / BUCKET_SIZE)
    }

    fn from_value_unchecked(value: usize) -> Self {
        debug_assert!(value < 1 << BITS);
        Self(value as u8)
    }

    fn as_usize(&self) -> usize {
        self.0 as usize
    }

    /// Center of the bucket, the same value `crate::bucket` yields
    fn center(&self) -> u8 {
        self.0 * BUCKET_SIZE + BUCKET_SIZE / 2
    }
}

fn color_index(Rgb { r, g, b }: &Rgb<Quantized>) -> usize {
    (r.as_usize() << (2 * BITS)) | (g.as_usize() << BITS) | b.as_usize()
}

/// Reads one sample, refusing coordinates outside the image
fn sample<I, P>(image: &I, x: u32, y: u32) -> Result<Rgba<u8>, Error>
where
    P: Pixel<Subpixel = u8> + 'static,
    I: GenericImageView<Pixel = P>,
{
    if !image.in_bounds(x, y) {
        return Err(Error::SampleOutOfRange { x, y });
    }
    Ok(image.get_pixel(x, y).to_rgba())
}

struct Histogram {
    buckets: Vec<usize>,
}

impl Histogram {
    fn new() -> Self {
        Self {
            buckets: vec![0; 1 << (3 * BITS)],
        }
    }

    /// Counts every `SAMPLE_STEP`th pixel on both axes, skipping transparent ones
    fn from_image<I, P>(image: &I) -> Self
    where
        P: Pixel<Subpixel = u8> + 'static,
        I: GenericImageView<Pixel = P>,
    {
        let mut histogram = Self::new();
        let (width, height) = image.dimensions();
        let step = SAMPLE_STEP as usize;

        for x in (0..width).step_by(step) {
            for y in (0..height).step_by(step) {
                let rgba = match sample(image, x, y) {
                    Ok(rgba) => rgba,
                    Err(error) => {
                        tracing::trace!(%error, "Skipping sample");
                        continue;
                    }
                };

                let [r, g, b, a] = rgba.0;
                if a < MIN_ALPHA {
                    continue;
                }
                histogram.insert(&Rgb { r, g, b }.map(Quantized::from_color));
            }
        }

        histogram
    }

    fn insert(&mut self, color: &Rgb<Quantized>) {
        let index = color_index(color);
        self.buckets[index] += 1;
    }

    /// Non-empty buckets in ascending color order
    fn buckets(&self) -> impl Iterator<Item = (Rgb<Quantized>, usize)> + '_ {
        const MASK: usize = 0xFF >> (8 - BITS);
        self.buckets
            .iter()
            .enumerate()
            .filter(|(_, count)| **count != 0)
            .map(|(color, &count)| {
                (
                    Rgb {
                        r: Quantized::from_value_unchecked(color >> (2 * BITS)),
                        g: Quantized::from_value_unchecked((color >> BITS) & MASK),
                        b: Quantized::from_value_unchecked(color & MASK),
                    },
                    count,
                )
            })
    }

    /// Buckets by descending count, equal counts in ascending color order
    fn ranked(&self) -> Vec<Color> {
        self.buckets()
            .map(|(color, count)| Color {
                color: color.map(|q| q.center()).into_image_rgb(),
                population: count,
            })
            .sorted_by_key(|c| Reverse(c.population))
            .collect()
    }
}

/// Fixed-grid bucket quantizer
///
/// Samples the image on a `SAMPLE_STEP` grid, snaps each opaque sample to the
/// center of its `BUCKET_SIZE` bucket and ranks the buckets by population.
#[derive(Debug, Default)]
pub struct Bucket;

impl Quantizer for Bucket {
    fn quantize<I, P>(&self, image: &I) -> Vec<Color>
    where
        P: Pixel<Subpixel = u8> + 'static,
        I: GenericImageView<Pixel = P>,
    {
        let ranked = Histogram::from_image(image).ranked();
        tracing::debug!(
            width = image.width(),
            height = image.height(),
            colors = ranked.len(),
            "Built color histogram"
        );
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, RgbImage, RgbaImage};
    use pretty_assertions::assert_eq;

    fn rgb(r: u8, g: u8, b: u8) -> image::Rgb<u8> {
        image::Rgb([r, g, b])
    }

    fn ranked(image: &RgbaImage) -> Vec<(image::Rgb<u8>, usize)> {
        Bucket
            .quantize(image)
            .into_iter()
            .map(|c| (c.color, c.population))
            .collect()
    }

    #[test]
    fn test_center_matches_bucket() {
        for v in 0..=u8::MAX {
            assert_eq!(Quantized::from_color(v).center(), crate::bucket(v));
        }
    }

    #[test]
    fn test_solid_image_single_bucket() {
        let image = RgbImage::from_pixel(100, 100, rgb(200, 50, 50));
        let colors = Bucket.quantize(&image);
        assert_eq!(colors.len(), 1);
        assert_eq!(colors[0].color, rgb(200, 56, 56));
        // 20 columns x 20 rows of samples
        assert_eq!(colors[0].population, 400);
    }

    #[test]
    fn test_bucket_counts_are_populations() {
        let mut histogram = Histogram::new();
        let color = Rgb { r: 200, g: 50, b: 50 }.map(Quantized::from_color);
        for _ in 0..70_000 {
            histogram.insert(&color);
        }
        let count: usize = histogram.buckets[color_index(&color)];
        assert_eq!(count, 70_000);
        assert_eq!(
            histogram
                .ranked()
                .into_iter()
                .map(|c| (c.color, c.population))
                .collect::<Vec<_>>(),
            vec![(rgb(200, 56, 56), 70_000)]
        );
    }

    #[test]
    fn test_only_grid_pixels_are_sampled() {
        let mut image = RgbaImage::from_pixel(6, 6, Rgba([0, 0, 0, 255]));
        // Off-grid pixels never count.
        for (x, y) in [(1, 1), (4, 0), (0, 3), (5, 4)] {
            image.put_pixel(x, y, Rgba([255, 255, 255, 255]));
        }
        assert_eq!(ranked(&image), vec![(rgb(8, 8, 8), 4)]);
    }

    #[test]
    fn test_grid_covers_last_partial_step() {
        let mut image = RgbaImage::from_pixel(11, 1, Rgba([0, 0, 0, 255]));
        image.put_pixel(10, 0, Rgba([255, 0, 0, 255]));
        assert_eq!(
            ranked(&image),
            vec![(rgb(8, 8, 8), 2), (rgb(248, 8, 8), 1)]
        );
    }

    #[test]
    fn test_transparent_pixels_are_excluded() {
        let mut image = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 127]));
        image.put_pixel(5, 5, Rgba([0, 0, 255, 128]));
        assert_eq!(ranked(&image), vec![(rgb(8, 8, 248), 1)]);
    }

    #[test]
    fn test_fully_transparent_image_is_empty() {
        let image = RgbaImage::from_pixel(50, 50, Rgba([10, 200, 30, 0]));
        assert!(Bucket.quantize(&image).is_empty());
    }

    #[test]
    fn test_empty_image() {
        let image: RgbaImage = ImageBuffer::new(0, 0);
        assert!(Bucket.quantize(&image).is_empty());
    }

    #[test]
    fn test_near_colors_share_a_bucket() {
        let mut image = RgbaImage::from_pixel(10, 5, Rgba([32, 64, 96, 255]));
        image.put_pixel(5, 0, Rgba([47, 79, 111, 255]));
        assert_eq!(ranked(&image), vec![(rgb(40, 72, 104), 2)]);
    }

    #[test]
    fn test_ranked_by_population() {
        let mut image = RgbaImage::from_pixel(15, 5, Rgba([0, 0, 255, 255]));
        image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        assert_eq!(
            ranked(&image),
            vec![(rgb(8, 8, 248), 2), (rgb(248, 8, 8), 1)]
        );
    }

    #[test]
    fn test_ties_keep_ascending_color_order() {
        let mut image = RgbaImage::new(15, 1);
        image.put_pixel(0, 0, Rgba([255, 255, 255, 255]));
        image.put_pixel(5, 0, Rgba([0, 0, 0, 255]));
        image.put_pixel(10, 0, Rgba([0, 255, 0, 255]));
        assert_eq!(
            ranked(&image),
            vec![
                (rgb(8, 8, 8), 1),
                (rgb(8, 248, 8), 1),
                (rgb(248, 248, 248), 1),
            ]
        );
    }

    #[test]
    fn test_out_of_range_sample_is_an_error() {
        let image = RgbaImage::new(3, 3);
        match sample(&image, 3, 0) {
            Err(Error::SampleOutOfRange { x: 3, y: 0 }) => {}
            other => panic!("Expected SampleOutOfRange, got {:?}", other),
        }
        assert!(sample(&image, 2, 2).is_ok());
    }
}
