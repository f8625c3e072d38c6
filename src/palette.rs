use std::fmt;
use std::path::Path;

use image::{GenericImageView, Pixel};

use crate::settings::{MIN_DISTANCE, PALETTE_SIZE};
use crate::{Bucket, Color, Error, Quantizer};

/// Palette of dominant colors
#[derive(Debug, Default)]
pub struct Palette {
    /// Palette of Colors, most frequent first
    pub palette: Vec<Color>,
    scanned: usize,
}

impl Palette {
    /// Create a new palette from an image
    ///
    /// The image is bucketed with [`Bucket`] and the ranked buckets are reduced to at most
    /// `PALETTE_SIZE` colors that are at least `MIN_DISTANCE` apart.
    pub fn new<P, G>(image: &G) -> Palette
    where
        P: Pixel<Subpixel = u8> + 'static,
        G: GenericImageView<Pixel = P>,
    {
        let ranked = Bucket.quantize(image);
        let scanned = ranked.len();
        let palette = distinct(ranked, PALETTE_SIZE, MIN_DISTANCE);
        tracing::debug!(scanned, kept = palette.len(), "Filtered palette");

        Palette { palette, scanned }
    }

    /// Open and decode the image at `path`, then build its palette
    pub fn from_path<T: AsRef<Path>>(path: T) -> Result<Palette, Error> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::MissingFile(path.to_path_buf()));
        }

        tracing::debug!(path = %path.display(), "Decoding image");
        let image = image::open(path)?;
        Ok(Palette::new(&image))
    }

    /// Number of distinct quantized colors that were ranked
    pub fn scanned(&self) -> usize {
        self.scanned
    }

    /// Number of colors in the palette
    pub fn len(&self) -> usize {
        self.palette.len()
    }

    /// Whether no color survived sampling
    pub fn is_empty(&self) -> bool {
        self.palette.is_empty()
    }

    /// Colors in descending population
    pub fn iter(&self) -> impl Iterator<Item = &Color> {
        self.palette.iter()
    }
}

/// Keeps ranked colors that are at least `threshold` away from every color kept before them
fn distinct<I>(ranked: I, size: usize, threshold: u32) -> Vec<Color>
where
    I: IntoIterator<Item = Color>,
{
    let mut accepted: Vec<Color> = Vec::with_capacity(size);
    for candidate in ranked {
        if accepted.len() >= size {
            break;
        }
        if accepted.iter().all(|c| c.distance(&candidate) >= threshold) {
            accepted.push(candidate);
        }
    }
    accepted
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Scanning {} colors...", self.scanned)?;
        for color in &self.palette {
            write!(f, "\n{}", color)?;
        }
        Ok(())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let [r, g, b] = self.color.0;
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
    }
}
