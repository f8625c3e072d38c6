//! Extract the dominant colors of an image
//!
//! The image is sampled on a coarse grid, every opaque sample is snapped to a fixed-size color
//! bucket, and the buckets are ranked by how often they occur. Walking that ranking, a color
//! joins the palette only when it is far enough from every color already in it.
//!
//! ```
//! use dominant::Palette;
//! use image::{Rgb, RgbImage};
//!
//! let image = RgbImage::from_pixel(100, 100, Rgb([200, 50, 50]));
//! let palette = Palette::new(&image);
//! assert_eq!(palette.to_string(), "Scanning 1 colors...\n#c83838");
//! ```

#![deny(missing_docs)]

pub use error::Error;
pub use palette::Palette;
pub use quantizer::*;

mod error;
mod palette;
mod quantizer;
pub mod settings;
