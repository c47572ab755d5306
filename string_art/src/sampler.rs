//! Brightness sampling along candidate chords.
//!
//! Brightness is the plain sum of a pixel's red, green and blue bytes
//! (`0..=765`). It is never divided by the channel count, so every score and
//! total in a run stays on the same scale.

use image::{Rgb, RgbImage};

use crate::geometry::{Point, Segment};

/// Brightness of a fully white pixel.
pub const MAX_BRIGHTNESS: f64 = 255.0 * 3.0;

/// Score of a chord that covers no pixel. Higher than any real average, so
/// such a chord is never picked.
pub const UNSELECTABLE: f64 = f64::INFINITY;

#[inline]
pub fn pixel_brightness(pixel: &Rgb<u8>) -> u32 {
    pixel.0.iter().map(|&channel| channel as u32).sum()
}

/// Average brightness of the pixels on the digital line from `from` toward
/// `to`. `from` is sampled, `to` is not; coincident points yield
/// [`UNSELECTABLE`].
pub fn average_brightness(image: &RgbImage, from: Point<usize>, to: Point<usize>) -> f64 {
    let (width, height) = (image.width() as usize, image.height() as usize);
    let mut sum = 0u64;
    let mut count = 0u64;
    for point in Segment::new(from, to).pixels() {
        if point.x < width && point.y < height {
            sum += pixel_brightness(image.get_pixel(point.x as u32, point.y as u32)) as u64;
            count += 1;
        }
    }
    if count > 0 {
        sum as f64 / count as f64
    } else {
        UNSELECTABLE
    }
}
