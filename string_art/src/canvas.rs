use image::{imageops::FilterType, DynamicImage, Rgb, RgbImage};

use crate::{
    geometry::{Point, Segment},
    grid::Grid,
    sampler::pixel_brightness,
};

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Paints every pixel of the chord between `a` and `b`, both ends included.
pub fn draw_chord(buffer: &mut RgbImage, a: Point<usize>, b: Point<usize>, color: Rgb<u8>) {
    let grid = Grid::from(&*buffer);
    for point in Segment::new(a, b).pixels_inclusive() {
        if grid.contains(point) {
            buffer.put_pixel(point.x as u32, point.y as u32, color);
        }
    }
}

/// Sum of the three per-channel means over the whole buffer.
pub fn total_brightness(buffer: &RgbImage) -> f64 {
    let area = Grid::from(buffer).area();
    if area == 0 {
        return 0.0;
    }
    let sum: u64 = buffer
        .pixels()
        .map(|pixel| pixel_brightness(pixel) as u64)
        .sum();
    sum as f64 / area as f64
}

/// Converts any decoded image to 8-bit RGB at exactly `grid`'s size.
pub fn prepare(image: &DynamicImage, grid: Grid) -> RgbImage {
    image
        .resize_exact(grid.width as u32, grid.height as u32, FilterType::CatmullRom)
        .to_rgb8()
}

/// The working copy of the source, from which drawn chords are erased, and
/// the output, onto which they are inked.
#[derive(Clone)]
pub struct Canvas {
    source: RgbImage,
    output: RgbImage,
}

impl Canvas {
    pub fn new(source: RgbImage) -> Self {
        let output = RgbImage::from_pixel(source.width(), source.height(), WHITE);
        Self { source, output }
    }

    pub fn source(&self) -> &RgbImage {
        &self.source
    }

    pub fn output(&self) -> &RgbImage {
        &self.output
    }

    pub fn grid(&self) -> Grid {
        Grid::from(&self.source)
    }

    /// Erases the chord from the source and inks it onto the output.
    pub fn draw(&mut self, a: Point<usize>, b: Point<usize>) {
        draw_chord(&mut self.source, a, b, WHITE);
        draw_chord(&mut self.output, a, b, BLACK);
    }

    pub fn output_brightness(&self) -> f64 {
        total_brightness(&self.output)
    }

    pub fn into_output(self) -> RgbImage {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chord_covers_both_endpoints() {
        let mut buffer = RgbImage::from_pixel(5, 5, WHITE);
        draw_chord(&mut buffer, Point::new(0, 0), Point::new(4, 4), BLACK);
        for i in 0..5 {
            assert_eq!(buffer.get_pixel(i, i), &BLACK);
        }
        assert_eq!(buffer.pixels().filter(|p| **p == BLACK).count(), 5);
    }

    #[test]
    fn total_brightness_sums_channel_means() {
        let mut buffer = RgbImage::from_pixel(2, 1, Rgb([255, 255, 255]));
        assert_eq!(total_brightness(&buffer), 765.0);
        buffer.put_pixel(0, 0, Rgb([0, 100, 200]));
        // means: r 127.5, g 177.5, b 227.5
        assert_eq!(total_brightness(&buffer), 532.5);
    }

    #[test]
    fn draw_erases_source_and_inks_output() {
        let mut canvas = Canvas::new(RgbImage::from_pixel(4, 4, BLACK));
        assert_eq!(canvas.output_brightness(), 765.0);
        canvas.draw(Point::new(0, 0), Point::new(3, 0));
        for x in 0..4 {
            assert_eq!(canvas.source().get_pixel(x, 0), &WHITE);
            assert_eq!(canvas.output().get_pixel(x, 0), &BLACK);
        }
        assert_eq!(canvas.source().get_pixel(0, 1), &BLACK);
        assert_eq!(canvas.output_brightness(), 765.0 * 12.0 / 16.0);
    }

    #[test]
    fn canvases_share_dimensions() {
        let canvas = Canvas::new(RgbImage::new(7, 3));
        assert_eq!(canvas.source().dimensions(), canvas.output().dimensions());
        assert_eq!(canvas.grid(), Grid::new(3, 7));
    }

    #[test]
    fn prepare_resizes_exactly_and_drops_alpha() {
        let image = DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            30,
            10,
            image::Rgba([128, 128, 128, 255]),
        ));
        let prepared = prepare(&image, Grid::new(20, 20));
        assert_eq!(prepared.dimensions(), (20, 20));
        assert_eq!(prepared.get_pixel(10, 10), &Rgb([128, 128, 128]));
    }
}
