use crate::geometry::Point;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Grid<T = usize> {
    pub height: T,
    pub width: T,
}

impl<T> Grid<T> {
    pub fn new(height: T, width: T) -> Self {
        Self { height, width }
    }
}

impl Grid<usize> {
    pub fn contains(&self, point: Point<usize>) -> bool {
        point.x < self.width && point.y < self.height
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<&image::RgbImage> for Grid<usize> {
    fn from(image: &image::RgbImage) -> Self {
        Self {
            height: image.height() as usize,
            width: image.width() as usize,
        }
    }
}

impl From<Grid<usize>> for Point<f64> {
    fn from(grid: Grid<usize>) -> Self {
        Point {
            x: grid.width as f64,
            y: grid.height as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_excludes_far_edges() {
        let grid = Grid::new(3, 4);
        assert!(grid.contains(Point::new(0, 0)));
        assert!(grid.contains(Point::new(3, 2)));
        assert!(!grid.contains(Point::new(4, 0)));
        assert!(!grid.contains(Point::new(0, 3)));
    }

    #[test]
    fn grid_from_image_reads_dimensions() {
        let image = image::RgbImage::new(7, 5);
        let grid = Grid::from(&image);
        assert_eq!(grid, Grid::new(5, 7));
        assert_eq!(grid.area(), 35);
        assert!(!grid.is_empty());
    }
}
