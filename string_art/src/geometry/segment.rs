use super::Point;
use bresenham::Bresenham;
use num_traits::AsPrimitive;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment<T> {
    pub start: Point<T>,
    pub end: Point<T>,
}

impl<T: fmt::Display> fmt::Display for Segment<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

impl<T> Segment<T> {
    pub fn new(start: Point<T>, end: Point<T>) -> Self {
        Self { start, end }
    }
}

impl<T: PartialEq> Segment<T> {
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }
}

impl<T> Segment<T> {
    pub fn as_<S: Copy + 'static>(self) -> Segment<S>
    where
        T: AsPrimitive<S>,
    {
        Segment {
            start: self.start.as_(),
            end: self.end.as_(),
        }
    }
}

impl<T: AsPrimitive<f64>> Segment<T> {
    pub fn length(&self) -> f64 {
        self.start.as_::<f64>().distance(&self.end.as_())
    }
}

impl Segment<isize> {
    /// Walks the digital line from `start` toward `end`. The start point is
    /// yielded, the end point is not.
    pub fn points_between(&self) -> impl Iterator<Item = Point<isize>> {
        Bresenham::new((self.start.x, self.start.y), (self.end.x, self.end.y))
            .map(|(x, y)| Point { x, y })
    }
}

impl Segment<usize> {
    /// Pixel positions from `start` up to, but excluding, `end`.
    pub fn pixels(&self) -> impl Iterator<Item = Point<usize>> {
        self.as_::<isize>()
            .points_between()
            .filter_map(|point| point.cast::<usize>())
    }

    /// Pixel positions covering both endpoints.
    pub fn pixels_inclusive(&self) -> impl Iterator<Item = Point<usize>> {
        self.pixels().chain(core::iter::once(self.end))
    }
}
