use std::ops::Deref;

use crate::{
    geometry::Point,
    grid::Grid,
    verboser::{Message, Verboser},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Shape {
    #[default]
    Circle,
    Square,
}

impl core::fmt::Display for Shape {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Shape::Circle => write!(f, "circle"),
            Shape::Square => write!(f, "square"),
        }
    }
}

/// The fixed, ordered set of pins a run draws between. A pin is identified by
/// its index in the table, never by its position.
#[derive(Clone, Debug)]
pub struct PinTable {
    pins: Vec<Point<usize>>,
    grid: Grid,
}

impl PinTable {
    /// Builds a table for `shape` out of `pin_count` total pins. The square
    /// layout places `pin_count / 4` pins on each side.
    pub fn new(
        shape: Shape,
        grid: Grid,
        pin_count: usize,
        verboser: &mut impl Verboser,
    ) -> Result<Self, PinTableError> {
        match shape {
            Shape::Circle => Self::circle(grid, pin_count, verboser),
            Shape::Square => Self::square(grid, pin_count / 4, verboser),
        }
    }

    /// `pin_count` pins evenly spaced on the circle inscribed in `grid`, one
    /// pixel inside its border.
    pub fn circle(
        grid: Grid,
        pin_count: usize,
        verboser: &mut impl Verboser,
    ) -> Result<Self, PinTableError> {
        check(grid, pin_count)?;
        let pins = (0..pin_count)
            .map(|i| {
                let pin = circle_position(grid, i, pin_count)
                    .trunc()
                    .as_::<usize>();
                verboser.verbose(Message::CreatingPin(i, pin));
                pin
            })
            .collect();
        Ok(Self { pins, grid })
    }

    /// `per_side` subdivisions, each emitting a top, bottom, left and right pin
    /// in that order.
    pub fn square(
        grid: Grid,
        per_side: usize,
        verboser: &mut impl Verboser,
    ) -> Result<Self, PinTableError> {
        check(grid, per_side)?;
        let dx = grid.width as f64 / per_side as f64;
        let dy = grid.height as f64 / per_side as f64;
        let (right, bottom) = (grid.width - 1, grid.height - 1);

        let mut pins = Vec::with_capacity(4 * per_side);
        for i in 0..per_side {
            let offset = i as f64 + 0.5;
            let x = (dx * offset) as usize;
            let y = (dy * offset) as usize;
            pins.extend([
                Point { x, y: 0 },
                Point { x, y: bottom },
                Point { x: 0, y },
                Point { x: right, y },
            ]);
        }
        for (i, pin) in pins.iter().enumerate() {
            verboser.verbose(Message::CreatingPin(i, *pin));
        }
        Ok(Self { pins, grid })
    }

    /// A table over caller-chosen positions, kept in the given order.
    pub fn from_points(
        grid: Grid,
        pins: impl IntoIterator<Item = Point<usize>>,
        verboser: &mut impl Verboser,
    ) -> Result<Self, PinTableError> {
        let pins: Vec<_> = pins.into_iter().collect();
        check(grid, pins.len())?;
        for (i, pin) in pins.iter().enumerate() {
            if !grid.contains(*pin) {
                return Err(PinTableError::OutOfBounds(i, *pin));
            }
            verboser.verbose(Message::CreatingPin(i, *pin));
        }
        Ok(Self { pins, grid })
    }

    pub fn pins(&self) -> &[Point<usize>] {
        &self.pins
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// True when at least two pins sit on different pixels.
    pub fn has_distinct_positions(&self) -> bool {
        self.pins
            .split_first()
            .is_some_and(|(first, rest)| rest.iter().any(|pin| pin != first))
    }

    /// Upper bound on the number of distinct chords between pins.
    pub fn max_edges(&self) -> usize {
        self.pins.len() * self.pins.len().saturating_sub(1) / 2
    }
}

impl Deref for PinTable {
    type Target = [Point<usize>];

    fn deref(&self) -> &Self::Target {
        &self.pins
    }
}

/// Untruncated position of pin `idx` out of `count` on the circular layout.
pub fn circle_position(grid: Grid, idx: usize, count: usize) -> Point<f64> {
    let size: Point<f64> = grid.into();
    let origin = size * 0.5;
    let radius = size.x.min(size.y) / 2.0 - 1.0;
    let theta = idx as f64 * 2.0 * std::f64::consts::PI / count as f64;
    origin
        + Point {
            x: radius * theta.cos(),
            y: radius * theta.sin(),
        }
}

fn check(grid: Grid, count: usize) -> Result<(), PinTableError> {
    if count == 0 {
        Err(PinTableError::MinPinCount)
    } else if grid.is_empty() {
        Err(PinTableError::EmptyGrid)
    } else {
        Ok(())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PinTableError {
    #[error("at least one pin is needed (four on a square table)")]
    MinPinCount,
    #[error("the canvas has no pixels")]
    EmptyGrid,
    #[error("pin {0} at {1} lies outside the canvas")]
    OutOfBounds(usize, Point<usize>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verboser::{Recorder, Silent};
    use std::f64::consts::{PI, SQRT_2};

    #[test]
    fn circle_pins_stay_in_bounds_and_near_the_rim() {
        for grid in [Grid::new(1000, 1000), Grid::new(480, 640), Grid::new(57, 101)] {
            for count in [3, 8, 74, 200] {
                let table = PinTable::circle(grid, count, &mut Silent).unwrap();
                assert_eq!(table.len(), count);
                let center: Point<f64> = Point::<f64>::from(grid) * 0.5;
                let half = grid.width.min(grid.height) as f64 / 2.0;
                for pin in table.iter() {
                    assert!(grid.contains(*pin));
                    // truncation moves a pin by less than a pixel on each axis
                    assert!(pin.as_::<f64>().distance(&center) <= half - 1.0 + SQRT_2);
                }
            }
        }
    }

    #[test]
    fn circle_positions_are_evenly_spaced() {
        let grid = Grid::new(1000, 1000);
        let count = 74;
        let center = Point::<f64>::from(grid) * 0.5;
        let angle = |p: Point<f64>| (p.y - center.y).atan2(p.x - center.x);
        for i in 0..count {
            let a = angle(circle_position(grid, i, count));
            let b = angle(circle_position(grid, (i + 1) % count, count));
            let step = (b - a).rem_euclid(2.0 * PI);
            assert!((step - 2.0 * PI / count as f64).abs() < 1e-9);
        }
    }

    #[test]
    fn first_circle_pin_is_on_the_right() {
        let table = PinTable::circle(Grid::new(1000, 1000), 4, &mut Silent).unwrap();
        assert_eq!(table[0], Point::new(999, 500));
        assert_eq!(table[1], Point::new(500, 999));
    }

    #[test]
    fn square_pins_lie_on_the_border() {
        let grid = Grid::new(300, 400);
        for per_side in [1, 5, 18] {
            let table = PinTable::square(grid, per_side, &mut Silent).unwrap();
            assert_eq!(table.len(), 4 * per_side);
            for pin in table.iter() {
                assert!(grid.contains(*pin));
                assert!(
                    pin.x == 0 || pin.y == 0 || pin.x == grid.width - 1 || pin.y == grid.height - 1
                );
            }
        }
    }

    #[test]
    fn square_emits_top_bottom_left_right() {
        let table = PinTable::square(Grid::new(100, 100), 2, &mut Silent).unwrap();
        assert_eq!(
            table.pins(),
            &[
                Point::new(25, 0),
                Point::new(25, 99),
                Point::new(0, 25),
                Point::new(99, 25),
                Point::new(75, 0),
                Point::new(75, 99),
                Point::new(0, 75),
                Point::new(99, 75),
            ]
        );
    }

    #[test]
    fn shape_divides_square_count_by_four() {
        let grid = Grid::new(100, 100);
        assert_eq!(PinTable::new(Shape::Square, grid, 74, &mut Silent).unwrap().len(), 72);
        assert_eq!(PinTable::new(Shape::Circle, grid, 74, &mut Silent).unwrap().len(), 74);
    }

    #[test]
    fn zero_pins_is_rejected() {
        let grid = Grid::new(10, 10);
        assert_eq!(
            PinTable::circle(grid, 0, &mut Silent).unwrap_err(),
            PinTableError::MinPinCount
        );
        assert_eq!(
            PinTable::new(Shape::Square, grid, 3, &mut Silent).unwrap_err(),
            PinTableError::MinPinCount
        );
        assert_eq!(
            PinTable::circle(Grid::new(0, 10), 4, &mut Silent).unwrap_err(),
            PinTableError::EmptyGrid
        );
    }

    #[test]
    fn distinct_positions_and_edge_bound() {
        let single = PinTable::circle(Grid::new(10, 10), 1, &mut Silent).unwrap();
        assert!(!single.has_distinct_positions());
        assert_eq!(single.max_edges(), 0);

        let table = PinTable::circle(Grid::new(10, 10), 6, &mut Silent).unwrap();
        assert!(table.has_distinct_positions());
        assert_eq!(table.max_edges(), 15);
    }

    #[test]
    fn custom_points_are_checked() {
        let grid = Grid::new(4, 4);
        let table =
            PinTable::from_points(grid, [Point::new(0, 0), Point::new(3, 3)], &mut Silent).unwrap();
        assert_eq!(table.pins(), &[Point::new(0, 0), Point::new(3, 3)]);
        assert_eq!(
            PinTable::from_points(grid, [Point::new(0, 0), Point::new(4, 0)], &mut Silent)
                .unwrap_err(),
            PinTableError::OutOfBounds(1, Point::new(4, 0))
        );
        assert_eq!(
            PinTable::from_points(grid, Vec::new(), &mut Silent).unwrap_err(),
            PinTableError::MinPinCount
        );
    }

    #[test]
    fn every_pin_is_reported() {
        let mut recorder = Recorder::default();
        PinTable::square(Grid::new(40, 40), 3, &mut recorder).unwrap();
        assert_eq!(recorder.0.len(), 12);
        assert_eq!(
            recorder.0[0],
            Message::CreatingPin(0, Point::new(6, 0))
        );
    }
}
