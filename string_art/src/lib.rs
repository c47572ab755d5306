pub mod geometry {
    pub mod point;
    pub mod segment;

    pub use point::Point;
    pub use segment::Segment;
}

mod algorithm;
pub mod canvas;
pub mod config;
pub mod grid;
pub mod pin_table;
pub mod sampler;
pub mod used_edges;
pub mod verboser;

pub use algorithm::*;
pub use canvas::Canvas;
pub use config::{Config, ConfigError};
pub use grid::Grid;
pub use pin_table::{PinTable, PinTableError, Shape};
pub use used_edges::UsedEdges;
pub use verboser::{Message, Verboser};
