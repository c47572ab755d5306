use crate::{grid::Grid, pin_table::{PinTableError, Shape}};

/// Parameters of a single run.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Total pins. The square layout uses `pin_count / 4` per side.
    pub pin_count: usize,
    /// The run stops once `tolerance * output brightness` no longer exceeds
    /// the source brightness, so larger values let the output get darker.
    pub tolerance: f64,
    pub shape: Shape,
    /// Working size the source is resized to before anything else.
    pub resolution: Grid,
    /// Seed for picking the start pin. Entropy is used when unset.
    pub seed: Option<u64>,
    /// Fixed start pin, overriding the random pick.
    pub start_pin: Option<usize>,
    /// Lower bound on the iteration cap of `pins * (pins - 1) / 2`.
    pub max_lines: Option<usize>,
}

impl Config {
    pub const DEFAULT_PIN_COUNT: usize = 74;
    pub const DEFAULT_TOLERANCE: f64 = 0.73;
    pub const DEFAULT_RESOLUTION: usize = 1000;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pin_count == 0 {
            return Err(ConfigError::PinCount);
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(ConfigError::Tolerance(self.tolerance));
        }
        if self.resolution.is_empty() {
            return Err(ConfigError::Resolution(self.resolution));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pin_count: Self::DEFAULT_PIN_COUNT,
            tolerance: Self::DEFAULT_TOLERANCE,
            shape: Shape::default(),
            resolution: Grid::new(Self::DEFAULT_RESOLUTION, Self::DEFAULT_RESOLUTION),
            seed: None,
            start_pin: None,
            max_lines: None,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("pin count must be greater than zero")]
    PinCount,
    #[error("tolerance must be a positive number, got {0}")]
    Tolerance(f64),
    #[error("resolution must be at least 1x1, got {}x{}", .0.width, .0.height)]
    Resolution(Grid),
    #[error("start pin {pin} is out of range for {count} pins")]
    StartPin { pin: usize, count: usize },
    #[error("pins need at least two distinct positions")]
    DegeneratePins,
    #[error("pin table is {table:?} but the image is {image:?}")]
    GridMismatch { table: Grid, image: Grid },
    #[error(transparent)]
    PinTable(#[from] PinTableError),
}
