use std::{fmt, io, ops::Range};

use image::{DynamicImage, RgbImage};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::{
    canvas::{self, Canvas},
    config::{Config, ConfigError},
    geometry::{Point, Segment},
    grid::Grid,
    pin_table::PinTable,
    sampler::{self, MAX_BRIGHTNESS, UNSELECTABLE},
    used_edges::UsedEdges,
    verboser::{Message, Verboser},
};

/// Validates `config`, resizes `image` to the working resolution, lays out the
/// pins and runs the greedy path builder to completion.
pub fn compute(
    image: &DynamicImage,
    config: &Config,
    verboser: &mut impl Verboser,
) -> Result<Computation, ConfigError> {
    config.validate()?;
    let source = canvas::prepare(image, config.resolution);
    let table = PinTable::new(config.shape, config.resolution, config.pin_count, verboser)?;
    Ok(PathBuilder::new(source, table, config)?.run(verboser))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// The output got dark enough for the tolerance.
    Converged,
    /// No unused chord leaves the current pin.
    Stalled,
    /// Every possible chord count was spent.
    Capped,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Converged => write!(f, "converged"),
            Termination::Stalled => write!(f, "stalled"),
            Termination::Capped => write!(f, "iteration cap reached"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Running,
    Done(Termination),
}

pub struct PathBuilder {
    table: PinTable,
    canvas: Canvas,
    used: UsedEdges,
    usage: Vec<usize>,
    path: Vec<usize>,
    batches: Vec<Range<usize>>,
    tolerance: f64,
    target: f64,
    brightness: f64,
    cap: usize,
    state: State,
}

impl PathBuilder {
    /// Sets up a run over `source`, which must have the table's dimensions.
    /// The start pin is `config.start_pin`, or drawn uniformly at random.
    pub fn new(source: RgbImage, table: PinTable, config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let image = Grid::from(&source);
        if table.grid() != image {
            return Err(ConfigError::GridMismatch {
                table: table.grid(),
                image,
            });
        }
        if !table.has_distinct_positions() {
            return Err(ConfigError::DegeneratePins);
        }
        let count = table.len();
        let start = match config.start_pin {
            Some(pin) if pin >= count => return Err(ConfigError::StartPin { pin, count }),
            Some(pin) => pin,
            None => {
                let mut rng = match config.seed {
                    Some(seed) => SmallRng::seed_from_u64(seed),
                    None => SmallRng::from_entropy(),
                };
                rng.gen_range(0..count)
            }
        };
        let cap = config
            .max_lines
            .map_or(table.max_edges(), |lines| lines.min(table.max_edges()));

        // one contiguous batch of candidates per worker
        let chunk = count.div_ceil(num_cpus::get().max(1));
        let batches = (0..count)
            .step_by(chunk)
            .map(|begin| begin..count.min(begin + chunk))
            .collect();

        let target = canvas::total_brightness(&source);
        Ok(Self {
            canvas: Canvas::new(source),
            used: UsedEdges::new(count),
            usage: vec![0; count],
            path: vec![start],
            batches,
            tolerance: config.tolerance,
            target,
            brightness: MAX_BRIGHTNESS,
            cap,
            state: State::Running,
            table,
        })
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn path(&self) -> &[usize] {
        &self.path
    }

    pub fn current_pin(&self) -> usize {
        self.path[self.path.len() - 1]
    }

    /// Chords drawn so far.
    pub fn lines(&self) -> usize {
        self.path.len() - 1
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn used_edges(&self) -> &UsedEdges {
        &self.used
    }

    pub fn target_brightness(&self) -> f64 {
        self.target
    }

    /// Output brightness as of the last check; `255 * 3` before the first
    /// chord.
    pub fn brightness(&self) -> f64 {
        self.brightness
    }

    /// Performs one transition and returns the resulting state.
    pub fn step(&mut self, verboser: &mut impl Verboser) -> State {
        if self.state != State::Running {
            return self.state;
        }
        if self.tolerance * self.brightness <= self.target {
            self.state = State::Done(Termination::Converged);
        } else if self.lines() >= self.cap {
            self.state = State::Done(Termination::Capped);
        } else if let Some(next) = self.find_next_pin() {
            self.draw(next);
            verboser.verbose(Message::Progress {
                step: self.lines(),
                target: self.target,
                current: self.brightness,
                tolerance: self.tolerance,
            });
        } else {
            self.state = State::Done(Termination::Stalled);
        }
        self.state
    }

    pub fn run(mut self, verboser: &mut impl Verboser) -> Computation {
        verboser.verbose(Message::Starting {
            pin: self.current_pin(),
            target: self.target,
        });
        loop {
            if let State::Done(termination) = self.step(verboser) {
                verboser.verbose(Message::Finished(termination));
                return self.into_computation();
            }
        }
    }

    /// Stops here, whatever the state, and hands out the results.
    pub fn into_computation(self) -> Computation {
        Computation {
            termination: match self.state {
                State::Running => None,
                State::Done(termination) => Some(termination),
            },
            target: self.target,
            brightness: self.canvas.output_brightness(),
            output: self.canvas.into_output(),
            table: self.table,
            path: self.path,
            usage: self.usage,
        }
    }

    /// The best unused chord leaving the current pin: darkest on the source
    /// canvas, then longest, then lowest pin index.
    pub fn find_next_pin(&self) -> Option<usize> {
        let current = self.current_pin();
        let origin = self.table[current];
        self.batches
            .par_iter()
            .map(|range| {
                range
                    .clone()
                    .filter(|&idx| self.table[idx] != origin && !self.used.contains(idx, current))
                    .filter_map(|idx| {
                        let pin = self.table[idx];
                        let brightness = sampler::average_brightness(self.canvas.source(), pin, origin);
                        (brightness != UNSELECTABLE).then(|| Candidate {
                            pin: idx,
                            brightness,
                            distance: Segment::new(pin, origin).length(),
                        })
                    })
                    .fold(None, Candidate::pick)
            })
            .reduce(|| None, Candidate::merge)
            .map(|candidate| candidate.pin)
    }

    fn draw(&mut self, next: usize) {
        let current = self.current_pin();
        self.canvas.draw(self.table[next], self.table[current]);
        self.used.insert(current, next);
        self.usage[current] += 1;
        self.usage[next] += 1;
        self.path.push(next);
        self.brightness = self.canvas.output_brightness();
    }
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    pin: usize,
    brightness: f64,
    distance: f64,
}

impl Candidate {
    fn beats(&self, other: &Self) -> bool {
        self.brightness < other.brightness
            || (self.brightness == other.brightness && self.distance > other.distance)
    }

    /// Keeps `best` unless `challenger` strictly beats it, so the earlier
    /// candidate wins full ties.
    fn pick(best: Option<Self>, challenger: Self) -> Option<Self> {
        match best {
            Some(best) if !challenger.beats(&best) => Some(best),
            _ => Some(challenger),
        }
    }

    fn merge(best: Option<Self>, later: Option<Self>) -> Option<Self> {
        match later {
            Some(later) => Self::pick(best, later),
            None => best,
        }
    }
}

/// The finished pattern.
pub struct Computation {
    table: PinTable,
    path: Vec<usize>,
    usage: Vec<usize>,
    output: RgbImage,
    termination: Option<Termination>,
    target: f64,
    brightness: f64,
}

impl Computation {
    pub fn pins(&self) -> &PinTable {
        &self.table
    }

    /// Visited pin indices, start pin first.
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// Visited pins with their positions, start pin first.
    pub fn steps(&self) -> impl Iterator<Item = (usize, Point<usize>)> + '_ {
        self.path.iter().map(|&idx| (idx, self.table[idx]))
    }

    /// How many drawn chords end at each pin.
    pub fn usage(&self) -> &[usize] {
        &self.usage
    }

    pub fn max_usage(&self) -> usize {
        self.usage.iter().copied().max().unwrap_or(0)
    }

    pub fn output(&self) -> &RgbImage {
        &self.output
    }

    pub fn into_output(self) -> RgbImage {
        self.output
    }

    /// `None` when the run was stopped before reaching a terminal state.
    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    pub fn target_brightness(&self) -> f64 {
        self.target
    }

    pub fn final_brightness(&self) -> f64 {
        self.brightness
    }

    /// One `(pin, (x, y))` line per visited pin.
    pub fn write_instructions(&self, writer: &mut impl io::Write) -> io::Result<()> {
        for (idx, point) in self.steps() {
            writeln!(writer, "({idx}, {point})")?;
        }
        Ok(())
    }

    pub fn build_instructions(&self) -> String {
        self.steps()
            .map(|(idx, point)| format!("({idx}, {point})\n"))
            .collect()
    }

    pub fn build_svg(&self, line_thickness: f32) -> svg::Document {
        let grid = self.table.grid();
        let mut doc = svg::Document::new()
            .set("viewBox", (0, 0, grid.width, grid.height))
            .add(
                svg::node::element::Rectangle::new()
                    .set("width", grid.width)
                    .set("height", grid.height)
                    .set("fill", "white"),
            );
        for pin in self.table.iter() {
            doc = doc.add(
                svg::node::element::Circle::new()
                    .set("cx", pin.x)
                    .set("cy", pin.y)
                    .set("r", line_thickness * 2.0)
                    .set("fill", "black"),
            );
        }
        for pair in self.path.windows(2) {
            let (start, end) = (self.table[pair[0]], self.table[pair[1]]);
            doc = doc.add(
                svg::node::element::Line::new()
                    .set("x1", start.x)
                    .set("y1", start.y)
                    .set("x2", end.x)
                    .set("y2", end.y)
                    .set("stroke", "black")
                    .set("stroke-width", format!("{:.4}", line_thickness)),
            );
        }
        doc
    }
}
