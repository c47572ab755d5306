use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::{Parser, ValueEnum};
use log::{error, info, LevelFilter};
use simplelog::SimpleLogger;
use string_art::{verboser::Logger, Config, ConfigError, Grid, Shape};
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input image path.
    #[arg()]
    input: PathBuf,

    /// File the visited pins are written to, one `(pin, (x, y))` per line.
    #[arg()]
    output: PathBuf,

    /// Save the drawn image here.
    #[arg(short = 'o', long = "image")]
    image: Option<PathBuf>,

    /// Stop once tolerance * output brightness no longer exceeds the source
    /// brightness. Larger values draw more chords.
    #[arg(short, long, default_value_t = Config::DEFAULT_TOLERANCE)]
    tolerance: f64,

    /// Number of pins. A square table uses a quarter of them per side.
    #[arg(short, long, default_value_t = Config::DEFAULT_PIN_COUNT)]
    pins: usize,

    /// Lay the pins on the border of a square instead of a circle.
    #[arg(short, long)]
    square: bool,

    /// Side in pixels of the working canvas.
    #[arg(short, long, default_value_t = Config::DEFAULT_RESOLUTION)]
    resolution: usize,

    /// Seed for the random start pin.
    #[arg(long)]
    seed: Option<u64>,

    /// Start from this pin instead of a random one.
    #[arg(long)]
    start: Option<usize>,

    /// Stop after this many chords at the latest.
    #[arg(long)]
    max_lines: Option<usize>,

    /// Also write an SVG preview here.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Stroke width of the SVG preview.
    #[arg(long, default_value_t = 0.5)]
    line_thickness: f32,

    #[arg(long, default_value_t = Verbosity::Info)]
    verbosity: Verbosity,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            pin_count: self.pins,
            tolerance: self.tolerance,
            shape: if self.square {
                Shape::Square
            } else {
                Shape::Circle
            },
            resolution: Grid::new(self.resolution, self.resolution),
            seed: self.seed,
            start_pin: self.start,
            max_lines: self.max_lines,
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Verbosity {
    Quiet,
    Info,
    Debug,
}

impl ValueEnum for Verbosity {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Quiet, Self::Info, Self::Debug]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Quiet => clap::builder::PossibleValue::new("Quiet")
                .alias("quiet")
                .alias("q"),
            Self::Info => clap::builder::PossibleValue::new("Info").alias("info"),
            Self::Debug => clap::builder::PossibleValue::new("Debug")
                .alias("debug")
                .alias("verbose"),
        })
    }
}

impl std::fmt::Display for Verbosity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Quiet => write!(f, "Quiet"),
            Self::Info => write!(f, "Info"),
            Self::Debug => write!(f, "Debug"),
        }
    }
}

impl From<Verbosity> for LevelFilter {
    fn from(verbosity: Verbosity) -> Self {
        match verbosity {
            Verbosity::Quiet => LevelFilter::Error,
            Verbosity::Info => LevelFilter::Info,
            Verbosity::Debug => LevelFilter::Debug,
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(err) = SimpleLogger::init(args.verbosity.into(), simplelog::Config::default()) {
        eprintln!("logger could not be installed: {err}");
    }
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let config = args.config();
    config.validate()?;

    info!("Loading {}", args.input.display());
    let image = image::open(&args.input)?;

    info!(
        "Drawing with {} pins on a {}, tolerance {}",
        config.pin_count, config.shape, config.tolerance
    );
    let computation = string_art::compute(&image, &config, &mut Logger)?;

    let mut file = BufWriter::new(File::create(&args.output)?);
    computation.write_instructions(&mut file)?;
    file.flush()?;
    info!(
        "{} chords written to {}",
        computation.path().len() - 1,
        args.output.display()
    );
    info!("{} is the most one pin is used", computation.max_usage());

    if let Some(path) = &args.image {
        computation.output().save(path)?;
        info!("Image saved to {}", path.display());
    }
    if let Some(path) = &args.svg {
        svg::save(path, &computation.build_svg(args.line_thickness))?;
        info!("SVG saved to {}", path.display());
    }
    Ok(())
}
