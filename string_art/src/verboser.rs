use crate::{geometry::Point, Termination};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Message {
    CreatingPin(usize, Point<usize>),
    Starting { pin: usize, target: f64 },
    Progress {
        step: usize,
        target: f64,
        current: f64,
        tolerance: f64,
    },
    Finished(Termination),
}

pub trait Verboser {
    fn verbose(&mut self, message: Message);
}

pub struct Silent;

impl Verboser for Silent {
    fn verbose(&mut self, _: Message) {}
}

/// Forwards every message to the `log` facade.
pub struct Logger;

impl Verboser for Logger {
    fn verbose(&mut self, message: Message) {
        match message {
            Message::CreatingPin(idx, point) => log::debug!("pin {idx} at {point}"),
            Message::Starting { pin, target } => {
                log::info!("starting at pin {pin}, target brightness {target:.0}")
            }
            Message::Progress {
                step,
                target,
                current,
                tolerance,
            } => log::debug!(
                "{step} {target:.0} / {current:.0} = {:.3}, target {tolerance:.3}",
                target / current
            ),
            Message::Finished(termination) => log::info!("finished: {termination}"),
        }
    }
}

/// Keeps every message; handy to inspect a run after the fact.
#[derive(Default)]
pub struct Recorder(pub Vec<Message>);

impl Verboser for Recorder {
    fn verbose(&mut self, message: Message) {
        self.0.push(message)
    }
}
