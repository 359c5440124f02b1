//! Runs of the cellular automaton.

use crate::{
    error::Error,
    grid::Grid,
    rules::{Rule, TransitionTable},
};
use log::{debug, trace};
use std::time::Instant;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Status of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Status {
    /// All requested grids have been computed.
    Finished,
    /// Stopped before the end, because the step budget or the deadline
    /// was reached. The run can be resumed.
    Paused,
}

/// The grids of a run and whether each step changed anything.
///
/// There is always at least one grid, and one flag fewer than grids.
/// Deserialization checks both.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "HistorySer"))]
pub struct History {
    /// Grids in order. The first one is the initial grid.
    grids: Vec<Grid>,

    /// `stable[i]` is whether `grids[i + 1]` equals `grids[i]`.
    stable: Vec<bool>,
}

impl History {
    fn with_capacity(initial: Grid, capacity: usize) -> Self {
        let mut grids = Vec::with_capacity(capacity);
        grids.push(initial);
        History {
            grids,
            stable: Vec::with_capacity(capacity.saturating_sub(1)),
        }
    }

    /// All grids computed so far, starting with the initial grid.
    pub fn grids(&self) -> &[Grid] {
        &self.grids
    }

    /// For each step after the first, whether its grid equals the
    /// previous one.
    pub fn stable_flags(&self) -> &[bool] {
        &self.stable
    }

    /// Number of grids.
    pub fn len(&self) -> usize {
        self.grids.len()
    }

    /// Always `false`: a history holds at least the initial grid.
    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }

    /// The latest grid.
    pub fn last(&self) -> &Grid {
        // Never empty, see the deserialization check.
        &self.grids[self.grids.len() - 1]
    }

    /// The first step whose grid equals the previous one.
    ///
    /// Every later step is stable as well, since the rule is deterministic.
    pub fn first_stable_step(&self) -> Option<usize> {
        self.stable.iter().position(|&s| s).map(|i| i + 1)
    }

    /// Splits the history into the grids and the stability flags.
    pub fn into_parts(self) -> (Vec<Grid>, Vec<bool>) {
        (self.grids, self.stable)
    }

    fn push(&mut self, grid: Grid) {
        let stable = *self.last() == grid;
        self.grids.push(grid);
        self.stable.push(stable);
    }
}

/// The unchecked form of a [`History`] in serialized data.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct HistorySer {
    grids: Vec<Grid>,
    stable: Vec<bool>,
}

#[cfg(feature = "serde")]
impl TryFrom<HistorySer> for History {
    type Error = Error;

    fn try_from(ser: HistorySer) -> Result<Self, Self::Error> {
        let size = match ser.grids.first() {
            Some(grid) => grid.size(),
            None => {
                return Err(Error::InvalidHistory {
                    grids: 0,
                    flags: ser.stable.len(),
                })
            }
        };
        if ser.stable.len() + 1 != ser.grids.len() {
            return Err(Error::InvalidHistory {
                grids: ser.grids.len(),
                flags: ser.stable.len(),
            });
        }
        if let Some(grid) = ser.grids.iter().find(|g| g.size() != size) {
            return Err(Error::InvalidDimension {
                rows: grid.size(),
                cols: grid.size(),
            });
        }
        Ok(History {
            grids: ser.grids,
            stable: ser.stable,
        })
    }
}

/// A single run: an initial grid evolved under a rule for a fixed number
/// of generations.
///
/// The run can be advanced all at once, or a few steps at a time so that
/// the caller can stop between steps. The grids already computed stay
/// valid either way.
#[derive(Clone, Debug)]
pub struct Simulation {
    /// The rule of the cellular automaton.
    rule: Rule,

    /// Precomputed transitions of [`rule`](#structfield.rule).
    table: TransitionTable,

    /// Number of grids to produce, including the initial one.
    duration: usize,

    /// Grids computed so far.
    history: History,
}

impl Simulation {
    /// Sets up a run. No step is computed yet.
    ///
    /// Returns an error if `duration < 1` or if the rule is invalid.
    /// A [`Grid`] is always square and non-empty, so the grid needs no check.
    pub fn new(initial: Grid, duration: isize, rule: Rule) -> Result<Self, Error> {
        if duration < 1 {
            return Err(Error::InvalidDuration(duration));
        }
        rule.validate()?;
        let duration = duration as usize;
        debug!(
            "new run: {}x{} grid, {} generations, rule {}",
            initial.size(),
            initial.size(),
            duration,
            rule
        );
        Ok(Simulation {
            table: TransitionTable::new(&rule),
            rule,
            duration,
            history: History::with_capacity(initial, duration),
        })
    }

    /// The rule of the run.
    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    /// Number of grids the run will produce, including the initial one.
    pub fn duration(&self) -> usize {
        self.duration
    }

    /// Grids computed so far.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Takes the grids computed so far.
    pub fn into_history(self) -> History {
        self.history
    }

    /// Whether all grids have been computed.
    pub fn is_finished(&self) -> bool {
        self.history.len() >= self.duration
    }

    /// Computes one more grid.
    fn step(&mut self) {
        let next = self.history.last().step_with(&self.table);
        let gen = self.history.len();
        self.history.push(next);
        trace!(
            "generation {}: population {}",
            gen,
            self.history.last().population()
        );
        let flags = self.history.stable_flags();
        if flags == [true] || flags.ends_with(&[false, true]) {
            debug!("stable from generation {}", gen);
        }
    }

    /// Computes the remaining grids.
    ///
    /// Returns [`Status::Paused`] if `max_step` steps have been computed
    /// and the run is not over yet, [`Status::Finished`] otherwise.
    pub fn advance(&mut self, max_step: Option<u64>) -> Status {
        let mut step_count = 0;
        while !self.is_finished() {
            if let Some(max_step) = max_step {
                if step_count >= max_step {
                    debug!("paused at generation {}", self.history.len() - 1);
                    return Status::Paused;
                }
            }
            self.step();
            step_count += 1;
        }
        Status::Finished
    }

    /// Computes the remaining grids, checking the clock between steps.
    ///
    /// Returns [`Status::Paused`] if `deadline` passes before the run is
    /// over. A step in progress is never interrupted.
    pub fn advance_until(&mut self, deadline: Instant) -> Status {
        while !self.is_finished() {
            if Instant::now() >= deadline {
                debug!("deadline reached at generation {}", self.history.len() - 1);
                return Status::Paused;
            }
            self.step();
        }
        Status::Finished
    }
}

/// Evolves `initial` under `rule`, producing `duration` grids in total.
///
/// Returns the grids, starting with `initial`, and for each step after
/// the first whether it equals the step before.
pub fn run(initial: Grid, duration: isize, rule: Rule) -> Result<(Vec<Grid>, Vec<bool>), Error> {
    let mut simulation = Simulation::new(initial, duration, rule)?;
    simulation.advance(None);
    Ok(simulation.into_history().into_parts())
}

/// An endless iterator of successive grids, starting with the initial one.
///
/// Nothing is stored, so this is the way to go when only the final grid or
/// the first stable step matters.
#[derive(Clone, Debug)]
pub struct Generations<'a> {
    table: TransitionTable,
    current: Grid,
    rule: &'a Rule,
}

impl<'a> Generations<'a> {
    /// The rule of the iterator.
    pub fn rule(&self) -> &'a Rule {
        self.rule
    }
}

impl<'a> Iterator for Generations<'a> {
    type Item = Grid;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.current.step_with(&self.table);
        Some(std::mem::replace(&mut self.current, next))
    }
}

impl Rule {
    /// Iterates over the generations of `initial` under this rule.
    pub fn generations(&self, initial: Grid) -> Generations<'_> {
        Generations {
            table: TransitionTable::new(self),
            current: initial,
            rule: self,
        }
    }
}
