//! Run configuration.

use crate::{
    error::Error,
    grid::Grid,
    rules::Rule,
    world::{History, Simulation},
};
use educe::Educe;
use rand::{rngs::StdRng, SeedableRng};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Size of random grids when no size is given.
pub const DEFAULT_SIZE: usize = 16;

/// Run configuration.
///
/// A run is generated from this configuration and an initial grid.
#[derive(Clone, Debug, Educe, PartialEq)]
#[educe(Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Number of grids to produce, including the initial one.
    #[educe(Default = 10)]
    pub duration: isize,

    /// The rule of the cellular automaton.
    pub rule: Rule,

    /// Width and height of the grid.
    ///
    /// `None` means the size of the pattern that is read,
    /// or [`DEFAULT_SIZE`] for random grids.
    pub size: Option<usize>,

    /// Probability for each cell of a random grid to be alive.
    #[educe(Default = 0.5)]
    pub density: f64,

    /// Seed for random grids.
    ///
    /// `None` means a seed from the operating system.
    pub seed: Option<u64>,
}

impl Config {
    /// Sets up a new configuration with given duration.
    pub fn new(duration: isize) -> Self {
        Config {
            duration,
            ..Config::default()
        }
    }

    /// Sets the rule.
    pub fn set_rule(mut self, rule: Rule) -> Self {
        self.rule = rule;
        self
    }

    /// Sets the size of the grid.
    pub fn set_size<T: Into<Option<usize>>>(mut self, size: T) -> Self {
        self.size = size.into();
        self
    }

    /// Sets the density of random grids.
    pub fn set_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    /// Sets the seed of random grids.
    pub fn set_seed<T: Into<Option<u64>>>(mut self, seed: T) -> Self {
        self.seed = seed.into();
        self
    }

    /// Creates a random grid from the size, density and seed.
    pub fn random_grid(&self) -> Result<Grid, Error> {
        let size = self.size.unwrap_or(DEFAULT_SIZE);
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Grid::random(size, self.density, &mut rng)
    }

    /// Creates a new run from the configuration.
    ///
    /// Returns an error if the duration or the rule is invalid.
    pub fn simulation(&self, initial: Grid) -> Result<Simulation, Error> {
        Simulation::new(initial, self.duration, self.rule.clone())
    }

    /// Creates a new run from the configuration and runs it to the end.
    pub fn run(&self, initial: Grid) -> Result<History, Error> {
        let mut simulation = self.simulation(initial)?;
        simulation.advance(None);
        Ok(simulation.into_history())
    }
}
