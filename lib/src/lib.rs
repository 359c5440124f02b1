//! __Torlife__ evolves Life-like cellular automata on a toroidal grid.
//!
//! Given an initial square grid and a birth/survival [`Rule`], a run
//! produces every intermediate grid, together with a flag for each step
//! telling whether it left the grid unchanged.
//!
//! # Example
//!
//! ```rust
//! use torlife_lib::{run, Grid, Rule};
//!
//! let blinker = Grid::from_rows(&[
//!     [0, 0, 0, 0, 0],
//!     [0, 0, 0, 0, 0],
//!     [0, 1, 1, 1, 0],
//!     [0, 0, 0, 0, 0],
//!     [0, 0, 0, 0, 0],
//! ])
//! .unwrap();
//!
//! let (grids, stable) = run(blinker.clone(), 3, Rule::conway()).unwrap();
//! assert_eq!(grids[2], blinker);
//! assert_eq!(stable, vec![false, false]);
//! ```

mod cells;
mod config;
mod error;
mod grid;
pub mod rules;
mod world;

pub use cells::{CellValue, Coord, State, ALIVE, DEAD};
pub use config::{Config, DEFAULT_SIZE};
pub use error::{Error, RuleError};
pub use grid::Grid;
pub use rules::{Rule, Survive};
pub use world::{run, Generations, History, Simulation, Status};
