//! Cells in the cellular automaton.

use std::ops::Not;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Possible states of a cell.
///
/// Only two values exist: [`DEAD`] and [`ALIVE`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct State(pub(crate) u8);

/// The Dead state.
pub const DEAD: State = State(0);
/// The Alive state.
pub const ALIVE: State = State(1);

impl State {
    /// Whether the cell is alive.
    #[inline]
    pub fn is_alive(self) -> bool {
        self == ALIVE
    }
}

/// Flips the state.
impl Not for State {
    type Output = Self;

    #[inline]
    fn not(self) -> Self::Output {
        match self {
            ALIVE => DEAD,
            _ => ALIVE,
        }
    }
}

impl From<bool> for State {
    #[inline]
    fn from(alive: bool) -> Self {
        if alive {
            ALIVE
        } else {
            DEAD
        }
    }
}

impl From<State> for u8 {
    #[inline]
    fn from(state: State) -> Self {
        state.0
    }
}

/// The coordinates of a cell.
///
/// `(x-coordinate, y-coordinate)`, i.e., `(column, row)`.
/// Both coordinates are 0-indexed.
pub type Coord = (usize, usize);

/// Values that can be read as a cell state.
///
/// Any nonzero value is read as [`ALIVE`], zero as [`DEAD`].
/// This is the only place where external data is interpreted;
/// a [`Grid`](crate::Grid) itself only stores [`State`]s.
pub trait CellValue {
    /// Whether the value stands for a living cell.
    fn is_alive(&self) -> bool;

    /// The state this value stands for.
    fn to_state(&self) -> State {
        State::from(self.is_alive())
    }
}

impl CellValue for bool {
    fn is_alive(&self) -> bool {
        *self
    }
}

impl CellValue for State {
    fn is_alive(&self) -> bool {
        State::is_alive(*self)
    }
}

macro_rules! nonzero_is_alive {
    ($($t:ty),*) => {
        $(
            impl CellValue for $t {
                #[inline]
                fn is_alive(&self) -> bool {
                    *self != 0
                }
            }
        )*
    };
}

nonzero_is_alive!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

/// `NaN` is nonzero, so it is read as alive.
impl CellValue for f32 {
    fn is_alive(&self) -> bool {
        *self != 0.0
    }
}

/// `NaN` is nonzero, so it is read as alive.
impl CellValue for f64 {
    fn is_alive(&self) -> bool {
        *self != 0.0
    }
}

impl<T: CellValue> CellValue for &T {
    fn is_alive(&self) -> bool {
        (**self).is_alive()
    }
}
