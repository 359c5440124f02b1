use super::Rule;
use crate::cells::State;

/// The next state for every current state and neighbor count.
///
/// Built once per run, so that the step only does a lookup per cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionTable {
    table: [[State; 9]; 2],
}

impl TransitionTable {
    /// Tabulates [`Rule::next_state`] for all 18 cases.
    pub fn new(rule: &Rule) -> Self {
        let mut table = [[State::default(); 9]; 2];
        for (state, row) in table.iter_mut().enumerate() {
            for (count, next) in row.iter_mut().enumerate() {
                *next = rule.next_state(State(state as u8), count as u8);
            }
        }
        TransitionTable { table }
    }

    /// Looks up the next state.
    ///
    /// `count` is at most 8 for a Moore neighborhood.
    #[inline]
    pub fn next_state(&self, state: State, count: u8) -> State {
        self.table[state.0 as usize][count as usize]
    }
}
