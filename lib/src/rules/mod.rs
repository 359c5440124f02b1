//! Birth/survival rules.
//!
//! For the notations of rule strings, please see
//! [this article on LifeWiki](https://conwaylife.com/wiki/Rulestring).

mod table;

use crate::{
    cells::State,
    error::{Error, RuleError},
};
use ca_rules::ParseLife;
use std::{
    collections::BTreeSet,
    fmt::{self, Display, Formatter},
    str::FromStr,
};
pub use table::TransitionTable;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The inclusive range of neighbor counts for which a living cell stays alive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Survive {
    /// Fewest living neighbors a cell survives with.
    pub min: u8,
    /// Most living neighbors a cell survives with.
    pub max: u8,
}

impl Survive {
    /// Whether a living cell with `count` living neighbors stays alive.
    #[inline]
    pub fn contains(self, count: u8) -> bool {
        self.min <= count && count <= self.max
    }
}

/// A Life-like rule with a birth set and a survival range.
///
/// [`Rule::new`], [`FromStr`] and deserialization all validate the rule,
/// so a `Rule` value always has a non-empty birth set and
/// `survive.min <= survive.max`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RuleSer", into = "RuleSer"))]
pub struct Rule {
    birth: BTreeSet<u8>,
    survive: Survive,
}

impl Rule {
    /// Constructs a new rule from the birth counts and the survival range.
    pub fn new<I: IntoIterator<Item = u8>>(birth: I, min: u8, max: u8) -> Result<Self, RuleError> {
        let rule = Rule {
            birth: birth.into_iter().collect(),
            survive: Survive { min, max },
        };
        rule.validate()?;
        Ok(rule)
    }

    /// Conway's Game of Life, `B3/S23`.
    pub fn conway() -> Self {
        Rule {
            birth: BTreeSet::from([3]),
            survive: Survive { min: 2, max: 3 },
        }
    }

    /// Builds a rule without checking it.
    #[cfg(test)]
    pub(crate) fn new_unchecked(birth: &[u8], min: u8, max: u8) -> Self {
        Rule {
            birth: birth.iter().copied().collect(),
            survive: Survive { min, max },
        }
    }

    /// Checks the invariants of the rule.
    pub fn validate(&self) -> Result<(), RuleError> {
        if self.birth.is_empty() {
            return Err(RuleError::EmptyBirth);
        }
        if self.survive.min > self.survive.max {
            return Err(RuleError::EmptySurvival {
                min: self.survive.min,
                max: self.survive.max,
            });
        }
        Ok(())
    }

    /// Neighbor counts that bring a dead cell to life.
    pub fn birth(&self) -> &BTreeSet<u8> {
        &self.birth
    }

    /// Neighbor counts for which a living cell stays alive.
    pub fn survive(&self) -> Survive {
        self.survive
    }

    /// The state of a cell in the next generation, given its current state
    /// and the number of its living neighbors.
    #[inline]
    pub fn next_state(&self, state: State, count: u8) -> State {
        if state.is_alive() {
            State::from(self.survive.contains(count))
        } else {
            State::from(self.birth.contains(&count))
        }
    }

    /// Builds a rule from the digit lists of a rule string.
    fn from_digits(b: Vec<u8>, mut s: Vec<u8>) -> Result<Self, RuleError> {
        s.sort_unstable();
        s.dedup();
        let (min, max) = match (s.first(), s.last()) {
            (Some(&min), Some(&max)) => (min, max),
            _ => return Err(RuleError::NonContiguousSurvival(s)),
        };
        if (max - min) as usize + 1 != s.len() {
            return Err(RuleError::NonContiguousSurvival(s));
        }
        Rule::new(b, min, max)
    }
}

impl Default for Rule {
    fn default() -> Self {
        Rule::conway()
    }
}

/// The digit lists of a totalistic rule string.
struct Digits {
    b: Vec<u8>,
    s: Vec<u8>,
}

/// A parser for the rule.
impl ParseLife for Digits {
    fn from_bs(b: Vec<u8>, s: Vec<u8>) -> Self {
        Digits { b, s }
    }
}

/// Parses rule strings such as `B3/S23`.
///
/// The survival digits must form a contiguous range.
impl FromStr for Rule {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let Digits { b, s } = ParseLife::parse_rule(input)?;
        Ok(Rule::from_digits(b, s)?)
    }
}

/// Displays the rule in the `B3/S23` notation.
impl Display for Rule {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "B")?;
        for b in &self.birth {
            write!(f, "{}", b)?;
        }
        write!(f, "/S")?;
        for s in self.survive.min..=self.survive.max {
            write!(f, "{}", s)?;
        }
        Ok(())
    }
}

/// The loosely-typed form of a rule in configuration files.
///
/// Counts are signed here so that negative values in a file are reported
/// as [`RuleError::NegativeCount`] rather than as a parse error.
#[cfg(feature = "serde")]
#[derive(Clone, Debug, Serialize, Deserialize)]
struct RuleSer {
    birth: Vec<i64>,
    survive: SurviveSer,
}

#[cfg(feature = "serde")]
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct SurviveSer {
    min: i64,
    max: i64,
}

#[cfg(feature = "serde")]
fn count(n: i64) -> Result<u8, RuleError> {
    if n < 0 {
        Err(RuleError::NegativeCount(n))
    } else {
        Ok(n.min(u8::MAX as i64) as u8)
    }
}

#[cfg(feature = "serde")]
impl TryFrom<RuleSer> for Rule {
    type Error = RuleError;

    fn try_from(ser: RuleSer) -> Result<Self, Self::Error> {
        let birth = ser
            .birth
            .into_iter()
            .map(count)
            .collect::<Result<Vec<_>, _>>()?;
        Rule::new(birth, count(ser.survive.min)?, count(ser.survive.max)?)
    }
}

#[cfg(feature = "serde")]
impl From<Rule> for RuleSer {
    fn from(rule: Rule) -> Self {
        RuleSer {
            birth: rule.birth.into_iter().map(i64::from).collect(),
            survive: SurviveSer {
                min: rule.survive.min.into(),
                max: rule.survive.max.into(),
            },
        }
    }
}
