//! Flat, string-keyed view of analysis results.
//!
//! Renderers and the command-line tool consume results through this map
//! rather than through the typed structures. Keys are stable snake-case
//! names; values serialize as plain JSON numbers, arrays or strings.

use std::collections::BTreeMap;

use serde::Serialize;

/// One entry of a [`ResultMap`].
#[derive(Debug, Clone, PartialEq, Serialize, derive_more::From)]
#[serde(untagged)]
pub enum ResultValue {
    Scalar(f64),
    /// An interval or a coordinate pair.
    Pair([f64; 2]),
    /// A value with its confidence interval, `[value, ci_low, ci_high]`.
    Triple([f64; 3]),
    Count(usize),
    IndexPair([usize; 2]),
    Sequence(Vec<f64>),
    Counts(Vec<usize>),
    Labels(Vec<char>),
    Text(&'static str),
}

impl From<(f64, f64)> for ResultValue {
    fn from((lo, hi): (f64, f64)) -> Self {
        Self::Pair([lo, hi])
    }
}

impl From<(usize, usize)> for ResultValue {
    fn from((lo, hi): (usize, usize)) -> Self {
        Self::IndexPair([lo, hi])
    }
}

/// Result entries ordered by key.
pub type ResultMap = BTreeMap<&'static str, ResultValue>;

/// Conversion of a typed result into a [`ResultMap`].
pub trait ToResultMap {
    fn to_result_map(&self) -> ResultMap;
}
