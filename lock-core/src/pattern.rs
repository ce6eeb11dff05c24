//! Patterns and ordered sequence equality.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{matrix_in_range, AnchorPoint};

/// Strict ordered comparison of two chosen sequences by anchor index.
///
/// Two empty sequences compare equal; callers that must not accept an empty
/// pattern reject it before comparing.
#[must_use]
pub fn sequences_equal(a: &[AnchorPoint], b: &[AnchorPoint]) -> bool {
    indices_equal(a.iter().map(|p| p.index), b.iter().map(|p| p.index))
}

fn indices_equal<A, B>(a: A, b: B) -> bool
where
    A: ExactSizeIterator<Item = u32>,
    B: ExactSizeIterator<Item = u32>,
{
    a.len() == b.len() && a.eq(b)
}

/// An ordered sequence of anchor indices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pattern(Vec<u32>);

impl Pattern {
    /// Wrap a list of indices.
    #[must_use]
    pub fn new(indices: Vec<u32>) -> Self {
        Self(indices)
    }

    /// Capture the indices of a chosen sequence.
    #[must_use]
    pub fn from_points(points: &[AnchorPoint]) -> Self {
        Self(points.iter().map(|p| p.index).collect())
    }

    /// The indices in selection order.
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.0
    }

    /// Number of anchors in the pattern.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the pattern selects nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether a chosen sequence traces this pattern, in order.
    #[must_use]
    pub fn matches(&self, points: &[AnchorPoint]) -> bool {
        indices_equal(self.0.iter().copied(), points.iter().map(|p| p.index))
    }

    /// Whether every index is unique and addressable on a `matrix x matrix`
    /// grid of a supported size.
    #[must_use]
    pub fn fits(&self, matrix: u32) -> bool {
        if !matrix_in_range(matrix) {
            return false;
        }
        let size = matrix * matrix;
        let mut seen = HashSet::with_capacity(self.0.len());
        !self.0.is_empty()
            && self
                .0
                .iter()
                .all(|&i| (1..=size).contains(&i) && seen.insert(i))
    }
}

impl From<Vec<u32>> for Pattern {
    fn from(indices: Vec<u32>) -> Self {
        Self(indices)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "[{}]", joined.join(","))
    }
}

/// The accepted unlock pattern together with the grid it was enrolled on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPattern {
    /// Grid side length at enrolment.
    pub matrix: u32,
    /// The pattern itself.
    pub pattern: Pattern,
}

impl StoredPattern {
    /// Create a record.
    #[must_use]
    pub fn new(matrix: u32, pattern: Pattern) -> Self {
        Self { matrix, pattern }
    }

    /// Whether the record can be verified against on its own grid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.pattern.fits(self.matrix)
    }
}
