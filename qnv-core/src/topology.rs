//! Immutable description of a quantum-network topology.
//!
//! A [`Topology`] is constructed once from validated inputs and shared
//! read-only for the lifetime of an analysis run.

use thiserror::Error;

/// Sentinel value of `s[i]` meaning "node `i` has no saturation limit".
pub const UNBOUNDED: i64 = -1;

/// Stable codes describing [`TopologyError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum TopologyErrorCode {
    /// `p` was not a square `n x n` matrix.
    MalformedProbabilityMatrix,
    /// `q` or `s` did not have length `n`.
    MalformedVectorLength,
    /// `p` was not symmetric, or had a nonzero diagonal.
    AsymmetricProbabilityMatrix,
    /// A probability in `p` or `q` fell outside `[0, 1]`.
    ProbabilityOutOfRange,
    /// `n` was zero.
    EmptyTopology,
}

impl TopologyErrorCode {
    /// Returns the stable machine-readable representation of this code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MalformedProbabilityMatrix => "TOPOLOGY_MALFORMED_P",
            Self::MalformedVectorLength => "TOPOLOGY_MALFORMED_VECTOR_LENGTH",
            Self::AsymmetricProbabilityMatrix => "TOPOLOGY_ASYMMETRIC_P",
            Self::ProbabilityOutOfRange => "TOPOLOGY_PROBABILITY_OUT_OF_RANGE",
            Self::EmptyTopology => "TOPOLOGY_EMPTY",
        }
    }
}

/// Errors raised while validating a [`Topology`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TopologyError {
    /// `n` was zero.
    #[error("topology must have at least one node")]
    EmptyTopology,
    /// `p` was not `n x n`.
    #[error("p must be a {n}x{n} matrix, but row count was {rows}")]
    MalformedProbabilityMatrix {
        /// Expected row/column count.
        n: usize,
        /// Actual number of rows supplied.
        rows: usize,
    },
    /// `q` or `s` did not have length `n`.
    #[error("`{field}` must have length {expected}, but had length {actual}")]
    MalformedVectorLength {
        /// Name of the offending field (`"q"` or `"s"`).
        field: &'static str,
        /// Expected length (`n`).
        expected: usize,
        /// Actual length supplied.
        actual: usize,
    },
    /// `p[i][j] != p[j][i]` for some `i, j`, or a diagonal entry was nonzero.
    #[error("p[{i}][{j}]={p_ij} does not match p[{j}][{i}]={p_ji}")]
    AsymmetricProbabilityMatrix {
        /// Row index.
        i: usize,
        /// Column index.
        j: usize,
        /// Value at `p[i][j]`.
        p_ij: f64,
        /// Value at `p[j][i]`.
        p_ji: f64,
    },
    /// A probability fell outside `[0, 1]`.
    #[error("{field}[{index}] = {value} is not a probability in [0, 1]")]
    ProbabilityOutOfRange {
        /// Name of the offending field (`"p"` or `"q"`).
        field: &'static str,
        /// Index of the offending entry (flattened for `p`).
        index: usize,
        /// The out-of-range value.
        value: f64,
    },
}

impl TopologyError {
    /// Returns the stable [`TopologyErrorCode`] for this error.
    #[must_use]
    pub const fn code(&self) -> TopologyErrorCode {
        match self {
            Self::EmptyTopology => TopologyErrorCode::EmptyTopology,
            Self::MalformedProbabilityMatrix { .. } => {
                TopologyErrorCode::MalformedProbabilityMatrix
            }
            Self::MalformedVectorLength { .. } => TopologyErrorCode::MalformedVectorLength,
            Self::AsymmetricProbabilityMatrix { .. } => {
                TopologyErrorCode::AsymmetricProbabilityMatrix
            }
            Self::ProbabilityOutOfRange { .. } => TopologyErrorCode::ProbabilityOutOfRange,
        }
    }
}

/// Immutable network topology: node count, link-generation probabilities,
/// swap-success probabilities, and per-node saturation markers.
///
/// Constructed once via [`Topology::try_new`] and shared read-only
/// thereafter; every accessor is a plain borrow, never a copy of the
/// underlying matrices.
#[derive(Debug, Clone, PartialEq)]
pub struct Topology {
    n: usize,
    p: Vec<Vec<f64>>,
    q: Vec<f64>,
    s: Vec<i64>,
}

impl Topology {
    /// Validates and constructs a [`Topology`].
    ///
    /// `p` must be an `n x n` symmetric matrix with zero diagonal and
    /// entries in `[0, 1]`. `q` must have length `n` with entries in
    /// `[0, 1]`. `s` must either be empty (every node unbounded) or have
    /// length `n`; entries are saturation markers, with [`UNBOUNDED`]
    /// meaning no limit.
    ///
    /// # Errors
    /// Returns [`TopologyError`] when any of the shape, symmetry, or range
    /// invariants above are violated.
    pub fn try_new(
        n: usize,
        p: Vec<Vec<f64>>,
        q: Vec<f64>,
        s: Vec<i64>,
    ) -> Result<Self, TopologyError> {
        if n == 0 {
            return Err(TopologyError::EmptyTopology);
        }
        if p.len() != n || p.iter().any(|row| row.len() != n) {
            return Err(TopologyError::MalformedProbabilityMatrix { n, rows: p.len() });
        }
        if q.len() != n {
            return Err(TopologyError::MalformedVectorLength {
                field: "q",
                expected: n,
                actual: q.len(),
            });
        }
        let s = if s.is_empty() {
            vec![UNBOUNDED; n]
        } else if s.len() == n {
            s
        } else {
            return Err(TopologyError::MalformedVectorLength {
                field: "s",
                expected: n,
                actual: s.len(),
            });
        };

        for (i, row) in p.iter().enumerate() {
            for (j, &p_ij) in row.iter().enumerate() {
                if !(0.0..=1.0).contains(&p_ij) {
                    return Err(TopologyError::ProbabilityOutOfRange {
                        field: "p",
                        index: i * n + j,
                        value: p_ij,
                    });
                }
                let p_ji = p[j][i];
                if (p_ij - p_ji).abs() > f64::EPSILON {
                    return Err(TopologyError::AsymmetricProbabilityMatrix { i, j, p_ij, p_ji });
                }
            }
        }
        for (index, &q_i) in q.iter().enumerate() {
            if !(0.0..=1.0).contains(&q_i) {
                return Err(TopologyError::ProbabilityOutOfRange {
                    field: "q",
                    index,
                    value: q_i,
                });
            }
        }

        Ok(Self { n, p, q, s })
    }

    /// Number of nodes.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.n
    }

    /// Creation success probability between 1-indexed nodes `x` and `y`.
    #[must_use]
    pub fn creation_probability(&self, x: usize, y: usize) -> f64 {
        self.p[x - 1][y - 1]
    }

    /// Swap success probability at 1-indexed node `z`.
    #[must_use]
    pub fn swap_probability(&self, z: usize) -> f64 {
        self.q[z - 1]
    }

    /// Saturation marker for 1-indexed node `x`; [`UNBOUNDED`] if unlimited.
    #[must_use]
    pub fn saturation(&self, x: usize) -> i64 {
        self.s[x - 1]
    }
}
