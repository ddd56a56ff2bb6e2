//! Reads the whitespace-delimited topology text format into a
//! [`qnv_core::Topology`].
//!
//! Format:
//! - Line 1: `n m` (node count, edge count).
//! - Next `m` lines: `u v p`, `1 <= u, v <= n`, `0 <= p <= 1`.
//! - Next line: `n` whitespace-separated reals, the `q` vector.
//! - Optional final line: `n` whitespace-separated integers, the `s` vector.
//!   Absent means every node is unbounded.

use std::fmt;
use std::path::Path;

use qnv_core::{Topology, TopologyError, TopologyErrorCode};
use thiserror::Error;

/// Stable codes describing [`TopologyIoError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum TopologyIoErrorCode {
    /// Reading the file from disk failed.
    Io,
    /// The file's content did not match the expected format.
    Format,
    /// The parsed values failed [`Topology`]'s own validation.
    Topology(TopologyErrorCode),
}

impl TopologyIoErrorCode {
    /// Returns the stable machine-readable representation of this code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Io => "TOPOLOGY_IO_READ_FAILED",
            Self::Format => "TOPOLOGY_IO_MALFORMED_FILE",
            Self::Topology(inner) => inner.as_str(),
        }
    }
}

/// Errors raised while reading a topology file.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TopologyIoError {
    /// The file could not be read.
    #[error("failed to read topology file {path}: {source}")]
    Io {
        /// The path that could not be read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file's content did not match the expected format.
    #[error("malformed topology file: {0}")]
    Format(FormatError),
    /// The parsed values were rejected by [`Topology::try_new`].
    #[error(transparent)]
    Topology(#[from] TopologyError),
}

/// A specific reason the topology file's text did not parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// A line expected to be present was missing.
    MissingLine {
        /// What the missing line was expected to contain.
        what: &'static str,
    },
    /// A token on a line did not parse as the expected numeric type.
    InvalidNumber {
        /// What the token was expected to be.
        what: &'static str,
        /// The offending text.
        text: String,
    },
    /// A line had the wrong number of whitespace-separated tokens.
    WrongTokenCount {
        /// What the line was expected to contain.
        what: &'static str,
        /// Expected token count.
        expected: usize,
        /// Actual token count found.
        actual: usize,
    },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingLine { what } => write!(f, "missing line: {what}"),
            Self::InvalidNumber { what, text } => {
                write!(f, "expected {what}, found `{text}`")
            }
            Self::WrongTokenCount {
                what,
                expected,
                actual,
            } => write!(f, "{what}: expected {expected} tokens, found {actual}"),
        }
    }
}

impl TopologyIoError {
    /// Returns the stable [`TopologyIoErrorCode`] for this error.
    #[must_use]
    pub fn code(&self) -> TopologyIoErrorCode {
        match self {
            Self::Io { .. } => TopologyIoErrorCode::Io,
            Self::Format(_) => TopologyIoErrorCode::Format,
            Self::Topology(err) => TopologyIoErrorCode::Topology(err.code()),
        }
    }
}

/// Reads and parses the topology file at `path`.
///
/// # Errors
/// Returns [`TopologyIoError::Io`] if the file cannot be read,
/// [`TopologyIoError::Format`] if its content does not match the expected
/// shape, or [`TopologyIoError::Topology`] if the parsed values fail
/// [`Topology`]'s own validation.
pub fn read_topology_file(path: impl AsRef<Path>) -> Result<Topology, TopologyIoError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| TopologyIoError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_topology(&content)
}

enum ParsedError {
    Format(FormatError),
    Topology(TopologyError),
}

impl From<FormatError> for ParsedError {
    fn from(err: FormatError) -> Self {
        Self::Format(err)
    }
}

impl From<TopologyError> for ParsedError {
    fn from(err: TopologyError) -> Self {
        Self::Topology(err)
    }
}

/// Parses topology text directly, bypassing the filesystem. Exposed for
/// testing against inline fixtures.
///
/// # Errors
/// See [`read_topology_file`].
pub fn parse_topology(content: &str) -> Result<Topology, TopologyIoError> {
    parse_topology_inner(content).map_err(|err| match err {
        ParsedError::Format(format_err) => TopologyIoError::Format(format_err),
        ParsedError::Topology(topo_err) => TopologyIoError::Topology(topo_err),
    })
}

fn parse_topology_inner(content: &str) -> Result<Topology, ParsedError> {
    let mut lines = content.lines().map(str::trim).filter(|line| !line.is_empty());

    let header = lines.next().ok_or(FormatError::MissingLine {
        what: "header `n m`",
    })?;
    let mut header_tokens = header.split_whitespace();
    let n = parse_usize(&mut header_tokens, "node count n")?;
    let m = parse_usize(&mut header_tokens, "edge count m")?;

    let mut p = vec![vec![0.0_f64; n]; n];
    for _ in 0..m {
        let edge_line = lines.next().ok_or(FormatError::MissingLine { what: "edge line" })?;
        let mut tokens = edge_line.split_whitespace();
        let u = parse_usize(&mut tokens, "edge endpoint u")?;
        let v = parse_usize(&mut tokens, "edge endpoint v")?;
        let weight = parse_f64(&mut tokens, "edge probability p")?;
        set_symmetric(&mut p, u, v, weight)?;
    }

    let q_line = lines.next().ok_or(FormatError::MissingLine { what: "q vector" })?;
    let q = parse_exactly_n_f64(q_line, n, "q vector entry")?;

    let s = match lines.next() {
        Some(s_line) => parse_exactly_n_i64(s_line, n, "s vector entry")?,
        None => Vec::new(),
    };

    Topology::try_new(n, p, q, s).map_err(ParsedError::from)
}

/// Sets `p[u-1][v-1]` and `p[v-1][u-1]` from an edge line's `u v p` triple.
/// An out-of-range index here would only ever come from a malformed file,
/// surfaced as a format error rather than a panic.
fn set_symmetric(p: &mut [Vec<f64>], u: usize, v: usize, weight: f64) -> Result<(), FormatError> {
    let n = p.len();
    if u == 0 || v == 0 || u > n || v > n {
        return Err(FormatError::InvalidNumber {
            what: "edge endpoint within [1, n]",
            text: format!("{u} {v}"),
        });
    }
    let row_u = p.get_mut(u - 1).ok_or(FormatError::InvalidNumber {
        what: "edge endpoint within [1, n]",
        text: u.to_string(),
    })?;
    if let Some(entry) = row_u.get_mut(v - 1) {
        *entry = weight;
    }
    let row_v = p.get_mut(v - 1).ok_or(FormatError::InvalidNumber {
        what: "edge endpoint within [1, n]",
        text: v.to_string(),
    })?;
    if let Some(entry) = row_v.get_mut(u - 1) {
        *entry = weight;
    }
    Ok(())
}

fn parse_usize<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    what: &'static str,
) -> Result<usize, FormatError> {
    let token = tokens.next().ok_or(FormatError::MissingLine { what })?;
    token
        .parse::<usize>()
        .map_err(|_err| FormatError::InvalidNumber {
            what,
            text: token.to_owned(),
        })
}

fn parse_f64<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    what: &'static str,
) -> Result<f64, FormatError> {
    let token = tokens.next().ok_or(FormatError::MissingLine { what })?;
    token
        .parse::<f64>()
        .map_err(|_err| FormatError::InvalidNumber {
            what,
            text: token.to_owned(),
        })
}

fn parse_exactly_n_f64(line: &str, n: usize, what: &'static str) -> Result<Vec<f64>, FormatError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != n {
        return Err(FormatError::WrongTokenCount {
            what,
            expected: n,
            actual: tokens.len(),
        });
    }
    tokens
        .into_iter()
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|_err| FormatError::InvalidNumber {
                    what,
                    text: token.to_owned(),
                })
        })
        .collect()
}

fn parse_exactly_n_i64(line: &str, n: usize, what: &'static str) -> Result<Vec<i64>, FormatError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != n {
        return Err(FormatError::WrongTokenCount {
            what,
            expected: n,
            actual: tokens.len(),
        });
    }
    tokens
        .into_iter()
        .map(|token| {
            token
                .parse::<i64>()
                .map_err(|_err| FormatError::InvalidNumber {
                    what,
                    text: token.to_owned(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::parse_topology;

    #[test]
    fn parses_a_minimal_two_node_topology() {
        let topo = parse_topology("2 1\n1 2 0.5\n0.0 0.0\n").expect("valid fixture");
        assert_eq!(topo.node_count(), 2);
        assert!((topo.creation_probability(1, 2) - 0.5).abs() < 1e-9);
        assert!((topo.creation_probability(2, 1) - 0.5).abs() < 1e-9);
        assert_eq!(topo.saturation(1), qnv_core::UNBOUNDED);
    }

    #[test]
    fn parses_an_explicit_saturation_line() {
        let topo = parse_topology("2 1\n1 2 1.0\n0.0 0.0\n3 5\n").expect("valid fixture");
        assert_eq!(topo.saturation(1), 3);
        assert_eq!(topo.saturation(2), 5);
    }

    #[test]
    fn rejects_a_q_line_with_the_wrong_number_of_entries() {
        let err = parse_topology("2 1\n1 2 0.5\n0.0\n").expect_err("q line too short");
        assert!(matches!(err, super::TopologyIoError::Format(_)));
    }

    #[test]
    fn rejects_an_unparsable_header() {
        let err = parse_topology("two one\n").expect_err("header is not numeric");
        assert!(matches!(err, super::TopologyIoError::Format(_)));
    }

    #[test]
    fn rejects_a_probability_outside_zero_one_via_topology_validation() {
        let err = parse_topology("2 1\n1 2 1.5\n0.0 0.0\n").expect_err("p out of range");
        assert!(matches!(err, super::TopologyIoError::Topology(_)));
    }
}
