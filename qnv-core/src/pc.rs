//! Probabilistic configuration: a weighted multiset of deterministic worlds.

use crate::dc::DeterministicConfiguration;
use crate::topology::Topology;

/// An ordered sequence of [`DeterministicConfiguration`]s forming a
/// sub-probability distribution over possible network states.
///
/// Order is significant only as a pairing mechanism with expression-result
/// vectors (see [`crate::eval::eval`]); semantically the configuration is a
/// multiset. Lifted operations ([`Self::assign`], [`Self::cr`], [`Self::sw`],
/// [`Self::de`]) take a pre-evaluated argument vector, one entry per
/// currently-live [`DeterministicConfiguration`].
#[derive(Debug, Clone, Default)]
pub struct ProbabilisticConfiguration {
    dcs: Vec<DeterministicConfiguration>,
}

impl ProbabilisticConfiguration {
    /// Builds the initial configuration for a topology of `n` nodes: a
    /// single deterministic configuration with probability 1.
    #[must_use]
    pub fn initial(n: usize) -> Self {
        Self {
            dcs: vec![DeterministicConfiguration::initial(n)],
        }
    }

    /// Wraps an explicit list of deterministic configurations.
    #[must_use]
    pub fn from_dcs(dcs: Vec<DeterministicConfiguration>) -> Self {
        Self { dcs }
    }

    /// Number of live deterministic configurations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dcs.len()
    }

    /// Whether no deterministic configurations remain live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dcs.is_empty()
    }

    /// Borrows the live deterministic configurations, in order.
    #[must_use]
    pub fn dcs(&self) -> &[DeterministicConfiguration] {
        &self.dcs
    }

    /// Consumes this configuration, returning its deterministic configurations.
    #[must_use]
    pub fn into_dcs(self) -> Vec<DeterministicConfiguration> {
        self.dcs
    }

    /// Replaces the live configurations wholesale. Used by `if`/`while`/
    /// `forget` to install a recombined or filtered list.
    pub fn set_dcs(&mut self, dcs: Vec<DeterministicConfiguration>) {
        self.dcs = dcs;
    }

    /// Sum of `prob` across all live configurations; a sub-probability
    /// (at most `1 + epsilon`).
    #[must_use]
    pub fn total_probability(&self) -> f64 {
        self.dcs.iter().map(DeterministicConfiguration::prob).sum()
    }

    /// Lifted `assign`: `dcs[i].mem[name] = values[i]` for each `i`.
    ///
    /// # Panics
    /// Panics if `values.len()` does not match [`Self::len`]; this is an
    /// internal-invariant violation (the interpreter always evaluates
    /// expressions against the current configuration before calling this),
    /// not a condition a well-typed caller can trigger.
    pub fn assign(&mut self, name: &str, values: &[i64]) {
        assert_eq!(values.len(), self.dcs.len(), "assign: value vector length mismatch");
        for (dc, &value) in self.dcs.iter_mut().zip(values) {
            dc.assign(name, value);
        }
    }

    /// Lifted `cr`: forks a success sibling per live configuration where
    /// creation is attempted. Siblings appended during this call are never
    /// themselves visited within the same lifted step — the snapshot length
    /// is taken up front and iteration never revisits indices beyond it.
    ///
    /// # Panics
    /// Panics if `xs.len()` or `ys.len()` does not match [`Self::len`].
    pub fn cr(&mut self, name: &str, xs: &[i64], ys: &[i64], topo: &Topology) {
        assert_eq!(xs.len(), self.dcs.len(), "cr: x vector length mismatch");
        assert_eq!(ys.len(), self.dcs.len(), "cr: y vector length mismatch");
        let initial_len = self.dcs.len();
        let mut forked = Vec::new();
        for i in 0..initial_len {
            let x = usize_node(xs[i]);
            let y = usize_node(ys[i]);
            self.dcs[i].cr(name, x, y, topo, &mut forked);
        }
        self.dcs.extend(forked);
    }

    /// Lifted `sw`, analogous to [`Self::cr`].
    ///
    /// # Panics
    /// Panics if any argument vector's length does not match [`Self::len`].
    pub fn sw(&mut self, name: &str, xs: &[i64], ys: &[i64], zs: &[i64], topo: &Topology) {
        assert_eq!(xs.len(), self.dcs.len(), "sw: x vector length mismatch");
        assert_eq!(ys.len(), self.dcs.len(), "sw: y vector length mismatch");
        assert_eq!(zs.len(), self.dcs.len(), "sw: z vector length mismatch");
        let initial_len = self.dcs.len();
        let mut forked = Vec::new();
        for i in 0..initial_len {
            let x = usize_node(xs[i]);
            let y = usize_node(ys[i]);
            let z = usize_node(zs[i]);
            self.dcs[i].sw(name, x, y, z, topo, &mut forked);
        }
        self.dcs.extend(forked);
    }

    /// Lifted `de`, analogous to [`Self::cr`] but never forks.
    ///
    /// # Panics
    /// Panics if either argument vector's length does not match [`Self::len`].
    pub fn de(&mut self, xs: &[i64], ys: &[i64]) {
        assert_eq!(xs.len(), self.dcs.len(), "de: x vector length mismatch");
        assert_eq!(ys.len(), self.dcs.len(), "de: y vector length mismatch");
        for (dc, (&x, &y)) in self.dcs.iter_mut().zip(xs.iter().zip(ys)) {
            dc.de(usize_node(x), usize_node(y));
        }
    }
}

/// Converts a node identifier evaluated from the source language (an
/// arbitrary `i64`) into the 1-indexed `usize` the topology accessors use.
///
/// Negative or implausibly large node numbers indicate a program that is
/// not well-typed with respect to the topology; this crate does not type
/// check the AST, so this performs the minimal clamp needed to stay within
/// `usize` rather than validating against the topology's node count (which
/// the caller — [`DeterministicConfiguration`] indexing — will still catch
/// via a panic on out-of-bounds access).
fn usize_node(value: i64) -> usize {
    usize::try_from(value).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::ProbabilisticConfiguration;
    use crate::topology::Topology;

    fn t2(p: f64) -> Topology {
        Topology::try_new(2, vec![vec![0.0, p], vec![p, 0.0]], vec![0.0, 0.0], vec![])
            .expect("valid topology")
    }

    #[test]
    fn cr_forks_once_per_live_configuration_and_not_the_siblings() {
        let topo = t2(0.5);
        let mut pc = ProbabilisticConfiguration::initial(2);
        pc.cr("a", &[1], &[2], &topo);
        assert_eq!(pc.len(), 2);

        // A second cr should fork each of the two current worlds once,
        // yielding four, not touch the just-appended siblings again.
        pc.cr("b", &[1, 1], &[2, 2], &topo);
        assert_eq!(pc.len(), 4);
    }

    #[test]
    fn total_probability_is_conserved_across_a_fork() {
        let topo = t2(0.5);
        let mut pc = ProbabilisticConfiguration::initial(2);
        let before = pc.total_probability();
        pc.cr("a", &[1], &[2], &topo);
        let after = pc.total_probability();
        assert!((before - after).abs() < 1e-9);
    }
}
