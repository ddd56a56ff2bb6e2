//! Shared test fixtures: topology builders and small canned programs.
//!
//! This crate is dev-dependency-only scaffolding, not a production
//! interface — shared fixtures pulled out of individual test modules,
//! scoped to exactly what the tests in this workspace need.

use qnv_ast::{Expr, Program, Stmt};
use qnv_core::Topology;

/// Builds a [`Topology`] incrementally, defaulting every entry to zero/
/// unbounded, for use in test fixtures where only a handful of entries are
/// interesting.
#[derive(Debug, Clone)]
pub struct TopologyBuilder {
    n: usize,
    p: Vec<Vec<f64>>,
    q: Vec<f64>,
    s: Vec<i64>,
}

impl TopologyBuilder {
    /// Starts a builder for `n` nodes, every probability zero and every
    /// node unbounded.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            n,
            p: vec![vec![0.0; n]; n],
            q: vec![0.0; n],
            s: Vec::new(),
        }
    }

    /// Sets the symmetric creation probability between 1-indexed nodes `x`
    /// and `y`.
    #[must_use]
    pub fn with_edge(mut self, x: usize, y: usize, p: f64) -> Self {
        if let Some(row) = self.p.get_mut(x - 1) {
            if let Some(entry) = row.get_mut(y - 1) {
                *entry = p;
            }
        }
        if let Some(row) = self.p.get_mut(y - 1) {
            if let Some(entry) = row.get_mut(x - 1) {
                *entry = p;
            }
        }
        self
    }

    /// Sets the swap-success probability at 1-indexed node `z`.
    #[must_use]
    pub fn with_swap_probability(mut self, z: usize, q: f64) -> Self {
        if let Some(entry) = self.q.get_mut(z - 1) {
            *entry = q;
        }
        self
    }

    /// Sets the saturation marker for 1-indexed node `x`.
    #[must_use]
    pub fn with_saturation(mut self, x: usize, limit: i64) -> Self {
        if self.s.is_empty() {
            self.s = vec![qnv_core::UNBOUNDED; self.n];
        }
        if let Some(entry) = self.s.get_mut(x - 1) {
            *entry = limit;
        }
        self
    }

    /// Finishes the builder, validating the result.
    ///
    /// # Panics
    /// Panics if the accumulated fields fail [`Topology::try_new`]'s
    /// validation; fixtures are expected to be well-formed by construction.
    #[must_use]
    pub fn build(self) -> Topology {
        Topology::try_new(self.n, self.p, self.q, self.s)
            .unwrap_or_else(|err| panic!("test fixture topology is invalid: {err}"))
    }
}

/// The `T2` topology from the end-to-end scenarios: two nodes, edge `1-2`
/// with creation probability `p`, swap probabilities zero, unbounded.
#[must_use]
pub fn t2(p: f64) -> Topology {
    TopologyBuilder::new(2).with_edge(1, 2, p).build()
}

/// The `T3` topology from the swap scenario: three nodes in a chain,
/// `1-2` and `2-3` with creation probability 1.0, swap probability `q` at
/// node 2.
#[must_use]
pub fn t3_chain(q_at_middle: f64) -> Topology {
    TopologyBuilder::new(3)
        .with_edge(1, 2, 1.0)
        .with_edge(2, 3, 1.0)
        .with_swap_probability(2, q_at_middle)
        .build()
}

/// `{ident} := cr({x}, {y});`
#[must_use]
pub fn program_create(ident: &str, x: i64, y: i64) -> Program {
    Program::new(vec![Stmt::AssignCr {
        ident: ident.to_owned(),
        lhs: Expr::IntLit(x),
        rhs: Expr::IntLit(y),
    }])
}

/// `{ident} := cr({x}, {y}); assert({ident});`
#[must_use]
pub fn program_create_then_assert(ident: &str, x: i64, y: i64) -> Program {
    Program::new(vec![
        Stmt::AssignCr {
            ident: ident.to_owned(),
            lhs: Expr::IntLit(x),
            rhs: Expr::IntLit(y),
        },
        Stmt::Assert {
            test: Expr::Ident(ident.to_owned()),
        },
    ])
}
