//! Statement interpreter: tagged-variant dispatch over a probabilistic
//! configuration.
//!
//! The AST is closed and needs no open-world polymorphism, so each
//! statement kind is handled by a `match` arm rather than a visitor trait.

use thiserror::Error;

use qnv_ast::{Program, Stmt};

use crate::eval::{eval, require_ints, EvalError, EvalErrorCode};
use crate::pc::ProbabilisticConfiguration;
use crate::topology::Topology;

/// Default cap on `while` body iterations before a run is aborted as
/// divergent.
pub const DEFAULT_MAX_LOOP_ITERATIONS: u32 = 1000;

/// Stable codes describing [`InterpreterError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum InterpreterErrorCode {
    /// A `while` loop exceeded the configured iteration cap.
    LoopDivergence,
    /// Expression evaluation failed.
    Eval(EvalErrorCode),
}

/// Errors raised while interpreting a program against a configuration.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum InterpreterError {
    /// A `while` body ran more than the configured iteration cap without
    /// its active set emptying.
    #[error("too many loop iterations: exceeded the cap of {cap} after {iterations} iterations")]
    LoopDivergence {
        /// The configured cap that was exceeded.
        cap: u32,
        /// The number of iterations actually executed.
        iterations: u32,
    },
    /// Expression evaluation failed.
    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl InterpreterError {
    /// Returns the stable [`InterpreterErrorCode`] for this error.
    #[must_use]
    pub const fn code(&self) -> InterpreterErrorCode {
        match self {
            Self::LoopDivergence { .. } => InterpreterErrorCode::LoopDivergence,
            Self::Eval(err) => InterpreterErrorCode::Eval(err.code()),
        }
    }
}

/// Runtime configuration for [`exec_program`].
#[derive(Debug, Clone, Copy)]
pub struct InterpreterConfig {
    max_loop_iterations: u32,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            max_loop_iterations: DEFAULT_MAX_LOOP_ITERATIONS,
        }
    }
}

impl InterpreterConfig {
    /// Builds a configuration with an explicit loop-iteration cap.
    #[must_use]
    pub const fn with_max_loop_iterations(max_loop_iterations: u32) -> Self {
        Self { max_loop_iterations }
    }

    /// The configured loop-iteration cap.
    #[must_use]
    pub const fn max_loop_iterations(&self) -> u32 {
        self.max_loop_iterations
    }
}

/// Executes every statement of `program` against `pc` in order.
///
/// # Errors
/// Returns [`InterpreterError`] if any statement fails to evaluate, or if a
/// `while` loop exceeds the configured iteration cap.
pub fn exec_program(
    program: &Program,
    pc: &mut ProbabilisticConfiguration,
    topo: &Topology,
    config: &InterpreterConfig,
) -> Result<(), InterpreterError> {
    for stmt in &program.statements {
        exec_stmt(stmt, pc, topo, config)?;
    }
    Ok(())
}

fn exec_stmt(
    stmt: &Stmt,
    pc: &mut ProbabilisticConfiguration,
    topo: &Topology,
    config: &InterpreterConfig,
) -> Result<(), InterpreterError> {
    match stmt {
        Stmt::Assign { ident, expr } => {
            let values = require_ints(&eval(expr, pc)?)?;
            pc.assign(ident, &values);
        }
        Stmt::AssignCr { ident, lhs, rhs } => {
            let xs = require_ints(&eval(lhs, pc)?)?;
            let ys = require_ints(&eval(rhs, pc)?)?;
            pc.cr(ident, &xs, &ys, topo);
        }
        Stmt::AssignSw { ident, lhs, rhs, at } => {
            let xs = require_ints(&eval(lhs, pc)?)?;
            let ys = require_ints(&eval(rhs, pc)?)?;
            let zs = require_ints(&eval(at, pc)?)?;
            pc.sw(ident, &xs, &ys, &zs, topo);
        }
        Stmt::De { lhs, rhs } => {
            let xs = require_ints(&eval(lhs, pc)?)?;
            let ys = require_ints(&eval(rhs, pc)?)?;
            pc.de(&xs, &ys);
        }
        Stmt::Assert { test } => exec_assert(test, pc)?,
        Stmt::Pass => {}
        Stmt::Forget { idents } => exec_forget(idents, pc),
        Stmt::If {
            test,
            then_branch,
            else_branch,
        } => exec_if(test, then_branch, else_branch, pc, topo, config)?,
        Stmt::While { test, body } => exec_while(test, body, pc, topo, config)?,
    }
    Ok(())
}

fn exec_assert(
    test: &qnv_ast::Expr,
    pc: &mut ProbabilisticConfiguration,
) -> Result<(), InterpreterError> {
    let truth = require_ints(&eval(test, pc)?)?;
    let survivors: Vec<_> = pc
        .dcs()
        .iter()
        .zip(&truth)
        .filter(|(_, &t)| t != 0)
        .map(|(dc, _)| dc.clone())
        .collect();
    pc.set_dcs(survivors);
    Ok(())
}

fn exec_forget(idents: &[String], pc: &mut ProbabilisticConfiguration) {
    let mut forgotten: Vec<_> = pc.dcs().to_vec();
    for dc in &mut forgotten {
        dc.forget(idents);
    }

    let mut merged: Vec<_> = Vec::with_capacity(forgotten.len());
    let mut index_by_key = std::collections::HashMap::new();
    for dc in forgotten {
        let key = dc.merge_key();
        if let Some(&existing_index) = index_by_key.get(&key) {
            let existing: &mut crate::dc::DeterministicConfiguration =
                &mut merged[existing_index];
            existing.absorb_probability(&dc);
        } else {
            index_by_key.insert(key, merged.len());
            merged.push(dc);
        }
    }
    pc.set_dcs(merged);
}

fn exec_if(
    test: &qnv_ast::Expr,
    then_branch: &Program,
    else_branch: &Program,
    pc: &mut ProbabilisticConfiguration,
    topo: &Topology,
    config: &InterpreterConfig,
) -> Result<(), InterpreterError> {
    let truth = require_ints(&eval(test, pc)?)?;
    let (then_dcs, else_dcs): (Vec<_>, Vec<_>) = pc
        .dcs()
        .iter()
        .cloned()
        .zip(&truth)
        .partition(|(_, &t)| t != 0);
    let mut then_pc = ProbabilisticConfiguration::from_dcs(
        then_dcs.into_iter().map(|(dc, _)| dc).collect(),
    );
    let mut else_pc = ProbabilisticConfiguration::from_dcs(
        else_dcs.into_iter().map(|(dc, _)| dc).collect(),
    );
    exec_program(then_branch, &mut then_pc, topo, config)?;
    exec_program(else_branch, &mut else_pc, topo, config)?;

    let mut combined = then_pc.into_dcs();
    combined.extend(else_pc.into_dcs());
    pc.set_dcs(combined);
    Ok(())
}

fn exec_while(
    test: &qnv_ast::Expr,
    body: &Program,
    pc: &mut ProbabilisticConfiguration,
    topo: &Topology,
    config: &InterpreterConfig,
) -> Result<(), InterpreterError> {
    let mut exited = Vec::new();
    let mut iterations: u32 = 0;
    loop {
        let truth = require_ints(&eval(test, pc)?)?;
        let (active, done): (Vec<_>, Vec<_>) = pc
            .dcs()
            .iter()
            .cloned()
            .zip(&truth)
            .partition(|(_, &t)| t != 0);
        exited.extend(done.into_iter().map(|(dc, _)| dc));
        let active: Vec<_> = active.into_iter().map(|(dc, _)| dc).collect();
        if active.is_empty() {
            break;
        }
        pc.set_dcs(active);
        exec_program(body, pc, topo, config)?;
        iterations += 1;
        if iterations > config.max_loop_iterations() {
            return Err(InterpreterError::LoopDivergence {
                cap: config.max_loop_iterations(),
                iterations,
            });
        }
    }
    pc.set_dcs(exited);
    Ok(())
}
