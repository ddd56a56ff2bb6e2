//! Probabilistic symbolic interpreter for quantum-network entanglement
//! verification programs.
//!
//! [`topology`] holds the static network description, [`dc`] and [`pc`] hold
//! the deterministic/probabilistic configuration data model, [`eval`]
//! evaluates expressions, [`interp`] dispatches statements, and [`driver`]
//! ties a topology and a program together into a single run.

mod dc;
mod driver;
mod eval;
mod interp;
mod pc;
mod topology;

pub use dc::DeterministicConfiguration;
pub use driver::Driver;
pub use eval::{eval, require_ints, EvalError, EvalErrorCode, EvalValue};
pub use interp::{
    exec_program, InterpreterConfig, InterpreterError, InterpreterErrorCode,
    DEFAULT_MAX_LOOP_ITERATIONS,
};
pub use pc::ProbabilisticConfiguration;
pub use topology::{Topology, TopologyError, TopologyErrorCode, UNBOUNDED};
