//! Entry point tying a topology and a program together into a run.

use qnv_ast::Program;
use tracing::instrument;

use crate::interp::{exec_program, InterpreterConfig, InterpreterError};
use crate::pc::ProbabilisticConfiguration;
use crate::topology::Topology;

/// Runs a program against a topology, returning the final probabilistic
/// configuration.
///
/// Holds only an [`InterpreterConfig`]; a [`Topology`] and [`Program`] are
/// supplied per call rather than stored, since neither the CLI nor the
/// eventual embedding use case needs to run more than one program per
/// topology in a session.
#[derive(Debug, Clone, Copy, Default)]
pub struct Driver {
    config: InterpreterConfig,
}

impl Driver {
    /// Builds a driver with the default loop-iteration cap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a driver with an explicit loop-iteration cap.
    #[must_use]
    pub const fn with_max_loop_iterations(max_loop_iterations: u32) -> Self {
        Self {
            config: InterpreterConfig::with_max_loop_iterations(max_loop_iterations),
        }
    }

    /// Builds the initial single-world configuration for `topo` and runs
    /// `program` against it to completion.
    ///
    /// # Errors
    /// Returns [`InterpreterError`] if evaluation fails or a `while` loop
    /// exceeds the configured iteration cap.
    #[instrument(skip(self, topo, program), fields(nodes = topo.node_count(), statements = program.statements.len()))]
    pub fn run(
        &self,
        topo: &Topology,
        program: &Program,
    ) -> Result<ProbabilisticConfiguration, InterpreterError> {
        let mut pc = ProbabilisticConfiguration::initial(topo.node_count());
        exec_program(program, &mut pc, topo, &self.config)?;
        tracing::debug!(worlds = pc.len(), total_probability = pc.total_probability(), "run complete");
        Ok(pc)
    }
}
