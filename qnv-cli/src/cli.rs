//! Command-line surface: `--input`/`--topo`/`--parse`/`--qnv`.

use std::io::Write as _;
use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use qnv_core::{Driver, InterpreterError, ProbabilisticConfiguration, DEFAULT_MAX_LOOP_ITERATIONS};
use qnv_syntax::{parse, print_program, ParseError};
use qnv_topology_io::{read_topology_file, TopologyIoError};

/// Name of the environment variable overriding the `while`-loop iteration
/// cap, primarily so tests can exercise [`InterpreterError::LoopDivergence`]
/// without running 1000 iterations. Defaults to
/// [`DEFAULT_MAX_LOOP_ITERATIONS`] when unset or unparsable.
pub const MAX_LOOP_ITERATIONS_VAR: &str = "QNV_MAX_LOOP_ITERATIONS";

/// Reads [`MAX_LOOP_ITERATIONS_VAR`] and builds a [`Driver`] honouring it.
/// An unset or unparsable value falls back to
/// [`DEFAULT_MAX_LOOP_ITERATIONS`] rather than failing the run.
fn resolve_driver() -> Driver {
    let raw = std::env::var(MAX_LOOP_ITERATIONS_VAR).ok();
    Driver::with_max_loop_iterations(max_loop_iterations_from(raw.as_deref()))
}

/// Pure parsing logic behind [`resolve_driver`], split out so tests can
/// exercise every branch without mutating process-global environment state.
fn max_loop_iterations_from(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.parse::<u32>().ok())
        .unwrap_or(DEFAULT_MAX_LOOP_ITERATIONS)
}

/// Verifies probabilistic entanglement programs against a network topology.
#[derive(Debug, Parser)]
#[command(name = "qnv", version, about)]
pub struct Cli {
    /// Path to the source program file.
    #[arg(long)]
    pub input: PathBuf,

    /// Path to the topology file.
    #[arg(long)]
    pub topo: PathBuf,

    /// Emit the parsed program's AST as an indented tree, then exit.
    #[arg(long)]
    pub parse: bool,

    /// Run the interpreter and print the final probabilistic configuration.
    #[arg(long)]
    pub qnv: bool,
}

/// Stable codes describing [`CliError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum CliErrorCode {
    /// The source program failed to parse.
    Syntax,
    /// The topology file could not be read or was malformed.
    Topology,
    /// Interpretation failed (evaluation error or loop divergence).
    Interpret,
    /// A file could not be read, or output could not be written.
    Io,
    /// Neither `--parse` nor `--qnv` was given.
    NoAction,
}

/// Top-level error type for the `qnv` binary.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CliError {
    /// The source program failed to parse.
    #[error("{} syntax error(s) in the source program", .0.len())]
    Syntax(Vec<ParseError>),
    /// The topology file could not be read or was malformed.
    #[error(transparent)]
    Topology(#[from] TopologyIoError),
    /// Interpretation failed.
    #[error(transparent)]
    Interpret(#[from] InterpreterError),
    /// Reading the source file from disk failed.
    #[error("failed to read source file {path}: {source}")]
    ReadSource {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Writing program output failed.
    #[error("failed to write output: {0}")]
    Write(#[source] std::io::Error),
    /// Neither `--parse` nor `--qnv` was given.
    #[error("nothing to do: pass --parse, --qnv, or both")]
    NoAction,
}

impl CliError {
    /// Returns the stable [`CliErrorCode`] for this error.
    #[must_use]
    pub const fn code(&self) -> CliErrorCode {
        match self {
            Self::Syntax(_) => CliErrorCode::Syntax,
            Self::Topology(_) => CliErrorCode::Topology,
            Self::Interpret(_) => CliErrorCode::Interpret,
            Self::ReadSource { .. } | Self::Write(_) => CliErrorCode::Io,
            Self::NoAction => CliErrorCode::NoAction,
        }
    }
}

/// Runs the CLI's chosen actions, writing program output to `out`.
///
/// # Errors
/// Returns [`CliError`] on any I/O, syntax, or interpretation failure, or if
/// neither `--parse` nor `--qnv` was requested.
pub fn run(cli: &Cli, out: &mut impl std::io::Write) -> Result<(), CliError> {
    let source = std::fs::read_to_string(&cli.input).map_err(|source| CliError::ReadSource {
        path: cli.input.clone(),
        source,
    })?;
    let program = parse(&source).map_err(CliError::Syntax)?;

    if !cli.parse && !cli.qnv {
        return Err(CliError::NoAction);
    }

    if cli.parse {
        write!(out, "{}", print_program(&program)).map_err(CliError::Write)?;
    }

    if cli.qnv {
        let topology = read_topology_file(&cli.topo)?;
        let driver = resolve_driver();
        let pc = driver.run(&topology, &program)?;
        render_pc(&pc, out).map_err(CliError::Write)?;
    }

    Ok(())
}

/// Renders a probabilistic configuration DC-by-DC: each DC's `prob`, its
/// `mem` mapping, and its `ent` matrix on separate lines, with a blank line
/// between DCs.
///
/// # Errors
/// Propagates any I/O error from writing to `out`.
pub fn render_pc(
    pc: &ProbabilisticConfiguration,
    out: &mut impl std::io::Write,
) -> std::io::Result<()> {
    for (index, dc) in pc.dcs().iter().enumerate() {
        if index > 0 {
            writeln!(out)?;
        }
        writeln!(out, "prob: {}", dc.prob())?;

        let mut mem: Vec<_> = dc.mem().iter().collect();
        mem.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
        let rendered_mem = mem
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(out, "mem: {rendered_mem}")?;

        writeln!(out, "ent:")?;
        for row in dc.ent() {
            let rendered_row = row
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(out, "{rendered_row}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::{max_loop_iterations_from, render_pc, run, Cli};
    use qnv_test_support::{program_create, t2};

    #[test]
    fn render_pc_emits_a_blank_line_between_configurations() {
        let topo = t2(0.5);
        let program = program_create("a", 1, 2);
        let driver = qnv_core::Driver::new();
        let pc = driver.run(&topo, &program).expect("program runs");

        let mut out = Vec::new();
        render_pc(&pc, &mut out).expect("writes cleanly");
        let rendered = String::from_utf8(out).expect("output is UTF-8");

        assert_eq!(rendered.matches("prob:").count(), 2);
        assert!(rendered.contains("\n\nprob:"));
    }

    #[rstest]
    #[case::unset(None, qnv_core::DEFAULT_MAX_LOOP_ITERATIONS)]
    #[case::valid(Some("5"), 5)]
    #[case::unparsable(Some("not-a-number"), qnv_core::DEFAULT_MAX_LOOP_ITERATIONS)]
    #[case::negative(Some("-1"), qnv_core::DEFAULT_MAX_LOOP_ITERATIONS)]
    fn max_loop_iterations_from_falls_back_on_anything_but_a_valid_u32(
        #[case] raw: Option<&str>,
        #[case] expected: u32,
    ) {
        assert_eq!(max_loop_iterations_from(raw), expected);
    }

    fn write_fixture(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).expect("fixture writes");
        path
    }

    fn t2_topology_fixture(dir: &TempDir) -> PathBuf {
        write_fixture(dir, "topo.txt", "2 1\n1 2 0.5\n0.0 0.0\n")
    }

    #[test]
    fn parse_flag_emits_the_ast_dump_without_a_topology() {
        let dir = TempDir::new().expect("temp dir");
        let input = write_fixture(&dir, "program.qnv", "a := cr(1, 2);\n");
        let cli = Cli {
            input,
            topo: dir.path().join("unused-topo.txt"),
            parse: true,
            qnv: false,
        };

        let mut out = Vec::new();
        run(&cli, &mut out).expect("parse-only run succeeds without reading the topology");
        let rendered = String::from_utf8(out).expect("output is UTF-8");
        assert!(rendered.starts_with("Program\n"));
        assert!(rendered.contains("AssignCr a"));
    }

    #[test]
    fn qnv_flag_runs_the_interpreter_and_renders_the_final_configuration() {
        let dir = TempDir::new().expect("temp dir");
        let input = write_fixture(&dir, "program.qnv", "a := cr(1, 2);\n");
        let topo = t2_topology_fixture(&dir);
        let cli = Cli {
            input,
            topo,
            parse: false,
            qnv: true,
        };

        let mut out = Vec::new();
        run(&cli, &mut out).expect("qnv run succeeds");
        let rendered = String::from_utf8(out).expect("output is UTF-8");
        assert_eq!(rendered.matches("prob:").count(), 2);
    }

    #[test]
    fn parse_and_qnv_together_emit_the_ast_dump_before_the_final_configuration() {
        let dir = TempDir::new().expect("temp dir");
        let input = write_fixture(&dir, "program.qnv", "a := cr(1, 2);\n");
        let topo = t2_topology_fixture(&dir);
        let cli = Cli {
            input,
            topo,
            parse: true,
            qnv: true,
        };

        let mut out = Vec::new();
        run(&cli, &mut out).expect("combined run succeeds");
        let rendered = String::from_utf8(out).expect("output is UTF-8");
        let ast_pos = rendered.find("Program\n").expect("ast dump present");
        let pc_pos = rendered.find("prob:").expect("pc dump present");
        assert!(ast_pos < pc_pos);
    }

    #[test]
    fn neither_flag_reports_no_action() {
        let dir = TempDir::new().expect("temp dir");
        let input = write_fixture(&dir, "program.qnv", "pass;\n");
        let cli = Cli {
            input,
            topo: dir.path().join("unused-topo.txt"),
            parse: false,
            qnv: false,
        };

        let mut out = Vec::new();
        let err = run(&cli, &mut out).expect_err("neither --parse nor --qnv was requested");
        assert!(matches!(err, super::CliError::NoAction));
    }

    #[test]
    fn missing_input_file_reports_an_io_error() {
        let dir = TempDir::new().expect("temp dir");
        let cli = Cli {
            input: dir.path().join("does-not-exist.qnv"),
            topo: dir.path().join("unused-topo.txt"),
            parse: true,
            qnv: false,
        };

        let mut out = Vec::new();
        let err = run(&cli, &mut out).expect_err("input file does not exist");
        assert!(matches!(err, super::CliError::ReadSource { .. }));
    }

    #[test]
    fn missing_topology_file_reports_a_topology_error_when_qnv_is_requested() {
        let dir = TempDir::new().expect("temp dir");
        let input = write_fixture(&dir, "program.qnv", "pass;\n");
        let cli = Cli {
            input,
            topo: dir.path().join("does-not-exist.txt"),
            parse: false,
            qnv: true,
        };

        let mut out = Vec::new();
        let err = run(&cli, &mut out).expect_err("topology file does not exist");
        assert!(matches!(err, super::CliError::Topology(_)));
    }

    #[test]
    fn syntax_errors_are_reported_without_touching_the_topology() {
        let dir = TempDir::new().expect("temp dir");
        let input = write_fixture(&dir, "program.qnv", "a := ;\n");
        let cli = Cli {
            input,
            topo: dir.path().join("unused-topo.txt"),
            parse: true,
            qnv: false,
        };

        let mut out = Vec::new();
        let err = run(&cli, &mut out).expect_err("malformed source does not parse");
        assert!(matches!(err, super::CliError::Syntax(_)));
    }

    /// A `while` whose test stays true past the 1000-iteration cap aborts
    /// the run rather than looping forever.
    #[test]
    fn a_while_loop_past_the_default_cap_reports_loop_divergence() {
        let dir = TempDir::new().expect("temp dir");
        let input = write_fixture(
            &dir,
            "program.qnv",
            "x := 0;\nwhile (x < 2000) { x := x + 1; }\n",
        );
        let topo = t2_topology_fixture(&dir);
        let cli = Cli {
            input,
            topo,
            parse: false,
            qnv: true,
        };

        let mut out = Vec::new();
        let err = run(&cli, &mut out).expect_err("the loop never satisfies its test within 1000 iterations");
        assert!(matches!(
            err,
            super::CliError::Interpret(qnv_core::InterpreterError::LoopDivergence { cap: 1000, .. })
        ));
    }
}
