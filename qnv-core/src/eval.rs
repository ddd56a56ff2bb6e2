//! Pure expression evaluation over a probabilistic configuration.

use thiserror::Error;

use qnv_ast::{BinaryOp, Expr, UnaryOp};

use crate::pc::ProbabilisticConfiguration;

/// The result of evaluating an expression against one deterministic
/// configuration.
///
/// `Null` is the explicit division-by-zero marker: a distinct value rather
/// than a magic integer, so the type system forces every consumer to decide
/// how to handle it instead of silently treating it as data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalValue {
    /// An ordinary integer result.
    Int(i64),
    /// The result of a division whose divisor evaluated to zero.
    Null,
}

/// Stable codes describing [`EvalError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum EvalErrorCode {
    /// An identifier was not present in a configuration's memory.
    MissingVariable,
    /// A null marker (division by zero) was observed at its first use.
    DivisionByZero,
}

impl EvalErrorCode {
    /// Returns the stable machine-readable representation of this code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingVariable => "EVAL_MISSING_VARIABLE",
            Self::DivisionByZero => "EVAL_DIVISION_BY_ZERO",
        }
    }
}

/// Errors raised while evaluating an expression.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum EvalError {
    /// An identifier was read before any statement assigned it in this
    /// configuration.
    #[error("variable `{name}` is not defined in the current configuration")]
    MissingVariable {
        /// The offending identifier.
        name: String,
    },
    /// A `Null` produced by division by zero is an error at its first
    /// downstream use, rather than silently undefined.
    #[error("division by zero produced an undefined value used by a later operation")]
    DivisionByZero,
}

impl EvalError {
    /// Returns the stable [`EvalErrorCode`] for this error.
    #[must_use]
    pub const fn code(&self) -> EvalErrorCode {
        match self {
            Self::MissingVariable { .. } => EvalErrorCode::MissingVariable,
            Self::DivisionByZero => EvalErrorCode::DivisionByZero,
        }
    }
}

/// Evaluates `expr` once per live deterministic configuration in `pc`,
/// returning a position-aligned vector of results.
///
/// # Errors
/// Returns [`EvalError::MissingVariable`] if an identifier is absent from a
/// configuration's memory.
pub fn eval(expr: &Expr, pc: &ProbabilisticConfiguration) -> Result<Vec<EvalValue>, EvalError> {
    match expr {
        Expr::IntLit(c) => Ok(vec![EvalValue::Int(*c); pc.len()]),
        Expr::Ident(name) => pc
            .dcs()
            .iter()
            .map(|dc| {
                dc.mem()
                    .get(name)
                    .copied()
                    .map(EvalValue::Int)
                    .ok_or_else(|| EvalError::MissingVariable { name: name.clone() })
            })
            .collect(),
        Expr::Unary { op, operand } => {
            let operand = eval(operand, pc)?;
            operand.into_iter().map(|v| eval_unary(*op, v)).collect()
        }
        Expr::Binary { op, lhs, rhs } => {
            // Both operands are always evaluated, even for LogicOr/LogicAnd:
            // no short-circuiting, to keep per-configuration result vectors
            // aligned across all operators.
            let lhs = eval(lhs, pc)?;
            let rhs = eval(rhs, pc)?;
            lhs.into_iter()
                .zip(rhs)
                .map(|(l, r)| eval_binary(*op, l, r))
                .collect()
        }
    }
}

/// Forces a vector of [`EvalValue`]s into plain integers: a `Null` observed
/// at its first use is an error, not undefined behaviour.
///
/// # Errors
/// Returns [`EvalError::DivisionByZero`] if any element is [`EvalValue::Null`].
pub fn require_ints(values: &[EvalValue]) -> Result<Vec<i64>, EvalError> {
    values
        .iter()
        .map(|v| match v {
            EvalValue::Int(i) => Ok(*i),
            EvalValue::Null => Err(EvalError::DivisionByZero),
        })
        .collect()
}

/// Integer floor division, matching the source language's `//` (always
/// rounds toward negative infinity, unlike Rust's truncating `/`).
#[expect(
    clippy::integer_division,
    clippy::integer_division_remainder_used,
    reason = "implementing floor division is the entire purpose of this function"
)]
fn floor_div(l: i64, r: i64) -> i64 {
    let q = l / r;
    let rem = l % r;
    if rem != 0 && (rem < 0) != (r < 0) {
        q - 1
    } else {
        q
    }
}

fn eval_unary(op: UnaryOp, operand: EvalValue) -> Result<EvalValue, EvalError> {
    let EvalValue::Int(value) = operand else {
        return Err(EvalError::DivisionByZero);
    };
    Ok(match op {
        UnaryOp::Neg => EvalValue::Int(-value),
        UnaryOp::LogicNot => EvalValue::Int(i64::from(value == 0)),
    })
}

#[expect(
    clippy::too_many_lines,
    reason = "one exhaustive match over every binary operator reads more clearly flat than split"
)]
fn eval_binary(op: BinaryOp, lhs: EvalValue, rhs: EvalValue) -> Result<EvalValue, EvalError> {
    let (EvalValue::Int(l), EvalValue::Int(r)) = (lhs, rhs) else {
        return Err(EvalError::DivisionByZero);
    };
    Ok(match op {
        BinaryOp::Add => EvalValue::Int(l + r),
        BinaryOp::Sub => EvalValue::Int(l - r),
        BinaryOp::Mul => EvalValue::Int(l * r),
        BinaryOp::Div if r == 0 => EvalValue::Null,
        BinaryOp::Div => EvalValue::Int(floor_div(l, r)),
        BinaryOp::Eq => EvalValue::Int(i64::from(l == r)),
        BinaryOp::Ne => EvalValue::Int(i64::from(l != r)),
        BinaryOp::Lt => EvalValue::Int(i64::from(l < r)),
        BinaryOp::Le => EvalValue::Int(i64::from(l <= r)),
        BinaryOp::Gt => EvalValue::Int(i64::from(l > r)),
        BinaryOp::Ge => EvalValue::Int(i64::from(l >= r)),
        BinaryOp::LogicOr => EvalValue::Int(i64::from(l != 0 || r != 0)),
        BinaryOp::LogicAnd => EvalValue::Int(i64::from(l != 0 && r != 0)),
    })
}

#[cfg(test)]
mod tests {
    use super::{eval, require_ints, EvalError, EvalValue};
    use qnv_ast::{BinaryOp, Expr, UnaryOp};
    use rstest::rstest;

    use crate::pc::ProbabilisticConfiguration;

    #[test]
    fn int_literal_broadcasts_across_all_configurations() {
        let pc = ProbabilisticConfiguration::initial(1);
        let result = eval(&Expr::IntLit(7), &pc).expect("literal evaluates");
        assert_eq!(result, vec![EvalValue::Int(7)]);
    }

    #[test]
    fn missing_identifier_reports_its_name() {
        let pc = ProbabilisticConfiguration::initial(1);
        let err = eval(&Expr::Ident("x".into()), &pc).expect_err("x is undefined");
        assert_eq!(err, EvalError::MissingVariable { name: "x".into() });
    }

    #[rstest]
    #[case::add(BinaryOp::Add, 3, 4, 7)]
    #[case::sub(BinaryOp::Sub, 3, 4, -1)]
    #[case::mul(BinaryOp::Mul, 3, 4, 12)]
    #[case::eq_true(BinaryOp::Eq, 4, 4, 1)]
    #[case::eq_false(BinaryOp::Eq, 3, 4, 0)]
    #[case::ne(BinaryOp::Ne, 3, 4, 1)]
    #[case::lt(BinaryOp::Lt, 3, 4, 1)]
    #[case::le(BinaryOp::Le, 4, 4, 1)]
    #[case::gt(BinaryOp::Gt, 4, 3, 1)]
    #[case::ge(BinaryOp::Ge, 4, 4, 1)]
    #[case::logic_or(BinaryOp::LogicOr, 0, 5, 1)]
    #[case::logic_and(BinaryOp::LogicAnd, 0, 5, 0)]
    fn binary_operators_match_their_truth_table(
        #[case] op: BinaryOp,
        #[case] lhs: i64,
        #[case] rhs: i64,
        #[case] expected: i64,
    ) {
        let pc = ProbabilisticConfiguration::initial(1);
        let expr = Expr::binary(op, Expr::IntLit(lhs), Expr::IntLit(rhs));
        let result = eval(&expr, &pc).expect("constant-folds");
        assert_eq!(result, vec![EvalValue::Int(expected)]);
    }

    #[test]
    fn logic_operators_evaluate_both_operands_without_short_circuit() {
        // If LogicAnd short-circuited on a false left operand, evaluating a
        // missing identifier on the right would never surface its error.
        let pc = ProbabilisticConfiguration::initial(1);
        let expr = Expr::binary(
            BinaryOp::LogicAnd,
            Expr::IntLit(0),
            Expr::Ident("missing".into()),
        );
        let err = eval(&expr, &pc).expect_err("right operand is still evaluated");
        assert_eq!(
            err,
            EvalError::MissingVariable {
                name: "missing".into()
            }
        );
    }

    #[test]
    fn division_by_zero_yields_null_not_an_error_at_the_point_of_division() {
        let pc = ProbabilisticConfiguration::initial(1);
        let expr = Expr::binary(BinaryOp::Div, Expr::IntLit(5), Expr::IntLit(0));
        let result = eval(&expr, &pc).expect("division itself does not error");
        assert_eq!(result, vec![EvalValue::Null]);
    }

    #[test]
    fn require_ints_surfaces_division_by_zero_at_first_use() {
        let values = vec![EvalValue::Null];
        assert_eq!(require_ints(&values), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn unary_operators_match_their_truth_table() {
        let pc = ProbabilisticConfiguration::initial(1);
        let neg = eval(&Expr::unary(UnaryOp::Neg, Expr::IntLit(3)), &pc).expect("negates");
        assert_eq!(neg, vec![EvalValue::Int(-3)]);

        let not_zero = eval(&Expr::unary(UnaryOp::LogicNot, Expr::IntLit(0)), &pc)
            .expect("logic-nots");
        assert_eq!(not_zero, vec![EvalValue::Int(1)]);
    }
}
