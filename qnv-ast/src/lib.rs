//! Abstract syntax tree for the quantum-network verifier source language.
//!
//! This crate defines the tagged-variant AST that [`qnv-syntax`][syntax] produces
//! and [`qnv-core`][core] consumes. It is deliberately inert: no lexing, parsing,
//! or evaluation logic lives here, only the shape of a parsed program. Keeping
//! the AST in its own crate lets the interpreter depend on a stable, minimal
//! surface without pulling in the lexer or parser.
//!
//! [syntax]: https://docs.rs/qnv-syntax
//! [core]: https://docs.rs/qnv-core

/// A parsed program: a sequence of statements executed in order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    /// Top-level statements, in source order.
    pub statements: Vec<Stmt>,
}

impl Program {
    /// Builds a program from a statement list.
    #[must_use]
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self { statements }
    }
}

/// A single statement in the source language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// `v := e`
    Assign {
        /// Target variable.
        ident: String,
        /// Value expression.
        expr: Expr,
    },
    /// `v := cr(e1, e2)` — entanglement creation between the nodes named by
    /// `e1` and `e2`.
    AssignCr {
        /// Variable bound to the creation's success flag.
        ident: String,
        /// First node expression.
        lhs: Expr,
        /// Second node expression.
        rhs: Expr,
    },
    /// `v := sw(e1, e2 @ e3)` — entanglement swap at the node named by `e3`,
    /// consuming links `e1`–`e3` and `e2`–`e3`.
    AssignSw {
        /// Variable bound to the swap's success flag.
        ident: String,
        /// First outer node expression.
        lhs: Expr,
        /// Second outer node expression.
        rhs: Expr,
        /// Intermediate (swapping) node expression.
        at: Expr,
    },
    /// `de(e1, e2)` — unconditional discard of one entanglement unit.
    De {
        /// First node expression.
        lhs: Expr,
        /// Second node expression.
        rhs: Expr,
    },
    /// `assert(t)` — prune worlds where `t` evaluates to zero.
    Assert {
        /// Test expression.
        test: Expr,
    },
    /// No-op statement.
    Pass,
    /// `forget(v1, ..., vm)` — drop named variables, then merge identical
    /// worlds.
    Forget {
        /// Variables to drop from memory.
        idents: Vec<String>,
    },
    /// `if (t) { then } else { otherwise }`
    If {
        /// Test expression.
        test: Expr,
        /// Branch taken when `test` is nonzero.
        then_branch: Program,
        /// Branch taken when `test` is zero.
        else_branch: Program,
    },
    /// `while (t) { body }`
    While {
        /// Loop test, re-evaluated every iteration.
        test: Expr,
        /// Loop body.
        body: Program,
    },
}

/// An expression, evaluated once per live deterministic configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// An integer literal.
    IntLit(i64),
    /// A variable reference.
    Ident(String),
    /// A unary operation applied to a subexpression.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        operand: Box<Expr>,
    },
    /// A binary operation applied to two subexpressions.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
}

impl Expr {
    /// Convenience constructor for a unary expression, boxing the operand.
    #[must_use]
    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// Convenience constructor for a binary expression, boxing both operands.
    #[must_use]
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Self::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Arithmetic negation.
    Neg,
    /// Logical not: `0` if the operand is nonzero, else `1`.
    LogicNot,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// Integer floor division; division by zero yields a null marker.
    Div,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// Logical or. Both operands are always evaluated.
    LogicOr,
    /// Logical and. Both operands are always evaluated.
    LogicAnd,
}
