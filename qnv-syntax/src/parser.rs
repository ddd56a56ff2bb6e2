//! Hand-written recursive-descent / Pratt parser producing [`qnv_ast::Program`].
//!
//! Grounded in the original grammar's production rules (an `additive` /
//! `multiplicative` / `unary` / `postfix` precedence chain for expressions,
//! a separate `logical_or` / `logical_and` / `relational` chain for tests),
//! translated here into a single Pratt loop over binding power rather than a
//! nest of mutually-recursive `additive`/`multiplicative` functions — the
//! idiomatic Rust rendition of the same precedence table.

use logos::Logos;
use thiserror::Error;

use qnv_ast::{BinaryOp, Expr, Program, Stmt, UnaryOp};

use crate::lexer::Token;

/// Stable codes describing [`ParseError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum ParseErrorCode {
    /// The lexer encountered a byte sequence matching no token.
    InvalidToken,
    /// The parser expected a particular token and found something else.
    UnexpectedToken,
    /// The input ended where at least one more token was expected.
    UnexpectedEof,
}

impl ParseErrorCode {
    /// Returns the stable machine-readable representation of this code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidToken => "PARSE_INVALID_TOKEN",
            Self::UnexpectedToken => "PARSE_UNEXPECTED_TOKEN",
            Self::UnexpectedEof => "PARSE_UNEXPECTED_EOF",
        }
    }
}

/// A single parse diagnostic. Syntax errors are collected rather than
/// aborting at the first one; [`parse`] gathers every [`ParseError`] it
/// encounters and recovers at the next statement boundary.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ParseError {
    /// No token pattern matched at this position.
    #[error("invalid token at byte offset {offset}")]
    InvalidToken {
        /// Byte offset into the source where lexing failed.
        offset: usize,
    },
    /// A specific token was expected but a different one was found.
    #[error("expected {expected}, found {found:?}")]
    UnexpectedToken {
        /// Human-readable description of what was expected.
        expected: &'static str,
        /// The token actually encountered.
        found: String,
    },
    /// The token stream ended before the grammar was satisfied.
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof {
        /// Human-readable description of what was expected.
        expected: &'static str,
    },
}

impl ParseError {
    /// Returns the stable [`ParseErrorCode`] for this error.
    #[must_use]
    pub const fn code(&self) -> ParseErrorCode {
        match self {
            Self::InvalidToken { .. } => ParseErrorCode::InvalidToken,
            Self::UnexpectedToken { .. } => ParseErrorCode::UnexpectedToken,
            Self::UnexpectedEof { .. } => ParseErrorCode::UnexpectedEof,
        }
    }
}

/// Parses `source` into a [`Program`].
///
/// # Errors
/// Returns every [`ParseError`] collected while parsing, in source order,
/// rather than stopping at the first one.
pub fn parse(source: &str) -> Result<Program, Vec<ParseError>> {
    let mut errors = Vec::new();
    let mut tokens = Vec::new();
    for (result, span) in Token::lexer(source).spanned() {
        match result {
            Ok(token) => tokens.push(token),
            Err(()) => errors.push(ParseError::InvalidToken {
                offset: span.start,
            }),
        }
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        errors,
    };
    let program = parser.parse_program();
    if parser.errors.is_empty() {
        Ok(program)
    } else {
        Err(parser.errors)
    }
}

struct Parser<'src> {
    tokens: Vec<Token<'src>>,
    pos: usize,
    errors: Vec<ParseError>,
}

impl<'src> Parser<'src> {
    fn peek(&self) -> Option<Token<'src>> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token<'src>> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: Token<'src>, what: &'static str) -> Result<(), ()> {
        if self.peek() == Some(expected) {
            self.advance();
            Ok(())
        } else {
            self.report_mismatch(what);
            Err(())
        }
    }

    fn report_mismatch(&mut self, expected: &'static str) {
        match self.peek() {
            Some(found) => self.errors.push(ParseError::UnexpectedToken {
                expected,
                found: format!("{found:?}"),
            }),
            None => self.errors.push(ParseError::UnexpectedEof { expected }),
        }
    }

    /// Skips tokens until the next `;`, `}`, or end of input, then consumes
    /// a trailing `;` if present. Used to resynchronise after a statement
    /// fails to parse so one error does not cascade into spurious ones.
    fn recover_to_statement_boundary(&mut self) {
        while let Some(token) = self.peek() {
            match token {
                Token::Semi => {
                    self.advance();
                    return;
                }
                Token::RBrace => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();
        while !matches!(self.peek(), None | Some(Token::RBrace)) {
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(()) => self.recover_to_statement_boundary(),
            }
        }
        Program::new(statements)
    }

    fn parse_statement(&mut self) -> Result<Stmt, ()> {
        match self.peek() {
            Some(Token::If) => self.parse_if(),
            Some(Token::While) => self.parse_while(),
            Some(Token::Assert) => self.parse_assert(),
            Some(Token::Pass) => self.parse_pass(),
            Some(Token::Forget) => self.parse_forget(),
            Some(Token::Identifier(_)) => self.parse_assignment_like(),
            _ => {
                self.report_mismatch("a statement");
                Err(())
            }
        }
    }

    fn parse_if(&mut self) -> Result<Stmt, ()> {
        self.advance();
        self.expect(Token::LParen, "`(`")?;
        let test = self.parse_test()?;
        self.expect(Token::RParen, "`)`")?;
        self.expect(Token::LBrace, "`{`")?;
        let then_branch = self.parse_program();
        self.expect(Token::RBrace, "`}`")?;
        self.expect(Token::Else, "`else`")?;
        self.expect(Token::LBrace, "`{`")?;
        let else_branch = self.parse_program();
        self.expect(Token::RBrace, "`}`")?;
        Ok(Stmt::If {
            test,
            then_branch,
            else_branch,
        })
    }

    fn parse_while(&mut self) -> Result<Stmt, ()> {
        self.advance();
        self.expect(Token::LParen, "`(`")?;
        let test = self.parse_test()?;
        self.expect(Token::RParen, "`)`")?;
        self.expect(Token::LBrace, "`{`")?;
        let body = self.parse_program();
        self.expect(Token::RBrace, "`}`")?;
        Ok(Stmt::While { test, body })
    }

    fn parse_assert(&mut self) -> Result<Stmt, ()> {
        self.advance();
        self.expect(Token::LParen, "`(`")?;
        let test = self.parse_test()?;
        self.expect(Token::RParen, "`)`")?;
        self.expect(Token::Semi, "`;`")?;
        Ok(Stmt::Assert { test })
    }

    fn parse_pass(&mut self) -> Result<Stmt, ()> {
        self.advance();
        self.expect(Token::Semi, "`;`")?;
        Ok(Stmt::Pass)
    }

    fn parse_forget(&mut self) -> Result<Stmt, ()> {
        self.advance();
        self.expect(Token::LParen, "`(`")?;
        let mut idents = Vec::new();
        if self.peek() != Some(Token::RParen) {
            idents.push(self.parse_identifier()?);
            while self.peek() == Some(Token::Comma) {
                self.advance();
                idents.push(self.parse_identifier()?);
            }
        }
        self.expect(Token::RParen, "`)`")?;
        self.expect(Token::Semi, "`;`")?;
        Ok(Stmt::Forget { idents })
    }

    /// Dispatches `ident := expr;`, `ident := cr(e, e);`, `ident := sw(e, e @ e);`,
    /// or `de(e, e);` — the four statement forms sharing an `Identifier`-led
    /// prefix in the original grammar.
    fn parse_assignment_like(&mut self) -> Result<Stmt, ()> {
        let ident = self.parse_identifier()?;
        if ident == "de" && self.peek() == Some(Token::LParen) {
            self.advance();
            let lhs = self.parse_expr()?;
            self.expect(Token::Comma, "`,`")?;
            let rhs = self.parse_expr()?;
            self.expect(Token::RParen, "`)`")?;
            self.expect(Token::Semi, "`;`")?;
            return Ok(Stmt::De { lhs, rhs });
        }

        self.expect(Token::Assign, "`:=`")?;
        match self.peek() {
            Some(Token::Cr) => {
                self.advance();
                self.expect(Token::LParen, "`(`")?;
                let lhs = self.parse_expr()?;
                self.expect(Token::Comma, "`,`")?;
                let rhs = self.parse_expr()?;
                self.expect(Token::RParen, "`)`")?;
                self.expect(Token::Semi, "`;`")?;
                Ok(Stmt::AssignCr { ident, lhs, rhs })
            }
            Some(Token::Sw) => {
                self.advance();
                self.expect(Token::LParen, "`(`")?;
                let lhs = self.parse_expr()?;
                self.expect(Token::Comma, "`,`")?;
                let rhs = self.parse_expr()?;
                self.expect(Token::At, "`@`")?;
                let at = self.parse_expr()?;
                self.expect(Token::RParen, "`)`")?;
                self.expect(Token::Semi, "`;`")?;
                Ok(Stmt::AssignSw { ident, lhs, rhs, at })
            }
            _ => {
                let expr = self.parse_expr()?;
                self.expect(Token::Semi, "`;`")?;
                Ok(Stmt::Assign { ident, expr })
            }
        }
    }

    fn parse_identifier(&mut self) -> Result<String, ()> {
        match self.peek() {
            Some(Token::Identifier(name)) => {
                self.advance();
                Ok(name.to_owned())
            }
            _ => {
                self.report_mismatch("an identifier");
                Err(())
            }
        }
    }

    /// Boolean-test grammar: `logical_or := logical_and ('||' logical_and)*`,
    /// `logical_and := relational ('&&' relational)*`,
    /// `relational := '!' relational | expr (relop expr)?`.
    fn parse_test(&mut self) -> Result<Expr, ()> {
        self.parse_logic_or()
    }

    fn parse_logic_or(&mut self) -> Result<Expr, ()> {
        let mut lhs = self.parse_logic_and()?;
        while self.peek() == Some(Token::Or) {
            self.advance();
            let rhs = self.parse_logic_and()?;
            lhs = Expr::binary(BinaryOp::LogicOr, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_logic_and(&mut self) -> Result<Expr, ()> {
        let mut lhs = self.parse_relational()?;
        while self.peek() == Some(Token::And) {
            self.advance();
            let rhs = self.parse_relational()?;
            lhs = Expr::binary(BinaryOp::LogicAnd, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_relational(&mut self) -> Result<Expr, ()> {
        if self.peek() == Some(Token::Not) {
            self.advance();
            let operand = self.parse_relational()?;
            return Ok(Expr::unary(UnaryOp::LogicNot, operand));
        }
        let lhs = self.parse_expr()?;
        let op = match self.peek() {
            Some(Token::Equal) => Some(BinaryOp::Eq),
            Some(Token::NotEqual) => Some(BinaryOp::Ne),
            Some(Token::Less) => Some(BinaryOp::Lt),
            Some(Token::LessEqual) => Some(BinaryOp::Le),
            Some(Token::Greater) => Some(BinaryOp::Gt),
            Some(Token::GreaterEqual) => Some(BinaryOp::Ge),
            _ => None,
        };
        match op {
            Some(op) => {
                self.advance();
                let rhs = self.parse_expr()?;
                Ok(Expr::binary(op, lhs, rhs))
            }
            None => Ok(lhs),
        }
    }

    /// Arithmetic-expression grammar, parsed with a small Pratt loop over
    /// `+`/`-` (binding power 1) and `*`/`/` (binding power 2) rather than
    /// the original's nested `additive`/`multiplicative` productions.
    fn parse_expr(&mut self) -> Result<Expr, ()> {
        self.parse_binary_expr(0)
    }

    fn parse_binary_expr(&mut self, min_power: u8) -> Result<Expr, ()> {
        let mut lhs = self.parse_unary_expr()?;
        loop {
            let Some((op, power)) = Self::infix_binding_power(self.peek()) else {
                break;
            };
            if power < min_power {
                break;
            }
            self.advance();
            let rhs = self.parse_binary_expr(power + 1)?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn infix_binding_power(token: Option<Token<'src>>) -> Option<(BinaryOp, u8)> {
        match token {
            Some(Token::Plus) => Some((BinaryOp::Add, 1)),
            Some(Token::Minus) => Some((BinaryOp::Sub, 1)),
            Some(Token::Mul) => Some((BinaryOp::Mul, 2)),
            Some(Token::Div) => Some((BinaryOp::Div, 2)),
            _ => None,
        }
    }

    fn parse_unary_expr(&mut self) -> Result<Expr, ()> {
        if self.peek() == Some(Token::Minus) {
            self.advance();
            let operand = self.parse_unary_expr()?;
            return Ok(Expr::unary(UnaryOp::Neg, operand));
        }
        self.parse_primary_expr()
    }

    fn parse_primary_expr(&mut self) -> Result<Expr, ()> {
        match self.advance() {
            Some(Token::Integer(value)) => Ok(Expr::IntLit(value)),
            Some(Token::Identifier(name)) => Ok(Expr::Ident(name.to_owned())),
            Some(Token::LParen) => {
                let inner = self.parse_expr()?;
                self.expect(Token::RParen, "`)`")?;
                Ok(inner)
            }
            Some(found) => {
                self.errors.push(ParseError::UnexpectedToken {
                    expected: "an expression",
                    found: format!("{found:?}"),
                });
                Err(())
            }
            None => {
                self.errors.push(ParseError::UnexpectedEof {
                    expected: "an expression",
                });
                Err(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse, ParseError};
    use qnv_ast::{BinaryOp, Expr, Stmt};

    #[test]
    fn parses_a_create_then_assert_program() {
        let program = parse("a := cr(1, 2);\nassert(a);\n").expect("parses cleanly");
        assert_eq!(program.statements.len(), 2);
        assert!(matches!(
            program.statements[0],
            Stmt::AssignCr { ref ident, .. } if ident == "a"
        ));
        assert!(matches!(
            program.statements[1],
            Stmt::Assert { test: Expr::Ident(ref name) } if name == "a"
        ));
    }

    #[test]
    fn parses_swap_with_at_clause() {
        let program = parse("c := sw(1, 3 @ 2);\n").expect("parses cleanly");
        assert!(matches!(
            program.statements[0],
            Stmt::AssignSw { ref ident, .. } if ident == "c"
        ));
    }

    #[test]
    fn respects_arithmetic_precedence() {
        let program = parse("x := 1 + 2 * 3;\n").expect("parses cleanly");
        let Stmt::Assign { expr, .. } = &program.statements[0] else {
            panic!("expected an assignment");
        };
        assert_eq!(
            *expr,
            Expr::binary(
                BinaryOp::Add,
                Expr::IntLit(1),
                Expr::binary(BinaryOp::Mul, Expr::IntLit(2), Expr::IntLit(3)),
            )
        );
    }

    #[test]
    fn parses_if_else_and_while() {
        let program = parse(
            "if (a) { x := 1; } else { x := 2; }\nwhile (x) { x := x - 1; }\n",
        )
        .expect("parses cleanly");
        assert_eq!(program.statements.len(), 2);
        assert!(matches!(program.statements[0], Stmt::If { .. }));
        assert!(matches!(program.statements[1], Stmt::While { .. }));
    }

    #[test]
    fn parses_forget_with_multiple_identifiers() {
        let program = parse("forget(a, b, c);\n").expect("parses cleanly");
        assert!(matches!(
            program.statements[0],
            Stmt::Forget { ref idents } if idents == &["a".to_owned(), "b".to_owned(), "c".to_owned()]
        ));
    }

    #[test]
    fn parses_discard_statement() {
        let program = parse("de(1, 2);\n").expect("parses cleanly");
        assert!(matches!(program.statements[0], Stmt::De { .. }));
    }

    #[test]
    fn collects_multiple_errors_instead_of_stopping_at_the_first() {
        let errors = parse("x := ;\ny := ;\n").expect_err("both statements are malformed");
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], ParseError::UnexpectedToken { .. }));
        assert!(matches!(errors[1], ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn logic_not_and_relational_operators_parse() {
        let program = parse("assert(!(a == b));\n").expect("parses cleanly");
        assert!(matches!(program.statements[0], Stmt::Assert { .. }));
    }
}
