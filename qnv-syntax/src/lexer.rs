//! Token definitions, generated by [`logos`].

use logos::Logos;

/// A lexical token of the source language.
///
/// Keywords and punctuation follow the original grammar's terminal set
/// one-for-one; `Cr`/`Sw`/`Forget`/`Assert`/`Pass`/`If`/`While` are plain
/// identifiers lexically but reserved here as keywords, matching the
/// grammar's dedicated terminals rather than resolving them in the parser.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"#[^\n]*")]
pub enum Token<'src> {
    /// `if`
    #[token("if")]
    If,
    /// `else`
    #[token("else")]
    Else,
    /// `while`
    #[token("while")]
    While,
    /// `assert`
    #[token("assert")]
    Assert,
    /// `pass`
    #[token("pass")]
    Pass,
    /// `forget`
    #[token("forget")]
    Forget,
    /// `cr`
    #[token("cr")]
    Cr,
    /// `sw`
    #[token("sw")]
    Sw,

    /// `:=`
    #[token(":=")]
    Assign,
    /// `==`
    #[token("==")]
    Equal,
    /// `!=`
    #[token("!=")]
    NotEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `!`
    #[token("!")]
    Not,
    /// `||`
    #[token("||")]
    Or,
    /// `&&`
    #[token("&&")]
    And,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Mul,
    /// `/`
    #[token("/")]
    Div,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `,`
    #[token(",")]
    Comma,
    /// `;`
    #[token(";")]
    Semi,
    /// `@`
    #[token("@")]
    At,

    /// An integer literal. Negation is handled by the unary `-` operator in
    /// the parser, not folded into the token: a bare `-?` prefix here would
    /// win the longest-match tie over the standalone `Minus` token and make
    /// `x-5` unparseable as subtraction.
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Integer(i64),
    /// An identifier: not a keyword, starts with a letter or underscore.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice())]
    Identifier(&'src str),
}
