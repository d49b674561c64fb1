//! Syntactic elements of a simple ASP-like logic language:
//! terms, literals, rules, and directives, as produced by
//! the parser and consumed by the translation.
//!
//! See "Abstract Gringo" (2015) by Gebser, et al. and the
//! "ASP-Core-2 Input Language Format" (2012). The surface
//! syntax lives in the lexer and parser; the elements here
//! are independent of it.
//!
//! Every statement, literal, and term carries the [`Location`]
//! where it began, for diagnostics. Locations are *not* part
//! of a node's identity: two nodes parsed at different places
//! compare equal if they are structurally equal.

mod lexer;
mod parser;
mod tokens;

use std::fmt;
use std::fmt::Display;

use thiserror::Error;

pub use lexer::{lex, Token, TokenKind};
pub use parser::parse_program;
pub use tokens::Tokens;

/// Uninterpreted element that names itself, a predicate,
/// a function, or a variable.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(name: String) -> Self {
        Symbol(name)
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol::new(String::from(s))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Line and column of a syntactic element, both 1-based.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{}:{}", self.line, self.column))
    }
}

/// A program that could not be turned into a statement stream.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("{location}: {message}")]
pub struct ParseError {
    pub location: Location,
    pub message: String,
}

impl ParseError {
    pub fn new(location: Location, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }
}

/// Unary (prefix or circumfix) operations over terms:
/// absolute value, numeric negation, bitwise complement.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum UnaryOp {
    Abs,
    Neg,
    Not,
}

/// Binary (infix) operations over terms. The bitwise three
/// have no counterpart in the target logic and are rejected
/// there, but parse like any other operation.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Exp,
    And,
    Or,
    Xor,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BinOp::*;
        f.write_str(match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Rem => "\\",
            Exp => "**",
            And => "&",
            Or => "?",
            Xor => "^",
        })
    }
}

/// Arithmetic relational operators: equal, not equal, less than,
/// greater than, less than or equal to, greater than or equal to.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum RelOp {
    Eq,
    Ne,
    Lt,
    Gt,
    Leq,
    Geq,
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use RelOp::*;
        f.write_str(match self {
            Eq => "=",
            Ne => "!=",
            Lt => "<",
            Gt => ">",
            Leq => "<=",
            Geq => ">=",
        })
    }
}

/// Interpreted element that represents either itself (a constant,
/// string, or integer), something else (a variable or function),
/// a set of values (an interval or pool), or an operation applied
/// to other terms.
#[derive(Clone, Debug)]
pub struct Term {
    pub kind: TermKind,
    pub location: Location,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TermKind {
    Integer(i64),
    String(String),
    /// `#inf`, below every other value.
    Infimum,
    /// `#sup`, above every other value.
    Supremum,
    /// A symbolic constant, e.g. `a`.
    Constant(Symbol),
    /// A variable, e.g. `X`; the name `_` is anonymous.
    Variable(Symbol),
    /// A symbolic function application, e.g. `f(a, X)`.
    Function(Symbol, Vec<Term>),
    /// An external (script) function call, e.g. `@f(X)`.
    ExternalFunction(Symbol, Vec<Term>),
    UnaryOperation(UnaryOp, Box<Term>),
    BinaryOperation(Box<Term>, BinOp, Box<Term>),
    /// `from..to`, every integer between the endpoints.
    Interval(Box<Term>, Box<Term>),
    /// `(a; b; c)`, one of several alternatives.
    Pool(Vec<Term>),
}

impl Term {
    pub fn new(kind: TermKind, location: Location) -> Self {
        Self { kind, location }
    }

    /// Boxing constructor.
    pub fn unary_operation(op: UnaryOp, x: Term) -> Self {
        let location = x.location;
        Self::new(TermKind::UnaryOperation(op, Box::new(x)), location)
    }

    /// Boxing constructor.
    pub fn binary_operation(x: Term, op: BinOp, y: Term) -> Self {
        let location = x.location;
        Self::new(
            TermKind::BinaryOperation(Box::new(x), op, Box::new(y)),
            location,
        )
    }

    /// Boxing constructor.
    pub fn interval(from: Term, to: Term) -> Self {
        let location = from.location;
        Self::new(TermKind::Interval(Box::new(from), Box::new(to)), location)
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Term {}

fn comma_separated(f: &mut fmt::Formatter<'_>, args: &[Term]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        arg.fmt(f)?;
    }
    Ok(())
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TermKind::*;
        use UnaryOp::*;
        match &self.kind {
            Integer(i) => i.fmt(f),
            String(s) => f.write_fmt(format_args!("{s:?}")),
            Infimum => f.write_str("#inf"),
            Supremum => f.write_str("#sup"),
            Constant(s) | Variable(s) => s.fmt(f),
            Function(s, args) => {
                f.write_fmt(format_args!("{s}("))?;
                comma_separated(f, args)?;
                f.write_str(")")
            }
            ExternalFunction(s, args) => {
                f.write_fmt(format_args!("@{s}("))?;
                comma_separated(f, args)?;
                f.write_str(")")
            }
            UnaryOperation(Abs, x) => f.write_fmt(format_args!("|{x}|")),
            UnaryOperation(Neg, x) => f.write_fmt(format_args!("-{x}")),
            UnaryOperation(Not, x) => f.write_fmt(format_args!("~{x}")),
            BinaryOperation(x, op, y) => f.write_fmt(format_args!("({x} {op} {y})")),
            Interval(from, to) => f.write_fmt(format_args!("({from}..{to})")),
            Pool(args) => {
                f.write_str("(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    arg.fmt(f)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Negation-as-failure marks on a literal. See Lifschitz,
/// "ASP" §5.8 for why triple negation is unnecessary.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Sign {
    None,
    Negation,
    DoubleNegation,
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Sign::None => "",
            Sign::Negation => "not ",
            Sign::DoubleNegation => "not not ",
        })
    }
}

/// A head or body literal: a sign applied to a bare condition.
#[derive(Clone, Debug)]
pub struct Literal {
    pub sign: Sign,
    pub kind: LiteralKind,
    pub location: Location,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LiteralKind {
    /// `#true` or `#false`.
    Boolean(bool),
    /// An atom. The parser produces arbitrary terms here;
    /// the translation accepts only symbolic constants and
    /// function applications.
    Atom(Term),
    /// A boolean arithmetic relation, e.g. `1 < 2`.
    Comparison(Term, RelOp, Term),
}

impl Literal {
    pub fn new(sign: Sign, kind: LiteralKind, location: Location) -> Self {
        Self {
            sign,
            kind,
            location,
        }
    }
}

impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        self.sign == other.sign && self.kind == other.kind
    }
}

impl Eq for Literal {}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.sign.fmt(f)?;
        match &self.kind {
            LiteralKind::Boolean(true) => f.write_str("#true"),
            LiteralKind::Boolean(false) => f.write_str("#false"),
            LiteralKind::Atom(t) => t.fmt(f),
            LiteralKind::Comparison(x, rel, y) => f.write_fmt(format_args!("{x} {rel} {y}")),
        }
    }
}

/// One alternative of a choice, with an optional condition:
/// `p(X) : q(X)`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConditionalLiteral {
    pub literal: Literal,
    pub condition: Vec<Literal>,
}

impl ConditionalLiteral {
    pub fn new(literal: Literal, condition: impl IntoIterator<Item = Literal>) -> Self {
        Self {
            literal,
            condition: condition.into_iter().collect(),
        }
    }
}

impl fmt::Display for ConditionalLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.literal.fmt(f)?;
        for (i, c) in self.condition.iter().enumerate() {
            f.write_str(if i == 0 { " : " } else { ", " })?;
            c.fmt(f)?;
        }
        Ok(())
    }
}

/// Cardinality bounds on a choice: `lower { ... } upper`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AggregateBounds {
    pub lower_bound: Box<Term>,
    pub upper_bound: Box<Term>,
}

impl AggregateBounds {
    pub fn new(lower_bound: Term, upper_bound: Term) -> Self {
        Self {
            lower_bound: Box::new(lower_bound),
            upper_bound: Box::new(upper_bound),
        }
    }
}

/// A choice over some alternatives, e.g. `{p; q}`,
/// with optional cardinality bounds.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Aggregate {
    pub elements: Vec<ConditionalLiteral>,
    pub bounds: Option<AggregateBounds>,
}

impl Aggregate {
    pub fn new(
        elements: impl IntoIterator<Item = ConditionalLiteral>,
        bounds: Option<AggregateBounds>,
    ) -> Self {
        Self {
            elements: elements.into_iter().collect(),
            bounds,
        }
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(AggregateBounds { lower_bound, .. }) = &self.bounds {
            f.write_fmt(format_args!("{lower_bound} "))?;
        }
        f.write_str("{")?;
        for (i, e) in self.elements.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            e.fmt(f)?;
        }
        f.write_str("}")?;
        if let Some(AggregateBounds { upper_bound, .. }) = &self.bounds {
            f.write_fmt(format_args!(" {upper_bound}"))?;
        }
        Ok(())
    }
}

/// The head of a rule: a plain literal or a choice.
#[derive(Clone, Debug)]
pub struct Head {
    pub kind: HeadKind,
    pub location: Location,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum HeadKind {
    Literal(Literal),
    Choice(Aggregate),
}

impl Head {
    pub fn new(kind: HeadKind, location: Location) -> Self {
        Self { kind, location }
    }

    /// The head written for a headless constraint `:- body.`
    pub fn falsity(location: Location) -> Self {
        Self::new(
            HeadKind::Literal(Literal::new(
                Sign::None,
                LiteralKind::Boolean(false),
                location,
            )),
            location,
        )
    }
}

impl PartialEq for Head {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Head {}

impl fmt::Display for Head {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            HeadKind::Literal(l) => l.fmt(f),
            HeadKind::Choice(c) => c.fmt(f),
        }
    }
}

/// A rule: a head implied by a conjunction of body literals.
/// Facts have an empty body, constraints a `#false` head.
#[derive(Clone, Debug)]
pub struct Rule {
    pub head: Head,
    pub body: Vec<Literal>,
    pub location: Location,
}

impl Rule {
    pub fn new(head: Head, body: impl IntoIterator<Item = Literal>, location: Location) -> Self {
        Self {
            head,
            body: body.into_iter().collect(),
            location,
        }
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.head == other.head && self.body == other.body
    }
}

impl Eq for Rule {}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.head.fmt(f)?;
        for (i, l) in self.body.iter().enumerate() {
            f.write_str(if i == 0 { " :- " } else { ", " })?;
            l.fmt(f)?;
        }
        f.write_str(".")
    }
}

/// A predicate name together with its arity, e.g. `p/2`.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Signature {
    pub name: Symbol,
    pub arity: usize,
}

impl Signature {
    pub fn new(name: Symbol, arity: usize) -> Self {
        Self { name, arity }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{}/{}", self.name, self.arity))
    }
}

/// One element of the statement stream: a rule or a directive.
#[derive(Clone, Debug)]
pub enum Statement {
    Rule(Rule),
    /// `#show p/n.` marks `p/n` visible; a bare `#show.`
    /// hides everything not explicitly shown.
    Show(Option<Signature>, Location),
    /// `#external p/n.` marks `p/n` as an open (input) predicate.
    External(Signature, Location),
}

impl Statement {
    pub fn location(&self) -> Location {
        match self {
            Statement::Rule(r) => r.location,
            Statement::Show(_, location) => *location,
            Statement::External(_, location) => *location,
        }
    }
}

impl PartialEq for Statement {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Statement::Rule(a), Statement::Rule(b)) => a == b,
            (Statement::Show(a, _), Statement::Show(b, _)) => a == b,
            (Statement::External(a, _), Statement::External(b, _)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Statement {}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Rule(r) => r.fmt(f),
            Statement::Show(Some(s), _) => f.write_fmt(format_args!("#show {s}.")),
            Statement::Show(None, _) => f.write_str("#show."),
            Statement::External(s, _) => f.write_fmt(format_args!("#external {s}.")),
        }
    }
}

impl From<i64> for TermKind {
    fn from(i: i64) -> Self {
        TermKind::Integer(i)
    }
}

impl From<&str> for TermKind {
    fn from(s: &str) -> Self {
        TermKind::String(String::from(s))
    }
}

impl TermKind {
    /// A name starting with an uppercase letter is a variable,
    /// anything else a symbolic constant. Used by the parser
    /// and the `term!` macro.
    pub fn name(name: &str) -> Self {
        if name.starts_with(|c: char| c.is_uppercase()) || name == "_" {
            TermKind::Variable(Symbol::from(name))
        } else {
            TermKind::Constant(Symbol::from(name))
        }
    }
}

/// These constructor macros can make tests involving syntactic elements
/// (most of them) much more readable. They are *not* intended as a public
/// interface, and *should* be behind `#[cfg(test)]`, but [cargo can't
/// currently export test code across crates](https://github.com/rust-lang/cargo/issues/8379).
#[cfg(any(test, feature = "macros"))]
mod macros {
    #[macro_export]
    macro_rules! sym {
        ($name: ident) => {
            Symbol::from(stringify!($name))
        };
    }

    #[macro_export]
    macro_rules! term {
        (#inf) => {
            Term::new(TermKind::Infimum, Location::default())
        };
        (#sup) => {
            Term::new(TermKind::Supremum, Location::default())
        };
        ($i: literal) => {
            Term::new(TermKind::from($i), Location::default())
        };
        ($name: ident) => {
            Term::new(TermKind::name(stringify!($name)), Location::default())
        };
        ($name: ident($($arg: expr),* $(,)?)) => {
            Term::new(
                TermKind::Function(sym!($name), vec![$($arg),*]),
                Location::default(),
            )
        };
        (@$name: ident($($arg: expr),* $(,)?)) => {
            Term::new(
                TermKind::ExternalFunction(sym!($name), vec![$($arg),*]),
                Location::default(),
            )
        };
    }

    #[macro_export]
    macro_rules! unary {
        ($op: ident, $e: expr) => {
            Term::unary_operation(UnaryOp::$op, $e)
        };
    }

    #[macro_export]
    macro_rules! binary {
        ($l: expr, $op: ident, $r: expr) => {
            Term::binary_operation($l, BinOp::$op, $r)
        };
    }

    #[macro_export]
    macro_rules! interval {
        ($from: expr => $to: expr) => {
            Term::interval($from, $to)
        };
    }

    #[macro_export]
    macro_rules! pool {
        ($($elt: expr),+ $(,)?) => {
            Term::new(TermKind::Pool(vec![$($elt),+]), Location::default())
        };
    }

    #[macro_export]
    macro_rules! atom {
        ($pred: ident $(($($arg: expr),* $(,)?))?) => {
            Literal::new(
                Sign::None,
                LiteralKind::Atom(term!($pred $(($($arg),*))?)),
                Location::default(),
            )
        };
    }

    #[macro_export]
    macro_rules! neg {
        ($lit: expr) => {{
            let mut lit = $lit;
            lit.sign = Sign::Negation;
            lit
        }};
    }

    #[macro_export]
    macro_rules! nneg {
        ($lit: expr) => {{
            let mut lit = $lit;
            lit.sign = Sign::DoubleNegation;
            lit
        }};
    }

    #[macro_export]
    macro_rules! rel {
        ($l: expr, $op: ident, $r: expr) => {
            Literal::new(
                Sign::None,
                LiteralKind::Comparison($l, RelOp::$op, $r),
                Location::default(),
            )
        };
    }

    #[macro_export]
    macro_rules! head {
        ({$($element: expr),* $(,)?}) => {
            Head::new(
                HeadKind::Choice(Aggregate::new(
                    [$(ConditionalLiteral::new($element, [])),*],
                    None,
                )),
                Location::default(),
            )
        };
        ($lit: expr) => {
            Head::new(HeadKind::Literal($lit), Location::default())
        };
    }

    #[macro_export]
    macro_rules! rule {
        ($head: expr) => {
            Rule::new($head, [], Location::default())
        };
        ($head: expr, [$($body: expr),* $(,)?]) => {
            Rule::new($head, [$($body),*], Location::default())
        };
    }

    #[macro_export]
    macro_rules! constraint {
        ([$($body: expr),* $(,)?]) => {
            Rule::new(
                Head::falsity(Location::default()),
                [$($body),*],
                Location::default(),
            )
        };
    }
}
