//! First-order formulas over the program and integer sorts: the target
//! language of the translation, the passes that act on it (simplification
//! to a fixpoint, variable domain inference), and printers for
//! human-readable and TPTP output.
//!
//! Formulas own their trees but not their declarations: variables,
//! predicates, and symbolic functions live in arenas ([Variables],
//! [SymbolTable]) and appear in formulas as `Copy` handles. Everything
//! downstream of the parser shares one pair of arenas per translation run.

mod domain;
mod format;
mod formula;
mod simplify;
mod symbols;

pub use domain::{infer_domains, DomainError};
pub use format::{FormatError, Formatter, HumanFormula, Parentheses};
pub use formula::{
    BinOp, Formula, RelOp, ScopedFormula, SpecialInteger, Term, UnaryOp,
};
pub use simplify::simplify;
pub use symbols::{
    Domain, Function, FunctionData, Predicate, PredicateData, SymbolTable, TypeAnnotation,
    Variable, VariableData, VariableKind, Variables, Visibility,
};
