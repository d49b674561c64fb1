//! Body literals become formula fragments.
//!
//! A relation never applies to program terms directly, because a term
//! may stand for zero, one, or many values (an interval, a partial
//! arithmetic expression). Each argument position instead gets a fresh
//! value variable `X` constrained by `X in t`, the relation applies to
//! the value variables, and the literal closes over them existentially.

use gavotte_logic as logic;
use gavotte_logic::{Formula, Predicate, SymbolTable};
use gavotte_syntax as syntax;
use gavotte_syntax::{LiteralKind, Sign};

use crate::term::{self, Scope};
use crate::Error;

/// The predicate symbol and argument terms of an atom, or an error
/// naming what stood in its place.
pub(crate) fn atom_parts(
    term: &syntax::Term,
) -> Result<(&syntax::Symbol, &[syntax::Term]), Error> {
    match &term.kind {
        syntax::TermKind::Constant(name) => Ok((name, &[])),
        syntax::TermKind::Function(name, arguments) => Ok((name, arguments)),
        _ => Err(Error::unsupported(
            "a literal that is not a predicate application",
            term.location,
        )),
    }
}

/// The value-selection image of one atom: fresh variables drawn from
/// the argument terms, then the predicate applied to those variables.
/// For a negated literal the relation conjunct is negated in place, so
/// the quantifier stays existential.
pub(crate) fn atom_formula(
    predicate: Predicate,
    terms: &[syntax::Term],
    negated: bool,
    scope: &mut Scope,
    symbols: &mut SymbolTable,
) -> Result<Formula, Error> {
    let values: Vec<_> = terms.iter().map(|_| scope.value()).collect();
    let arguments = values
        .iter()
        .map(|&value| logic::Term::Variable(value))
        .collect();
    let mut atom = Formula::Predicate(predicate, arguments);
    if negated {
        atom = Formula::not(atom);
    }
    if values.is_empty() {
        return Ok(atom);
    }
    let mut conjuncts = Vec::with_capacity(terms.len() + 1);
    for (&value, term) in values.iter().zip(terms) {
        conjuncts.push(Formula::member(
            logic::Term::Variable(value),
            term::translate(term, scope, symbols)?,
        ));
    }
    conjuncts.push(atom);
    Ok(Formula::Exists(values, Box::new(Formula::And(conjuncts))))
}

/// Translate one body literal.
pub(crate) fn translate_literal(
    literal: &syntax::Literal,
    scope: &mut Scope,
    symbols: &mut SymbolTable,
) -> Result<Formula, Error> {
    if literal.sign == Sign::DoubleNegation {
        return Err(Error::unsupported(
            "a double-negated literal",
            literal.location,
        ));
    }
    let negated = literal.sign == Sign::Negation;
    match &literal.kind {
        LiteralKind::Boolean(value) => {
            let boolean = Formula::Boolean(*value);
            Ok(if negated {
                Formula::not(boolean)
            } else {
                boolean
            })
        }
        LiteralKind::Atom(term) => {
            let (name, arguments) = atom_parts(term)?;
            let predicate = symbols.predicate(name.name(), arguments.len());
            symbols[predicate].is_used = true;
            atom_formula(predicate, arguments, negated, scope, symbols)
        }
        LiteralKind::Comparison(left, op, right) => {
            if negated {
                return Err(Error::unsupported(
                    "a negated comparison",
                    literal.location,
                ));
            }
            let left_value = scope.value();
            let right_value = scope.value();
            let conjuncts = vec![
                Formula::member(
                    logic::Term::Variable(left_value),
                    term::translate(left, scope, symbols)?,
                ),
                Formula::member(
                    logic::Term::Variable(right_value),
                    term::translate(right, scope, symbols)?,
                ),
                Formula::comparison(
                    relation(*op),
                    logic::Term::Variable(left_value),
                    logic::Term::Variable(right_value),
                ),
            ];
            Ok(Formula::Exists(
                vec![left_value, right_value],
                Box::new(Formula::And(conjuncts)),
            ))
        }
    }
}

/// Translate a rule body, one fragment per literal.
pub(crate) fn translate_body(
    body: &[syntax::Literal],
    scope: &mut Scope,
    symbols: &mut SymbolTable,
) -> Result<Vec<Formula>, Error> {
    body.iter()
        .map(|literal| translate_literal(literal, scope, symbols))
        .collect()
}

fn relation(op: syntax::RelOp) -> logic::RelOp {
    match op {
        syntax::RelOp::Eq => logic::RelOp::Eq,
        syntax::RelOp::Ne => logic::RelOp::Ne,
        syntax::RelOp::Lt => logic::RelOp::Lt,
        syntax::RelOp::Gt => logic::RelOp::Gt,
        syntax::RelOp::Leq => logic::RelOp::Leq,
        syntax::RelOp::Geq => logic::RelOp::Geq,
    }
}
