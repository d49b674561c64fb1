//! Rule heads classify into the few shapes the translation handles;
//! everything else becomes a located error.

use gavotte_logic::{Predicate, SymbolTable};
use gavotte_syntax as syntax;
use gavotte_syntax::{LiteralKind, Sign};

use crate::body;
use crate::Error;

/// How rule heads are turned into formulas.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum HeadMode {
    /// Each rule stays a closed implication.
    Direct,
    /// Rules accumulate per-predicate definitions for completion.
    #[default]
    ForCompletion,
}

/// What a head means for the translation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum HeadShape<'a> {
    /// A plain atom: the rule defines part of its predicate.
    SingleAtom(Predicate, &'a [syntax::Term]),
    /// `{atom}`: as [`HeadShape::SingleAtom`], but the definition is
    /// guarded by the head atom itself, so the rule never forces it.
    ChoiceSingleAtom(Predicate, &'a [syntax::Term]),
    /// `#false`, or no head at all: the body is forbidden.
    IntegrityConstraint,
    /// `#true`: the rule carries no information.
    Fact,
}

pub(crate) fn classify<'a>(
    head: &'a syntax::Head,
    symbols: &mut SymbolTable,
) -> Result<HeadShape<'a>, Error> {
    match &head.kind {
        syntax::HeadKind::Literal(literal) => {
            if literal.sign != Sign::None {
                return Err(Error::unsupported(
                    "a negated head literal",
                    literal.location,
                ));
            }
            match &literal.kind {
                LiteralKind::Boolean(true) => Ok(HeadShape::Fact),
                LiteralKind::Boolean(false) => Ok(HeadShape::IntegrityConstraint),
                LiteralKind::Atom(term) => {
                    let (predicate, terms) = declare(term, symbols)?;
                    Ok(HeadShape::SingleAtom(predicate, terms))
                }
                LiteralKind::Comparison(..) => Err(Error::unsupported(
                    "a comparison in a rule head",
                    literal.location,
                )),
            }
        }
        syntax::HeadKind::Choice(aggregate) => {
            if aggregate.bounds.is_some() {
                return Err(Error::unsupported(
                    "cardinality bounds on a choice",
                    head.location,
                ));
            }
            let element = match aggregate.elements.as_slice() {
                [element] => element,
                [] => return Err(Error::unsupported("an empty choice", head.location)),
                _ => {
                    return Err(Error::unsupported(
                        "a choice over multiple alternatives",
                        head.location,
                    ))
                }
            };
            if !element.condition.is_empty() {
                return Err(Error::unsupported(
                    "a conditional literal",
                    element.literal.location,
                ));
            }
            if element.literal.sign != Sign::None {
                return Err(Error::unsupported(
                    "a negated head literal",
                    element.literal.location,
                ));
            }
            match &element.literal.kind {
                LiteralKind::Atom(term) => {
                    let (predicate, terms) = declare(term, symbols)?;
                    Ok(HeadShape::ChoiceSingleAtom(predicate, terms))
                }
                _ => Err(Error::unsupported(
                    "a choice over anything but a plain atom",
                    element.literal.location,
                )),
            }
        }
    }
}

/// Intern the head atom's predicate and mark it used.
fn declare<'a>(
    term: &'a syntax::Term,
    symbols: &mut SymbolTable,
) -> Result<(Predicate, &'a [syntax::Term]), Error> {
    let (name, terms) = body::atom_parts(term)?;
    let predicate = symbols.predicate(name.name(), terms.len());
    symbols[predicate].is_used = true;
    Ok((predicate, terms))
}
