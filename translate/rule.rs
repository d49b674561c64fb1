//! One rule becomes a closed implication, or feeds the per-predicate
//! definitions that completion will fuse.

use std::collections::BTreeMap;

use gavotte_logic as logic;
use gavotte_logic::{Formula, Predicate, ScopedFormula, SymbolTable, Variables};
use gavotte_syntax as syntax;

use crate::body;
use crate::completion::Definitions;
use crate::head::{self, HeadShape};
use crate::term::{self, Scope};
use crate::Error;

/// Direct mode: `forall free (body -> head)`.
pub(crate) fn translate_direct(
    rule: &syntax::Rule,
    variables: &mut Variables,
    symbols: &mut SymbolTable,
) -> Result<Formula, Error> {
    let shape = head::classify(&rule.head, symbols)?;
    let mut scope = Scope::new(variables);
    let antecedents = body::translate_body(&rule.body, &mut scope, symbols)?;
    let consequent = match shape {
        HeadShape::Fact => Formula::Boolean(true),
        HeadShape::IntegrityConstraint => Formula::Boolean(false),
        HeadShape::SingleAtom(predicate, terms) => {
            body::atom_formula(predicate, terms, false, &mut scope, symbols)?
        }
        HeadShape::ChoiceSingleAtom(predicate, terms) => {
            let image = body::atom_formula(predicate, terms, false, &mut scope, symbols)?;
            Formula::Or(vec![image.clone(), Formula::not(image)])
        }
    };
    let free = scope.free();
    let implication = Formula::implies(Formula::and(antecedents), consequent);
    Ok(ScopedFormula::new(implication, free).close_universally())
}

/// Completion mode: file the rule under its head predicate.
///
/// The head's argument terms are not evaluated in place. Completion
/// owns one parameter tuple per predicate; each rule contributes a
/// fragment binding those parameters to its own head terms, with the
/// rule body and bindings closed over the rule's free variables.
pub(crate) fn translate_for_completion(
    rule: &syntax::Rule,
    variables: &mut Variables,
    symbols: &mut SymbolTable,
    definitions: &mut BTreeMap<Predicate, Definitions>,
    constraints: &mut Vec<ScopedFormula>,
) -> Result<(), Error> {
    let shape = head::classify(&rule.head, symbols)?;
    match shape {
        HeadShape::Fact => Ok(()),
        HeadShape::IntegrityConstraint => {
            let mut scope = Scope::new(variables);
            let body = body::translate_body(&rule.body, &mut scope, symbols)?;
            let free = scope.free();
            constraints.push(ScopedFormula::new(
                Formula::not(Formula::and(body)),
                free,
            ));
            Ok(())
        }
        HeadShape::SingleAtom(predicate, terms)
        | HeadShape::ChoiceSingleAtom(predicate, terms) => {
            let choice = matches!(shape, HeadShape::ChoiceSingleAtom(..));
            let mut scope = Scope::new(variables);
            let mut conjuncts = body::translate_body(&rule.body, &mut scope, symbols)?;
            let head_terms = terms
                .iter()
                .map(|term| term::translate(term, &mut scope, symbols))
                .collect::<Result<Vec<_>, _>>()?;
            let free = scope.free();
            let definition = definitions
                .entry(predicate)
                .or_insert_with(|| Definitions::new(head_terms.len(), variables));
            for (&parameter, term) in definition.parameters.iter().zip(head_terms) {
                conjuncts.push(Formula::member(logic::Term::Variable(parameter), term));
            }
            if choice {
                let arguments = definition
                    .parameters
                    .iter()
                    .map(|&parameter| logic::Term::Variable(parameter))
                    .collect();
                conjuncts.push(Formula::Predicate(predicate, arguments));
            }
            definition
                .fragments
                .push(ScopedFormula::new(Formula::and(conjuncts), free).close_existentially());
            Ok(())
        }
    }
}
