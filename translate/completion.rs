//! Clark completion: the accumulated definitions become equivalences.
//!
//! Every used, non-external predicate gets exactly one formula. A
//! predicate with definitions is equivalent to the disjunction of its
//! fragments over the shared parameter tuple; a predicate that only
//! ever appears in bodies is false everywhere. Integrity constraints
//! follow in source order.

use std::collections::BTreeMap;

use gavotte_logic::{
    Formula, Predicate, ScopedFormula, SymbolTable, Term, Variable, VariableKind, Variables,
};

/// Per-predicate state gathered while scanning rules: the parameter
/// tuple shared by every rule for the predicate, and one fragment per
/// rule.
pub(crate) struct Definitions {
    pub parameters: Vec<Variable>,
    pub fragments: Vec<Formula>,
}

impl Definitions {
    pub fn new(arity: usize, variables: &mut Variables) -> Self {
        Self {
            parameters: (0..arity)
                .map(|_| variables.declare(VariableKind::Head))
                .collect(),
            fragments: Vec::new(),
        }
    }
}

/// Fuse definitions into one closed equivalence per predicate, in
/// (name, arity) order, then append the closed constraints.
pub(crate) fn complete(
    mut definitions: BTreeMap<Predicate, Definitions>,
    constraints: Vec<ScopedFormula>,
    variables: &mut Variables,
    symbols: &SymbolTable,
) -> Vec<Formula> {
    let mut formulas = Vec::new();
    for predicate in symbols.predicates() {
        let data = &symbols[predicate];
        if !data.is_used || data.is_external {
            continue;
        }
        let formula = match definitions.remove(&predicate) {
            Some(definition) => {
                let atom = atom(predicate, &definition.parameters);
                Formula::for_all(
                    definition.parameters,
                    Formula::biconditional(atom, Formula::or(definition.fragments)),
                )
            }
            None => {
                let parameters: Vec<_> = (0..data.arity)
                    .map(|_| variables.declare(VariableKind::Head))
                    .collect();
                let negated = Formula::not(atom(predicate, &parameters));
                Formula::for_all(parameters, negated)
            }
        };
        formulas.push(formula);
    }
    formulas.extend(constraints.into_iter().map(ScopedFormula::close_universally));
    formulas
}

fn atom(predicate: Predicate, parameters: &[Variable]) -> Formula {
    Formula::Predicate(
        predicate,
        parameters
            .iter()
            .map(|&parameter| Term::Variable(parameter))
            .collect(),
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use gavotte_logic::Formatter;

    fn human(variables: &Variables, symbols: &SymbolTable, formulas: &[Formula]) -> Vec<String> {
        let formatter = Formatter::new(variables, symbols);
        formulas
            .iter()
            .map(|formula| formatter.human(formula).to_string())
            .collect()
    }

    #[test]
    fn definitions_fuse_into_equivalences() {
        let mut variables = Variables::new();
        let mut symbols = SymbolTable::new();
        let p = symbols.predicate("p", 1);
        symbols[p].is_used = true;

        let mut definition = Definitions::new(1, &mut variables);
        let parameter = definition.parameters[0];
        definition
            .fragments
            .push(Formula::member(Term::Variable(parameter), Term::Integer(1)));
        definition
            .fragments
            .push(Formula::member(Term::Variable(parameter), Term::Integer(2)));

        let mut definitions = BTreeMap::new();
        definitions.insert(p, definition);
        let formulas = complete(definitions, Vec::new(), &mut variables, &symbols);
        assert_eq!(
            human(&variables, &symbols, &formulas),
            ["forall V1 (p(V1) <-> V1 in 1 or V1 in 2)"]
        );
    }

    #[test]
    fn body_only_predicates_are_false() {
        let mut variables = Variables::new();
        let mut symbols = SymbolTable::new();
        let q = symbols.predicate("q", 2);
        symbols[q].is_used = true;
        let r = symbols.predicate("r", 0);
        symbols[r].is_used = true;

        let formulas = complete(BTreeMap::new(), Vec::new(), &mut variables, &symbols);
        assert_eq!(
            human(&variables, &symbols, &formulas),
            ["forall V1, V2 not q(V1, V2)", "not r"]
        );
    }

    #[test]
    fn unused_and_external_predicates_are_skipped() {
        let mut variables = Variables::new();
        let mut symbols = SymbolTable::new();
        symbols.predicate("shown", 1);
        let external = symbols.predicate("ext", 1);
        symbols[external].is_used = true;
        symbols[external].is_external = true;

        let formulas = complete(BTreeMap::new(), Vec::new(), &mut variables, &symbols);
        assert!(formulas.is_empty());
    }

    #[test]
    fn constraints_keep_source_order() {
        let mut variables = Variables::new();
        let mut symbols = SymbolTable::new();
        let p = symbols.predicate("p", 0);
        symbols[p].is_used = true;
        let q = symbols.predicate("q", 0);
        symbols[q].is_used = true;

        let constraints = vec![
            ScopedFormula::new(
                Formula::not(Formula::Predicate(q, Vec::new())),
                Vec::new(),
            ),
            ScopedFormula::new(
                Formula::not(Formula::Predicate(p, Vec::new())),
                Vec::new(),
            ),
        ];
        let formulas = complete(BTreeMap::new(), constraints, &mut variables, &symbols);
        assert_eq!(
            human(&variables, &symbols, &formulas),
            ["not p", "not q", "not q", "not p"]
        );
    }
}
