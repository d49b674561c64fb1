//! Fixpoint simplification of formulas.
//!
//! A pass walks the tree in post-order, attempting one local rewrite at
//! each node whose children are already stable; the driver repeats
//! passes until a whole pass changes nothing. Termination: every rule
//! strictly decreases the measure (quantified variable slots,
//! membership formulas, node count), compared lexicographically. Any
//! new rule must keep that property.

use crate::formula::{Formula, RelOp, Term};
use crate::symbols::Variable;

/// Rewrite `formula` until no rule applies anywhere.
pub fn simplify(formula: Formula) -> Formula {
    let mut formula = formula;
    loop {
        let (simplified, changed) = step(formula);
        formula = simplified;
        if !changed {
            return formula;
        }
    }
}

/// One post-order pass. Children are simplified first; this node is
/// rewritten only once its children report no further change.
fn step(formula: Formula) -> (Formula, bool) {
    use Formula::*;
    let (formula, changed) = match formula {
        And(arguments) => {
            let (arguments, changed) = step_all(arguments);
            (And(arguments), changed)
        }
        Or(arguments) => {
            let (arguments, changed) = step_all(arguments);
            (Or(arguments), changed)
        }
        Not(argument) => {
            let (argument, changed) = step(*argument);
            (Not(Box::new(argument)), changed)
        }
        Implies(antecedent, consequent) => {
            let (antecedent, a) = step(*antecedent);
            let (consequent, c) = step(*consequent);
            (Formula::implies(antecedent, consequent), a || c)
        }
        Biconditional(left, right) => {
            let (left, l) = step(*left);
            let (right, r) = step(*right);
            (Formula::biconditional(left, right), l || r)
        }
        ForAll(variables, argument) => {
            let (argument, changed) = step(*argument);
            (ForAll(variables, Box::new(argument)), changed)
        }
        Exists(variables, argument) => {
            let (argument, changed) = step(*argument);
            (Exists(variables, Box::new(argument)), changed)
        }
        other => (other, false),
    };
    if changed {
        (formula, true)
    } else {
        rewrite(formula)
    }
}

fn step_all(arguments: Vec<Formula>) -> (Vec<Formula>, bool) {
    let mut changed = false;
    let arguments = arguments
        .into_iter()
        .map(|argument| {
            let (argument, c) = step(argument);
            changed |= c;
            argument
        })
        .collect();
    (arguments, changed)
}

/// Attempt one rewrite at the root of `formula`.
fn rewrite(formula: Formula) -> (Formula, bool) {
    use Formula::*;
    match formula {
        Not(argument) => match *argument {
            Boolean(value) => (Boolean(!value), true),
            Not(inner) => (*inner, true),
            other => (Formula::not(other), false),
        },

        And(arguments) => {
            if arguments.iter().any(|a| matches!(a, Boolean(false))) {
                return (Boolean(false), true);
            }
            if arguments.iter().any(|a| matches!(a, And(_) | Boolean(true))) {
                let mut flattened = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    match argument {
                        And(inner) => flattened.extend(inner),
                        Boolean(true) => (),
                        other => flattened.push(other),
                    }
                }
                return (Formula::and(flattened), true);
            }
            let mut arguments = arguments;
            match arguments.len() {
                0 => (Boolean(true), true),
                1 => (arguments.remove(0), true),
                _ => (And(arguments), false),
            }
        }

        Or(arguments) => {
            if arguments.iter().any(|a| matches!(a, Boolean(true))) {
                return (Boolean(true), true);
            }
            if arguments.iter().any(|a| matches!(a, Or(_) | Boolean(false))) {
                let mut flattened = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    match argument {
                        Or(inner) => flattened.extend(inner),
                        Boolean(false) => (),
                        other => flattened.push(other),
                    }
                }
                return (Formula::or(flattened), true);
            }
            let mut arguments = arguments;
            match arguments.len() {
                0 => (Boolean(false), true),
                1 => (arguments.remove(0), true),
                _ => (Or(arguments), false),
            }
        }

        Implies(antecedent, consequent) => match (*antecedent, *consequent) {
            (Boolean(true), consequent) => (consequent, true),
            (Boolean(false), _) => (Boolean(true), true),
            (_, Boolean(true)) => (Boolean(true), true),
            (antecedent, Boolean(false)) => (Formula::not(antecedent), true),
            (antecedent, consequent) => (Formula::implies(antecedent, consequent), false),
        },

        Biconditional(left, right) => match (*left, *right) {
            (Boolean(true), formula) | (formula, Boolean(true)) => (formula, true),
            (Boolean(false), formula) | (formula, Boolean(false)) => {
                (Formula::not(formula), true)
            }
            (left, right) => (Formula::biconditional(left, right), false),
        },

        ForAll(mut variables, argument) => match *argument {
            ForAll(inner_variables, inner) => {
                variables.extend(inner_variables);
                (ForAll(variables, inner), true)
            }
            argument => {
                let before = variables.len();
                variables.retain(|&variable| argument.contains(variable));
                if variables.is_empty() {
                    return (argument, true);
                }
                let changed = variables.len() != before;
                (ForAll(variables, Box::new(argument)), changed)
            }
        },

        Exists(mut variables, argument) => match *argument {
            Exists(inner_variables, inner) => {
                variables.extend(inner_variables);
                (Exists(variables, inner), true)
            }
            argument => {
                let conjuncts = match argument {
                    And(conjuncts) => conjuncts,
                    other => vec![other],
                };
                if let Some((index, variable, term)) = assignment(&variables, &conjuncts) {
                    let mut conjuncts = conjuncts;
                    conjuncts.remove(index);
                    variables.retain(|&v| v != variable);
                    let remainder = conjuncts
                        .into_iter()
                        .map(|conjunct| conjunct.substitute(variable, &term))
                        .collect();
                    return (Formula::exists(variables, Formula::and(remainder)), true);
                }
                let argument = Formula::and(conjuncts);
                let before = variables.len();
                variables.retain(|&variable| argument.contains(variable));
                if variables.is_empty() {
                    return (argument, true);
                }
                let changed = variables.len() != before;
                (Exists(variables, Box::new(argument)), changed)
            }
        },

        In(element, set) if set.is_single_valued() => {
            (Comparison(RelOp::Eq, element, set), true)
        }

        Comparison(RelOp::Eq, left, right) if left == right && left.is_single_valued() => {
            (Boolean(true), true)
        }

        other => (other, false),
    }
}

/// Find a conjunct `v = t` (either orientation) through which `v` can
/// be eliminated: `v` must be bound by the quantifier and must not
/// occur in `t`.
fn assignment(
    variables: &[Variable],
    conjuncts: &[Formula],
) -> Option<(usize, Variable, Term)> {
    for (index, conjunct) in conjuncts.iter().enumerate() {
        if let Formula::Comparison(RelOp::Eq, left, right) = conjunct {
            if let Term::Variable(variable) = **left {
                if variables.contains(&variable) && !right.contains(variable) {
                    return Some((index, variable, (**right).clone()));
                }
            }
            if let Term::Variable(variable) = **right {
                if variables.contains(&variable) && !left.contains(variable) {
                    return Some((index, variable, (**left).clone()));
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::formula::BinOp;
    use crate::symbols::{SymbolTable, VariableKind, Variables};

    fn atom(table: &mut SymbolTable, name: &str) -> Formula {
        Formula::Predicate(table.predicate(name, 0), vec![])
    }

    #[test]
    fn negation() {
        let mut table = SymbolTable::new();
        let p = atom(&mut table, "p");
        assert_eq!(simplify(Formula::not(Formula::not(p.clone()))), p);
        assert_eq!(
            simplify(Formula::not(Formula::Boolean(true))),
            Formula::Boolean(false)
        );
    }

    #[test]
    fn conjunction() {
        let mut table = SymbolTable::new();
        let p = atom(&mut table, "p");
        let q = atom(&mut table, "q");
        let r = atom(&mut table, "r");
        assert_eq!(
            simplify(Formula::And(vec![Formula::Boolean(true), p.clone()])),
            p
        );
        assert_eq!(
            simplify(Formula::And(vec![p.clone(), Formula::Boolean(false)])),
            Formula::Boolean(false)
        );
        assert_eq!(
            simplify(Formula::And(vec![
                Formula::And(vec![p.clone(), q.clone()]),
                r.clone()
            ])),
            Formula::And(vec![p, q, r])
        );
    }

    #[test]
    fn disjunction() {
        let mut table = SymbolTable::new();
        let p = atom(&mut table, "p");
        let q = atom(&mut table, "q");
        assert_eq!(
            simplify(Formula::Or(vec![Formula::Boolean(false), p.clone()])),
            p
        );
        assert_eq!(
            simplify(Formula::Or(vec![q, Formula::Boolean(true)])),
            Formula::Boolean(true)
        );
    }

    #[test]
    fn implication() {
        let mut table = SymbolTable::new();
        let p = atom(&mut table, "p");
        assert_eq!(
            simplify(Formula::implies(Formula::Boolean(true), p.clone())),
            p
        );
        assert_eq!(
            simplify(Formula::implies(Formula::Boolean(false), p.clone())),
            Formula::Boolean(true)
        );
        assert_eq!(
            simplify(Formula::implies(p.clone(), Formula::Boolean(false))),
            Formula::not(p.clone())
        );
        assert_eq!(
            simplify(Formula::implies(p, Formula::Boolean(true))),
            Formula::Boolean(true)
        );
    }

    #[test]
    fn biconditional() {
        let mut table = SymbolTable::new();
        let p = atom(&mut table, "p");
        assert_eq!(
            simplify(Formula::biconditional(p.clone(), Formula::Boolean(true))),
            p
        );
        assert_eq!(
            simplify(Formula::biconditional(Formula::Boolean(false), p.clone())),
            Formula::not(p)
        );
    }

    #[test]
    fn quantifiers() {
        let mut table = SymbolTable::new();
        let mut variables = Variables::new();
        let p = atom(&mut table, "p");
        let x = variables.declare(VariableKind::Body);
        let y = variables.declare(VariableKind::Body);

        // Unused variables disappear, and so do emptied quantifiers.
        assert_eq!(
            simplify(Formula::for_all(vec![x], p.clone())),
            p
        );

        // Directly nested quantifiers of one kind merge.
        let q1 = table.predicate("q", 2);
        let inner = Formula::Predicate(q1, vec![Term::Variable(x), Term::Variable(y)]);
        let nested = Formula::for_all(vec![x], Formula::for_all(vec![y], inner.clone()));
        assert_eq!(
            simplify(nested),
            Formula::ForAll(vec![x, y], Box::new(inner))
        );
    }

    #[test]
    fn membership() {
        let mut variables = Variables::new();
        let x = variables.declare(VariableKind::Body);
        let y = variables.declare(VariableKind::UserDefined);

        assert_eq!(
            simplify(Formula::member(Term::Variable(x), Term::Integer(2))),
            Formula::comparison(RelOp::Eq, Term::Variable(x), Term::Integer(2))
        );

        // Multi-valued and partial terms stay memberships.
        let interval = Formula::member(
            Term::Variable(x),
            Term::interval(Term::Integer(1), Term::Integer(3)),
        );
        assert_eq!(simplify(interval.clone()), interval);
        let quotient = Formula::member(
            Term::Variable(x),
            Term::binary_operation(BinOp::Div, Term::Variable(y), Term::Integer(0)),
        );
        assert_eq!(simplify(quotient.clone()), quotient);
    }

    #[test]
    fn assignment_elimination() {
        let mut table = SymbolTable::new();
        let mut variables = Variables::new();
        let p = table.predicate("p", 1);
        let x = variables.declare(VariableKind::Body);
        let y = variables.declare(VariableKind::UserDefined);

        let f = Formula::exists(
            vec![x],
            Formula::And(vec![
                Formula::comparison(RelOp::Eq, Term::Variable(x), Term::Variable(y)),
                Formula::Predicate(p, vec![Term::Variable(x)]),
            ]),
        );
        assert_eq!(
            simplify(f),
            Formula::Predicate(p, vec![Term::Variable(y)])
        );
    }

    #[test]
    fn chosen_values_collapse() {
        // exists A B (A in X and B in 2 and A > B) reduces to X > 2.
        let mut variables = Variables::new();
        let x = variables.declare(VariableKind::UserDefined);
        let a = variables.declare(VariableKind::Body);
        let b = variables.declare(VariableKind::Body);

        let f = Formula::exists(
            vec![a, b],
            Formula::And(vec![
                Formula::member(Term::Variable(a), Term::Variable(x)),
                Formula::member(Term::Variable(b), Term::Integer(2)),
                Formula::comparison(RelOp::Gt, Term::Variable(a), Term::Variable(b)),
            ]),
        );
        assert_eq!(
            simplify(f),
            Formula::comparison(RelOp::Gt, Term::Variable(x), Term::Integer(2))
        );
    }

    #[test]
    fn reflexive_equality() {
        let mut variables = Variables::new();
        let x = variables.declare(VariableKind::Body);
        assert_eq!(
            simplify(Formula::comparison(
                RelOp::Eq,
                Term::Variable(x),
                Term::Variable(x)
            )),
            Formula::Boolean(true)
        );

        // Equality of partial terms is not trivially reflexive.
        let quotient =
            Term::binary_operation(BinOp::Div, Term::Variable(x), Term::Integer(0));
        let f = Formula::comparison(RelOp::Eq, quotient.clone(), quotient);
        assert_eq!(simplify(f.clone()), f);
    }

    #[test]
    fn idempotence() {
        let mut table = SymbolTable::new();
        let mut variables = Variables::new();
        let p = table.predicate("p", 1);
        let q = atom(&mut table, "q");
        let x = variables.declare(VariableKind::Body);
        let u = variables.declare(VariableKind::UserDefined);

        let formulas = [
            Formula::exists(
                vec![x],
                Formula::And(vec![
                    Formula::member(Term::Variable(x), Term::Variable(u)),
                    Formula::Predicate(p, vec![Term::Variable(x)]),
                ]),
            ),
            Formula::implies(
                Formula::not(Formula::not(q.clone())),
                Formula::Boolean(false),
            ),
            Formula::for_all(
                vec![u],
                Formula::Or(vec![q, Formula::Boolean(false)]),
            ),
        ];
        for formula in formulas {
            let once = simplify(formula);
            assert_eq!(simplify(once.clone()), once);
        }
    }
}
