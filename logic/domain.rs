//! Variable domain inference.
//!
//! Decides which sort each variable ranges over by propagating evidence
//! through the formula set to a fixpoint: arithmetic positions force
//! `Integer`, strings and symbolic terms force `Program`, and equality,
//! membership, and predicate argument positions carry domains over to
//! variables (in both directions, so completed head parameters type
//! their predicates and vice versa). Evidence only ever refines
//! `Unknown`, never overturns; contradictory evidence is an error.

use thiserror::Error;

use crate::formula::{Formula, RelOp, Term};
use crate::symbols::{Domain, Predicate, SymbolTable, Variable, Variables};

/// Contradictory domain evidence. The translation produced an
/// ill-sorted formula, so this is surfaced as a defect rather than
/// silently resolved.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum DomainError {
    #[error("variable typed both {first} and {second}, please report this as a bug")]
    Variable { first: Domain, second: Domain },
    #[error(
        "argument {position} of {name}/{arity} typed both {first} and {second}, \
         please report this as a bug"
    )]
    Parameter {
        name: String,
        arity: usize,
        position: usize,
        first: Domain,
        second: Domain,
    },
}

/// Propagate domain evidence through `formulas` until nothing changes.
/// Declarations start `Unknown` and only ever become `Program` or
/// `Integer`, so a fixpoint exists.
pub fn infer_domains(
    formulas: &[Formula],
    variables: &mut Variables,
    symbols: &mut SymbolTable,
) -> Result<(), DomainError> {
    loop {
        let mut changed = false;
        for formula in formulas {
            changed |= walk_formula(formula, variables, symbols)?;
        }
        if !changed {
            return Ok(());
        }
    }
}

fn walk_formula(
    formula: &Formula,
    variables: &mut Variables,
    symbols: &mut SymbolTable,
) -> Result<bool, DomainError> {
    use Formula::*;
    match formula {
        And(arguments) | Or(arguments) => {
            let mut changed = false;
            for argument in arguments {
                changed |= walk_formula(argument, variables, symbols)?;
            }
            Ok(changed)
        }
        Biconditional(left, right) | Implies(left, right) => {
            Ok(walk_formula(left, variables, symbols)?
                | walk_formula(right, variables, symbols)?)
        }
        Boolean(_) => Ok(false),
        Comparison(op, left, right) => {
            let mut changed = walk_term(left, variables, symbols)?
                | walk_term(right, variables, symbols)?;
            if *op == RelOp::Eq {
                changed |= relate(left, right, variables, symbols)?;
                changed |= relate(right, left, variables, symbols)?;
            }
            Ok(changed)
        }
        Exists(_, argument) | ForAll(_, argument) | Not(argument) => {
            walk_formula(argument, variables, symbols)
        }
        In(element, set) => {
            let mut changed = walk_term(element, variables, symbols)?
                | walk_term(set, variables, symbols)?;
            changed |= relate(element, set, variables, symbols)?;
            changed |= relate(set, element, variables, symbols)?;
            Ok(changed)
        }
        Predicate(predicate, arguments) => {
            let mut changed = false;
            for (position, argument) in arguments.iter().enumerate() {
                changed |= walk_term(argument, variables, symbols)?;
                let declared = symbols[*predicate].parameters[position];
                if let Term::Variable(variable) = argument {
                    changed |= assign_variable(variables, *variable, declared)?;
                }
                let evident = term_domain(argument, variables, symbols);
                changed |= assign_parameter(symbols, *predicate, position, evident)?;
            }
            Ok(changed)
        }
    }
}

/// Seed facts inside terms: operands of arithmetic and the endpoints
/// of intervals are integers.
fn walk_term(
    term: &Term,
    variables: &mut Variables,
    symbols: &mut SymbolTable,
) -> Result<bool, DomainError> {
    use Term::*;
    match term {
        BinaryOperation(_, left, right) | Interval(left, right) => {
            let mut changed = walk_term(left, variables, symbols)?
                | walk_term(right, variables, symbols)?;
            changed |= force_integer(left, variables)?;
            changed |= force_integer(right, variables)?;
            Ok(changed)
        }
        UnaryOperation(_, argument) => {
            let mut changed = walk_term(argument, variables, symbols)?;
            changed |= force_integer(argument, variables)?;
            Ok(changed)
        }
        Function(_, arguments) => {
            let mut changed = false;
            for argument in arguments {
                changed |= walk_term(argument, variables, symbols)?;
            }
            Ok(changed)
        }
        Constant(_) | Integer(_) | SpecialInteger(_) | String(_) | Variable(_) => Ok(false),
    }
}

/// If `target` is a variable, it inherits the domain of `source`.
fn relate(
    target: &Term,
    source: &Term,
    variables: &mut Variables,
    symbols: &SymbolTable,
) -> Result<bool, DomainError> {
    if let Term::Variable(variable) = target {
        let domain = term_domain(source, variables, symbols);
        return assign_variable(variables, *variable, domain);
    }
    Ok(false)
}

/// The domain of the values of `term`, as far as the term alone tells.
fn term_domain(term: &Term, variables: &Variables, symbols: &SymbolTable) -> Domain {
    use Term::*;
    match term {
        BinaryOperation(..) | Integer(_) | Interval(..) | SpecialInteger(_)
        | UnaryOperation(..) => Domain::Integer,
        Constant(function) | Function(function, _) => symbols[*function].domain,
        String(_) => Domain::Program,
        Variable(variable) => variables[*variable].domain,
    }
}

fn force_integer(term: &Term, variables: &mut Variables) -> Result<bool, DomainError> {
    if let Term::Variable(variable) = term {
        return assign_variable(variables, *variable, Domain::Integer);
    }
    Ok(false)
}

fn assign_variable(
    variables: &mut Variables,
    variable: Variable,
    domain: Domain,
) -> Result<bool, DomainError> {
    if domain == Domain::Unknown {
        return Ok(false);
    }
    let current = variables[variable].domain;
    if current == Domain::Unknown {
        variables[variable].domain = domain;
        return Ok(true);
    }
    if current == domain {
        return Ok(false);
    }
    Err(DomainError::Variable {
        first: current,
        second: domain,
    })
}

fn assign_parameter(
    symbols: &mut SymbolTable,
    predicate: Predicate,
    position: usize,
    domain: Domain,
) -> Result<bool, DomainError> {
    if domain == Domain::Unknown {
        return Ok(false);
    }
    let data = &mut symbols[predicate];
    let current = data.parameters[position];
    if current == Domain::Unknown {
        data.parameters[position] = domain;
        return Ok(true);
    }
    if current == domain {
        return Ok(false);
    }
    Err(DomainError::Parameter {
        name: data.name.clone(),
        arity: data.arity,
        position: position + 1,
        first: current,
        second: domain,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::symbols::VariableKind;

    #[test]
    fn interval_evidence() {
        let mut variables = Variables::new();
        let mut symbols = SymbolTable::new();
        let x = variables.declare(VariableKind::Body);
        let y = variables.declare(VariableKind::UserDefined);

        // X in Y..10 types both the element and the endpoint.
        let f = Formula::member(
            Term::Variable(x),
            Term::interval(Term::Variable(y), Term::Integer(10)),
        );
        infer_domains(&[f], &mut variables, &mut symbols).unwrap();
        assert_eq!(variables[x].domain, Domain::Integer);
        assert_eq!(variables[y].domain, Domain::Integer);
    }

    #[test]
    fn equality_evidence() {
        let mut variables = Variables::new();
        let mut symbols = SymbolTable::new();
        let x = variables.declare(VariableKind::Body);
        let y = variables.declare(VariableKind::Body);

        let fs = [
            Formula::comparison(RelOp::Eq, Term::Variable(x), Term::String("a".to_owned())),
            Formula::comparison(RelOp::Eq, Term::Integer(1), Term::Variable(y)),
        ];
        infer_domains(&fs, &mut variables, &mut symbols).unwrap();
        assert_eq!(variables[x].domain, Domain::Program);
        assert_eq!(variables[y].domain, Domain::Integer);
    }

    #[test]
    fn order_comparisons_carry_no_evidence() {
        let mut variables = Variables::new();
        let mut symbols = SymbolTable::new();
        let x = variables.declare(VariableKind::Body);

        let f = Formula::comparison(RelOp::Lt, Term::Variable(x), Term::Integer(3));
        infer_domains(&[f], &mut variables, &mut symbols).unwrap();
        assert_eq!(variables[x].domain, Domain::Unknown);
    }

    #[test]
    fn parameters_unify_across_rules() {
        let mut variables = Variables::new();
        let mut symbols = SymbolTable::new();
        let p = symbols.predicate("p", 1);
        let x = variables.declare(VariableKind::Head);
        let y = variables.declare(VariableKind::Head);

        // One formula types p's argument, the other picks it back up.
        let fs = [
            Formula::And(vec![
                Formula::Predicate(p, vec![Term::Variable(x)]),
                Formula::comparison(RelOp::Eq, Term::Variable(x), Term::Integer(0)),
            ]),
            Formula::Predicate(p, vec![Term::Variable(y)]),
        ];
        infer_domains(&fs, &mut variables, &mut symbols).unwrap();
        assert_eq!(symbols[p].parameters, [Domain::Integer]);
        assert_eq!(variables[y].domain, Domain::Integer);
    }

    #[test]
    fn functions_are_program_evidence() {
        let mut variables = Variables::new();
        let mut symbols = SymbolTable::new();
        let f = symbols.function("f", 1);
        let x = variables.declare(VariableKind::Body);

        let formula = Formula::member(
            Term::Variable(x),
            Term::Function(f, vec![Term::Integer(1)]),
        );
        infer_domains(&[formula], &mut variables, &mut symbols).unwrap();
        assert_eq!(variables[x].domain, Domain::Program);
    }

    #[test]
    fn conflicting_evidence() {
        let mut variables = Variables::new();
        let mut symbols = SymbolTable::new();
        let x = variables.declare(VariableKind::Body);

        let fs = [
            Formula::comparison(RelOp::Eq, Term::Variable(x), Term::Integer(1)),
            Formula::comparison(RelOp::Eq, Term::Variable(x), Term::String("a".to_owned())),
        ];
        let error = infer_domains(&fs, &mut variables, &mut symbols).unwrap_err();
        assert!(matches!(error, DomainError::Variable { .. }));
    }
}
