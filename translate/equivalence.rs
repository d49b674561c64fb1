//! The single-sort collapse used when comparing programs for strong
//! equivalence.
//!
//! External tooling for the logic of here-and-there works over one
//! unsorted domain. Integer and symbolic values both inject into it
//! through reserved function symbols, arithmetic becomes uninterpreted
//! applications, the built-in order becomes reserved predicates, and
//! quantification over integers survives as relativization through
//! `p__is_integer__`.

use gavotte_logic::{
    BinOp, Domain, Formula, Function, Predicate, RelOp, SpecialInteger, SymbolTable, Term,
    UnaryOp, Variable, Variables,
};

use crate::Error;

/// When the collapse onto the single program sort happens.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum UnifyDomains {
    /// Only when no quantified variable was inferred to range over the
    /// integers, so that nothing is lost by forgetting sorts.
    #[default]
    Auto,
    /// Unconditionally.
    Always,
}

/// The reserved vocabulary of the unified sort.
struct Vocabulary {
    integer: Function,
    symbolic: Function,
    infimum: Function,
    supremum: Function,
    sum: Function,
    difference: Function,
    product: Function,
    unary_minus: Function,
    less: Predicate,
    less_equal: Predicate,
    greater: Predicate,
    greater_equal: Predicate,
    is_integer: Predicate,
}

impl Vocabulary {
    fn declare(symbols: &mut SymbolTable) -> Self {
        Self {
            integer: symbols.function("f__integer__", 1),
            symbolic: symbols.function("f__symbolic__", 1),
            infimum: symbols.function("c__infimum__", 0),
            supremum: symbols.function("c__supremum__", 0),
            sum: symbols.function("f__sum__", 2),
            difference: symbols.function("f__difference__", 2),
            product: symbols.function("f__product__", 2),
            unary_minus: symbols.function("f__unary_minus__", 1),
            less: symbols.predicate("p__less__", 2),
            less_equal: symbols.predicate("p__less_equal__", 2),
            greater: symbols.predicate("p__greater__", 2),
            greater_equal: symbols.predicate("p__greater_equal__", 2),
            is_integer: symbols.predicate("p__is_integer__", 1),
        }
    }
}

/// Collapse `formulas` onto the single program sort when `policy` asks
/// for it. Afterwards every variable and predicate parameter ranges
/// over the program domain.
pub(crate) fn unify_domains(
    formulas: Vec<Formula>,
    policy: UnifyDomains,
    variables: &mut Variables,
    symbols: &mut SymbolTable,
) -> Result<Vec<Formula>, Error> {
    if policy == UnifyDomains::Auto
        && formulas
            .iter()
            .any(|formula| quantifies_integers(formula, variables))
    {
        return Ok(formulas);
    }
    let vocabulary = Vocabulary::declare(symbols);
    let formulas = formulas
        .into_iter()
        .map(|formula| map_formula(formula, &vocabulary, variables))
        .collect::<Result<_, _>>()?;
    let predicates: Vec<_> = symbols.predicates().collect();
    for predicate in predicates {
        symbols[predicate].parameters.fill(Domain::Program);
    }
    Ok(formulas)
}

fn quantifies_integers(formula: &Formula, variables: &Variables) -> bool {
    match formula {
        Formula::ForAll(scope, argument) | Formula::Exists(scope, argument) => {
            scope
                .iter()
                .any(|&variable| variables[variable].domain == Domain::Integer)
                || quantifies_integers(argument, variables)
        }
        Formula::And(arguments) | Formula::Or(arguments) => arguments
            .iter()
            .any(|argument| quantifies_integers(argument, variables)),
        Formula::Implies(left, right) | Formula::Biconditional(left, right) => {
            quantifies_integers(left, variables) || quantifies_integers(right, variables)
        }
        Formula::Not(argument) => quantifies_integers(argument, variables),
        Formula::Boolean(_) | Formula::Comparison(..) | Formula::In(..) | Formula::Predicate(..) => {
            false
        }
    }
}

fn map_formula(
    formula: Formula,
    vocabulary: &Vocabulary,
    variables: &mut Variables,
) -> Result<Formula, Error> {
    Ok(match formula {
        Formula::Boolean(value) => Formula::Boolean(value),
        Formula::Predicate(predicate, arguments) => Formula::Predicate(
            predicate,
            arguments
                .into_iter()
                .map(|argument| map_term(argument, vocabulary))
                .collect::<Result<_, _>>()?,
        ),
        Formula::Comparison(op, left, right) => {
            let left = map_term(*left, vocabulary)?;
            let right = map_term(*right, vocabulary)?;
            let order = match op {
                RelOp::Eq | RelOp::Ne => return Ok(Formula::comparison(op, left, right)),
                RelOp::Lt => vocabulary.less,
                RelOp::Gt => vocabulary.greater,
                RelOp::Leq => vocabulary.less_equal,
                RelOp::Geq => vocabulary.greater_equal,
            };
            Formula::Predicate(order, vec![left, right])
        }
        Formula::In(element, set) => match *set {
            Term::Interval(from, to) => {
                let element = map_term(*element, vocabulary)?;
                let from = map_term(*from, vocabulary)?;
                let to = map_term(*to, vocabulary)?;
                Formula::And(vec![
                    Formula::Predicate(vocabulary.less_equal, vec![from, element.clone()]),
                    Formula::Predicate(vocabulary.less_equal, vec![element, to]),
                ])
            }
            set => Formula::member(map_term(*element, vocabulary)?, map_term(set, vocabulary)?),
        },
        Formula::Not(argument) => Formula::not(map_formula(*argument, vocabulary, variables)?),
        Formula::And(arguments) => Formula::And(
            arguments
                .into_iter()
                .map(|argument| map_formula(argument, vocabulary, variables))
                .collect::<Result<_, _>>()?,
        ),
        Formula::Or(arguments) => Formula::Or(
            arguments
                .into_iter()
                .map(|argument| map_formula(argument, vocabulary, variables))
                .collect::<Result<_, _>>()?,
        ),
        Formula::Implies(antecedent, consequent) => Formula::implies(
            map_formula(*antecedent, vocabulary, variables)?,
            map_formula(*consequent, vocabulary, variables)?,
        ),
        Formula::Biconditional(left, right) => Formula::biconditional(
            map_formula(*left, vocabulary, variables)?,
            map_formula(*right, vocabulary, variables)?,
        ),
        Formula::ForAll(scope, argument) => {
            let guards = relativize(&scope, vocabulary, variables);
            let argument = map_formula(*argument, vocabulary, variables)?;
            let argument = if guards.is_empty() {
                argument
            } else {
                Formula::implies(Formula::and(guards), argument)
            };
            Formula::ForAll(scope, Box::new(argument))
        }
        Formula::Exists(scope, argument) => {
            let mut guards = relativize(&scope, vocabulary, variables);
            let argument = map_formula(*argument, vocabulary, variables)?;
            let argument = if guards.is_empty() {
                argument
            } else {
                guards.push(argument);
                Formula::and(guards)
            };
            Formula::Exists(scope, Box::new(argument))
        }
    })
}

fn map_term(term: Term, vocabulary: &Vocabulary) -> Result<Term, Error> {
    Ok(match term {
        Term::Integer(value) => {
            Term::Function(vocabulary.integer, vec![Term::Integer(value)])
        }
        Term::String(value) => {
            Term::Function(vocabulary.symbolic, vec![Term::String(value)])
        }
        Term::Constant(function) => {
            Term::Function(vocabulary.symbolic, vec![Term::Constant(function)])
        }
        Term::Function(function, arguments) => {
            let arguments = arguments
                .into_iter()
                .map(|argument| map_term(argument, vocabulary))
                .collect::<Result<_, _>>()?;
            Term::Function(vocabulary.symbolic, vec![Term::Function(function, arguments)])
        }
        Term::SpecialInteger(SpecialInteger::Infimum) => Term::Constant(vocabulary.infimum),
        Term::SpecialInteger(SpecialInteger::Supremum) => Term::Constant(vocabulary.supremum),
        Term::Variable(variable) => Term::Variable(variable),
        Term::BinaryOperation(op, left, right) => {
            let function = match op {
                BinOp::Add => vocabulary.sum,
                BinOp::Sub => vocabulary.difference,
                BinOp::Mul => vocabulary.product,
                BinOp::Div => return Err(Error::SingleSort("division")),
                BinOp::Rem => return Err(Error::SingleSort("modulo")),
                BinOp::Exp => return Err(Error::SingleSort("exponentiation")),
            };
            Term::Function(
                function,
                vec![map_term(*left, vocabulary)?, map_term(*right, vocabulary)?],
            )
        }
        Term::UnaryOperation(UnaryOp::Neg, argument) => {
            Term::Function(vocabulary.unary_minus, vec![map_term(*argument, vocabulary)?])
        }
        Term::UnaryOperation(UnaryOp::Abs, _) => {
            return Err(Error::SingleSort("absolute value"))
        }
        Term::Interval(..) => return Err(Error::SingleSort("an interval")),
    })
}

/// Guard integer-quantified variables with `p__is_integer__`, then
/// move every declaration onto the program domain.
fn relativize(
    scope: &[Variable],
    vocabulary: &Vocabulary,
    variables: &mut Variables,
) -> Vec<Formula> {
    let mut guards = Vec::new();
    for &variable in scope {
        if variables[variable].domain == Domain::Integer {
            guards.push(Formula::Predicate(
                vocabulary.is_integer,
                vec![Term::Variable(variable)],
            ));
        }
        variables[variable].domain = Domain::Program;
    }
    guards
}

#[cfg(test)]
mod test {
    use super::*;
    use gavotte_logic::{Formatter, VariableKind};

    fn unified(formula: Formula, policy: UnifyDomains) -> (String, Variables, SymbolTable) {
        let mut variables = Variables::new();
        let mut symbols = SymbolTable::new();
        let formulas = unify_domains(vec![formula], policy, &mut variables, &mut symbols).unwrap();
        let human = Formatter::new(&variables, &symbols)
            .human(&formulas[0])
            .to_string();
        (human, variables, symbols)
    }

    #[test]
    fn values_inject() {
        let mut symbols = SymbolTable::new();
        let a = symbols.function("a", 0);
        let p = symbols.predicate("p", 2);
        let atom = Formula::Predicate(p, vec![Term::Integer(1), Term::Constant(a)]);
        let mut variables = Variables::new();
        let formulas = unify_domains(
            vec![atom],
            UnifyDomains::Always,
            &mut variables,
            &mut symbols,
        )
        .unwrap();
        assert_eq!(
            Formatter::new(&variables, &symbols)
                .human(&formulas[0])
                .to_string(),
            "p(f__integer__(1), f__symbolic__(a))"
        );
        assert_eq!(symbols[p].parameters, [Domain::Program, Domain::Program]);
    }

    #[test]
    fn arithmetic_becomes_applications() {
        let sum = Term::binary_operation(BinOp::Add, Term::Integer(1), Term::Integer(2));
        let negated = Term::unary_operation(UnaryOp::Neg, Term::Integer(3));
        let comparison = Formula::comparison(RelOp::Lt, sum, negated);
        let (human, _, _) = unified(comparison, UnifyDomains::Always);
        assert_eq!(
            human,
            "p__less__(f__sum__(f__integer__(1), f__integer__(2)), \
             f__unary_minus__(f__integer__(3)))"
        );
    }

    #[test]
    fn membership_in_intervals_becomes_bounds() {
        let mut variables = Variables::new();
        let variable = variables.declare(VariableKind::Body);
        let membership = Formula::member(
            Term::Variable(variable),
            Term::interval(Term::Integer(1), Term::Integer(5)),
        );
        let mut symbols = SymbolTable::new();
        let formulas = unify_domains(
            vec![membership],
            UnifyDomains::Always,
            &mut variables,
            &mut symbols,
        )
        .unwrap();
        assert_eq!(
            Formatter::new(&variables, &symbols)
                .human(&formulas[0])
                .to_string(),
            "p__less_equal__(f__integer__(1), X1) and p__less_equal__(X1, f__integer__(5))"
        );
    }

    #[test]
    fn integer_quantifiers_relativize() {
        let mut variables = Variables::new();
        let variable = variables.declare(VariableKind::Body);
        variables[variable].domain = Domain::Integer;
        let formula = Formula::ForAll(
            vec![variable],
            Box::new(Formula::comparison(
                RelOp::Eq,
                Term::Variable(variable),
                Term::Variable(variable),
            )),
        );
        let mut symbols = SymbolTable::new();

        let kept = unify_domains(
            vec![formula.clone()],
            UnifyDomains::Auto,
            &mut variables,
            &mut symbols,
        )
        .unwrap();
        assert_eq!(kept, [formula.clone()]);
        assert_eq!(variables[variable].domain, Domain::Integer);

        let collapsed = unify_domains(
            vec![formula],
            UnifyDomains::Always,
            &mut variables,
            &mut symbols,
        )
        .unwrap();
        assert_eq!(
            Formatter::new(&variables, &symbols)
                .human(&collapsed[0])
                .to_string(),
            "forall X1 (p__is_integer__(X1) -> X1 = X1)"
        );
        assert_eq!(variables[variable].domain, Domain::Program);
    }

    #[test]
    fn auto_collapses_symbolic_programs() {
        let mut symbols = SymbolTable::new();
        let p = symbols.predicate("p", 1);
        let mut variables = Variables::new();
        let variable = variables.declare(VariableKind::UserDefined);
        let formula = Formula::Exists(
            vec![variable],
            Box::new(Formula::Predicate(p, vec![Term::Variable(variable)])),
        );
        let formulas = unify_domains(
            vec![formula],
            UnifyDomains::Auto,
            &mut variables,
            &mut symbols,
        )
        .unwrap();
        assert_eq!(
            Formatter::new(&variables, &symbols)
                .human(&formulas[0])
                .to_string(),
            "exists U1 p(U1)"
        );
        assert_eq!(symbols[p].parameters, [Domain::Program]);
    }

    #[test]
    fn partial_operations_have_no_rendering() {
        let division = Term::binary_operation(BinOp::Div, Term::Integer(4), Term::Integer(2));
        let formula = Formula::comparison(RelOp::Eq, division, Term::Integer(2));
        let mut variables = Variables::new();
        let mut symbols = SymbolTable::new();
        assert_eq!(
            unify_domains(
                vec![formula],
                UnifyDomains::Always,
                &mut variables,
                &mut symbols,
            ),
            Err(Error::SingleSort("division"))
        );
    }
}
