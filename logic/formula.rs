//! Terms and formulas of the target language.
//!
//! A source term may denote zero, one, or many values (`1..3`, division
//! by zero), so the translation never equates terms directly: it relates
//! a variable to a term with the membership formula `In(element, set)`,
//! which holds when `element` is one of the values `set` evaluates to.
//! Simplification later collapses memberships that are provably
//! single-valued into plain equality.

use std::fmt;

use crate::symbols::{Function, Predicate, Variable};

/// Arithmetic operations on terms.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Exp,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "\\",
            Self::Exp => "**",
        })
    }
}

/// `Neg` is arithmetic negation, `Abs` the absolute value `|t|`.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum UnaryOp {
    Abs,
    Neg,
}

/// Comparison operators.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
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
        f.write_str(match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Leq => "<=",
            Self::Geq => ">=",
        })
    }
}

/// The least and greatest elements of the total order on values.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum SpecialInteger {
    Infimum,
    Supremum,
}

impl fmt::Display for SpecialInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Infimum => "#inf",
            Self::Supremum => "#sup",
        })
    }
}

/// A term of the target language. Symbolic constants and functions are
/// handles into the symbol table; variables are handles into the
/// variable arena.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum Term {
    BinaryOperation(BinOp, Box<Term>, Box<Term>),
    Constant(Function),
    Function(Function, Vec<Term>),
    Integer(i64),
    Interval(Box<Term>, Box<Term>),
    SpecialInteger(SpecialInteger),
    String(String),
    UnaryOperation(UnaryOp, Box<Term>),
    Variable(Variable),
}

impl Term {
    pub fn binary_operation(op: BinOp, left: Term, right: Term) -> Self {
        Self::BinaryOperation(op, Box::new(left), Box::new(right))
    }

    pub fn unary_operation(op: UnaryOp, argument: Term) -> Self {
        Self::UnaryOperation(op, Box::new(argument))
    }

    pub fn interval(from: Term, to: Term) -> Self {
        Self::Interval(Box::new(from), Box::new(to))
    }

    /// Does `variable` occur anywhere in this term?
    pub fn contains(&self, variable: Variable) -> bool {
        use Term::*;
        match self {
            BinaryOperation(_, left, right) => {
                left.contains(variable) || right.contains(variable)
            }
            Constant(_) | Integer(_) | SpecialInteger(_) | String(_) => false,
            Function(_, arguments) => arguments.iter().any(|a| a.contains(variable)),
            Interval(from, to) => from.contains(variable) || to.contains(variable),
            UnaryOperation(_, argument) => argument.contains(variable),
            Variable(v) => *v == variable,
        }
    }

    /// Does this term denote exactly one value? Intervals and arithmetic
    /// may denote zero or many values; everything else denotes one.
    pub fn is_single_valued(&self) -> bool {
        use Term::*;
        match self {
            Constant(_) | Integer(_) | SpecialInteger(_) | String(_) | Variable(_) => true,
            Function(_, arguments) => arguments.iter().all(Self::is_single_valued),
            BinaryOperation(..) | Interval(..) | UnaryOperation(..) => false,
        }
    }

    /// Replace every occurrence of `variable` with `term`.
    pub fn substitute(self, variable: Variable, term: &Term) -> Term {
        use Term::*;
        match self {
            BinaryOperation(op, left, right) => BinaryOperation(
                op,
                Box::new(left.substitute(variable, term)),
                Box::new(right.substitute(variable, term)),
            ),
            Function(function, arguments) => Function(
                function,
                arguments
                    .into_iter()
                    .map(|a| a.substitute(variable, term))
                    .collect(),
            ),
            Interval(from, to) => Interval(
                Box::new(from.substitute(variable, term)),
                Box::new(to.substitute(variable, term)),
            ),
            UnaryOperation(op, argument) => {
                UnaryOperation(op, Box::new(argument.substitute(variable, term)))
            }
            Variable(v) if v == variable => term.clone(),
            other => other,
        }
    }
}

/// A formula of the target language.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum Formula {
    And(Vec<Formula>),
    Biconditional(Box<Formula>, Box<Formula>),
    Boolean(bool),
    Comparison(RelOp, Box<Term>, Box<Term>),
    Exists(Vec<Variable>, Box<Formula>),
    ForAll(Vec<Variable>, Box<Formula>),
    Implies(Box<Formula>, Box<Formula>),
    In(Box<Term>, Box<Term>),
    Not(Box<Formula>),
    Or(Vec<Formula>),
    Predicate(Predicate, Vec<Term>),
}

impl Formula {
    /// Conjunction; the empty conjunction is trivially true.
    pub fn and(mut conjuncts: Vec<Formula>) -> Self {
        match conjuncts.len() {
            0 => Self::Boolean(true),
            1 => conjuncts.remove(0),
            _ => Self::And(conjuncts),
        }
    }

    /// Disjunction; the empty disjunction is trivially false.
    pub fn or(mut disjuncts: Vec<Formula>) -> Self {
        match disjuncts.len() {
            0 => Self::Boolean(false),
            1 => disjuncts.remove(0),
            _ => Self::Or(disjuncts),
        }
    }

    pub fn not(formula: Formula) -> Self {
        Self::Not(Box::new(formula))
    }

    pub fn implies(antecedent: Formula, consequent: Formula) -> Self {
        Self::Implies(Box::new(antecedent), Box::new(consequent))
    }

    pub fn biconditional(left: Formula, right: Formula) -> Self {
        Self::Biconditional(Box::new(left), Box::new(right))
    }

    pub fn comparison(op: RelOp, left: Term, right: Term) -> Self {
        Self::Comparison(op, Box::new(left), Box::new(right))
    }

    /// Membership: `element` is one of the values of `set`.
    pub fn member(element: Term, set: Term) -> Self {
        Self::In(Box::new(element), Box::new(set))
    }

    /// Universal closure; a quantifier over no variables is dropped.
    pub fn for_all(variables: Vec<Variable>, formula: Formula) -> Self {
        if variables.is_empty() {
            formula
        } else {
            Self::ForAll(variables, Box::new(formula))
        }
    }

    /// Existential closure; a quantifier over no variables is dropped.
    pub fn exists(variables: Vec<Variable>, formula: Formula) -> Self {
        if variables.is_empty() {
            formula
        } else {
            Self::Exists(variables, Box::new(formula))
        }
    }

    /// Does `variable` occur in a term of this formula? Declarations are
    /// unique, so there is no notion of shadowing to account for.
    pub fn contains(&self, variable: Variable) -> bool {
        use Formula::*;
        match self {
            And(arguments) | Or(arguments) => {
                arguments.iter().any(|f| f.contains(variable))
            }
            Biconditional(left, right) | Implies(left, right) => {
                left.contains(variable) || right.contains(variable)
            }
            Boolean(_) => false,
            Comparison(_, left, right) | In(left, right) => {
                left.contains(variable) || right.contains(variable)
            }
            Exists(_, argument) | ForAll(_, argument) | Not(argument) => {
                argument.contains(variable)
            }
            Predicate(_, arguments) => arguments.iter().any(|t| t.contains(variable)),
        }
    }

    /// Replace every term occurrence of `variable` with `term`.
    /// Declarations are unique, so no quantifier in `self` can capture
    /// the variables of `term`.
    pub fn substitute(self, variable: Variable, term: &Term) -> Formula {
        use Formula::*;
        match self {
            And(arguments) => And(arguments
                .into_iter()
                .map(|f| f.substitute(variable, term))
                .collect()),
            Biconditional(left, right) => Biconditional(
                Box::new(left.substitute(variable, term)),
                Box::new(right.substitute(variable, term)),
            ),
            Boolean(value) => Boolean(value),
            Comparison(op, left, right) => Comparison(
                op,
                Box::new(left.substitute(variable, term)),
                Box::new(right.substitute(variable, term)),
            ),
            Exists(variables, argument) => {
                Exists(variables, Box::new(argument.substitute(variable, term)))
            }
            ForAll(variables, argument) => {
                ForAll(variables, Box::new(argument.substitute(variable, term)))
            }
            Implies(antecedent, consequent) => Implies(
                Box::new(antecedent.substitute(variable, term)),
                Box::new(consequent.substitute(variable, term)),
            ),
            In(element, set) => In(
                Box::new(element.substitute(variable, term)),
                Box::new(set.substitute(variable, term)),
            ),
            Not(argument) => Not(Box::new(argument.substitute(variable, term))),
            Or(arguments) => Or(arguments
                .into_iter()
                .map(|f| f.substitute(variable, term))
                .collect()),
            Predicate(predicate, arguments) => Predicate(
                predicate,
                arguments
                    .into_iter()
                    .map(|t| t.substitute(variable, term))
                    .collect(),
            ),
        }
    }
}

/// A formula together with the free variables it owns. Closing moves
/// the variables under a quantifier and yields a plain [Formula].
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct ScopedFormula {
    pub formula: Formula,
    pub free_variables: Vec<Variable>,
}

impl ScopedFormula {
    pub fn new(formula: Formula, free_variables: Vec<Variable>) -> Self {
        Self {
            formula,
            free_variables,
        }
    }

    /// `forall free_variables formula`.
    pub fn close_universally(self) -> Formula {
        Formula::for_all(self.free_variables, self.formula)
    }

    /// `exists free_variables formula`.
    pub fn close_existentially(self) -> Formula {
        Formula::exists(self.free_variables, self.formula)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::symbols::{VariableKind, Variables};

    #[test]
    fn connective_constructors() {
        assert_eq!(Formula::and(vec![]), Formula::Boolean(true));
        assert_eq!(Formula::or(vec![]), Formula::Boolean(false));
        let f = Formula::Boolean(true);
        assert_eq!(Formula::and(vec![f.clone()]), f);
        assert_eq!(Formula::or(vec![f.clone()]), f);
        assert!(matches!(
            Formula::and(vec![f.clone(), f.clone()]),
            Formula::And(_)
        ));
    }

    #[test]
    fn quantifier_constructors() {
        let mut variables = Variables::new();
        let x = variables.declare(VariableKind::Body);
        let f = Formula::Boolean(false);
        assert_eq!(Formula::for_all(vec![], f.clone()), f);
        assert_eq!(Formula::exists(vec![], f.clone()), f);
        assert!(matches!(
            Formula::exists(vec![x], f.clone()),
            Formula::Exists(..)
        ));
        assert_eq!(
            ScopedFormula::new(f.clone(), vec![]).close_universally(),
            f
        );
        assert!(matches!(
            ScopedFormula::new(f, vec![x]).close_universally(),
            Formula::ForAll(..)
        ));
    }

    #[test]
    fn occurrence() {
        let mut variables = Variables::new();
        let x = variables.declare(VariableKind::Body);
        let y = variables.declare(VariableKind::Body);
        let t = Term::binary_operation(BinOp::Add, Term::Variable(x), Term::Integer(1));
        assert!(t.contains(x));
        assert!(!t.contains(y));
        let f = Formula::member(Term::Variable(y), t);
        assert!(f.contains(x));
        assert!(f.contains(y));
        let g = Formula::exists(vec![y], f);
        assert!(g.contains(x));
    }

    #[test]
    fn substitution() {
        let mut variables = Variables::new();
        let x = variables.declare(VariableKind::Body);
        let f = Formula::comparison(RelOp::Lt, Term::Variable(x), Term::Integer(3));
        let g = f.substitute(x, &Term::Integer(2));
        assert_eq!(
            g,
            Formula::comparison(RelOp::Lt, Term::Integer(2), Term::Integer(3))
        );
    }

    #[test]
    fn single_valued() {
        let mut variables = Variables::new();
        let x = variables.declare(VariableKind::Body);
        assert!(Term::Variable(x).is_single_valued());
        assert!(Term::String("a".to_owned()).is_single_valued());
        assert!(Term::SpecialInteger(SpecialInteger::Supremum).is_single_valued());
        assert!(!Term::interval(Term::Integer(1), Term::Integer(3)).is_single_valued());
        assert!(
            !Term::binary_operation(BinOp::Div, Term::Integer(1), Term::Integer(0))
                .is_single_valued()
        );
    }
}
