//! Printers for formulas and type annotations.
//!
//! Handles mean nothing without their arenas, so both output forms are
//! built over a [Formatter] that borrows the declarations along with
//! the print policy. Variables are renamed per printed formula, by
//! declaration kind in first-occurrence order: head parameters become
//! `V1 V2 ...`, chosen-value variables `X1 X2 ...`, and user variables
//! `U1 U2 ...`.
//!
//! The human-readable form can render every formula and so is exposed
//! as a [fmt::Display] adapter. The TPTP form is typed and partial:
//! unknown domains and constructs without a TPTP rendering are errors,
//! so it is exposed as a fallible conversion to [String].

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::formula::{BinOp, Formula, RelOp, Term, UnaryOp};
use crate::symbols::{Domain, SymbolTable, TypeAnnotation, Variable, VariableKind, Variables};

/// How densely the human-readable form parenthesizes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Parentheses {
    /// Only where precedence leaves room for doubt.
    #[default]
    Normal,
    /// Around every compound subterm and subformula.
    Full,
}

/// A construct that cannot be rendered in the requested output form.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum FormatError {
    #[error("unknown domain in typed output")]
    UnknownDomain,
    #[error("{0} has no typed rendering")]
    Unrepresentable(&'static str),
}

/// Rendering context: the declaration arenas plus the output policy.
#[derive(Clone, Copy, Debug)]
pub struct Formatter<'a> {
    variables: &'a Variables,
    symbols: &'a SymbolTable,
    parentheses: Parentheses,
    default_domain: Option<Domain>,
}

impl<'a> Formatter<'a> {
    pub fn new(variables: &'a Variables, symbols: &'a SymbolTable) -> Self {
        Self {
            variables,
            symbols,
            parentheses: Parentheses::default(),
            default_domain: None,
        }
    }

    pub fn parentheses(mut self, parentheses: Parentheses) -> Self {
        self.parentheses = parentheses;
        self
    }

    /// Fallback for declarations whose domain inference left `Unknown`.
    pub fn default_domain(mut self, default_domain: Option<Domain>) -> Self {
        self.default_domain = default_domain;
        self
    }

    /// Human-readable view of `formula`.
    pub fn human(&self, formula: &'a Formula) -> HumanFormula<'a> {
        HumanFormula {
            formatter: *self,
            formula,
            names: RefCell::new(Names::default()),
        }
    }

    /// One `int(name/arity@position)` line per integer-typed argument,
    /// possibly none.
    pub fn human_annotation(&self, annotation: &TypeAnnotation) -> String {
        let mut out = String::new();
        for (position, &domain) in annotation.parameters.iter().enumerate() {
            if self.effective(domain) != Domain::Integer {
                continue;
            }
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!(
                "int({}/{}@{})",
                annotation.name,
                annotation.arity,
                position + 1
            ));
        }
        out
    }

    /// `formula` as a numbered TPTP axiom.
    pub fn tptp_axiom(&self, formula: &Formula, index: usize) -> Result<String, FormatError> {
        let mut names = Names::default();
        let mut out = String::new();
        out.push_str(&format!("tff(axiom{}, axiom, ", index + 1));
        self.tptp_formula(&mut out, formula, &mut names)?;
        out.push_str(").");
        Ok(out)
    }

    /// `annotation` as a numbered TPTP type declaration.
    pub fn tptp_annotation(
        &self,
        annotation: &TypeAnnotation,
        index: usize,
    ) -> Result<String, FormatError> {
        let mut out = String::new();
        out.push_str(&format!(
            "tff(type{}, type, ({}: ",
            index + 1,
            annotation.name
        ));
        if annotation.parameters.is_empty() {
            out.push_str("$o");
        } else {
            out.push('(');
            for (i, &domain) in annotation.parameters.iter().enumerate() {
                if i > 0 {
                    out.push_str(" * ");
                }
                out.push_str(self.sort(domain)?);
            }
            out.push_str(") > $o");
        }
        out.push_str(")).");
        Ok(out)
    }

    fn effective(&self, domain: Domain) -> Domain {
        match domain {
            Domain::Unknown => self.default_domain.unwrap_or(Domain::Unknown),
            domain => domain,
        }
    }

    fn sort(&self, domain: Domain) -> Result<&'static str, FormatError> {
        match self.effective(domain) {
            Domain::Program => Ok("$i"),
            Domain::Integer => Ok("$int"),
            Domain::Unknown => Err(FormatError::UnknownDomain),
        }
    }

    fn write_formula(
        &self,
        f: &mut fmt::Formatter<'_>,
        formula: &Formula,
        names: &mut Names,
    ) -> fmt::Result {
        use Formula::*;
        match formula {
            And(arguments) => self.write_connective(f, arguments, " and ", 2, names),
            Or(arguments) => self.write_connective(f, arguments, " or ", 3, names),
            Not(argument) => {
                f.write_str("not ")?;
                self.write_child(f, argument, 1, names)
            }
            Implies(antecedent, consequent) => {
                self.write_child(f, antecedent, 3, names)?;
                f.write_str(" -> ")?;
                self.write_child(f, consequent, 3, names)
            }
            Biconditional(left, right) => {
                self.write_child(f, left, 3, names)?;
                f.write_str(" <-> ")?;
                self.write_child(f, right, 3, names)
            }
            ForAll(variables, argument) => {
                self.write_quantifier(f, "forall", variables, argument, names)
            }
            Exists(variables, argument) => {
                self.write_quantifier(f, "exists", variables, argument, names)
            }
            Comparison(op, left, right) => {
                self.write_term(f, left, 5, names)?;
                write!(f, " {} ", op)?;
                self.write_term(f, right, 5, names)
            }
            In(element, set) => {
                self.write_term(f, element, 5, names)?;
                f.write_str(" in ")?;
                self.write_term(f, set, 5, names)
            }
            Boolean(true) => f.write_str("#true"),
            Boolean(false) => f.write_str("#false"),
            Predicate(predicate, arguments) => {
                f.write_str(&self.symbols[*predicate].name)?;
                if !arguments.is_empty() {
                    f.write_str("(")?;
                    for (i, argument) in arguments.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        self.write_term(f, argument, 5, names)?;
                    }
                    f.write_str(")")?;
                }
                Ok(())
            }
        }
    }

    fn write_child(
        &self,
        f: &mut fmt::Formatter<'_>,
        formula: &Formula,
        max: u8,
        names: &mut Names,
    ) -> fmt::Result {
        let precedence = formula_precedence(formula);
        let parenthesize = match self.parentheses {
            Parentheses::Normal => precedence > max,
            Parentheses::Full => precedence > 0,
        };
        if parenthesize {
            f.write_str("(")?;
            self.write_formula(f, formula, names)?;
            f.write_str(")")
        } else {
            self.write_formula(f, formula, names)
        }
    }

    fn write_connective(
        &self,
        f: &mut fmt::Formatter<'_>,
        arguments: &[Formula],
        separator: &str,
        precedence: u8,
        names: &mut Names,
    ) -> fmt::Result {
        for (i, argument) in arguments.iter().enumerate() {
            if i > 0 {
                f.write_str(separator)?;
            }
            self.write_child(f, argument, precedence, names)?;
        }
        Ok(())
    }

    fn write_quantifier(
        &self,
        f: &mut fmt::Formatter<'_>,
        keyword: &str,
        variables: &[Variable],
        argument: &Formula,
        names: &mut Names,
    ) -> fmt::Result {
        f.write_str(keyword)?;
        f.write_str(" ")?;
        for (i, &variable) in variables.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&names.name(variable, self.variables))?;
        }
        f.write_str(" ")?;
        self.write_child(f, argument, 1, names)
    }

    fn write_term(
        &self,
        f: &mut fmt::Formatter<'_>,
        term: &Term,
        max: u8,
        names: &mut Names,
    ) -> fmt::Result {
        let precedence = term_precedence(term);
        let parenthesize = match self.parentheses {
            Parentheses::Normal => precedence > max,
            Parentheses::Full => precedence > 0,
        };
        if parenthesize {
            f.write_str("(")?;
        }
        use Term::*;
        match term {
            BinaryOperation(op, left, right) => {
                let (left_max, right_max) = if *op == BinOp::Exp {
                    (precedence - 1, precedence)
                } else {
                    (precedence, precedence - 1)
                };
                self.write_term(f, left, left_max, names)?;
                write!(f, " {} ", op)?;
                self.write_term(f, right, right_max, names)?;
            }
            Constant(function) => f.write_str(&self.symbols[*function].name)?,
            Function(function, arguments) => {
                f.write_str(&self.symbols[*function].name)?;
                f.write_str("(")?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    self.write_term(f, argument, 5, names)?;
                }
                f.write_str(")")?;
            }
            Integer(value) => write!(f, "{}", value)?,
            Interval(from, to) => {
                self.write_term(f, from, 4, names)?;
                f.write_str("..")?;
                self.write_term(f, to, 4, names)?;
            }
            SpecialInteger(special) => write!(f, "{}", special)?,
            String(string) => write!(f, "{:?}", string)?,
            UnaryOperation(UnaryOp::Abs, argument) => {
                f.write_str("|")?;
                self.write_term(f, argument, 5, names)?;
                f.write_str("|")?;
            }
            UnaryOperation(UnaryOp::Neg, argument) => {
                f.write_str("-")?;
                self.write_term(f, argument, 1, names)?;
            }
            Variable(variable) => f.write_str(&names.name(*variable, self.variables))?,
        }
        if parenthesize {
            f.write_str(")")?;
        }
        Ok(())
    }

    fn tptp_formula(
        &self,
        out: &mut String,
        formula: &Formula,
        names: &mut Names,
    ) -> Result<(), FormatError> {
        use Formula::*;
        match formula {
            And(arguments) => self.tptp_connective(out, arguments, " & ", names),
            Or(arguments) => self.tptp_connective(out, arguments, " | ", names),
            Not(argument) => {
                out.push('~');
                self.tptp_child(out, argument, names)
            }
            Implies(antecedent, consequent) => {
                self.tptp_child(out, antecedent, names)?;
                out.push_str(" => ");
                self.tptp_child(out, consequent, names)
            }
            Biconditional(left, right) => {
                self.tptp_child(out, left, names)?;
                out.push_str(" <=> ");
                self.tptp_child(out, right, names)
            }
            ForAll(variables, argument) => {
                out.push('!');
                self.tptp_binder(out, variables, names)?;
                out.push_str(": ");
                self.tptp_child(out, argument, names)
            }
            Exists(variables, argument) => {
                out.push('?');
                self.tptp_binder(out, variables, names)?;
                out.push_str(": ");
                self.tptp_child(out, argument, names)
            }
            Comparison(op, left, right) => match op {
                RelOp::Eq | RelOp::Ne => {
                    self.tptp_term(out, left, names)?;
                    out.push_str(if *op == RelOp::Eq { " = " } else { " != " });
                    self.tptp_term(out, right, names)
                }
                RelOp::Lt | RelOp::Gt | RelOp::Leq | RelOp::Geq => {
                    out.push_str(match op {
                        RelOp::Lt => "$less",
                        RelOp::Gt => "$greater",
                        RelOp::Leq => "$lesseq",
                        _ => "$greatereq",
                    });
                    out.push('(');
                    self.tptp_term(out, left, names)?;
                    out.push_str(", ");
                    self.tptp_term(out, right, names)?;
                    out.push(')');
                    Ok(())
                }
            },
            // Membership of a value in an interval is a pair of bounds;
            // any other set denotes at most one value and compares equal.
            In(element, set) => match &**set {
                Term::Interval(from, to) => {
                    out.push_str("$lesseq(");
                    self.tptp_term(out, from, names)?;
                    out.push_str(", ");
                    self.tptp_term(out, element, names)?;
                    out.push_str(") & $lesseq(");
                    self.tptp_term(out, element, names)?;
                    out.push_str(", ");
                    self.tptp_term(out, to, names)?;
                    out.push(')');
                    Ok(())
                }
                _ => {
                    self.tptp_term(out, element, names)?;
                    out.push_str(" = ");
                    self.tptp_term(out, set, names)
                }
            },
            Boolean(true) => {
                out.push_str("$true");
                Ok(())
            }
            Boolean(false) => {
                out.push_str("$false");
                Ok(())
            }
            Predicate(predicate, arguments) => {
                out.push_str(&self.symbols[*predicate].name);
                if !arguments.is_empty() {
                    out.push('(');
                    for (i, argument) in arguments.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        self.tptp_term(out, argument, names)?;
                    }
                    out.push(')');
                }
                Ok(())
            }
        }
    }

    fn tptp_child(
        &self,
        out: &mut String,
        formula: &Formula,
        names: &mut Names,
    ) -> Result<(), FormatError> {
        use Formula::*;
        let atomic = match formula {
            Boolean(_) | Comparison(..) | Predicate(..) => true,
            In(_, set) => !matches!(**set, Term::Interval(..)),
            _ => false,
        };
        if atomic {
            self.tptp_formula(out, formula, names)
        } else {
            out.push('(');
            self.tptp_formula(out, formula, names)?;
            out.push(')');
            Ok(())
        }
    }

    fn tptp_connective(
        &self,
        out: &mut String,
        arguments: &[Formula],
        separator: &str,
        names: &mut Names,
    ) -> Result<(), FormatError> {
        for (i, argument) in arguments.iter().enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            self.tptp_child(out, argument, names)?;
        }
        Ok(())
    }

    fn tptp_binder(
        &self,
        out: &mut String,
        variables: &[Variable],
        names: &mut Names,
    ) -> Result<(), FormatError> {
        out.push('[');
        for (i, &variable) in variables.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&names.name(variable, self.variables));
            out.push_str(": ");
            out.push_str(self.sort(self.variables[variable].domain)?);
        }
        out.push(']');
        Ok(())
    }

    fn tptp_term(
        &self,
        out: &mut String,
        term: &Term,
        names: &mut Names,
    ) -> Result<(), FormatError> {
        use Term::*;
        match term {
            BinaryOperation(op, left, right) => {
                out.push_str(match op {
                    BinOp::Add => "$sum",
                    BinOp::Sub => "$difference",
                    BinOp::Mul => "$product",
                    BinOp::Div => "$quotient_e",
                    BinOp::Rem => "$remainder_e",
                    BinOp::Exp => return Err(FormatError::Unrepresentable("exponentiation")),
                });
                out.push('(');
                self.tptp_term(out, left, names)?;
                out.push_str(", ");
                self.tptp_term(out, right, names)?;
                out.push(')');
                Ok(())
            }
            Constant(function) => {
                out.push_str(&self.symbols[*function].name);
                Ok(())
            }
            Function(function, arguments) => {
                out.push_str(&self.symbols[*function].name);
                out.push('(');
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.tptp_term(out, argument, names)?;
                }
                out.push(')');
                Ok(())
            }
            Integer(value) => {
                out.push_str(&value.to_string());
                Ok(())
            }
            Interval(..) => Err(FormatError::Unrepresentable("interval term")),
            SpecialInteger(crate::formula::SpecialInteger::Infimum) => {
                out.push_str("c__infimum__");
                Ok(())
            }
            SpecialInteger(crate::formula::SpecialInteger::Supremum) => {
                out.push_str("c__supremum__");
                Ok(())
            }
            String(string) => {
                out.push_str(&format!("{:?}", string));
                Ok(())
            }
            UnaryOperation(UnaryOp::Neg, argument) => {
                out.push_str("$uminus(");
                self.tptp_term(out, argument, names)?;
                out.push(')');
                Ok(())
            }
            UnaryOperation(UnaryOp::Abs, _) => {
                Err(FormatError::Unrepresentable("absolute value"))
            }
            Variable(variable) => {
                out.push_str(&names.name(*variable, self.variables));
                Ok(())
            }
        }
    }
}

/// Human-readable [fmt::Display] view of a formula.
pub struct HumanFormula<'a> {
    formatter: Formatter<'a>,
    formula: &'a Formula,
    names: RefCell<Names>,
}

impl fmt::Display for HumanFormula<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.formatter
            .write_formula(f, self.formula, &mut self.names.borrow_mut())
    }
}

/// Display names assigned at first occurrence, counted per kind.
#[derive(Debug, Default)]
struct Names {
    assigned: BTreeMap<Variable, String>,
    counters: [usize; 3],
}

impl Names {
    fn name(&mut self, variable: Variable, variables: &Variables) -> String {
        if let Some(name) = self.assigned.get(&variable) {
            return name.clone();
        }
        let (prefix, index) = match variables[variable].kind {
            VariableKind::Head => ("V", 0),
            VariableKind::Body => ("X", 1),
            VariableKind::UserDefined => ("U", 2),
        };
        self.counters[index] += 1;
        let name = format!("{}{}", prefix, self.counters[index]);
        self.assigned.insert(variable, name.clone());
        name
    }
}

fn formula_precedence(formula: &Formula) -> u8 {
    use Formula::*;
    match formula {
        Boolean(_) | Comparison(..) | In(..) | Predicate(..) => 0,
        Exists(..) | ForAll(..) | Not(..) => 1,
        And(_) => 2,
        Or(_) => 3,
        Biconditional(..) | Implies(..) => 4,
    }
}

fn term_precedence(term: &Term) -> u8 {
    use Term::*;
    match term {
        Constant(_) | Function(..) | Integer(_) | SpecialInteger(_) | String(_)
        | Variable(_) => 0,
        UnaryOperation(UnaryOp::Abs, _) => 0,
        BinaryOperation(BinOp::Exp, ..) => 1,
        UnaryOperation(UnaryOp::Neg, _) => 2,
        BinaryOperation(BinOp::Div | BinOp::Mul | BinOp::Rem, ..) => 3,
        BinaryOperation(BinOp::Add | BinOp::Sub, ..) => 4,
        Interval(..) => 5,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn human(
        variables: &Variables,
        symbols: &SymbolTable,
        parentheses: Parentheses,
        formula: &Formula,
    ) -> String {
        Formatter::new(variables, symbols)
            .parentheses(parentheses)
            .human(formula)
            .to_string()
    }

    #[test]
    fn connectives() {
        let mut symbols = SymbolTable::new();
        let variables = Variables::new();
        let p = Formula::Predicate(symbols.predicate("p", 0), vec![]);
        let q = Formula::Predicate(symbols.predicate("q", 0), vec![]);
        let r = Formula::Predicate(symbols.predicate("r", 0), vec![]);

        let f = Formula::And(vec![p.clone(), Formula::Or(vec![q.clone(), r.clone()])]);
        assert_eq!(
            human(&variables, &symbols, Parentheses::Normal, &f),
            "p and (q or r)"
        );

        let g = Formula::Or(vec![Formula::And(vec![p.clone(), q.clone()]), r.clone()]);
        assert_eq!(
            human(&variables, &symbols, Parentheses::Normal, &g),
            "p and q or r"
        );
        assert_eq!(
            human(&variables, &symbols, Parentheses::Full, &g),
            "(p and q) or r"
        );

        let h = Formula::not(Formula::And(vec![p, q]));
        assert_eq!(
            human(&variables, &symbols, Parentheses::Normal, &h),
            "not (p and q)"
        );
    }

    #[test]
    fn quantified_definition() {
        let mut symbols = SymbolTable::new();
        let mut variables = Variables::new();
        let p = symbols.predicate("p", 1);
        let q = symbols.predicate("q", 1);
        let v = variables.declare(VariableKind::Head);
        let u = variables.declare_named("N");

        let f = Formula::ForAll(
            vec![v],
            Box::new(Formula::biconditional(
                Formula::Predicate(p, vec![Term::Variable(v)]),
                Formula::Exists(
                    vec![u],
                    Box::new(Formula::And(vec![
                        Formula::Predicate(q, vec![Term::Variable(u)]),
                        Formula::member(
                            Term::Variable(v),
                            Term::binary_operation(
                                BinOp::Add,
                                Term::Variable(u),
                                Term::Integer(1),
                            ),
                        ),
                    ])),
                ),
            )),
        );
        assert_eq!(
            human(&variables, &symbols, Parentheses::Normal, &f),
            "forall V1 (p(V1) <-> exists U1 (q(U1) and V1 in U1 + 1))"
        );
    }

    #[test]
    fn negated_atom_under_quantifier() {
        let mut symbols = SymbolTable::new();
        let mut variables = Variables::new();
        let p = symbols.predicate("p", 1);
        let v = variables.declare(VariableKind::Head);

        let f = Formula::ForAll(
            vec![v],
            Box::new(Formula::not(Formula::Predicate(
                p,
                vec![Term::Variable(v)],
            ))),
        );
        assert_eq!(
            human(&variables, &symbols, Parentheses::Normal, &f),
            "forall V1 not p(V1)"
        );
    }

    #[test]
    fn terms() {
        let symbols = SymbolTable::new();
        let mut variables = Variables::new();
        let x = variables.declare(VariableKind::Body);

        let t = Term::binary_operation(
            BinOp::Mul,
            Term::binary_operation(BinOp::Add, Term::Integer(1), Term::Integer(2)),
            Term::Integer(3),
        );
        let f = Formula::member(Term::Variable(x), t);
        assert_eq!(
            human(&variables, &symbols, Parentheses::Normal, &f),
            "X1 in (1 + 2) * 3"
        );

        let exp = Term::binary_operation(
            BinOp::Exp,
            Term::Integer(2),
            Term::binary_operation(BinOp::Exp, Term::Integer(3), Term::Integer(2)),
        );
        let g = Formula::member(Term::Variable(x), exp);
        assert_eq!(
            human(&variables, &symbols, Parentheses::Normal, &g),
            "X1 in 2 ** 3 ** 2"
        );

        let interval = Term::interval(
            Term::Integer(1),
            Term::binary_operation(BinOp::Add, Term::Variable(x), Term::Integer(1)),
        );
        let h = Formula::member(Term::Variable(x), interval);
        assert_eq!(
            human(&variables, &symbols, Parentheses::Normal, &h),
            "X1 in 1..X1 + 1"
        );

        let negated = Term::unary_operation(
            UnaryOp::Neg,
            Term::binary_operation(BinOp::Add, Term::Variable(x), Term::Integer(1)),
        );
        let i = Formula::member(Term::Variable(x), negated);
        assert_eq!(
            human(&variables, &symbols, Parentheses::Normal, &i),
            "X1 in -(X1 + 1)"
        );
    }

    #[test]
    fn tptp_axioms() {
        let mut symbols = SymbolTable::new();
        let mut variables = Variables::new();
        let p = symbols.predicate("p", 1);
        let v = variables.declare(VariableKind::Head);
        variables[v].domain = Domain::Integer;

        let f = Formula::ForAll(
            vec![v],
            Box::new(Formula::implies(
                Formula::Predicate(p, vec![Term::Variable(v)]),
                Formula::comparison(RelOp::Lt, Term::Variable(v), Term::Integer(2)),
            )),
        );
        let formatter = Formatter::new(&variables, &symbols);
        assert_eq!(
            formatter.tptp_axiom(&f, 0).unwrap(),
            "tff(axiom1, axiom, ![V1: $int]: (p(V1) => $less(V1, 2)))."
        );
    }

    #[test]
    fn tptp_membership() {
        let mut symbols = SymbolTable::new();
        let mut variables = Variables::new();
        let p = symbols.predicate("p", 1);
        let v = variables.declare(VariableKind::Head);
        let u = variables.declare_named("N");
        variables[v].domain = Domain::Integer;
        variables[u].domain = Domain::Integer;

        let f = Formula::ForAll(
            vec![v],
            Box::new(Formula::biconditional(
                Formula::Predicate(p, vec![Term::Variable(v)]),
                Formula::Exists(
                    vec![u],
                    Box::new(Formula::member(
                        Term::Variable(v),
                        Term::interval(Term::Integer(1), Term::Variable(u)),
                    )),
                ),
            )),
        );
        let formatter = Formatter::new(&variables, &symbols);
        assert_eq!(
            formatter.tptp_axiom(&f, 2).unwrap(),
            "tff(axiom3, axiom, ![V1: $int]: (p(V1) <=> \
             (?[U1: $int]: ($lesseq(1, V1) & $lesseq(V1, U1)))))."
        );
    }

    #[test]
    fn tptp_errors() {
        let symbols = SymbolTable::new();
        let mut variables = Variables::new();
        let x = variables.declare(VariableKind::Body);
        variables[x].domain = Domain::Integer;

        let formatter = Formatter::new(&variables, &symbols);
        let exp = Formula::comparison(
            RelOp::Eq,
            Term::Variable(x),
            Term::binary_operation(BinOp::Exp, Term::Integer(2), Term::Integer(3)),
        );
        assert_eq!(
            formatter.tptp_axiom(&exp, 0),
            Err(FormatError::Unrepresentable("exponentiation"))
        );

        let mut unknown_variables = Variables::new();
        let y = unknown_variables.declare(VariableKind::Body);
        let f = Formula::Exists(vec![y], Box::new(Formula::Boolean(true)));
        let untyped = Formatter::new(&unknown_variables, &symbols);
        assert_eq!(untyped.tptp_axiom(&f, 0), Err(FormatError::UnknownDomain));
        let defaulted = untyped.default_domain(Some(Domain::Program));
        assert_eq!(
            defaulted.tptp_axiom(&f, 0).unwrap(),
            "tff(axiom1, axiom, ?[X1: $i]: $true)."
        );
    }

    #[test]
    fn annotations() {
        let variables = Variables::new();
        let symbols = SymbolTable::new();
        let formatter = Formatter::new(&variables, &symbols);

        let annotation = TypeAnnotation {
            name: "p".to_owned(),
            arity: 2,
            parameters: vec![Domain::Integer, Domain::Program],
        };
        assert_eq!(formatter.human_annotation(&annotation), "int(p/2@1)");
        assert_eq!(
            formatter.tptp_annotation(&annotation, 0).unwrap(),
            "tff(type1, type, (p: ($int * $i) > $o))."
        );

        let propositional = TypeAnnotation {
            name: "q".to_owned(),
            arity: 0,
            parameters: vec![],
        };
        assert_eq!(formatter.human_annotation(&propositional), "");
        assert_eq!(
            formatter.tptp_annotation(&propositional, 1).unwrap(),
            "tff(type2, type, (q: $o))."
        );

        let untyped = TypeAnnotation {
            name: "r".to_owned(),
            arity: 1,
            parameters: vec![Domain::Unknown],
        };
        assert_eq!(formatter.human_annotation(&untyped), "");
        assert_eq!(
            formatter.tptp_annotation(&untyped, 2),
            Err(FormatError::UnknownDomain)
        );
        assert_eq!(
            formatter
                .default_domain(Some(Domain::Integer))
                .human_annotation(&untyped),
            "int(r/1@1)"
        );
    }
}
