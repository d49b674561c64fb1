//! Program terms become target terms.
//!
//! Most of the mapping is one-to-one. The work is variable resolution
//! (every occurrence of a name within a rule must reach the same
//! declaration) and rejecting term forms with no counterpart in the
//! target logic: pools, external functions, and the bitwise operators.

use gavotte_logic as logic;
use gavotte_syntax as syntax;
use gavotte_syntax::TermKind;

use crate::Error;

/// Variable scope of the rule under translation.
///
/// User-written names resolve to one declaration per rule, except `_`,
/// which introduces a fresh declaration at every occurrence. Value
/// variables are anonymous and never resolved by name; their literal
/// closes over them, so they are not free in the rule.
pub(crate) struct Scope<'v> {
    variables: &'v mut logic::Variables,
    names: Vec<(syntax::Symbol, logic::Variable)>,
    free: Vec<logic::Variable>,
}

impl<'v> Scope<'v> {
    pub fn new(variables: &'v mut logic::Variables) -> Self {
        Self {
            variables,
            names: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Resolve a user variable, declaring it on first occurrence.
    pub fn user(&mut self, name: &syntax::Symbol) -> logic::Variable {
        if name.name() == "_" {
            let variable = self.variables.declare(logic::VariableKind::UserDefined);
            self.free.push(variable);
            return variable;
        }
        if let Some(&(_, variable)) = self.names.iter().find(|(n, _)| n == name) {
            return variable;
        }
        let variable = self.variables.declare_named(name.name());
        self.names.push((name.clone(), variable));
        self.free.push(variable);
        variable
    }

    /// A fresh value variable for one argument position.
    pub fn value(&mut self) -> logic::Variable {
        self.variables.declare(logic::VariableKind::Body)
    }

    /// The rule's free variables, in order of first occurrence.
    pub fn free(self) -> Vec<logic::Variable> {
        self.free
    }
}

/// Translate one program term. Symbolic constants and functions are
/// interned as function symbols ranging over the program domain.
pub(crate) fn translate(
    term: &syntax::Term,
    scope: &mut Scope,
    symbols: &mut logic::SymbolTable,
) -> Result<logic::Term, Error> {
    Ok(match &term.kind {
        TermKind::Integer(value) => logic::Term::Integer(*value),
        TermKind::String(value) => logic::Term::String(value.clone()),
        TermKind::Infimum => logic::Term::SpecialInteger(logic::SpecialInteger::Infimum),
        TermKind::Supremum => logic::Term::SpecialInteger(logic::SpecialInteger::Supremum),
        TermKind::Constant(name) => logic::Term::Constant(symbols.function(name.name(), 0)),
        TermKind::Variable(name) => logic::Term::Variable(scope.user(name)),
        TermKind::Function(name, arguments) => {
            let function = symbols.function(name.name(), arguments.len());
            let arguments = arguments
                .iter()
                .map(|argument| translate(argument, scope, symbols))
                .collect::<Result<_, _>>()?;
            logic::Term::Function(function, arguments)
        }
        TermKind::ExternalFunction(..) => {
            return Err(Error::unsupported("an external function", term.location))
        }
        TermKind::UnaryOperation(op, argument) => logic::Term::unary_operation(
            unary(*op, term.location)?,
            translate(argument, scope, symbols)?,
        ),
        TermKind::BinaryOperation(left, op, right) => logic::Term::binary_operation(
            binary(*op, term.location)?,
            translate(left, scope, symbols)?,
            translate(right, scope, symbols)?,
        ),
        TermKind::Interval(from, to) => logic::Term::interval(
            translate(from, scope, symbols)?,
            translate(to, scope, symbols)?,
        ),
        TermKind::Pool(_) => return Err(Error::unsupported("a pool", term.location)),
    })
}

fn unary(op: syntax::UnaryOp, location: syntax::Location) -> Result<logic::UnaryOp, Error> {
    match op {
        syntax::UnaryOp::Abs => Ok(logic::UnaryOp::Abs),
        syntax::UnaryOp::Neg => Ok(logic::UnaryOp::Neg),
        syntax::UnaryOp::Not => Err(Error::unsupported("bitwise negation", location)),
    }
}

fn binary(op: syntax::BinOp, location: syntax::Location) -> Result<logic::BinOp, Error> {
    match op {
        syntax::BinOp::Add => Ok(logic::BinOp::Add),
        syntax::BinOp::Sub => Ok(logic::BinOp::Sub),
        syntax::BinOp::Mul => Ok(logic::BinOp::Mul),
        syntax::BinOp::Div => Ok(logic::BinOp::Div),
        syntax::BinOp::Rem => Ok(logic::BinOp::Rem),
        syntax::BinOp::Exp => Ok(logic::BinOp::Exp),
        syntax::BinOp::And => Err(Error::unsupported("bitwise conjunction", location)),
        syntax::BinOp::Or => Err(Error::unsupported("bitwise disjunction", location)),
        syntax::BinOp::Xor => Err(Error::unsupported("bitwise exclusive or", location)),
    }
}
