//! Declarations shared by the formulas of a translation run: variables,
//! predicates, and symbolic functions, interned in arenas and addressed
//! by `Copy` handles.
//!
//! Handles are plain indices, so two variable declarations spelled the
//! same way are still distinct; identity is the handle, never the name.
//! Predicates and functions are additionally indexed by (name, arity),
//! so every occurrence of `p/2` in a program resolves to one declaration
//! that accumulates flags (`is_used`, `is_external`, visibility) and
//! inferred argument domains as the program is scanned.

use std::collections::BTreeMap;
use std::fmt;
use std::ops;

/// The sort a variable or argument position ranges over. `Program` is
/// the sort of all values a grounder can produce (symbolic constants,
/// compound terms, strings, integers); `Integer` is its arithmetic
/// subsort. `Unknown` means inference has found no evidence yet.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd)]
pub enum Domain {
    Program,
    Integer,
    #[default]
    Unknown,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Program => "program",
            Self::Integer => "integer",
            Self::Unknown => "unknown",
        })
    }
}

/// Whether a predicate appears in typed output, as adjusted by `#show`.
/// A bare `#show.` flips the default for every predicate not named in
/// some other `#show` directive.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd)]
pub enum Visibility {
    #[default]
    Default,
    Visible,
    Hidden,
}

/// Handle to a [VariableData] in a [Variables] arena.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Variable(u32);

/// Handle to a [PredicateData] in a [SymbolTable].
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Predicate(u32);

/// Handle to a [FunctionData] in a [SymbolTable].
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Function(u32);

/// How a variable came to be declared: `Head` parameters stand for the
/// arguments of a completed predicate, `Body` variables are the fresh
/// values chosen for literal arguments, and `UserDefined` variables
/// were written in the source program.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum VariableKind {
    Head,
    Body,
    UserDefined,
}

/// One variable declaration. The name is kept only for `UserDefined`
/// variables and only so that rule translation can resolve later uses
/// against the scope stack; the printers rename every variable.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct VariableData {
    pub kind: VariableKind,
    pub name: Option<String>,
    pub domain: Domain,
}

/// Arena of variable declarations for one translation run.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Variables(Vec<VariableData>);

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a fresh unnamed variable.
    pub fn declare(&mut self, kind: VariableKind) -> Variable {
        self.push(VariableData {
            kind,
            name: None,
            domain: Domain::Unknown,
        })
    }

    /// Declare a fresh user variable carrying its source name.
    pub fn declare_named(&mut self, name: &str) -> Variable {
        self.push(VariableData {
            kind: VariableKind::UserDefined,
            name: Some(name.to_owned()),
            domain: Domain::Unknown,
        })
    }

    fn push(&mut self, data: VariableData) -> Variable {
        let handle = Variable(self.0.len() as u32);
        self.0.push(data);
        handle
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl ops::Index<Variable> for Variables {
    type Output = VariableData;

    fn index(&self, variable: Variable) -> &VariableData {
        &self.0[variable.0 as usize]
    }
}

impl ops::IndexMut<Variable> for Variables {
    fn index_mut(&mut self, variable: Variable) -> &mut VariableData {
        &mut self.0[variable.0 as usize]
    }
}

/// One predicate declaration, accumulated while scanning a program.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PredicateData {
    pub name: String,
    pub arity: usize,
    /// The predicate occurs in some rule, as opposed to existing only
    /// because a directive named it.
    pub is_used: bool,
    /// Set by `#external`: the predicate is open and is never completed.
    pub is_external: bool,
    pub visibility: Visibility,
    /// Inferred domain of each argument position.
    pub parameters: Vec<Domain>,
}

impl PredicateData {
    fn new(name: &str, arity: usize) -> Self {
        Self {
            name: name.to_owned(),
            arity,
            is_used: false,
            is_external: false,
            visibility: Visibility::Default,
            parameters: vec![Domain::Unknown; arity],
        }
    }
}

/// One symbolic function (or constant) declaration. The result domain
/// is pinned to `Program` on creation: a symbolic function never
/// denotes an integer, whatever its arguments.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FunctionData {
    pub name: String,
    pub arity: usize,
    pub domain: Domain,
}

/// The typed signature of one predicate, as handed to the printers.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypeAnnotation {
    pub name: String,
    pub arity: usize,
    pub parameters: Vec<Domain>,
}

/// Interning table for predicate and function declarations, indexed by
/// (name, arity). Iteration is always sorted by (name, arity), which
/// keeps completion output reproducible across runs.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SymbolTable {
    predicates: Vec<PredicateData>,
    predicate_index: BTreeMap<(String, usize), Predicate>,
    functions: Vec<FunctionData>,
    function_index: BTreeMap<(String, usize), Function>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find or create the declaration of predicate `name/arity`.
    pub fn predicate(&mut self, name: &str, arity: usize) -> Predicate {
        if let Some(&handle) = self.predicate_index.get(&(name.to_owned(), arity)) {
            return handle;
        }
        let handle = Predicate(self.predicates.len() as u32);
        self.predicates.push(PredicateData::new(name, arity));
        self.predicate_index.insert((name.to_owned(), arity), handle);
        handle
    }

    /// Find or create the declaration of function `name/arity`.
    pub fn function(&mut self, name: &str, arity: usize) -> Function {
        if let Some(&handle) = self.function_index.get(&(name.to_owned(), arity)) {
            return handle;
        }
        let handle = Function(self.functions.len() as u32);
        self.functions.push(FunctionData {
            name: name.to_owned(),
            arity,
            domain: Domain::Program,
        });
        self.function_index.insert((name.to_owned(), arity), handle);
        handle
    }

    /// All declared predicates, sorted by (name, arity).
    pub fn predicates(&self) -> impl Iterator<Item = Predicate> + '_ {
        self.predicate_index.values().copied()
    }

    /// The typed signature of `predicate`.
    pub fn annotation(&self, predicate: Predicate) -> TypeAnnotation {
        let data = &self[predicate];
        TypeAnnotation {
            name: data.name.clone(),
            arity: data.arity,
            parameters: data.parameters.clone(),
        }
    }
}

impl ops::Index<Predicate> for SymbolTable {
    type Output = PredicateData;

    fn index(&self, predicate: Predicate) -> &PredicateData {
        &self.predicates[predicate.0 as usize]
    }
}

impl ops::IndexMut<Predicate> for SymbolTable {
    fn index_mut(&mut self, predicate: Predicate) -> &mut PredicateData {
        &mut self.predicates[predicate.0 as usize]
    }
}

impl ops::Index<Function> for SymbolTable {
    type Output = FunctionData;

    fn index(&self, function: Function) -> &FunctionData {
        &self.functions[function.0 as usize]
    }
}

impl ops::IndexMut<Function> for SymbolTable {
    fn index_mut(&mut self, function: Function) -> &mut FunctionData {
        &mut self.functions[function.0 as usize]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn interning() {
        let mut table = SymbolTable::new();
        let p1 = table.predicate("p", 1);
        let p0 = table.predicate("p", 0);
        assert_eq!(table.predicate("p", 1), p1);
        assert_ne!(p0, p1);
        assert_eq!(table[p1].arity, 1);
        assert_eq!(table[p0].name, "p");
        assert_eq!(table[p1].parameters, [Domain::Unknown]);
    }

    #[test]
    fn sorted() {
        let mut table = SymbolTable::new();
        table.predicate("q", 2);
        table.predicate("p", 1);
        table.predicate("p", 0);
        let order = table
            .predicates()
            .map(|p| (table[p].name.clone(), table[p].arity))
            .collect::<Vec<_>>();
        assert_eq!(
            order,
            [
                ("p".to_owned(), 0),
                ("p".to_owned(), 1),
                ("q".to_owned(), 2)
            ]
        );
    }

    #[test]
    fn variables() {
        let mut variables = Variables::new();
        let x = variables.declare(VariableKind::Body);
        let y = variables.declare_named("Y");
        assert_ne!(x, y);
        assert_eq!(variables[x].domain, Domain::Unknown);
        assert_eq!(variables[x].name, None);
        assert_eq!(variables[y].name.as_deref(), Some("Y"));
        variables[x].domain = Domain::Integer;
        assert_eq!(variables[x].domain, Domain::Integer);
        assert_eq!(variables.len(), 2);
    }

    #[test]
    fn functions_are_symbolic() {
        let mut table = SymbolTable::new();
        let f = table.function("f", 1);
        assert_eq!(table[f].domain, Domain::Program);
        assert_eq!(table.function("f", 1), f);
        assert_ne!(table.function("f", 2), f);
    }
}
