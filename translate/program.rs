//! One translation run, end to end: statements in; closed formulas,
//! type annotations, and warnings out.

use std::collections::BTreeMap;

use gavotte_logic::{
    infer_domains, simplify, Domain, Formatter, Formula, SymbolTable, TypeAnnotation, Variables,
    Visibility,
};
use gavotte_syntax::Statement;
use gavotte_tracer::{trace, Trace};

use crate::completion;
use crate::equivalence::{self, UnifyDomains};
use crate::head::HeadMode;
use crate::rule;
use crate::{Error, Warning};

/// Knobs for one run.
#[derive(Clone, Copy, Debug)]
pub struct Options {
    pub head_mode: HeadMode,
    pub simplify: bool,
    pub detect_domains: bool,
    pub unify_domains: UnifyDomains,
    pub default_domain: Option<Domain>,
    pub trace: Trace,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            head_mode: HeadMode::default(),
            simplify: true,
            detect_domains: true,
            unify_domains: UnifyDomains::default(),
            default_domain: None,
            trace: Trace::none(),
        }
    }
}

/// Everything one run produces. The arenas ride along because the
/// formulas' variable and symbol handles mean nothing without them.
#[derive(Debug)]
pub struct Translation {
    pub formulas: Vec<Formula>,
    pub annotations: Vec<TypeAnnotation>,
    pub warnings: Vec<Warning>,
    pub variables: Variables,
    pub symbols: SymbolTable,
}

/// Translates statement streams under fixed [Options].
#[derive(Clone, Copy, Debug, Default)]
pub struct Translator {
    options: Options,
}

impl Translator {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    pub fn translate(&self, statements: &[Statement]) -> Result<Translation, Error> {
        match self.options.head_mode {
            HeadMode::ForCompletion => self.complete(statements),
            HeadMode::Direct => self.direct(statements),
        }
    }

    fn complete(&self, statements: &[Statement]) -> Result<Translation, Error> {
        let trace = self.options.trace;
        let mut variables = Variables::new();
        let mut symbols = SymbolTable::new();
        let mut definitions = BTreeMap::new();
        let mut constraints = Vec::new();
        let mut default_visibility = Visibility::Visible;

        for statement in statements {
            match statement {
                Statement::Rule(rule) => {
                    trace!(trace, Translate, "rule: {}", rule);
                    rule::translate_for_completion(
                        rule,
                        &mut variables,
                        &mut symbols,
                        &mut definitions,
                        &mut constraints,
                    )?;
                }
                Statement::Show(None, _) => default_visibility = Visibility::Hidden,
                Statement::Show(Some(signature), _) => {
                    let predicate = symbols.predicate(signature.name.name(), signature.arity);
                    symbols[predicate].visibility = Visibility::Visible;
                }
                Statement::External(signature, _) => {
                    let predicate = symbols.predicate(signature.name.name(), signature.arity);
                    symbols[predicate].is_external = true;
                }
            }
        }

        let mut formulas =
            completion::complete(definitions, constraints, &mut variables, &symbols);
        for formula in formulas.iter() {
            trace!(
                trace,
                Complete,
                "completed: {}",
                Formatter::new(&variables, &symbols).human(formula)
            );
        }

        let mut warnings = Vec::new();
        for predicate in symbols.predicates() {
            let data = &symbols[predicate];
            if data.is_used {
                continue;
            }
            if data.visibility != Visibility::Default {
                warnings.push(Warning::UnmatchedDirective {
                    directive: "#show",
                    name: data.name.clone(),
                    arity: data.arity,
                });
            }
            if data.is_external {
                warnings.push(Warning::UnmatchedDirective {
                    directive: "#external",
                    name: data.name.clone(),
                    arity: data.arity,
                });
            }
        }

        if self.options.detect_domains {
            infer_domains(&formulas, &mut variables, &mut symbols)?;
            for predicate in symbols.predicates() {
                let annotation = symbols.annotation(predicate);
                let integers = Formatter::new(&variables, &symbols).human_annotation(&annotation);
                if !integers.is_empty() {
                    trace!(trace, Domain, "{}", integers);
                }
            }
        }

        if self.options.simplify {
            formulas = self.simplified(formulas, &variables, &symbols);
        }

        let annotations = symbols
            .predicates()
            .filter(|&predicate| {
                let data = &symbols[predicate];
                let visible = data.visibility == Visibility::Visible
                    || (data.visibility == Visibility::Default
                        && default_visibility == Visibility::Visible);
                data.is_used && !data.is_external && visible
            })
            .map(|predicate| symbols.annotation(predicate))
            .collect();

        Ok(Translation {
            formulas,
            annotations,
            warnings,
            variables,
            symbols,
        })
    }

    fn direct(&self, statements: &[Statement]) -> Result<Translation, Error> {
        let trace = self.options.trace;
        let mut variables = Variables::new();
        let mut symbols = SymbolTable::new();
        let mut warnings = Vec::new();
        let mut formulas = Vec::new();

        for statement in statements {
            match statement {
                Statement::Rule(rule) => {
                    trace!(trace, Translate, "rule: {}", rule);
                    let formula = rule::translate_direct(rule, &mut variables, &mut symbols)?;
                    trace!(
                        trace,
                        Translate,
                        "implication: {}",
                        Formatter::new(&variables, &symbols).human(&formula)
                    );
                    formulas.push(formula);
                }
                Statement::Show(_, location) => warnings.push(Warning::IgnoredDirective {
                    directive: "#show",
                    location: *location,
                }),
                Statement::External(_, location) => warnings.push(Warning::IgnoredDirective {
                    directive: "#external",
                    location: *location,
                }),
            }
        }

        if self.options.detect_domains || self.options.unify_domains == UnifyDomains::Auto {
            infer_domains(&formulas, &mut variables, &mut symbols)?;
        }
        formulas = equivalence::unify_domains(
            formulas,
            self.options.unify_domains,
            &mut variables,
            &mut symbols,
        )?;
        for formula in formulas.iter() {
            trace!(
                trace,
                Domain,
                "domains: {}",
                Formatter::new(&variables, &symbols).human(formula)
            );
        }

        if self.options.simplify {
            formulas = self.simplified(formulas, &variables, &symbols);
        }

        let annotations = match self.options.default_domain {
            Some(_) => symbols
                .predicates()
                .map(|predicate| symbols.annotation(predicate))
                .collect(),
            None => {
                warnings.push(Warning::MissingDefaultDomain);
                Vec::new()
            }
        };

        Ok(Translation {
            formulas,
            annotations,
            warnings,
            variables,
            symbols,
        })
    }

    fn simplified(
        &self,
        formulas: Vec<Formula>,
        variables: &Variables,
        symbols: &SymbolTable,
    ) -> Vec<Formula> {
        let trace = self.options.trace;
        formulas
            .into_iter()
            .map(|formula| {
                let formula = simplify(formula);
                trace!(
                    trace,
                    Simplify,
                    "simplified: {}",
                    Formatter::new(variables, symbols).human(&formula)
                );
                formula
            })
            .collect()
    }
}
