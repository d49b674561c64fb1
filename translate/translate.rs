//! Translate logic programs into first-order theories.
//!
//! A program arrives as the statement stream of [`gavotte_syntax`] and
//! leaves as closed formulas over the vocabulary of [`gavotte_logic`].
//! Each rule becomes an implication whose body reads values out of its
//! terms; under completion the implications sharing a head predicate
//! fuse into one equivalence per predicate, the classical rendering of
//! the program's stable models for tight programs. [`Translator`]
//! drives the pipeline; each submodule owns one stage.

mod body;
mod completion;
mod equivalence;
mod head;
mod program;
mod rule;
mod term;

pub use equivalence::UnifyDomains;
pub use head::HeadMode;
pub use program::{Options, Translation, Translator};

use std::fmt;

use gavotte_logic::DomainError;
use gavotte_syntax::Location;

/// Why a program has no translation: a construct the target logic
/// cannot express, or domain evidence that does not add up.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("{location}: cannot translate {construct}")]
    Unsupported {
        construct: &'static str,
        location: Location,
    },
    #[error("{0} has no rendering over the single program sort")]
    SingleSort(&'static str),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl Error {
    pub(crate) fn unsupported(construct: &'static str, location: Location) -> Self {
        Self::Unsupported {
            construct,
            location,
        }
    }
}

/// Translation succeeded, but something deserves attention.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Warning {
    /// A directive names a predicate no rule uses.
    UnmatchedDirective {
        directive: &'static str,
        name: String,
        arity: usize,
    },
    /// A directive has no effect under the selected head mode.
    IgnoredDirective {
        directive: &'static str,
        location: Location,
    },
    /// Direct-mode annotations need a configured default domain.
    MissingDefaultDomain,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnmatchedDirective {
                directive,
                name,
                arity,
            } => f.write_fmt(format_args!(
                "{directive} declaration of {name}/{arity} matches no predicate used in a rule"
            )),
            Warning::IgnoredDirective {
                directive,
                location,
            } => f.write_fmt(format_args!(
                "{location}: {directive} is ignored because completion is not enabled"
            )),
            Warning::MissingDefaultDomain => f.write_str(
                "type annotations are omitted because no default domain is configured",
            ),
        }
    }
}
