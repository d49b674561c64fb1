//! The `gavotte` command: read logic programs, translate them into
//! first-order theories, and print the result.

use std::fs::read_to_string;
use std::io::{stdin, Read};
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use atty::Stream;
use clap::{Parser, ValueEnum};

use gavotte_logic::{Domain, Formatter, Parentheses};
use gavotte_syntax::{parse_program, Statement};
use gavotte_tracer::{trace, Trace};
use gavotte_translate::{HeadMode, Options, Translator, UnifyDomains};

/// Translate logic programs into first-order theories.
#[derive(Parser)]
#[command(name = "gavotte", version)]
struct Cli {
    /// Programs to translate; standard input when empty.
    files: Vec<PathBuf>,

    /// How rule heads are translated.
    #[arg(long, value_enum, default_value_t = HeadTranslation::ForCompletion)]
    head_translation: HeadTranslation,

    /// Keep the raw translation instead of simplifying it.
    #[arg(long)]
    no_simplify: bool,

    /// Skip domain inference; every declaration stays unknown.
    #[arg(long)]
    no_detect_domains: bool,

    /// When direct translations collapse onto the single program sort.
    #[arg(long, value_enum, default_value_t = Unification::Auto)]
    unify_domains: Unification,

    /// Fallback domain for declarations inference leaves unknown.
    #[arg(long, value_enum)]
    default_domain: Option<DefaultDomain>,

    /// How densely human-readable formulas are parenthesized.
    #[arg(long, value_enum, default_value_t = Grouping::Normal)]
    parentheses: Grouping,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Human)]
    format: Format,

    /// Pipeline stages to trace on standard error,
    /// e.g. `parse,simplify` or `all`.
    #[arg(long, value_parser = Trace::parse, default_value = "none")]
    trace: Trace,
}

#[derive(Clone, Copy, ValueEnum)]
enum HeadTranslation {
    Direct,
    ForCompletion,
}

#[derive(Clone, Copy, ValueEnum)]
enum Unification {
    Auto,
    Always,
}

#[derive(Clone, Copy, ValueEnum)]
enum DefaultDomain {
    Program,
    Integer,
}

#[derive(Clone, Copy, ValueEnum)]
enum Grouping {
    Normal,
    Full,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Human,
    Tptp,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let options = Options {
        head_mode: match cli.head_translation {
            HeadTranslation::Direct => HeadMode::Direct,
            HeadTranslation::ForCompletion => HeadMode::ForCompletion,
        },
        simplify: !cli.no_simplify,
        detect_domains: !cli.no_detect_domains,
        unify_domains: match cli.unify_domains {
            Unification::Auto => UnifyDomains::Auto,
            Unification::Always => UnifyDomains::Always,
        },
        default_domain: cli.default_domain.map(|domain| match domain {
            DefaultDomain::Program => Domain::Program,
            DefaultDomain::Integer => Domain::Integer,
        }),
        trace: cli.trace,
    };

    let statements = read_statements(&cli.files, cli.trace)?;
    let translation = Translator::new(options).translate(&statements)?;
    for warning in translation.warnings.iter() {
        eprintln!("warning: {warning}");
    }

    let formatter = Formatter::new(&translation.variables, &translation.symbols)
        .parentheses(match cli.parentheses {
            Grouping::Normal => Parentheses::Normal,
            Grouping::Full => Parentheses::Full,
        })
        .default_domain(options.default_domain);

    match cli.format {
        Format::Human => {
            for annotation in translation.annotations.iter() {
                let line = formatter.human_annotation(annotation);
                if !line.is_empty() {
                    println!("{line}");
                }
            }
            for formula in translation.formulas.iter() {
                println!("{}", formatter.human(formula));
            }
        }
        Format::Tptp => {
            for (index, annotation) in translation.annotations.iter().enumerate() {
                println!("{}", formatter.tptp_annotation(annotation, index)?);
            }
            for (index, formula) in translation.formulas.iter().enumerate() {
                println!("{}", formatter.tptp_axiom(formula, index)?);
            }
        }
    }
    Ok(())
}

/// Read and parse every input program, or standard input when no files
/// are given. The statement streams concatenate into one program.
fn read_statements(files: &[PathBuf], trace: Trace) -> Result<Vec<Statement>> {
    let mut statements = Vec::new();
    if files.is_empty() {
        if atty::is(Stream::Stdin) && atty::is(Stream::Stdout) {
            println!("Please enter your program, terminated with Ctrl-D.");
        }
        let mut source = String::new();
        stdin()
            .read_to_string(&mut source)
            .context("Reading from stdin")?;
        statements.extend(parse_program(&source)?);
    } else {
        for file in files {
            let source =
                read_to_string(file).with_context(|| format!("Reading {}", file.display()))?;
            let parsed =
                parse_program(&source).with_context(|| format!("Parsing {}", file.display()))?;
            statements.extend(parsed);
        }
    }
    for statement in statements.iter() {
        trace!(trace, Parse, "parsed: {statement}");
    }
    Ok(statements)
}
