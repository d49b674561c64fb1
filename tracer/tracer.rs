//! A trivial tracing facility.

use bitmask_enum::bitmask;

#[bitmask]
pub enum Trace {
    All,
    Parse,
    Translate,
    Complete,
    Domain,
    Simplify,
}

impl Trace {
    /// Parse a comma-separated list of stage names,
    /// e.g. `translate,simplify`. Unknown names are errors.
    pub fn parse(s: &str) -> Result<Self, String> {
        let mut trace = Trace::none();
        for name in s.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            trace |= match name {
                "all" => Trace::all(),
                "none" => Trace::none(),
                "parse" => Trace::Parse,
                "translate" => Trace::Translate,
                "complete" => Trace::Complete,
                "domain" => Trace::Domain,
                "simplify" => Trace::Simplify,
                other => return Err(format!("no such trace stage: {other}")),
            };
        }
        Ok(trace)
    }
}

#[macro_export]
macro_rules! trace {
    ($trace:expr, $level:ident, $fmt:literal $(,)? $($arg:expr),* $(,)?) => {
        if $trace.intersects(Trace::$level) {
            eprintln!($fmt, $($arg),*);
        }
    }
}
