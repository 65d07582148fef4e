//! Console output helpers
//!
//! [`report`] prints a dispatch outcome the way the CLI presents it.
//! [`say`] prints handler output at the current indentation level; an
//! [`Indent`] guard nests everything said while it is alive.

use std::cell::Cell;
use std::io::{self, Write};

use crate::domain::Outcome;

thread_local! {
    static INDENTATION: Cell<usize> = const { Cell::new(0) };
}

/// Prints an outcome to stdout/stderr and returns its exit status
pub fn report(outcome: &Outcome) -> i32 {
    let mut out = io::stdout().lock();
    let mut err = io::stderr().lock();
    // A closed stdout or stderr must not turn a finished command into a crash.
    let _ = report_to(outcome, &mut out, &mut err);
    outcome.exit_code()
}

/// Writes an outcome to explicit streams.
///
/// Usage errors go to `err` as `error: <message>` followed by the relevant
/// help; handler errors go to `out` as `ERROR: <message>`.
pub fn report_to(outcome: &Outcome, out: &mut impl Write, err: &mut impl Write) -> io::Result<i32> {
    match outcome {
        Outcome::Completed => {}
        Outcome::Displayed(text) => writeln!(out, "{}", text.trim_end())?,
        Outcome::UsageError { message, help, .. } => {
            writeln!(err, "error: {}", message)?;
            writeln!(err, "{}", help.trim_end())?;
        }
        Outcome::HandlerError { message } => writeln!(out, "ERROR: {}", message)?,
    }
    Ok(outcome.exit_code())
}

/// Current indentation level
pub fn indentation() -> usize {
    INDENTATION.with(Cell::get)
}

/// Prefixes `line` with two spaces per indentation level
pub fn indented(line: &str) -> String {
    format!("{}{}", "  ".repeat(indentation()), line)
}

/// Prints each line at the current indentation level
pub fn say<I, S>(lines: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for line in lines {
        println!("{}", indented(line.as_ref()));
    }
}

/// Guard that keeps output indented one level deeper while alive
#[must_use = "indentation ends when the guard is dropped"]
#[derive(Debug)]
pub struct Indent {
    _private: (),
}

/// Increases the indentation level until the returned guard drops
pub fn indent() -> Indent {
    INDENTATION.with(|level| level.set(level.get() + 1));
    Indent { _private: () }
}

/// Prints a header, then indents what follows under it
pub fn section(header: &str) -> Indent {
    say([header]);
    indent()
}

impl Drop for Indent {
    fn drop(&mut self) {
        INDENTATION.with(|level| level.set(level.get().saturating_sub(1)));
    }
}
