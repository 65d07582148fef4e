//! Result of dispatching one invocation

use clap::error::ErrorKind;

/// Exit status for usage errors
pub const USAGE_EXIT_CODE: i32 = 2;

/// What happened when an invocation was dispatched.
///
/// Dispatch never prints or exits on its own; the caller decides whether an
/// outcome ends the process (batch mode) or only the current line (REPL).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The handler ran to completion
    Completed,

    /// Help or version text was requested
    Displayed(String),

    /// The input did not match the parser tree
    UsageError {
        message: String,
        help: String,
        exit_code: i32,
    },

    /// The handler ran and reported an error
    HandlerError { message: String },
}

impl Outcome {
    pub fn usage(message: impl Into<String>, help: impl Into<String>) -> Self {
        Outcome::UsageError {
            message: message.into(),
            help: help.into(),
            exit_code: USAGE_EXIT_CODE,
        }
    }

    /// Converts a clap parse failure, using `help` as the contextual help text
    pub fn from_clap(err: &clap::Error, help: impl Into<String>) -> Self {
        match err.kind() {
            ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                Outcome::Displayed(err.to_string())
            }
            _ => Outcome::UsageError {
                message: clap_message(err),
                help: help.into(),
                exit_code: err.exit_code(),
            },
        }
    }

    /// Process exit status for this outcome
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::UsageError { exit_code, .. } => *exit_code,
            Outcome::Completed | Outcome::Displayed(_) | Outcome::HandlerError { .. } => 0,
        }
    }

    pub fn is_usage_error(&self) -> bool {
        matches!(self, Outcome::UsageError { .. })
    }
}

/// Extracts the message part of a rendered clap error, without the leading
/// `error:` label and the trailing usage block.
fn clap_message(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let body = rendered
        .split_once("\n\nUsage:")
        .map(|(body, _)| body)
        .unwrap_or(&rendered);

    body.trim()
        .trim_start_matches("error:")
        .trim()
        .to_string()
}
