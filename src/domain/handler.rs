//! Command handlers and the errors they report

use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use super::args::ParsedArgs;

/// Message reported when a privileged command runs without privileges
pub const SUPERUSER_REQUIRED: &str = "To perform this command you need super user privileges.";

/// Recoverable error raised by a command handler.
///
/// These are reported as `ERROR: <message>` and never end the process.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("{0}")]
    Failed(String),

    #[error("{}", SUPERUSER_REQUIRED)]
    PermissionDenied,

    #[error("{0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HandlerError {
    pub fn failed(message: impl Into<String>) -> Self {
        HandlerError::Failed(message.into())
    }
}

impl From<std::io::Error> for HandlerError {
    fn from(err: std::io::Error) -> Self {
        HandlerError::Other(err.into())
    }
}

pub type HandlerResult = Result<(), HandlerError>;

/// Shared, cheaply cloned handler function
#[derive(Clone)]
pub struct Handler(Rc<dyn Fn(&ParsedArgs) -> HandlerResult>);

impl Handler {
    pub fn new(f: impl Fn(&ParsedArgs) -> HandlerResult + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, args: &ParsedArgs) -> HandlerResult {
        (self.0)(args)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handler(..)")
    }
}

/// Returns true when the process runs with an effective user id of 0
#[cfg(unix)]
pub fn is_superuser() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
pub fn is_superuser() -> bool {
    false
}

/// Wraps a handler so it only runs with super user privileges
pub fn superuser<F>(handler: F) -> impl Fn(&ParsedArgs) -> HandlerResult
where
    F: Fn(&ParsedArgs) -> HandlerResult,
{
    superuser_with(is_superuser, handler)
}

/// Like [`superuser`] with an explicit privilege probe
pub fn superuser_with<C, F>(check: C, handler: F) -> impl Fn(&ParsedArgs) -> HandlerResult
where
    C: Fn() -> bool,
    F: Fn(&ParsedArgs) -> HandlerResult,
{
    move |args| {
        if !check() {
            return Err(HandlerError::PermissionDenied);
        }
        handler(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn guard_denies_without_privileges() {
        let ran = Cell::new(false);
        let guarded = superuser_with(
            || false,
            |_: &ParsedArgs| {
                ran.set(true);
                Ok(())
            },
        );

        let err = guarded(&ParsedArgs::new("reboot")).unwrap_err();
        assert!(matches!(err, HandlerError::PermissionDenied));
        assert_eq!(err.to_string(), SUPERUSER_REQUIRED);
        assert!(!ran.get());
    }

    #[test]
    fn guard_passes_through_with_privileges() {
        let ran = Cell::new(false);
        let guarded = superuser_with(
            || true,
            |_: &ParsedArgs| {
                ran.set(true);
                Err(HandlerError::failed("inner result"))
            },
        );

        let err = guarded(&ParsedArgs::new("reboot")).unwrap_err();
        assert_eq!(err.to_string(), "inner result");
        assert!(ran.get());
    }

    #[test]
    fn anyhow_errors_convert() {
        let err: HandlerError = anyhow::anyhow!("disk full").into();
        assert_eq!(err.to_string(), "disk full");
    }

    #[test]
    fn handler_is_callable_through_clone() {
        let handler = Handler::new(|args| {
            if args.command() == "ok" {
                Ok(())
            } else {
                Err(HandlerError::failed("nope"))
            }
        });
        let copy = handler.clone();

        assert!(copy.call(&ParsedArgs::new("ok")).is_ok());
        assert!(handler.call(&ParsedArgs::new("other")).is_err());
    }
}
