//! Interactive mode
//!
//! Reads lines, splits them on whitespace and runs each one as a full
//! invocation. Usage errors and handler errors are reported and the loop
//! keeps going; end of input stops it with status 0 and an interrupt with 1.

use tracing::{trace, warn};

use super::app::Cli;
use super::input::{default_reader, LineReader, ReadLine};
use crate::domain::ConfigError;

/// Splits an input line into invocation tokens
pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

impl Cli {
    /// Runs the interactive loop on the terminal
    pub fn interactive(&mut self) -> Result<i32, ConfigError> {
        let mut reader = default_reader();
        self.interactive_with(reader.as_mut())
    }

    /// Runs the interactive loop on lines from `reader`
    pub fn interactive_with(&mut self, reader: &mut dyn LineReader) -> Result<i32, ConfigError> {
        self.interactive_mode = true;
        println!("{}", self.message);

        let result = self.read_eval_loop(reader);
        self.interactive_mode = false;
        result
    }

    fn read_eval_loop(&mut self, reader: &mut dyn LineReader) -> Result<i32, ConfigError> {
        loop {
            let prompt = self.prompt.clone();
            match reader.read_line(&prompt) {
                Ok(ReadLine::Line(line)) => {
                    let tokens = tokenize(&line);
                    trace!(?tokens, "interactive input");
                    self.run(tokens.as_slice())?;
                }
                Ok(ReadLine::Eof) => {
                    println!();
                    return Ok(0);
                }
                Ok(ReadLine::Interrupted) => {
                    println!();
                    return Ok(1);
                }
                Err(err) => {
                    warn!(error = %err, "failed to read input");
                    return Ok(1);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::input::ScriptedReader;
    use crate::domain::{argument, command, GroupModule, HandlerError};
    use crate::registry::ModuleCatalog;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::io;
    use std::rc::Rc;

    fn cli(log: &Rc<RefCell<Vec<String>>>) -> Cli {
        let base_log = Rc::clone(log);
        let foo_log = Rc::clone(log);

        let catalog = ModuleCatalog::new()
            .module("app.commands", "base", move || {
                let seen = Rc::clone(&base_log);
                GroupModule::new().command(command("ping", move |_| {
                    seen.borrow_mut().push("ping".into());
                    Ok(())
                }))
            })
            .module("app.commands", "foo", move || {
                let seen = Rc::clone(&foo_log);
                GroupModule::new()
                    .command(
                        command("bar", move |args| {
                            let x = args.require_str("x")?;
                            seen.borrow_mut().push(format!("bar {}", x));
                            Ok(())
                        })
                        .arg(argument(["--x"]).required(true)),
                    )
                    .command(command("fail", |_| Err(HandlerError::failed("nope"))))
            });

        Cli::builder("app", "1.0.0").catalog(catalog).build().unwrap()
    }

    fn log() -> Rc<RefCell<Vec<String>>> {
        Rc::new(RefCell::new(Vec::new()))
    }

    struct BrokenReader;

    impl LineReader for BrokenReader {
        fn read_line(&mut self, _prompt: &str) -> io::Result<ReadLine> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        }
    }

    #[test]
    fn tokenizes_on_whitespace() {
        assert_eq!(tokenize("  foo   bar\t--x 1 "), vec!["foo", "bar", "--x", "1"]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn eof_ends_with_success() {
        let log = log();
        let mut cli = cli(&log);
        let mut reader = ScriptedReader::lines(["ping", "foo bar --x 7"]);

        assert_eq!(cli.interactive_with(&mut reader).unwrap(), 0);
        assert_eq!(*log.borrow(), vec!["ping", "foo bar 7"]);
        assert_eq!(reader.prompts(), 3);
    }

    #[test]
    fn errors_do_not_stop_the_loop() {
        let log = log();
        let mut cli = cli(&log);
        let mut reader = ScriptedReader::lines(["bogus", "foo", "foo bar", "foo fail", "ping"]);

        assert_eq!(cli.interactive_with(&mut reader).unwrap(), 0);
        assert_eq!(*log.borrow(), vec!["ping"]);
    }

    #[test]
    fn empty_line_is_ignored() {
        let log = log();
        let mut cli = cli(&log);
        let mut reader = ScriptedReader::lines(["", "   ", "ping"]);

        assert_eq!(cli.interactive_with(&mut reader).unwrap(), 0);
        assert_eq!(*log.borrow(), vec!["ping"]);
    }

    #[test]
    fn interrupt_ends_with_failure() {
        let log = log();
        let mut cli = cli(&log);
        let mut reader = ScriptedReader::new([
            ReadLine::Line("ping".into()),
            ReadLine::Interrupted,
            ReadLine::Line("ping".into()),
        ]);

        assert_eq!(cli.interactive_with(&mut reader).unwrap(), 1);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn read_failure_ends_with_failure() {
        let log = log();
        let mut cli = cli(&log);
        assert_eq!(cli.interactive_with(&mut BrokenReader).unwrap(), 1);
    }

    #[test]
    fn interactive_flag_is_reset() {
        let log = log();
        let mut cli = cli(&log);
        assert!(!cli.is_interactive());

        cli.interactive_with(&mut ScriptedReader::default()).unwrap();
        assert!(!cli.is_interactive());
    }

    proptest! {
        #[test]
        fn tokens_never_contain_whitespace(line in ".{0,64}") {
            for token in tokenize(&line) {
                prop_assert!(!token.is_empty());
                prop_assert!(!token.chars().any(char::is_whitespace));
            }
        }

        #[test]
        fn joined_tokens_round_trip(words in prop::collection::vec("[a-z-]{1,8}", 0..6)) {
            let line = words.join("  ");
            prop_assert_eq!(tokenize(&line), words);
        }
    }
}
