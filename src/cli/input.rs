//! Line input for interactive mode
//!
//! On a capable terminal lines are read in raw mode with crossterm, which
//! lets Ctrl-C and Ctrl-D be told apart from ordinary input. Anywhere else
//! (pipes, `TERM=dumb`) lines come from a stdin reader thread, and a SIGINT
//! handler turns Ctrl-C into [`ReadLine::Interrupted`].

use std::collections::VecDeque;
use std::env;
use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, OnceLock};
use std::thread;

use crossterm::cursor;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{self, ClearType};
use tracing::debug;

/// Result of one read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadLine {
    /// A complete line, without its terminator
    Line(String),
    /// Input is exhausted
    Eof,
    /// The user interrupted the read
    Interrupted,
}

/// Source of interactive input lines
pub trait LineReader {
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadLine>;
}

/// Picks the terminal reader when stdin and stdout are terminals
pub fn default_reader() -> Box<dyn LineReader> {
    if supports_terminal_input() {
        Box::new(TerminalReader)
    } else {
        Box::new(StdinReader)
    }
}

fn supports_terminal_input() -> bool {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        return false;
    }

    if let Ok(term) = env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }

    true
}

/// Buffered line reads from stdin, interruptible by SIGINT
#[derive(Debug, Default)]
pub struct StdinReader;

impl LineReader for StdinReader {
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadLine> {
        // The interrupt handler must be in place before the prompt shows.
        let pump = stdin_pump();

        print!("{}", prompt);
        io::stdout().flush()?;

        let mut pump = pump.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        pump.next()
    }
}

enum Message {
    Line(String),
    Eof,
    Interrupted,
    Failed(io::Error),
}

/// Stdin lines read on request by a background thread.
///
/// Blocking reads retry on EINTR, so an interrupt cannot end a read directly;
/// the SIGINT handler posts to the same channel the reader thread answers on.
struct StdinPump {
    requests: Sender<()>,
    responses: Receiver<Message>,
    pending: bool,
}

impl StdinPump {
    fn start() -> Self {
        let (requests, request_rx) = mpsc::channel::<()>();
        let (response_tx, responses) = mpsc::channel();

        let lines = response_tx.clone();
        thread::spawn(move || {
            let stdin = io::stdin();
            for () in request_rx {
                let mut line = String::new();
                let message = match stdin.lock().read_line(&mut line) {
                    Ok(0) => Message::Eof,
                    Ok(_) => Message::Line(trim_newline(line)),
                    Err(err) => Message::Failed(err),
                };
                if lines.send(message).is_err() {
                    break;
                }
            }
        });

        if let Err(err) = ctrlc::set_handler(move || {
            let _ = response_tx.send(Message::Interrupted);
        }) {
            debug!(error = %err, "interrupt handler unavailable");
        }

        Self::new(requests, responses)
    }

    fn new(requests: Sender<()>, responses: Receiver<Message>) -> Self {
        Self {
            requests,
            responses,
            pending: false,
        }
    }

    /// Waits for the next line, asking the reader thread for one if needed
    fn next(&mut self) -> io::Result<ReadLine> {
        if !self.pending {
            if self.requests.send(()).is_err() {
                return Ok(ReadLine::Eof);
            }
            self.pending = true;
        }

        let message = match self.responses.recv() {
            Ok(message) => message,
            Err(_) => return Ok(ReadLine::Eof),
        };

        match message {
            // The requested line is still outstanding and arrives on a later read.
            Message::Interrupted => Ok(ReadLine::Interrupted),
            Message::Line(line) => {
                self.pending = false;
                Ok(ReadLine::Line(line))
            }
            Message::Eof => {
                self.pending = false;
                Ok(ReadLine::Eof)
            }
            Message::Failed(err) => {
                self.pending = false;
                Err(err)
            }
        }
    }
}

fn stdin_pump() -> &'static Mutex<StdinPump> {
    static PUMP: OnceLock<Mutex<StdinPump>> = OnceLock::new();
    PUMP.get_or_init(|| Mutex::new(StdinPump::start()))
}

fn trim_newline(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

/// Raw-mode line editor on the controlling terminal
#[derive(Debug, Default)]
pub struct TerminalReader;

impl LineReader for TerminalReader {
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadLine> {
        let guard = match RawModeGuard::enter() {
            Ok(guard) => guard,
            Err(err) => {
                debug!(error = %err, "raw mode unavailable, falling back to stdin");
                return StdinReader.read_line(prompt);
            }
        };

        let mut stdout = io::stdout();
        let mut editor = LineEditor::default();

        let result = loop {
            render(&mut stdout, prompt, &editor)?;

            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if let Some(done) = editor.handle_key(key) {
                        break done;
                    }
                }
                Event::Paste(text) => editor.insert_str(&text),
                _ => {}
            }
        };

        if matches!(result, ReadLine::Line(_)) {
            queue!(stdout, Print("\r\n"))?;
            stdout.flush()?;
        }

        drop(guard);
        Ok(result)
    }
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn render(stdout: &mut impl Write, prompt: &str, editor: &LineEditor) -> io::Result<()> {
    let column = prompt.chars().count() + editor.cursor;
    queue!(
        stdout,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt),
        Print(editor.text()),
        cursor::MoveToColumn(u16::try_from(column).unwrap_or(u16::MAX)),
    )?;
    stdout.flush()
}

/// Editing state of the line being typed
#[derive(Debug, Default)]
struct LineEditor {
    buffer: Vec<char>,
    cursor: usize,
}

impl LineEditor {
    fn text(&self) -> String {
        self.buffer.iter().collect()
    }

    fn insert(&mut self, ch: char) {
        self.buffer.insert(self.cursor, ch);
        self.cursor += 1;
    }

    fn insert_str(&mut self, text: &str) {
        for ch in text.chars().filter(|c| !c.is_control()) {
            self.insert(ch);
        }
    }

    /// Applies a key press; returns the read result once the line is done
    fn handle_key(&mut self, key: KeyEvent) -> Option<ReadLine> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('c') if ctrl => return Some(ReadLine::Interrupted),
            KeyCode::Char('d') if ctrl => {
                if self.buffer.is_empty() {
                    return Some(ReadLine::Eof);
                }
                if self.cursor < self.buffer.len() {
                    self.buffer.remove(self.cursor);
                }
            }
            KeyCode::Char('a') if ctrl => self.cursor = 0,
            KeyCode::Char('e') if ctrl => self.cursor = self.buffer.len(),
            KeyCode::Char('u') if ctrl => {
                self.buffer.drain(..self.cursor);
                self.cursor = 0;
            }
            KeyCode::Enter => return Some(ReadLine::Line(self.text())),
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.buffer.remove(self.cursor);
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.buffer.len() {
                    self.buffer.remove(self.cursor);
                }
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.buffer.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.buffer.len(),
            KeyCode::Tab => self.insert(' '),
            KeyCode::Char(ch) if !ctrl => self.insert(ch),
            _ => {}
        }

        None
    }
}

/// Replays a fixed sequence of reads, then reports end of input
#[derive(Debug, Default)]
pub struct ScriptedReader {
    reads: VecDeque<ReadLine>,
    prompts: usize,
}

impl ScriptedReader {
    pub fn new(reads: impl IntoIterator<Item = ReadLine>) -> Self {
        Self {
            reads: reads.into_iter().collect(),
            prompts: 0,
        }
    }

    /// Convenience constructor from plain lines
    pub fn lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(lines.into_iter().map(|l| ReadLine::Line(l.into())))
    }

    /// Number of times a line was requested
    pub fn prompts(&self) -> usize {
        self.prompts
    }
}

impl LineReader for ScriptedReader {
    fn read_line(&mut self, _prompt: &str) -> io::Result<ReadLine> {
        self.prompts += 1;
        Ok(self.reads.pop_front().unwrap_or(ReadLine::Eof))
    }
}
