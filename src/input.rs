use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossterm::{
    cursor, execute,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    style::{Attribute, Print, ResetColor, SetAttribute},
};
use tracing::info;

/// A decoded keypress. Everything the menus and the line reader care about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Enter,
    Esc,
    Backspace,
    Char(char),
    Other,
}

/// The single owned subscription to the terminal's key events. There is
/// exactly one `KeyStream` per app; menus and the line reader borrow it
/// mutably, so two readers can never be active at once.
pub struct KeyStream {
    shutdown: Arc<AtomicBool>,
}

impl KeyStream {
    pub fn new(shutdown: Arc<AtomicBool>) -> Self {
        Self { shutdown }
    }

    /// Block until the next keypress. Polls with a timeout so the signal
    /// flag is observed even while idle. Ctrl+C terminates the whole
    /// process here, regardless of which reading mode is active.
    pub fn next(&mut self) -> io::Result<Key> {
        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                exit_with_goodbye();
            }
            if !event::poll(Duration::from_millis(100))? {
                continue;
            }
            let Event::Key(KeyEvent { code, modifiers, kind, .. }) = event::read()? else {
                continue;
            };
            if kind == KeyEventKind::Release {
                continue;
            }
            if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
                exit_with_goodbye();
            }
            let key = match code {
                KeyCode::Up => Key::Up,
                KeyCode::Down => Key::Down,
                KeyCode::Enter => Key::Enter,
                KeyCode::Esc => Key::Esc,
                KeyCode::Backspace => Key::Backspace,
                KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => Key::Char(c),
                _ => Key::Other,
            };
            return Ok(key);
        }
    }

    /// Read a line of free text: characters accumulate with echo, Backspace
    /// removes the last character (no-op on an empty buffer), Enter commits.
    /// The cursor is shown for the duration and hidden again on every
    /// return path, handing the stream back to menu mode.
    pub fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        let mut out = io::stdout();
        execute!(
            out,
            SetAttribute(Attribute::Bold),
            Print(prompt),
            SetAttribute(Attribute::Reset),
            ResetColor,
            cursor::Show,
        )?;

        let result = self.accumulate(&mut out);

        let _ = execute!(out, cursor::Hide);
        let _ = write!(out, "\r\n");
        let _ = out.flush();
        result
    }

    fn accumulate(&mut self, out: &mut impl Write) -> io::Result<String> {
        let mut buffer = String::new();
        loop {
            match self.next()? {
                Key::Enter => return Ok(buffer),
                Key::Backspace => {
                    if buffer.pop().is_some() {
                        // Erase the echoed character in place.
                        write!(out, "\x08 \x08")?;
                        out.flush()?;
                    }
                }
                Key::Char(c) => {
                    buffer.push(c);
                    write!(out, "{}", c)?;
                    out.flush()?;
                }
                // Esc, arrows etc. have no meaning in text mode.
                _ => {}
            }
        }
    }
}

/// Global interrupt: restore the terminal, say goodbye, exit 0.
fn exit_with_goodbye() -> ! {
    crate::app::restore_terminal();
    info!("interrupted, exiting");
    println!("\nGoodbye!");
    std::process::exit(0);
}
