mod menu;

use std::io::{self, Write, stdout};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};

pub use menu::{Menu, MenuOutcome, MenuState};

/// Raw-mode line write. Raw mode needs an explicit carriage return.
pub fn writeln(out: &mut impl Write, text: &str) -> io::Result<()> {
    write!(out, "{}\r\n", text)
}

pub fn clear_screen(out: &mut impl Write) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    out.flush()
}

/// Bold screen header with a trailing blank line.
pub fn header(out: &mut impl Write, title: &str) -> io::Result<()> {
    queue!(out, SetAttribute(Attribute::Bold))?;
    writeln(out, title)?;
    queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
    writeln(out, "")
}

/// One menu option row, highlighted when it is the current selection.
pub fn write_option(out: &mut impl Write, text: &str, selected: bool) -> io::Result<()> {
    if selected {
        queue!(out, SetForegroundColor(Color::Cyan), SetAttribute(Attribute::Bold))?;
        writeln(out, &format!("  ❯ {}", text))?;
        queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
    } else {
        writeln(out, &format!("    {}", text))?;
    }
    Ok(())
}

/// Dimmed key-binding hint under a menu.
pub fn write_hint(out: &mut impl Write, text: &str) -> io::Result<()> {
    queue!(out, SetForegroundColor(Color::DarkGrey))?;
    writeln(out, text)?;
    queue!(out, ResetColor)?;
    Ok(())
}

/// Inline status message (flow results, cancellations).
pub fn message(text: &str) -> io::Result<()> {
    let mut out = stdout();
    queue!(out, SetForegroundColor(Color::Yellow))?;
    writeln(&mut out, text)?;
    queue!(out, ResetColor)?;
    out.flush()
}

/// Inline error message for recoverable gateway failures.
pub fn error_line(text: &str) -> io::Result<()> {
    let mut out = stdout();
    queue!(out, SetForegroundColor(Color::Red), SetAttribute(Attribute::Bold))?;
    writeln(&mut out, text)?;
    queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
    out.flush()
}

/// Plain detail row for the install management header.
pub fn detail(out: &mut impl Write, label: &str, value: &str) -> io::Result<()> {
    queue!(out, SetForegroundColor(Color::DarkGrey))?;
    write!(out, "    {:<16}", label)?;
    queue!(out, ResetColor)?;
    writeln(out, value)
}

/// Pause until the user acknowledges an inline message.
pub fn wait_for_ack(keys: &mut crate::input::KeyStream) -> io::Result<()> {
    let mut out = stdout();
    queue!(out, SetForegroundColor(Color::DarkGrey))?;
    writeln(&mut out, "Press any key to continue...")?;
    queue!(out, ResetColor)?;
    out.flush()?;
    keys.next()?;
    Ok(())
}
