use std::io::{self, Write, stdout};

use crossterm::{
    cursor::{MoveToColumn, MoveUp},
    queue,
    terminal::{Clear, ClearType},
};

use crate::input::{Key, KeyStream};

use super::{header, write_hint, write_option};

/// Result of presenting a menu. `Back` is a distinct variant, never an
/// index, so it cannot collide with a selection even for one-option lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuOutcome {
    Selected(usize),
    Back,
}

/// Highlighted-row cursor over a fixed option count. Clamps at both ends,
/// no wraparound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuState {
    cursor: usize,
    len: usize,
}

impl MenuState {
    /// `len` must be at least 1; every screen offers at least a back or
    /// exit row.
    pub fn new(len: usize) -> Self {
        debug_assert!(len > 0);
        Self { cursor: 0, len }
    }

    pub fn with_cursor(mut self, cursor: usize) -> Self {
        self.cursor = cursor.min(self.len - 1);
        self
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns true when the cursor moved.
    pub fn up(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    pub fn down(&mut self) -> bool {
        if self.cursor + 1 < self.len {
            self.cursor += 1;
            true
        } else {
            false
        }
    }
}

const HINT: &str = "  ↑/↓ move · Enter select · Esc back · Ctrl+C quit";

/// A titled single-selection menu rendered in place.
pub struct Menu<'a> {
    title: &'a str,
    options: &'a [String],
    preserve_header: bool,
    initial_cursor: usize,
}

impl<'a> Menu<'a> {
    pub fn new(title: &'a str, options: &'a [String]) -> Self {
        Self {
            title,
            options,
            preserve_header: false,
            initial_cursor: 0,
        }
    }

    /// Keep whatever is already on screen above the menu instead of
    /// clearing; redraws then erase exactly the region this menu drew.
    pub fn preserve_header(mut self, preserve: bool) -> Self {
        self.preserve_header = preserve;
        self
    }

    pub fn initial_cursor(mut self, cursor: usize) -> Self {
        self.initial_cursor = cursor;
        self
    }

    /// Rows drawn per frame: title + blank + options + hint.
    fn rows(&self) -> u16 {
        (self.options.len() + 3) as u16
    }

    fn draw(&self, out: &mut impl Write, state: &MenuState) -> io::Result<()> {
        header(out, self.title)?;
        for (i, option) in self.options.iter().enumerate() {
            write_option(out, option, i == state.cursor())?;
        }
        write_hint(out, HINT)?;
        out.flush()
    }

    fn redraw(&self, out: &mut impl Write, state: &MenuState) -> io::Result<()> {
        // Back to the top of the previously drawn block, wipe it, repaint.
        queue!(out, MoveToColumn(0), MoveUp(self.rows()), Clear(ClearType::FromCursorDown))?;
        self.draw(out, state)
    }

    /// Drive the menu until the user selects or backs out. Borrowing the
    /// key stream mutably guarantees a single in-flight menu.
    pub fn present(&self, keys: &mut KeyStream) -> io::Result<MenuOutcome> {
        let mut out = stdout();
        let mut state = MenuState::new(self.options.len()).with_cursor(self.initial_cursor);

        if !self.preserve_header {
            super::clear_screen(&mut out)?;
        }
        self.draw(&mut out, &state)?;

        loop {
            match keys.next()? {
                Key::Up => {
                    if state.up() {
                        self.redraw(&mut out, &state)?;
                    }
                }
                Key::Down => {
                    if state.down() {
                        self.redraw(&mut out, &state)?;
                    }
                }
                Key::Enter => return Ok(MenuOutcome::Selected(state.cursor())),
                Key::Esc => return Ok(MenuOutcome::Back),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_starts_at_zero_and_clamps_low() {
        let mut state = MenuState::new(3);
        assert_eq!(state.cursor(), 0);
        assert!(!state.up());
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn cursor_clamps_high_without_wraparound() {
        let mut state = MenuState::new(3);
        assert!(state.down());
        assert!(state.down());
        assert_eq!(state.cursor(), 2);
        assert!(!state.down());
        assert_eq!(state.cursor(), 2);
        assert!(state.up());
        assert_eq!(state.cursor(), 1);
    }

    #[test]
    fn cursor_stays_in_bounds_for_any_sequence() {
        let mut state = MenuState::new(4);
        let moves = [1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 1, 1];
        for m in moves {
            if m == 1 {
                state.down();
            } else {
                state.up();
            }
            assert!(state.cursor() < 4);
        }
    }

    #[test]
    fn single_option_menu_cannot_move() {
        let mut state = MenuState::new(1);
        assert!(!state.down());
        assert!(!state.up());
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn with_cursor_clamps_to_len() {
        let state = MenuState::new(3).with_cursor(10);
        assert_eq!(state.cursor(), 2);
    }

    #[test]
    fn back_is_distinct_from_every_index() {
        // Tagged result: even a one-option menu distinguishes the two.
        assert_ne!(MenuOutcome::Back, MenuOutcome::Selected(0));
        for i in 0..8 {
            assert_ne!(MenuOutcome::Back, MenuOutcome::Selected(i));
        }
    }
}
