//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] events.  What a key does depends on
//! [`InputMode`]: while the search box is focused, printable keys edit the
//! term; otherwise they navigate and dismiss stories.
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a method on [`App`] for the action (if one doesn't exist).
//! 2. Add a `KeyCode` match arm in [`handle_search_key`] or
//!    [`handle_browse_key`] that calls it.
//! 3. Update the help text in [`crate::ui`].

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, InputMode};

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit = true;
        return;
    }

    match app.mode {
        InputMode::Search => handle_search_key(app, key),
        InputMode::Browse => handle_browse_key(app, key),
    }
}

fn handle_search_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Tab | KeyCode::Down => app.focus_list(),
        KeyCode::Backspace => app.search_pop(),
        // Alt / Ctrl chords are not text.
        KeyCode::Char(c) if key.modifiers.difference(KeyModifiers::SHIFT).is_empty() => {
            app.search_push(c);
        }
        _ => {}
    }
}

fn handle_browse_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Char('/') | KeyCode::Tab => app.focus_search(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::Delete | KeyCode::Char('d') | KeyCode::Char('x') => app.remove_selected(),
        KeyCode::Char('r') => app.remount(),
        _ => {}
    }
}
