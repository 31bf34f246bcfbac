use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, Command};
use crate::focus::NavKey;

// --- Key mapping ---

/// Arrow keys, vim-style aliases, Enter and the favorite key.
pub fn nav_key(key: &KeyEvent) -> Option<NavKey> {
  match key.code {
    KeyCode::Up | KeyCode::Char('k') => Some(NavKey::Up),
    KeyCode::Down | KeyCode::Char('j') => Some(NavKey::Down),
    KeyCode::Left | KeyCode::Char('h') => Some(NavKey::Left),
    KeyCode::Right | KeyCode::Char('l') => Some(NavKey::Right),
    KeyCode::Enter => Some(NavKey::Enter),
    KeyCode::Char('f') | KeyCode::Char('F') => Some(NavKey::Favorite),
    _ => None,
  }
}

// --- Event Handling ---

pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Vec<Command> {
  if key.kind != KeyEventKind::Press {
    return Vec::new();
  }

  if key.modifiers.contains(KeyModifiers::CONTROL) {
    match key.code {
      KeyCode::Char('c') => app.should_quit = true,
      KeyCode::Char('t') => app.next_theme(),
      _ => {}
    }
    return Vec::new();
  }

  match key.code {
    KeyCode::Char('q') => {
      app.should_quit = true;
      Vec::new()
    }
    KeyCode::Char('r') | KeyCode::Char('R') => app.retry(),
    KeyCode::Esc => {
      if app.load_error.is_some() {
        app.dismiss_error();
      } else if app.focus.in_grid() {
        app.leave_grid();
      } else {
        app.should_quit = true;
      }
      Vec::new()
    }
    _ => match nav_key(&key) {
      Some(nav) => app.navigate(nav),
      None => Vec::new(),
    },
  }
}
