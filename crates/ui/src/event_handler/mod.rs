mod key_action;

pub use key_action::KeyAction;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};
use std::time::Duration;

/// Rows moved per mouse wheel notch
const WHEEL_ROWS: i64 = 3;

/// Which surface currently receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Projects,
    Search,
}

/// Event handler for the TUI application
pub struct EventHandler;

impl EventHandler {
    /// Read a single event from the terminal
    ///
    /// Returns `Some(event)` if an event is available, `None` on timeout or error.
    pub fn read(timeout: Duration) -> Option<Event> {
        match crossterm::event::poll(timeout) {
            Ok(true) => match crossterm::event::read() {
                Ok(event) => Some(event),
                Err(e) => {
                    tracing::warn!(error = %e, "terminal read failed");
                    None
                }
            },
            Ok(false) => None,
            Err(e) => {
                tracing::warn!(error = %e, "event poll failed");
                None
            }
        }
    }

    pub fn handle_event(event: &Event, mode: InputMode) -> Option<KeyAction> {
        match event {
            Event::Key(key_event) => Self::handle_key_event(*key_event, mode),
            Event::Mouse(mouse_event) if mode == InputMode::Normal => Self::handle_mouse_event(*mouse_event),
            _ => None,
        }
    }

    pub fn handle_key_event(event: KeyEvent, mode: InputMode) -> Option<KeyAction> {
        if event.kind != KeyEventKind::Press {
            return None;
        }

        if event.modifiers.contains(KeyModifiers::CONTROL) && event.code == KeyCode::Char('c') {
            return Some(KeyAction::Quit);
        }

        match mode {
            InputMode::Normal => Self::handle_normal_key(event),
            InputMode::Projects => Self::handle_projects_key(event),
            InputMode::Search => Self::handle_search_key(event),
        }
    }

    fn handle_normal_key(event: KeyEvent) -> Option<KeyAction> {
        let action = match event.code {
            KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('j') | KeyCode::Down => KeyAction::ScrollLines(1),
            KeyCode::Char('k') | KeyCode::Up => KeyAction::ScrollLines(-1),
            KeyCode::Char('d') if event.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::PageDown,
            KeyCode::Char('u') if event.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::PageUp,
            KeyCode::PageDown | KeyCode::Char(' ') => KeyAction::PageDown,
            KeyCode::PageUp => KeyAction::PageUp,
            KeyCode::Home | KeyCode::Char('g') => KeyAction::ScrollTop,
            KeyCode::End | KeyCode::Char('G') => KeyAction::ScrollBottom,
            KeyCode::Tab | KeyCode::Char(']') => KeyAction::NextConversation,
            KeyCode::BackTab | KeyCode::Char('[') => KeyAction::PrevConversation,
            KeyCode::Enter => KeyAction::ToggleExpansion,
            KeyCode::Char('e') => KeyAction::ToggleEditor,
            KeyCode::Char('o') => KeyAction::OpenEditor,
            KeyCode::Char('p') => KeyAction::ToggleProjects,
            KeyCode::Char('/') => KeyAction::StartSearch,
            _ => return None,
        };
        Some(action)
    }

    fn handle_projects_key(event: KeyEvent) -> Option<KeyAction> {
        match event.code {
            KeyCode::Char('j') | KeyCode::Down => Some(KeyAction::ProjectDown),
            KeyCode::Char('k') | KeyCode::Up => Some(KeyAction::ProjectUp),
            KeyCode::Enter => Some(KeyAction::ProjectSelect),
            KeyCode::Esc | KeyCode::Char('p') | KeyCode::Char('q') => Some(KeyAction::ProjectClose),
            _ => None,
        }
    }

    fn handle_search_key(event: KeyEvent) -> Option<KeyAction> {
        match event.code {
            KeyCode::Enter => Some(KeyAction::SearchSubmit),
            KeyCode::Esc => Some(KeyAction::SearchCancel),
            KeyCode::Backspace => Some(KeyAction::SearchBackspace),
            KeyCode::Char(c) => Some(KeyAction::SearchInput(c)),
            _ => None,
        }
    }

    fn handle_mouse_event(event: MouseEvent) -> Option<KeyAction> {
        match event.kind {
            MouseEventKind::ScrollUp => Some(KeyAction::ScrollLines(-WHEEL_ROWS)),
            MouseEventKind::ScrollDown => Some(KeyAction::ScrollLines(WHEEL_ROWS)),
            _ => None,
        }
    }
}
