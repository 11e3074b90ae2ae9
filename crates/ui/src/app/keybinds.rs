use super::App;
use crate::components::editor_embed::open_in_browser;
use crate::event_handler::{EventHandler, InputMode, KeyAction};
use crate::scroll::{Align, ScrollHandle, ScrollTarget};

use crossterm::event::Event;

pub fn handle_event(app: &mut App, event: &Event) {
    if let Some(action) = EventHandler::handle_event(event, app.mode) {
        handle_action(app, action);
    }
}

pub fn handle_action(app: &mut App, action: KeyAction) {
    match action {
        KeyAction::Quit => app.should_exit = true,
        KeyAction::ScrollLines(delta) => app.list.scroll_lines(delta),
        KeyAction::PageUp => app.list.page(false),
        KeyAction::PageDown => app.list.page(true),
        KeyAction::ScrollTop => app.list.scroll_to_top(),
        KeyAction::ScrollBottom => app.list.scroll_to_bottom(),
        KeyAction::NextConversation => app.cycle_conversation(true),
        KeyAction::PrevConversation => app.cycle_conversation(false),
        KeyAction::ToggleExpansion => app.toggle_focused_expansion(),
        KeyAction::ToggleEditor => app.editor_visible = !app.editor_visible,
        KeyAction::OpenEditor => open_editor(app),
        KeyAction::ToggleProjects => {
            app.projects.toggle();
            app.mode = if app.projects.is_open() { InputMode::Projects } else { InputMode::Normal };
        }
        KeyAction::ProjectUp => app.projects.previous(),
        KeyAction::ProjectDown => app.projects.next(),
        KeyAction::ProjectSelect => {
            if let Some(route) = app.projects.confirm() {
                tracing::info!(route = %route.path(), "project selected");
                app.status = Some(format!("project {}", route.path()));
                app.route = Some(route);
            }
            app.projects.close();
            app.mode = InputMode::Normal;
        }
        KeyAction::ProjectClose => {
            app.projects.close();
            app.mode = InputMode::Normal;
        }
        KeyAction::StartSearch => {
            app.search.start();
            app.mode = InputMode::Search;
        }
        KeyAction::SearchInput(ch) => app.search.push(ch),
        KeyAction::SearchBackspace => app.search.backspace(),
        KeyAction::SearchSubmit => match app.search.submit() {
            Some(index) => app.list.scroll_to_index(ScrollTarget::new(index, Align::Center)),
            None => app.status = Some(format!("no match for {:?}", app.search.query())),
        },
        KeyAction::SearchCancel => {
            app.search.cancel();
            app.mode = InputMode::Normal;
        }
    }
}

fn open_editor(app: &mut App) {
    match open_in_browser(&app.editor) {
        Ok(true) => app.status = Some("opened editor".to_string()),
        Ok(false) => app.status = Some("no editor available".to_string()),
        Err(e) => {
            tracing::warn!(error = %e, "failed to open editor");
            app.status = Some(format!("failed to open editor: {e}"));
        }
    }
}
