use crate::layout::centered;
use crate::theme::Theme;

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
};
use tailview_core::{Project, Route};

pub const PLACEHOLDER: &str = "Select a project";

/// Single-select list of projects
///
/// The current selection is the only state kept; the highlight exists only
/// while the popup is open.
#[derive(Debug, Clone, Default)]
pub struct ProjectSelector {
    projects: Vec<Project>,
    selected: Option<usize>,
    highlighted: usize,
    open: bool,
}

impl ProjectSelector {
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects, selected: None, highlighted: 0, open: false }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn selected(&self) -> Option<&Project> {
        self.selected.and_then(|index| self.projects.get(index))
    }

    /// Label shown in the selector: selected name or the placeholder
    pub fn label(&self) -> &str {
        self.selected().map(|project| project.name.as_str()).unwrap_or(PLACEHOLDER)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.highlighted = self.selected.unwrap_or(0);
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self) {
        if self.open { self.close() } else { self.open() }
    }

    pub fn next(&mut self) {
        if !self.projects.is_empty() {
            self.highlighted = (self.highlighted + 1) % self.projects.len();
        }
    }

    pub fn previous(&mut self) {
        if !self.projects.is_empty() {
            self.highlighted = (self.highlighted + self.projects.len() - 1) % self.projects.len();
        }
    }

    /// Select the highlighted project and return its task-list route
    pub fn confirm(&mut self) -> Option<Route> {
        let project = self.projects.get(self.highlighted)?;
        let route = Route::ProjectTasks(project.id.clone());
        self.selected = Some(self.highlighted);
        self.open = false;
        Some(route)
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        if !self.open {
            return;
        }

        let height = (self.projects.len() as u16).max(1) + 2;
        let popup = centered(area, 40, height);
        frame.render_widget(Clear, popup);

        let title = Line::from(vec![Span::raw(" "), Span::styled(self.label().to_string(), Style::default().fg(Theme::FG)), Span::raw(" ")]);
        let block = Block::default().borders(Borders::ALL).border_style(Theme::border()).title(title).style(Theme::panel());

        if self.projects.is_empty() {
            let items = vec![ListItem::new(Line::styled("No projects configured", Theme::muted()))];
            frame.render_widget(List::new(items).block(block), popup);
            return;
        }

        let items: Vec<ListItem> = self
            .projects
            .iter()
            .map(|project| ListItem::new(Line::from(project.name.clone())))
            .collect();

        let mut state = ListState::default().with_selected(Some(self.highlighted));
        frame.render_stateful_widget(
            List::new(items).block(block).highlight_style(Theme::active()).highlight_symbol("› "),
            popup,
            &mut state,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> ProjectSelector {
        ProjectSelector::new(vec![Project::new("p1", "Backend"), Project::new("p2", "Frontend")])
    }

    #[test]
    fn test_placeholder_until_selected() {
        let mut selector = selector();
        assert_eq!(selector.label(), PLACEHOLDER);

        selector.open();
        selector.next();
        let route = selector.confirm().unwrap();
        assert_eq!(route.path(), "/projects/p2/tasks");
        assert_eq!(selector.label(), "Frontend");
        assert!(!selector.is_open());
    }

    #[test]
    fn test_highlight_wraps() {
        let mut selector = selector();
        selector.open();
        selector.previous();
        assert_eq!(selector.confirm().map(|r| r.to_string()), Some("/projects/p2/tasks".to_string()));
    }

    #[test]
    fn test_reopen_highlights_selection() {
        let mut selector = selector();
        selector.open();
        selector.next();
        selector.confirm();

        selector.open();
        assert_eq!(selector.confirm().map(|r| r.path()), Some("/projects/p2/tasks".to_string()));
    }

    #[test]
    fn test_empty_list_confirms_nothing() {
        let mut selector = ProjectSelector::new(Vec::new());
        selector.open();
        selector.next();
        assert!(selector.confirm().is_none());
        assert_eq!(selector.label(), PLACEHOLDER);
    }
}
