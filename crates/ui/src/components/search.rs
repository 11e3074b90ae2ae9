use crate::registry::EntriesReader;
use crate::theme::Theme;

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

/// Jump-to-entry search over the published entries
///
/// Reads only through an [`EntriesReader`]; it never sees the render path.
#[derive(Debug)]
pub struct EntrySearch {
    reader: EntriesReader,
    query: String,
    matches: Vec<usize>,
    current: usize,
    active: bool,
    searched_version: Option<u64>,
}

impl EntrySearch {
    pub fn new(reader: EntriesReader) -> Self {
        Self { reader, query: String::new(), matches: Vec::new(), current: 0, active: false, searched_version: None }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches(&self) -> &[usize] {
        &self.matches
    }

    pub fn start(&mut self) {
        self.active = true;
        self.query.clear();
        self.matches.clear();
        self.current = 0;
        self.searched_version = None;
    }

    pub fn cancel(&mut self) {
        self.active = false;
    }

    pub fn push(&mut self, ch: char) {
        self.query.push(ch);
        self.searched_version = None;
    }

    pub fn backspace(&mut self) {
        self.query.pop();
        self.searched_version = None;
    }

    /// Index of the next match, searching again if the query or the
    /// published entries changed since the last call.
    pub fn submit(&mut self) -> Option<usize> {
        let version = self.reader.version();
        if self.searched_version != Some(version) {
            self.matches = self.reader.find(&self.query);
            self.current = 0;
            self.searched_version = Some(version);
        } else if !self.matches.is_empty() {
            self.current = (self.current + 1) % self.matches.len();
        }

        let index = self.matches.get(self.current).copied();
        tracing::debug!(query = %self.query, matches = self.matches.len(), ?index, "entry search");
        index
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let status = match (self.searched_version, self.matches.len()) {
            (None, _) => String::new(),
            (Some(_), 0) => "  no matches".to_string(),
            (Some(_), n) => format!("  {}/{}", self.current + 1, n),
        };

        let line = Line::from(vec![
            Span::styled("/", Style::default().fg(Theme::BLUE)),
            Span::styled(self.query.clone(), Style::default().fg(Theme::FG)),
            Span::styled("▏", Style::default().fg(Theme::BLUE)),
            Span::styled(status, Theme::muted()),
        ]);
        frame.render_widget(Paragraph::new(line).style(Theme::panel()), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SharedEntries;
    use tailview_core::{ConversationId, Entry, EntrySequence};

    fn registry() -> SharedEntries {
        let registry = SharedEntries::new();
        let entries: EntrySequence = vec![
            Entry::stdout("a", "error: first"),
            Entry::stdout("b", "ok"),
            Entry::stderr("c", "error: second"),
        ]
        .into();
        registry.set_entries(&ConversationId::new("att-1"), entries);
        registry
    }

    #[test]
    fn test_submit_cycles_matches() {
        let registry = registry();
        let mut search = EntrySearch::new(registry.reader());
        search.start();
        for ch in "error".chars() {
            search.push(ch);
        }

        assert_eq!(search.submit(), Some(0));
        assert_eq!(search.submit(), Some(2));
        assert_eq!(search.submit(), Some(0));
    }

    #[test]
    fn test_query_edit_restarts_search() {
        let registry = registry();
        let mut search = EntrySearch::new(registry.reader());
        search.start();
        search.push('o');
        search.push('k');
        assert_eq!(search.submit(), Some(1));

        search.backspace();
        search.backspace();
        search.push('n');
        search.push('d');
        assert_eq!(search.submit(), Some(2));
    }

    #[test]
    fn test_registry_reset_clears_results() {
        let registry = registry();
        let mut search = EntrySearch::new(registry.reader());
        search.start();
        search.push('e');
        assert_eq!(search.submit(), Some(0));

        registry.reset();
        assert_eq!(search.submit(), None);
    }
}
