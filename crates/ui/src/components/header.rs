use crate::theme::Theme;

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};
use tailview_core::ConversationId;

/// Conversation tabs plus the selected project label
pub struct Header<'a> {
    conversations: &'a [ConversationId],
    active: Option<usize>,
    project: &'a str,
}

impl<'a> Header<'a> {
    pub fn new(conversations: &'a [ConversationId], active: Option<usize>, project: &'a str) -> Self {
        Self { conversations, active, project }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let mut spans = vec![
            Span::styled(" tailview ", Style::default().fg(Theme::BG).bg(Theme::BLUE)),
            Span::styled(format!(" {} ", self.project), Style::default().fg(Theme::PURPLE)),
            Span::styled("│", Theme::border()),
        ];

        for (index, conversation) in self.conversations.iter().enumerate() {
            let style = if Some(index) == self.active { Theme::active() } else { Theme::muted() };
            spans.push(Span::styled(format!(" {} ", conversation), style));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)).style(Theme::base()), area);
    }
}
