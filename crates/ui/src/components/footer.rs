use crate::theme::Theme;
use crate::view::ConversationView;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Status line: conversation, entry count, follow state, key hints
pub struct Footer<'a> {
    view: &'a ConversationView,
    message: Option<&'a str>,
}

impl<'a> Footer<'a> {
    pub fn new(view: &'a ConversationView) -> Self {
        Self { view, message: None }
    }

    /// Transient message shown after the status
    pub fn message(mut self, message: Option<&'a str>) -> Self {
        self.message = message;
        self
    }

    /// `FOLLOW` while pinned to the bottom, `PAUSED` once scrolled up
    pub fn follow_label(&self) -> &'static str {
        if self.view.is_at_bottom() { "FOLLOW" } else { "PAUSED" }
    }

    pub fn status_spans(&self) -> Vec<Span<'static>> {
        let muted = Theme::muted();
        let Some(state) = self.view.state() else {
            return vec![Span::styled(" no conversation", muted)];
        };

        let follow_style = if self.view.is_at_bottom() {
            Style::default().fg(Theme::BG).bg(Theme::GREEN).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Theme::BG).bg(Theme::YELLOW).add_modifier(Modifier::BOLD)
        };

        let mut spans = vec![
            Span::styled(format!(" {} ", self.follow_label()), follow_style),
            Span::styled(format!(" {}", state.conversation()), Style::default().fg(Theme::CYAN)),
            Span::styled(format!(" · {} entries", state.entries.len()), muted),
        ];

        if state.loading {
            spans.push(Span::styled(" · loading", Style::default().fg(Theme::YELLOW)));
        }

        if let Some(updated_at) = state.updated_at {
            spans.push(Span::styled(format!(" · updated {}", updated_at.format("%H:%M:%S")), muted));
        }

        if let Some(message) = self.message {
            spans.push(Span::styled(format!(" · {message}"), Style::default().fg(Theme::PURPLE)));
        }

        spans
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(46)])
            .split(area);

        frame.render_widget(Paragraph::new(Line::from(self.status_spans())).style(Theme::base()), chunks[0]);

        let key = Style::default().fg(Theme::BLUE);
        let muted = Theme::muted();
        let hints = Line::from(vec![
            Span::styled("[G]", key),
            Span::styled(" end ", muted),
            Span::styled("[/]", key),
            Span::styled(" find ", muted),
            Span::styled("[e]", key),
            Span::styled(" editor ", muted),
            Span::styled("[p]", key),
            Span::styled(" projects ", muted),
            Span::styled("[q]", key),
            Span::styled(" quit", muted),
        ]);
        frame.render_widget(Paragraph::new(hints).alignment(Alignment::Right).style(Theme::base()), chunks[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::{FollowOutput, ScrollHandle, ScrollTarget};
    use tailview_core::ConversationId;

    struct Noop;

    impl ScrollHandle for Noop {
        fn scroll_to_index(&mut self, _target: ScrollTarget) {}
        fn set_follow_output(&mut self, _follow: FollowOutput) {}
    }

    #[test]
    fn test_follow_label_tracks_pinning() {
        let mut view = ConversationView::new(5);
        view.switch_to(Some(ConversationId::new("att-1")));
        assert_eq!(Footer::new(&view).follow_label(), "FOLLOW");

        view.on_bottom_state_change(false, &mut Noop);
        assert_eq!(Footer::new(&view).follow_label(), "PAUSED");
    }

    #[test]
    fn test_status_without_conversation() {
        let view = ConversationView::new(5);
        let text: String = Footer::new(&view).status_spans().iter().map(|s| s.content.to_string()).collect();
        assert_eq!(text, " no conversation");
    }
}
