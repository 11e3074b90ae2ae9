use crate::theme::Theme;

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use tailview_core::EditorEmbed;

pub const EDITOR_TITLE: &str = "Code Editor";
pub const NO_EDITOR: &str = "No editor available";

/// Panel standing in for the embedded editor frame
pub struct EditorPanel<'a> {
    embed: &'a EditorEmbed,
}

impl<'a> EditorPanel<'a> {
    pub fn new(embed: &'a EditorEmbed) -> Self {
        Self { embed }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let title = Line::from(vec![
            Span::styled(" ● ", Style::default().fg(Theme::RED)),
            Span::styled("● ", Style::default().fg(Theme::YELLOW)),
            Span::styled("● ", Style::default().fg(Theme::GREEN)),
            Span::styled(EDITOR_TITLE, Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD)),
            Span::raw(" "),
        ]);
        let block = Block::default().borders(Borders::ALL).border_style(Theme::border()).title(title).style(Theme::panel());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(url) = self.embed.url() else {
            let row = Rect { x: inner.x, y: inner.y + inner.height / 2, width: inner.width, height: inner.height.min(1) };
            frame.render_widget(
                Paragraph::new(Line::styled(NO_EDITOR, Style::default().fg(Theme::MUTED))).alignment(Alignment::Center),
                row,
            );
            return;
        };

        let label = Style::default().fg(Theme::MUTED);
        let value = Style::default().fg(Theme::FG);
        let lines = vec![
            Line::styled("url", label),
            Line::styled(url.to_string(), Style::default().fg(Theme::CYAN)),
            Line::default(),
            Line::styled("sandbox", label),
            Line::styled(EditorEmbed::sandbox(), value),
            Line::default(),
            Line::styled("allow", label),
            Line::styled(EditorEmbed::allow(), value),
            Line::default(),
            Line::from(vec![Span::styled("[o]", Style::default().fg(Theme::BLUE)), Span::styled(" open in browser", label)]),
        ];
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}

/// Hand the embed URL to the system browser; `false` when there is none
pub fn open_in_browser(embed: &EditorEmbed) -> std::io::Result<bool> {
    match embed.url() {
        Some(url) => {
            tracing::info!(url, "opening editor in browser");
            open::that(url)?;
            Ok(true)
        }
        None => Ok(false),
    }
}
