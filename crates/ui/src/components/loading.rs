use crate::theme::Theme;

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub const LOADING_TEXT: &str = "Loading History";

/// Opaque overlay covering the whole list area while history loads
pub struct LoadingOverlay {
    tick: usize,
}

impl LoadingOverlay {
    pub fn new(tick: usize) -> Self {
        Self { tick }
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER[self.tick % SPINNER.len()]
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        frame.render_widget(Clear, area);
        frame.render_widget(Block::default().style(Theme::base()), area);

        if area.height == 0 {
            return;
        }

        let line = Line::from(vec![
            Span::styled(self.spinner(), Style::default().fg(Theme::BLUE)),
            Span::raw(" "),
            Span::styled(LOADING_TEXT, Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD)),
        ]);
        let row = Rect { x: area.x, y: area.y + area.height / 2, width: area.width, height: 1 };
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), row);
    }
}
