use crate::theme::Theme;

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

/// Thumb offset and length for a track of `track` rows
///
/// Position is derived from the anchor entry over the entry count, so it
/// never needs the total row height of the list.
pub fn thumb(track: u16, anchor: usize, len: usize, visible: usize) -> Option<(u16, u16)> {
    if track <= 1 || len == 0 || visible >= len {
        return None;
    }

    let track_rows = track as usize;
    let size = (track_rows * visible).div_ceil(len).clamp(1, track_rows);
    let travel = track_rows - size;
    let scrollable = len - visible;
    let offset = (anchor.min(scrollable) * travel).div_ceil(scrollable.max(1));

    Some((offset as u16, size as u16))
}

/// Render the one-column position indicator
pub fn render_scrollbar(frame: &mut Frame<'_>, area: Rect, anchor: usize, len: usize, visible: usize) {
    let Some((offset, size)) = thumb(area.height, anchor, len, visible) else {
        return;
    };

    for y in 0..area.height {
        let is_thumb = y >= offset && y < offset + size;
        let style = if is_thumb {
            Style::default().fg(Theme::BLUE).bg(Theme::BG)
        } else {
            Style::default().fg(Theme::BORDER).bg(Theme::BG)
        };

        frame.render_widget(
            Paragraph::new(Line::from(vec![Span::styled("|", style)])),
            Rect::new(area.x, area.y + y, 1, 1),
        );
    }
}
