use super::loading::LoadingOverlay;
use super::scrollbar::render_scrollbar;
use crate::layout::with_scrollbar;
use crate::theme::Theme;
use crate::view::ConversationView;
use crate::viewport::{EventRenderer, RowContext, VirtualList};

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    text::Line,
    widgets::{Block, Paragraph},
};

/// The entry list with its scrollbar, or the loading overlay
///
/// Layout of the virtual list runs on every frame, overlay or not, so the
/// pinned state keeps tracking while the backlog loads.
pub struct LogView<'a> {
    view: &'a ConversationView,
    list: &'a mut VirtualList,
    events: &'a dyn EventRenderer,
    tick: usize,
}

impl<'a> LogView<'a> {
    pub fn new(view: &'a ConversationView, list: &'a mut VirtualList, events: &'a dyn EventRenderer) -> Self {
        Self { view, list, events, tick: 0 }
    }

    pub fn tick(mut self, tick: usize) -> Self {
        self.tick = tick;
        self
    }

    pub fn render(self, frame: &mut Frame<'_>, area: Rect) {
        let (body, bar) = with_scrollbar(area);

        let lines = match self.view.state() {
            Some(state) => {
                let ctx = RowContext {
                    conversation: state.conversation(),
                    expansion: &state.expansion,
                    events: self.events,
                };
                self.list.layout(&state.entries, &ctx, body)
            }
            None => Vec::new(),
        };

        if self.view.is_loading() {
            LoadingOverlay::new(self.tick).render(frame, area);
            return;
        }

        frame.render_widget(Block::default().style(Theme::base()), area);

        if self.list.is_empty() {
            let row = Rect { x: body.x, y: body.y + body.height / 2, width: body.width, height: body.height.min(1) };
            frame.render_widget(
                Paragraph::new(Line::styled("No entries", Theme::muted())).alignment(Alignment::Center),
                row,
            );
            return;
        }

        frame.render_widget(Paragraph::new(lines).style(Theme::base()), body);

        let visible = self.list.visible_range().len();
        render_scrollbar(frame, bar, self.list.anchor_index(), self.list.len(), visible);
    }
}
