use super::App;
use crate::components::{EditorPanel, Footer, Header, LogView};
use crate::layout::ViewerLayout;
use crate::theme::Theme;

use ratatui::{Frame, widgets::Block};

pub fn render(app: &mut App, frame: &mut Frame<'_>) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Theme::base()), area);

    let layout = ViewerLayout::calculate(area, app.editor_visible);

    Header::new(&app.conversations, app.active, app.projects.label()).render(frame, layout.header);

    LogView::new(&app.view, &mut app.list, app.events.as_ref())
        .tick(app.tick)
        .render(frame, layout.list);

    if let Some(editor_area) = layout.editor {
        EditorPanel::new(&app.editor).render(frame, editor_area);
    }

    if app.search.is_active() {
        app.search.render(frame, layout.footer);
    } else {
        Footer::new(&app.view).message(app.status.as_deref()).render(frame, layout.footer);
    }

    app.projects.render(frame, area);
}
