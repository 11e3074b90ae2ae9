use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Layout breakpoints for the viewer
///
/// - >= 100 cols: editor panel beside the list
/// - < 100 cols: editor panel below the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    Wide,
    Narrow,
}

impl From<u16> for LayoutMode {
    fn from(width: u16) -> Self {
        if width >= 100 { Self::Wide } else { Self::Narrow }
    }
}

/// Calculated areas for one frame
#[derive(Debug, Clone)]
pub struct ViewerLayout {
    pub mode: LayoutMode,
    /// Conversation tabs (1 line)
    pub header: Rect,
    /// Entry list, scrollbar included
    pub list: Rect,
    /// Editor embed panel when shown
    pub editor: Option<Rect>,
    /// Status line (1 line)
    pub footer: Rect,
}

impl ViewerLayout {
    pub fn calculate(area: Rect, editor_visible: bool) -> Self {
        let mode = LayoutMode::from(area.width);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
            .split(area);

        let (header, main, footer) = (chunks[0], chunks[1], chunks[2]);

        if !editor_visible {
            return Self { mode, header, list: main, editor: None, footer };
        }

        let direction = match mode {
            LayoutMode::Wide => Direction::Horizontal,
            LayoutMode::Narrow => Direction::Vertical,
        };
        let split = Layout::default()
            .direction(direction)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main);

        Self { mode, header, list: split[0], editor: Some(split[1]), footer }
    }
}

/// Split off the one-column scrollbar on the right of a list area
pub fn with_scrollbar(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Centered popup of at most `width` x `height` inside `area`
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_mode_breakpoint() {
        assert_eq!(LayoutMode::from(120), LayoutMode::Wide);
        assert_eq!(LayoutMode::from(100), LayoutMode::Wide);
        assert_eq!(LayoutMode::from(99), LayoutMode::Narrow);
    }

    #[test]
    fn test_layout_without_editor() {
        let layout = ViewerLayout::calculate(Rect::new(0, 0, 120, 30), false);
        assert_eq!(layout.header.height, 1);
        assert_eq!(layout.footer.height, 1);
        assert_eq!(layout.list.height, 28);
        assert!(layout.editor.is_none());
    }

    #[test]
    fn test_wide_editor_is_beside_list() {
        let layout = ViewerLayout::calculate(Rect::new(0, 0, 120, 30), true);
        let editor = layout.editor.unwrap();
        assert_eq!(editor.y, layout.list.y);
        assert_eq!(layout.list.width + editor.width, 120);
    }

    #[test]
    fn test_narrow_editor_is_below_list() {
        let layout = ViewerLayout::calculate(Rect::new(0, 0, 80, 30), true);
        let editor = layout.editor.unwrap();
        assert_eq!(editor.x, layout.list.x);
        assert_eq!(layout.list.height + editor.height, 28);
    }

    #[test]
    fn test_list_body_reserves_scrollbar() {
        let layout = ViewerLayout::calculate(Rect::new(0, 0, 80, 10), false);
        let (body, bar) = with_scrollbar(layout.list);
        assert_eq!(body.width, 79);
        assert_eq!(bar.width, 1);
    }

    #[test]
    fn test_centered_clamps() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered(area, 10, 4), Rect::new(5, 3, 10, 4));
        assert_eq!(centered(area, 50, 50), area);
    }
}
