use ratatui::style::{Color, Modifier, Style};

/// Iceberg color theme for the tailview TUI
///
/// Based on iceberg.vim color scheme (https://github.com/cocopon/iceberg.vim)
#[derive(Debug, Clone, Copy)]
pub struct Theme;

impl Theme {
    /// Primary background: deep blue-black (fills terminal)
    pub const BG: Color = Color::Rgb(22, 24, 33);

    /// Foreground: light blue-gray (primary text)
    pub const FG: Color = Color::Rgb(198, 200, 209);

    /// Secondary background: panels, overlays, popups
    pub const PANEL_BG: Color = Color::Rgb(30, 33, 50);

    /// Hover/active states: visual selection
    pub const ACTIVE: Color = Color::Rgb(39, 44, 66);

    pub const BLUE: Color = Color::Rgb(132, 160, 198);
    pub const CYAN: Color = Color::Rgb(137, 184, 194);
    pub const PURPLE: Color = Color::Rgb(160, 147, 199);
    pub const GREEN: Color = Color::Rgb(180, 190, 130);
    pub const YELLOW: Color = Color::Rgb(226, 164, 120);
    pub const RED: Color = Color::Rgb(226, 120, 120);

    /// Muted text: dimmed foreground
    pub const MUTED: Color = Color::Rgb(107, 112, 137);

    pub const BORDER: Color = Color::Rgb(60, 65, 90);

    /// Base style for all text
    pub fn base() -> Style {
        Style::default().fg(Self::FG).bg(Self::BG)
    }

    pub fn muted() -> Style {
        Style::default().fg(Self::MUTED).bg(Self::BG)
    }

    pub fn panel() -> Style {
        Style::default().fg(Self::FG).bg(Self::PANEL_BG)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    /// Active (selected) style
    pub fn active() -> Style {
        Style::default().fg(Self::FG).bg(Self::ACTIVE).add_modifier(Modifier::BOLD)
    }

    /// Raw output style per stream
    pub fn stream(stderr: bool) -> Style {
        if stderr { Style::default().fg(Self::RED) } else { Style::default().fg(Self::FG) }
    }

    /// Accent for a normalized event's type label
    pub fn event_color(label: &str) -> Color {
        match label {
            "user_message" => Self::GREEN,
            "assistant_message" => Self::BLUE,
            "tool_use" => Self::YELLOW,
            "thinking" => Self::PURPLE,
            "error_message" => Self::RED,
            "system_message" => Self::MUTED,
            _ => Self::CYAN,
        }
    }
}
