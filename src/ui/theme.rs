use ratatui::style::{Color, Modifier, Style};

use crate::core::message::LineStyle;

#[derive(Debug, Clone)]
pub struct Theme {
    // Overall background color to paint the full frame
    pub background_color: Color,

    // Transcript styles, one per line role
    pub plain_style: Style,
    pub echo_style: Style,
    pub info_style: Style,
    pub success_style: Style,
    pub warning_style: Style,
    pub error_style: Style,
    pub muted_style: Style,
    pub accent_style: Style,
    pub assistant_style: Style,

    // Chrome
    pub title_style: Style,
    pub status_style: Style,
    pub busy_indicator_style: Style,
    pub picker_selected_style: Style,
    pub picker_style: Style,
    pub suggestion_style: Style,
    pub input_border_style: Style,
    pub input_title_style: Style,

    // Input area
    pub input_text_style: Style,
    pub input_disabled_style: Style,
}

impl Theme {
    pub const NAMES: &'static [&'static str] = &["dark", "light"];

    pub fn dark_default() -> Self {
        Theme {
            background_color: Color::Black,
            plain_style: Style::default().fg(Color::Gray),
            echo_style: Style::default().fg(Color::Green),
            info_style: Style::default().fg(Color::Cyan),
            success_style: Style::default().fg(Color::Green),
            warning_style: Style::default().fg(Color::Yellow),
            error_style: Style::default().fg(Color::Red),
            muted_style: Style::default().fg(Color::DarkGray),
            accent_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            assistant_style: Style::default().fg(Color::LightBlue),

            title_style: Style::default().fg(Color::Gray),
            status_style: Style::default().fg(Color::DarkGray),
            busy_indicator_style: Style::default().fg(Color::Cyan),
            picker_selected_style: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            picker_style: Style::default().fg(Color::Gray),
            suggestion_style: Style::default().fg(Color::Gray),
            input_border_style: Style::default().fg(Color::Gray),
            input_title_style: Style::default().fg(Color::Gray),

            input_text_style: Style::default().fg(Color::Cyan),
            input_disabled_style: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM),
        }
    }

    pub fn light() -> Self {
        Theme {
            background_color: Color::White,
            plain_style: Style::default().fg(Color::Black),
            echo_style: Style::default().fg(Color::Green),
            info_style: Style::default().fg(Color::Blue),
            success_style: Style::default().fg(Color::Green),
            warning_style: Style::default().fg(Color::Rgb(0xb0, 0x6f, 0x00)),
            error_style: Style::default().fg(Color::Red),
            muted_style: Style::default().fg(Color::Gray),
            accent_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            assistant_style: Style::default().fg(Color::Magenta),

            title_style: Style::default().fg(Color::DarkGray),
            status_style: Style::default().fg(Color::Gray),
            busy_indicator_style: Style::default().fg(Color::Blue),
            picker_selected_style: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            picker_style: Style::default().fg(Color::Black),
            suggestion_style: Style::default().fg(Color::DarkGray),
            input_border_style: Style::default().fg(Color::Black),
            input_title_style: Style::default().fg(Color::DarkGray),

            input_text_style: Style::default().fg(Color::Blue),
            input_disabled_style: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::DIM),
        }
    }

    /// Theme for a configured name; unknown names fall back to dark.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "light" => Theme::light(),
            _ => Theme::dark_default(),
        }
    }

    pub fn line_style(&self, style: LineStyle) -> Style {
        match style {
            LineStyle::Plain => self.plain_style,
            LineStyle::Echo => self.echo_style,
            LineStyle::Info => self.info_style,
            LineStyle::Success => self.success_style,
            LineStyle::Warning => self.warning_style,
            LineStyle::Error => self.error_style,
            LineStyle::Muted => self.muted_style,
            LineStyle::Accent => self.accent_style,
            LineStyle::Assistant => self.assistant_style,
        }
    }
}
