use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::message::TranscriptLine;
use crate::core::page::{PageView, PickerView};
use crate::ui::theme::Theme;

const SPINNER_FRAMES: [&str; 3] = ["○", "◐", "●"];
const MAX_SUGGESTIONS: usize = 6;

/// Transcript scroll position, counted in wrapped rows above the bottom.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollState {
    pub from_bottom: u16,
}

impl ScrollState {
    pub fn page_up(&mut self, rows: u16) {
        self.from_bottom = self.from_bottom.saturating_add(rows.max(1));
    }

    pub fn page_down(&mut self, rows: u16) {
        self.from_bottom = self.from_bottom.saturating_sub(rows.max(1));
    }

    pub fn to_bottom(&mut self) {
        self.from_bottom = 0;
    }
}

pub fn spinner_symbol(frame: usize) -> &'static str {
    SPINNER_FRAMES[frame % SPINNER_FRAMES.len()]
}

/// Breaks transcript lines into display rows no wider than `width` columns.
///
/// Words that do not fit move to the next row and words wider than a row are
/// split. The transcript is drawn from these rows without `Wrap`, so the row
/// count used for scrolling is exactly what ends up on screen.
pub fn wrap_rows(lines: &[TranscriptLine], width: u16, theme: &Theme) -> Vec<Line<'static>> {
    let width = usize::from(width);
    let mut rows = RowBuilder {
        width,
        rows: Vec::with_capacity(lines.len()),
        spans: Vec::new(),
        used: 0,
    };

    for line in lines {
        let first_row = rows.rows.len();
        let mut word: Vec<(char, Style, usize)> = Vec::new();
        for segment in line.segments() {
            let style = theme.line_style(segment.style);
            for ch in segment.text.chars() {
                if ch == ' ' && width > 0 {
                    rows.place_word(&mut word);
                    if rows.used < width {
                        rows.push_char(' ', style, 1);
                    } else {
                        rows.finish_row();
                    }
                } else {
                    word.push((ch, style, UnicodeWidthChar::width(ch).unwrap_or(0)));
                }
            }
        }
        rows.place_word(&mut word);
        if !rows.spans.is_empty() || rows.rows.len() == first_row {
            rows.finish_row();
        }
    }

    rows.rows
}

struct RowBuilder {
    width: usize,
    rows: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    used: usize,
}

impl RowBuilder {
    fn finish_row(&mut self) {
        self.rows.push(Line::from(std::mem::take(&mut self.spans)));
        self.used = 0;
    }

    fn push_char(&mut self, ch: char, style: Style, cols: usize) {
        self.used += cols;
        if let Some(last) = self.spans.last_mut() {
            if last.style == style {
                last.content.to_mut().push(ch);
                return;
            }
        }
        self.spans.push(Span::styled(ch.to_string(), style));
    }

    fn place_word(&mut self, word: &mut Vec<(char, Style, usize)>) {
        if word.is_empty() {
            return;
        }
        // Zero width means the area is collapsed; keep each line on one row.
        if self.width == 0 {
            for (ch, style, cols) in word.drain(..) {
                self.push_char(ch, style, cols);
            }
            return;
        }

        let word_cols: usize = word.iter().map(|(_, _, cols)| cols).sum();
        if self.used > 0 && self.used + word_cols > self.width {
            self.finish_row();
        }
        for (ch, style, cols) in word.drain(..) {
            if self.used > 0 && self.used + cols > self.width {
                self.finish_row();
            }
            self.push_char(ch, style, cols);
        }
    }
}

fn page_layout(area: Rect, view: &PageView<'_>) -> (Rect, Rect, Option<Rect>, Option<Rect>, Rect) {
    let picker_height = view
        .picker
        .as_ref()
        .map(|picker| picker.options.len() as u16 + 2)
        .unwrap_or(0);
    let suggestion_height = view.suggestions.len().min(MAX_SUGGESTIONS) as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(picker_height),
            Constraint::Length(suggestion_height),
            Constraint::Length(3), // one input row plus borders
        ])
        .split(area);

    let picker = (picker_height > 0).then_some(chunks[2]);
    let suggestions = (suggestion_height > 0).then_some(chunks[3]);
    (chunks[0], chunks[1], picker, suggestions, chunks[4])
}

/// Draw one frame of a page.
///
/// `scroll` is clamped to the rows the transcript actually has, so paging up
/// past the top is harmless.
pub fn draw_page(
    f: &mut Frame,
    view: &PageView<'_>,
    theme: &Theme,
    scroll: &mut ScrollState,
    spinner_frame: usize,
) {
    f.render_widget(
        Block::default().style(Style::default().bg(theme.background_color)),
        f.area(),
    );

    let (header, body, picker_area, suggestion_area, input_area) = page_layout(f.area(), view);

    let mut header_spans = vec![Span::styled(view.title, theme.title_style)];
    if let Some(status) = view.status.as_deref() {
        header_spans.push(Span::raw("  "));
        header_spans.push(Span::styled(status, theme.status_style));
    }
    f.render_widget(Paragraph::new(Line::from(header_spans)), header);

    let rows = wrap_rows(view.transcript.lines(), body.width, theme);
    let total_rows = u16::try_from(rows.len()).unwrap_or(u16::MAX);
    let max_offset = total_rows.saturating_sub(body.height);
    scroll.from_bottom = scroll.from_bottom.min(max_offset);
    let top = max_offset - scroll.from_bottom;

    f.render_widget(Paragraph::new(rows).scroll((top, 0)), body);

    if let (Some(area), Some(picker)) = (picker_area, view.picker.as_ref()) {
        draw_picker(f, area, picker, theme);
    }

    if let Some(area) = suggestion_area {
        let rows: Vec<Line> = view
            .suggestions
            .iter()
            .take(MAX_SUGGESTIONS)
            .map(|row| Line::styled(row.as_str(), theme.suggestion_style))
            .collect();
        f.render_widget(Paragraph::new(rows), area);
    }

    draw_input(f, input_area, view, theme, spinner_frame);
}

fn draw_picker(f: &mut Frame, area: Rect, picker: &PickerView, theme: &Theme) {
    let items: Vec<ListItem> = picker
        .options
        .iter()
        .map(|option| ListItem::new(option.as_str()))
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.input_border_style),
        )
        .style(theme.picker_style)
        .highlight_style(theme.picker_selected_style)
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(picker.selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_input(f: &mut Frame, area: Rect, view: &PageView<'_>, theme: &Theme, spinner_frame: usize) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.input_border_style)
        .title(Span::styled(view.input_title.as_str(), theme.input_title_style));

    let content = if view.busy {
        Line::from(vec![
            Span::styled(spinner_symbol(spinner_frame), theme.busy_indicator_style),
            Span::raw(" "),
            Span::styled(view.busy_label, theme.input_disabled_style),
        ])
    } else {
        Line::styled(view.input, theme.input_text_style)
    };

    f.render_widget(Paragraph::new(content).block(block), area);

    if !view.busy {
        let inner_width = area.width.saturating_sub(2);
        let typed = UnicodeWidthStr::width(view.input) as u16;
        let cursor_x = (typed + 1).min(inner_width);
        f.set_cursor_position((area.x + cursor_x, area.y + 1));
    }
}
