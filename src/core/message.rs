/// Visual role of a transcript segment; the theme maps each to a style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineStyle {
    Plain,
    /// The user's own input repeated back.
    Echo,
    Info,
    Success,
    Warning,
    Error,
    Muted,
    Accent,
    Assistant,
}

impl LineStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            LineStyle::Plain => "plain",
            LineStyle::Echo => "echo",
            LineStyle::Info => "info",
            LineStyle::Success => "success",
            LineStyle::Warning => "warning",
            LineStyle::Error => "error",
            LineStyle::Muted => "muted",
            LineStyle::Accent => "accent",
            LineStyle::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub style: LineStyle,
    pub text: String,
}

/// One row of terminal output made of styled segments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranscriptLine {
    segments: Vec<Segment>,
}

impl TranscriptLine {
    pub fn new(style: LineStyle, text: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment {
                style,
                text: text.into(),
            }],
        }
    }

    pub fn blank() -> Self {
        Self::default()
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(LineStyle::Plain, text)
    }

    pub fn echo(text: impl Into<String>) -> Self {
        Self::new(LineStyle::Echo, format!("> {}", text.into()))
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(LineStyle::Info, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(LineStyle::Success, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(LineStyle::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(LineStyle::Error, text)
    }

    pub fn muted(text: impl Into<String>) -> Self {
        Self::new(LineStyle::Muted, text)
    }

    pub fn accent(text: impl Into<String>) -> Self {
        Self::new(LineStyle::Accent, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(LineStyle::Assistant, text)
    }

    pub fn push(mut self, style: LineStyle, text: impl Into<String>) -> Self {
        self.segments.push(Segment {
            style,
            text: text.into(),
        });
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Unstyled text, as written to transcript logs.
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn primary_style(&self) -> LineStyle {
        self.segments
            .first()
            .map(|s| s.style)
            .unwrap_or(LineStyle::Plain)
    }

    pub fn is_blank(&self) -> bool {
        self.segments.iter().all(|s| s.text.is_empty())
    }
}
