use super::message::TranscriptLine;

/// Append-only output buffer of a terminal page.
///
/// Lines are only removed by [`Transcript::clear`] or when a page retracts a
/// block it appended itself (the menu prompt). Lines that have not been
/// handed to the transcript log yet are tracked separately so the event loop
/// can drain them after every update.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    lines: Vec<TranscriptLine>,
    unlogged: Vec<TranscriptLine>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: TranscriptLine) {
        self.unlogged.push(line.clone());
        self.lines.push(line);
    }

    pub fn extend<I: IntoIterator<Item = TranscriptLine>>(&mut self, lines: I) {
        for line in lines {
            self.push(line);
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[TranscriptLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn last(&self) -> Option<&TranscriptLine> {
        self.lines.last()
    }

    /// Remove `block` if it is present verbatim at `start`.
    pub fn retract_block(&mut self, start: usize, block: &[TranscriptLine]) -> bool {
        let end = start + block.len();
        if end > self.lines.len() || self.lines[start..end] != *block {
            return false;
        }
        self.lines.drain(start..end);
        true
    }

    pub fn take_unlogged(&mut self) -> Vec<TranscriptLine> {
        std::mem::take(&mut self.unlogged)
    }

    pub fn texts(&self) -> Vec<String> {
        self.lines.iter().map(TranscriptLine::text).collect()
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.text().contains(needle))
    }
}
