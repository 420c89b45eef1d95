//! Contract between the two terminal pages and the shared event loop.

use async_trait::async_trait;

use super::message::TranscriptLine;
use super::transcript::Transcript;

/// Key input routed to a page after the loop has handled scrolling and quit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Up,
    Down,
    Enter,
    Esc,
    Char(char),
    Backspace,
    ClearLine,
}

/// A picker drawn between the transcript and the input box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerView {
    pub options: Vec<String>,
    pub selected: usize,
}

/// Everything the renderer needs to draw one frame of a page.
pub struct PageView<'a> {
    pub title: &'a str,
    pub status: Option<String>,
    pub transcript: &'a Transcript,
    pub picker: Option<PickerView>,
    pub input: &'a str,
    pub input_title: String,
    /// True while a remote call is outstanding; input is not accepted.
    pub busy: bool,
    pub busy_label: &'a str,
    pub suggestions: Vec<String>,
}

/// A reducer-style terminal page.
///
/// The page never performs I/O. Methods return a command describing remote
/// work, the loop executes it, and the result comes back through
/// [`TerminalPage::apply_outcome`].
pub trait TerminalPage {
    type Command: Send + 'static;
    type Outcome: Send + 'static;

    fn startup(&mut self) -> Option<Self::Command>;

    fn handle_key(&mut self, key: KeyInput) -> Option<Self::Command>;

    fn apply_outcome(&mut self, outcome: Self::Outcome) -> Option<Self::Command>;

    fn view(&self) -> PageView<'_>;

    /// Lines appended since the last call, for the transcript log.
    fn take_log_lines(&mut self) -> Vec<TranscriptLine>;
}

/// Runs page commands against remote services.
#[async_trait]
pub trait CommandExecutor: Send + Sync + 'static {
    type Command: Send + 'static;
    type Outcome: Send + 'static;

    async fn execute(&self, command: Self::Command) -> Self::Outcome;
}
