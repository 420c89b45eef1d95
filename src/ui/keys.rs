//! Translation of crossterm key events into page input or loop actions.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::page::KeyInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRoute {
    Page(KeyInput),
    ScrollUp,
    ScrollDown,
    ScrollToBottom,
    Quit,
    Ignore,
}

pub fn route_key(key: &KeyEvent) -> KeyRoute {
    if key.kind == KeyEventKind::Release {
        return KeyRoute::Ignore;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('d') if ctrl => KeyRoute::Quit,
        KeyCode::Char('u') if ctrl => KeyRoute::Page(KeyInput::ClearLine),
        KeyCode::Char('l') if ctrl => KeyRoute::ScrollToBottom,
        KeyCode::Char(_) if ctrl => KeyRoute::Ignore,
        KeyCode::Char(c) => KeyRoute::Page(KeyInput::Char(c)),
        KeyCode::Enter => KeyRoute::Page(KeyInput::Enter),
        KeyCode::Esc => KeyRoute::Page(KeyInput::Esc),
        KeyCode::Backspace => KeyRoute::Page(KeyInput::Backspace),
        KeyCode::Up => KeyRoute::Page(KeyInput::Up),
        KeyCode::Down => KeyRoute::Page(KeyInput::Down),
        KeyCode::PageUp => KeyRoute::ScrollUp,
        KeyCode::PageDown => KeyRoute::ScrollDown,
        KeyCode::End => KeyRoute::ScrollToBottom,
        _ => KeyRoute::Ignore,
    }
}
