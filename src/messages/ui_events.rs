//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Panel navigation
    NextPanel,
    PrevPanel,

    // Catalog tree
    SelectPrev,
    SelectNext,
    Toggle,

    // Parameter form
    PrevParam,
    NextParam,
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,

    // Endpoint actions
    Execute,
    ClearEndpoint,
    CopyUrl,
    CopyResponse,

    // Response panel
    ScrollUp,
    ScrollDown,

    // Search
    StartSearch,
    SearchChar(char),
    SearchBackspace,
    ClearSearch,
    StopSearch,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Focused pane (needed for context-aware event mapping)
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Panel {
    #[default]
    Tree,
    Params,
    Response,
}

impl Panel {
    pub fn next(&self) -> Panel {
        match self {
            Panel::Tree => Panel::Params,
            Panel::Params => Panel::Response,
            Panel::Response => Panel::Tree,
        }
    }

    pub fn prev(&self) -> Panel {
        match self {
            Panel::Tree => Panel::Response,
            Panel::Params => Panel::Tree,
            Panel::Response => Panel::Params,
        }
    }
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Editing a parameter value
    Editing,
    /// Typing into the search box
    Search,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    active_panel: Panel,
    input_mode: InputMode,
    show_help: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => return Some(UiEvent::Quit),
            KeyCode::Char('u') if input_mode == InputMode::Search => {
                return Some(UiEvent::ClearSearch)
            }
            _ => {}
        }
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    match input_mode {
        InputMode::Normal => normal_keys(key, active_panel),
        InputMode::Editing => match key.code {
            KeyCode::Esc | KeyCode::Enter => Some(UiEvent::StopEditing),
            KeyCode::Left => Some(UiEvent::CursorLeft),
            KeyCode::Right => Some(UiEvent::CursorRight),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Tab | KeyCode::Down => Some(UiEvent::NextParam),
            KeyCode::BackTab | KeyCode::Up => Some(UiEvent::PrevParam),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        },
        InputMode::Search => match key.code {
            KeyCode::Esc | KeyCode::Enter => Some(UiEvent::StopSearch),
            KeyCode::Backspace => Some(UiEvent::SearchBackspace),
            KeyCode::Char(c) => Some(UiEvent::SearchChar(c)),
            _ => None,
        },
    }
}

fn normal_keys(key: KeyEvent, active_panel: Panel) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Char('/') => Some(UiEvent::StartSearch),
        KeyCode::Tab => Some(UiEvent::NextPanel),
        KeyCode::BackTab => Some(UiEvent::PrevPanel),
        KeyCode::Char('s') | KeyCode::F(5) => Some(UiEvent::Execute),
        KeyCode::Char('x') => Some(UiEvent::ClearEndpoint),
        KeyCode::Char('y') => Some(UiEvent::CopyUrl),
        KeyCode::Char('Y') => Some(UiEvent::CopyResponse),
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('e') => match active_panel {
            Panel::Tree => Some(UiEvent::Toggle),
            Panel::Params => Some(UiEvent::StartEditing),
            Panel::Response => None,
        },
        KeyCode::Up | KeyCode::Char('k') => match active_panel {
            Panel::Tree => Some(UiEvent::SelectPrev),
            Panel::Params => Some(UiEvent::PrevParam),
            Panel::Response => Some(UiEvent::ScrollUp),
        },
        KeyCode::Down | KeyCode::Char('j') => match active_panel {
            Panel::Tree => Some(UiEvent::SelectNext),
            Panel::Params => Some(UiEvent::NextParam),
            Panel::Response => Some(UiEvent::ScrollDown),
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_enter_depends_on_panel() {
        let enter = press(KeyCode::Enter);
        assert_eq!(key_to_ui_event(enter, Panel::Tree, InputMode::Normal, false), Some(UiEvent::Toggle));
        assert_eq!(key_to_ui_event(enter, Panel::Params, InputMode::Normal, false), Some(UiEvent::StartEditing));
        assert_eq!(key_to_ui_event(enter, Panel::Params, InputMode::Editing, false), Some(UiEvent::StopEditing));
    }

    #[test]
    fn test_typing_in_search_mode() {
        let q = press(KeyCode::Char('q'));
        assert_eq!(key_to_ui_event(q, Panel::Tree, InputMode::Search, false), Some(UiEvent::SearchChar('q')));
        assert_eq!(key_to_ui_event(q, Panel::Tree, InputMode::Normal, false), Some(UiEvent::Quit));
        let ctrl_u = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert_eq!(key_to_ui_event(ctrl_u, Panel::Tree, InputMode::Search, false), Some(UiEvent::ClearSearch));
    }

    #[test]
    fn test_help_swallows_keys() {
        let s = press(KeyCode::Char('s'));
        assert_eq!(key_to_ui_event(s, Panel::Tree, InputMode::Normal, true), Some(UiEvent::CloseHelp));
    }
}
