//! Keyboard input handling.
//!
//! Keys translate to [`Action`]s, and actions apply to the [`App`]. The
//! split keeps keybindings testable without a terminal.

use crossterm::event::{KeyCode, KeyEvent};
use time::OffsetDateTime;

use crate::app::{App, DateField, Tab};
use crate::messages::Command;

/// Actions triggered by user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextTab,
    PreviousTab,
    SelectTab(Tab),
    Refresh,
    ToggleSort,
    CycleStatusFilter,
    CycleDateRange,
    NextPage,
    PreviousPage,
    EditStartDate,
    EditEndDate,
    ToggleHelp,
    TextInput(char),
    TextBackspace,
    TextSubmit,
    TextCancel,
}

/// Map a key event to an action, if any.
///
/// While a date bound is being edited, every key routes to the text
/// entry actions so filter shortcuts cannot fire mid-edit.
pub fn handle_key(key: KeyEvent, editing_date: bool) -> Option<Action> {
    if editing_date {
        return match key.code {
            KeyCode::Char(c) => Some(Action::TextInput(c)),
            KeyCode::Backspace => Some(Action::TextBackspace),
            KeyCode::Enter => Some(Action::TextSubmit),
            KeyCode::Esc => Some(Action::TextCancel),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Tab | KeyCode::Char('l') => Some(Action::NextTab),
        KeyCode::BackTab | KeyCode::Char('h') => Some(Action::PreviousTab),
        KeyCode::Char('1') => Some(Action::SelectTab(Tab::Overview)),
        KeyCode::Char('2') => Some(Action::SelectTab(Tab::Npk)),
        KeyCode::Char('3') => Some(Action::SelectTab(Tab::History)),
        KeyCode::Char('4') => Some(Action::SelectTab(Tab::Device)),
        KeyCode::Char('r') => Some(Action::Refresh),
        KeyCode::Char('s') => Some(Action::ToggleSort),
        KeyCode::Char('f') => Some(Action::CycleStatusFilter),
        KeyCode::Char('d') => Some(Action::CycleDateRange),
        KeyCode::Right | KeyCode::Char('n') => Some(Action::NextPage),
        KeyCode::Left | KeyCode::Char('p') => Some(Action::PreviousPage),
        KeyCode::Char('[') => Some(Action::EditStartDate),
        KeyCode::Char(']') => Some(Action::EditEndDate),
        KeyCode::Char('?') => Some(Action::ToggleHelp),
        _ => None,
    }
}

/// Apply an action to the application state.
///
/// Returns a [`Command`] when the action needs the background worker.
pub fn apply_action(app: &mut App, action: Action, now: OffsetDateTime) -> Option<Command> {
    match action {
        Action::Quit => {
            app.should_quit = true;
            return Some(Command::Shutdown);
        }
        Action::NextTab => app.active_tab = app.active_tab.next(),
        Action::PreviousTab => app.active_tab = app.active_tab.previous(),
        Action::SelectTab(tab) => app.active_tab = tab,
        Action::Refresh => {
            app.push_status_message("Refreshing...".to_string());
            return Some(Command::Refresh);
        }
        Action::ToggleSort => app.toggle_sort(),
        Action::CycleStatusFilter => app.cycle_status_filter(),
        Action::CycleDateRange => app.cycle_date_range(),
        Action::NextPage => app.next_page(now),
        Action::PreviousPage => app.previous_page(now),
        Action::EditStartDate => app.start_date_edit(DateField::Start),
        Action::EditEndDate => app.start_date_edit(DateField::End),
        Action::ToggleHelp => app.show_help = !app.show_help,
        Action::TextInput(c) => app.date_input_char(c),
        Action::TextBackspace => app.date_input_backspace(),
        Action::TextSubmit => app.submit_date_edit(),
        Action::TextCancel => app.cancel_date_edit(),
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use time::macros::datetime;
    use tokio::sync::mpsc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn test_app() -> App {
        let (command_tx, _command_rx) = mpsc::channel(4);
        let (_event_tx, event_rx) = mpsc::channel(4);
        App::new(command_tx, event_rx)
    }

    #[test]
    fn test_quit_key() {
        assert_eq!(handle_key(key(KeyCode::Char('q')), false), Some(Action::Quit));
    }

    #[test]
    fn test_tab_keys() {
        assert_eq!(handle_key(key(KeyCode::Tab), false), Some(Action::NextTab));
        assert_eq!(
            handle_key(key(KeyCode::Char('3')), false),
            Some(Action::SelectTab(Tab::History))
        );
    }

    #[test]
    fn test_editing_mode_captures_filter_keys() {
        // 's' would toggle the sort outside edit mode.
        assert_eq!(
            handle_key(key(KeyCode::Char('s')), true),
            Some(Action::TextInput('s'))
        );
        assert_eq!(handle_key(key(KeyCode::Esc), true), Some(Action::TextCancel));
    }

    #[test]
    fn test_unknown_key_is_ignored() {
        assert_eq!(handle_key(key(KeyCode::F(5)), false), None);
    }

    #[test]
    fn test_quit_action_requests_shutdown() {
        let mut app = test_app();
        let now = datetime!(2024-05-15 12:00:00 UTC);
        let cmd = apply_action(&mut app, Action::Quit, now);
        assert!(app.should_quit());
        assert_eq!(cmd, Some(Command::Shutdown));
    }

    #[test]
    fn test_refresh_action_requests_fetch() {
        let mut app = test_app();
        let now = datetime!(2024-05-15 12:00:00 UTC);
        let cmd = apply_action(&mut app, Action::Refresh, now);
        assert_eq!(cmd, Some(Command::Refresh));
    }

    #[test]
    fn test_filter_actions_mutate_query() {
        let mut app = test_app();
        let now = datetime!(2024-05-15 12:00:00 UTC);
        assert!(!app.query.ascending());
        apply_action(&mut app, Action::ToggleSort, now);
        assert!(app.query.ascending());
        apply_action(&mut app, Action::CycleStatusFilter, now);
        assert!(app.query.status().is_some());
    }
}
