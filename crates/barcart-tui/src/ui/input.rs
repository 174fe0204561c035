//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppState, PAGE_SCROLL_SIZE};
use crate::form::FormField;

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::F(1)) {
            app.state = AppState::Normal;
        }
        return false;
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return true;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return false;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        handle_control_key(app, key.code);
        return false;
    }

    match key.code {
        KeyCode::F(1) => app.state = AppState::ShowingHelp,
        KeyCode::Esc => app.state = AppState::ConfirmingQuit,
        KeyCode::Enter => app.submit(),
        KeyCode::Tab | KeyCode::Down => app.form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.form.focus_prev(),
        KeyCode::PageDown => app.scroll_favorites(PAGE_SCROLL_SIZE as isize),
        KeyCode::PageUp => app.scroll_favorites(-(PAGE_SCROLL_SIZE as isize)),
        KeyCode::Left if app.form.focus == FormField::Spirit => app.form.cycle_spirit(false),
        KeyCode::Right if app.form.focus == FormField::Spirit => app.form.cycle_spirit(true),
        KeyCode::Backspace => app.form.backspace(),
        KeyCode::Char(c) => {
            app.form.insert_char(c);
        }
        _ => {}
    }

    false
}

/// Ctrl-chorded actions; plain characters always go to the focused field.
fn handle_control_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('s') => app.save_favorite(),
        KeyCode::Char('n') => app.form.add_juice(),
        KeyCode::Char('d') => {
            if !app.form.remove_juice() {
                app.status_message = Some("At least one juice field is required".to_string());
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use barcart_core::{ApiClient, Config, FavoritesStore, MemoryStorage, Recipe, RecipeLookup};

    use super::*;

    fn app() -> App {
        let api = ApiClient::with_base_url("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        App::with_services(
            Config::default(),
            RecipeLookup::new(Box::new(MemoryStorage::new()), api),
            FavoritesStore::open(Box::new(MemoryStorage::new())),
        )
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_input(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(app: &mut App, c: char) -> bool {
        handle_input(app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    #[test]
    fn test_typing_fills_name_field() {
        let mut app = app();
        for c in "Gimlet".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.form.name, "Gimle");
    }

    #[test]
    fn test_quit_requires_confirmation() {
        let mut app = app();
        assert!(!press(&mut app, KeyCode::Esc));
        assert_eq!(app.state, AppState::ConfirmingQuit);
        assert!(!press(&mut app, KeyCode::Char('n')));
        assert_eq!(app.state, AppState::Normal);

        press(&mut app, KeyCode::Esc);
        assert!(press(&mut app, KeyCode::Char('y')));
        assert_eq!(app.state, AppState::Quitting);
    }

    #[test]
    fn test_help_overlay_swallows_keys() {
        let mut app = app();
        press(&mut app, KeyCode::F(1));
        assert_eq!(app.state, AppState::ShowingHelp);
        press(&mut app, KeyCode::Char('x'));
        assert!(app.form.name.is_empty());
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::Normal);
    }

    #[test]
    fn test_ctrl_s_saves_displayed_recipe() {
        let mut app = app();
        app.recipe = Some(Recipe::named("Paper Plane"));
        ctrl(&mut app, 's');
        assert_eq!(app.favorites.len(), 1);
        // Ctrl chords never type into the field
        assert!(app.form.name.is_empty());
    }

    #[test]
    fn test_juice_rows_add_and_remove() {
        let mut app = app();
        ctrl(&mut app, 'n');
        assert_eq!(app.form.juices.len(), 2);
        ctrl(&mut app, 'd');
        assert_eq!(app.form.juices.len(), 1);
        ctrl(&mut app, 'd');
        assert_eq!(app.form.juices.len(), 1);
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_arrows_cycle_spirit_only_when_focused() {
        let mut app = app();
        press(&mut app, KeyCode::Right);
        assert_eq!(app.form.spirit, None);

        app.form.focus = FormField::Spirit;
        press(&mut app, KeyCode::Right);
        assert_eq!(app.form.spirit, Some(0));
    }
}
