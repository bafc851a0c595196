use crate::application::{App, AppMode};
use crate::domain::{ApplicationStatus, KeyValueStore};
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event<S: KeyValueStore>(app: &mut App<S>, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, key, modifiers),
            AppMode::Help => Self::handle_help_mode(app, key),
        }
    }

    fn handle_normal_mode<S: KeyValueStore>(app: &mut App<S>, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            if key == KeyCode::Char('e') {
                app.export_csv();
            }
            return;
        }

        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                app.status_message = None;
                app.select_previous();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.status_message = None;
                app.select_next();
            }
            KeyCode::Home => app.select_first(),
            KeyCode::End => app.select_last(),
            KeyCode::Char('s') => app.toggle_selected(ApplicationStatus::Shortlisted),
            KeyCode::Char('r') => app.toggle_selected(ApplicationStatus::Rejected),
            KeyCode::F(1) | KeyCode::Char('?') => app.open_help(),
            KeyCode::Esc => app.status_message = None,
            // 'q' is handled by the main loop
            _ => {}
        }
    }

    fn handle_help_mode<S: KeyValueStore>(app: &mut App<S>, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.close_help();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.help_scroll = app.help_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }
}
