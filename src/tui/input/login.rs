use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::auth;
use crate::tui::app::{App, View};

pub(super) fn handle_login(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::Esc) => {
            app.should_quit = true;
        }
        (_, KeyCode::Enter) => submit_login(app),
        (_, KeyCode::Backspace) => {
            app.login_input.pop();
            app.login_error = None;
        }
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            app.login_input.push(c);
            app.login_error = None;
        }
        _ => {}
    }
}

fn submit_login(app: &mut App) {
    match auth::login(app.store.paths(), &app.login_input) {
        Ok(state) => {
            app.auth = state;
            app.login_input.clear();
            app.login_error = None;
            app.view = View::List;
            // A fresh session wants fresh data
            app.request_fetch();
        }
        Err(err) => app.login_error = Some(err.to_string()),
    }
}
