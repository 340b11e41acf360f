use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, Focus, Screen};
use crate::config::ConfigApi;

pub fn handle_input<A: ConfigApi>(app: &mut App<A>) -> io::Result<bool> {
    if event::poll(Duration::from_millis(100))?
        && let Event::Key(key) = event::read()?
        && key.kind == KeyEventKind::Press
    {
        handle_key(app, key);
    }
    Ok(app.should_quit)
}

pub fn handle_key<A: ConfigApi>(app: &mut App<A>, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.screen {
        Screen::Main if app.focus == Focus::PlateInput => handle_plate_input(app, key),
        Screen::Main => handle_main(app, key),
        Screen::Form => handle_form(app, key),
        Screen::Confirm(_) => handle_confirm(app, key),
        Screen::Loading | Screen::Saving => {}
    }
}

fn handle_main<A: ConfigApi>(app: &mut App<A>, key: KeyEvent) {
    match key.code {
        // Quit
        KeyCode::Char('q') => {
            app.should_quit = true;
        }

        // Navigation
        KeyCode::Up | KeyCode::Char('k') => app.move_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_down(),
        KeyCode::Tab => app.toggle_focus(),

        // Streams
        KeyCode::Char('a') => app.open_add_form(),
        KeyCode::Char('e') | KeyCode::Enter if app.focus == Focus::Streams => {
            app.open_edit_form();
        }

        // Streams and plates
        KeyCode::Char('d') | KeyCode::Delete => app.request_delete(),

        // Persistence
        KeyCode::Char('s') => app.start_save(),
        KeyCode::Char('r') => app.start_reload(),

        _ => {}
    }
}

fn handle_plate_input<A: ConfigApi>(app: &mut App<A>, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.add_plate(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Tab => app.toggle_focus(),
        KeyCode::Esc => app.focus = Focus::Streams,
        KeyCode::Char(c) => app.input_char(c),
        _ => {}
    }
}

fn handle_form<A: ConfigApi>(app: &mut App<A>, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_form(),
        KeyCode::Esc => app.cancel_form(),
        KeyCode::Tab | KeyCode::Down => app.next_field(),
        KeyCode::BackTab | KeyCode::Up => app.prev_field(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(c) => app.input_char(c),
        _ => {}
    }
}

fn handle_confirm<A: ConfigApi>(app: &mut App<A>, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.resolve_confirm(true),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.resolve_confirm(false),
        _ => {}
    }
}
