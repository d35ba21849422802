use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::App;
use crate::command::Command;
use crate::controller::Intent;

/// Translate a terminal event into commands; returns true if the UI needs a redraw
pub fn handle_event(event: Event, app: &mut App) -> bool {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        Event::Resize(_, _) => true,
        _ => false,
    }
}

pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return app.apply(Command::Quit);
    }

    if app.controller.editing_id().is_some() {
        return handle_editing_key(app, key.code);
    }
    if app.move_menu.is_some() {
        return handle_move_menu_key(app, key.code);
    }
    if app.controller.is_dragging() {
        return handle_dragging_key(app, key.code);
    }
    handle_browsing_key(app, key.code)
}

fn handle_editing_key(app: &mut App, key: KeyCode) -> bool {
    let draft = app.controller.draft().unwrap_or_default().to_string();
    match key {
        KeyCode::Char(c) => app.apply(Intent::RenameChange(format!("{}{}", draft, c)).into()),
        KeyCode::Backspace => {
            let mut draft = draft;
            draft.pop();
            app.apply(Intent::RenameChange(draft).into())
        }
        KeyCode::Enter => app.apply(Intent::RenameCommit.into()),
        KeyCode::Esc => app.apply(Intent::RenameCancel.into()),
        _ => false,
    }
}

fn handle_move_menu_key(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Char(c) if c == app.config.keybindings.drop_at_root => {
            app.choose_move_destination(None)
        }
        KeyCode::Char(c) if c.is_ascii_digit() => {
            let index = c.to_digit(10).unwrap_or(0) as usize;
            index > 0 && app.choose_move_destination(Some(index - 1))
        }
        KeyCode::Esc => {
            app.move_menu = None;
            true
        }
        _ => false,
    }
}

fn handle_dragging_key(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Up => app.apply(Command::SelectUp),
        KeyCode::Down => app.apply(Command::SelectDown),
        KeyCode::Enter => {
            let target = app.selection.clone();
            app.apply(Intent::Drop(target).into())
        }
        KeyCode::Char(c) if c == app.config.keybindings.drop_at_root => {
            app.apply(Intent::Drop(None).into())
        }
        KeyCode::Esc => app.apply(Intent::DragCancel.into()),
        _ => false,
    }
}

fn handle_browsing_key(app: &mut App, key: KeyCode) -> bool {
    let bindings = app.config.keybindings.clone();
    let selected = app.selection.clone();

    match key {
        KeyCode::Up => app.apply(Command::SelectUp),
        KeyCode::Down => app.apply(Command::SelectDown),
        KeyCode::Esc => app.apply(Command::Quit),
        KeyCode::Delete => match selected {
            Some(id) => app.apply(Intent::Delete(id).into()),
            None => false,
        },
        KeyCode::Enter | KeyCode::Char(' ') => match app.selected_node() {
            Some(node) if node.is_folder() => {
                let id = node.id().to_string();
                app.apply(Intent::ToggleExpand(id).into())
            }
            _ => false,
        },
        KeyCode::Char(c) if c == bindings.quit => app.apply(Command::Quit),
        KeyCode::Char(c) if c == bindings.new_folder => {
            let parent = app.creation_parent();
            app.apply(Intent::CreateFolder(parent).into())
        }
        KeyCode::Char(c) if c == bindings.new_root_folder => {
            app.apply(Intent::CreateFolder(None).into())
        }
        KeyCode::Char(c) if c == bindings.move_menu => app.open_move_menu(),
        KeyCode::Char(c) => {
            let Some(id) = selected else {
                return false;
            };
            if c == bindings.rename {
                app.apply(Intent::RenameStart(id).into())
            } else if c == bindings.delete {
                app.apply(Intent::Delete(id).into())
            } else if c == bindings.pick_up {
                app.apply(Intent::DragStart(id).into())
            } else {
                false
            }
        }
        _ => false,
    }
}
