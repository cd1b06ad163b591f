use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::{SubTask, TaskDraft, TaskPatch, TaskStatus, TaskType};
use crate::ops::task_ops;
use crate::tui::app::{App, FormField, FormState, Mode};

pub(super) fn handle_form(app: &mut App, key: KeyEvent) {
    // Keys that leave the form are handled before borrowing its state
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
            app.should_quit = true;
            return;
        }
        (_, KeyCode::Esc) => {
            app.form = None;
            app.mode = Mode::Navigate;
            return;
        }
        (_, KeyCode::Enter) => {
            submit_form(app);
            return;
        }
        _ => {}
    }

    let Some(form) = &mut app.form else {
        app.mode = Mode::Navigate;
        return;
    };

    match (key.modifiers, key.code) {
        // Field focus
        (_, KeyCode::Tab) => form.focus = form.focus.next(),
        (_, KeyCode::BackTab) => form.focus = form.focus.prev(),
        (_, KeyCode::Down) => focus_down(form),
        (_, KeyCode::Up) => focus_up(form),

        // Choice fields cycle with left/right
        (_, KeyCode::Left) => cycle_choice(form, false),
        (_, KeyCode::Right) => cycle_choice(form, true),

        // Subtask list editing
        (KeyModifiers::CONTROL, KeyCode::Char('n')) => add_subtask(form),
        (KeyModifiers::CONTROL, KeyCode::Char('t')) => toggle_subtask(form),
        (KeyModifiers::CONTROL, KeyCode::Char('d')) => remove_subtask(form),

        // Text entry
        (_, KeyCode::Backspace) => {
            if let Some(text) = form.focused_text_mut() {
                text.pop();
            }
        }
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            if let Some(text) = form.focused_text_mut() {
                text.push(c);
            }
        }
        _ => {}
    }
}

fn focus_down(form: &mut FormState) {
    // Within the subtask list, down walks the entries first
    if form.focus == FormField::Subtasks && form.subtask_cursor + 1 < form.subtasks.len() {
        form.subtask_cursor += 1;
        return;
    }
    form.focus = form.focus.next();
}

fn focus_up(form: &mut FormState) {
    if form.focus == FormField::Subtasks && form.subtask_cursor > 0 {
        form.subtask_cursor -= 1;
        return;
    }
    form.focus = form.focus.prev();
}

fn cycle_choice(form: &mut FormState, forward: bool) {
    match form.focus {
        FormField::Type => form.task_type = cycle(&TaskType::ALL, form.task_type, forward),
        FormField::Status => form.status = cycle(&TaskStatus::ALL, form.status, forward),
        _ => {}
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let idx = all.iter().position(|v| *v == current).unwrap_or(0);
    let next = if forward {
        (idx + 1) % all.len()
    } else {
        (idx + all.len() - 1) % all.len()
    };
    all[next]
}

fn add_subtask(form: &mut FormState) {
    form.subtasks
        .push(SubTask::new(task_ops::generate_id(), String::new()));
    form.subtask_cursor = form.subtasks.len() - 1;
    form.focus = FormField::Subtasks;
}

fn toggle_subtask(form: &mut FormState) {
    if let Some(sub) = form.subtasks.get_mut(form.subtask_cursor) {
        sub.completed = !sub.completed;
    }
}

fn remove_subtask(form: &mut FormState) {
    if form.subtask_cursor < form.subtasks.len() {
        form.subtasks.remove(form.subtask_cursor);
        if form.subtask_cursor > 0 && form.subtask_cursor >= form.subtasks.len() {
            form.subtask_cursor -= 1;
        }
    }
}

fn submit_form(app: &mut App) {
    let Some(mut form) = app.form.take() else {
        app.mode = Mode::Navigate;
        return;
    };

    if form.title.trim().is_empty() {
        form.error = Some("title is required".to_string());
        app.form = Some(form);
        return;
    }

    let result = match &form.task_id {
        None => {
            let draft = TaskDraft {
                title: form.title.trim().to_string(),
                description: form.description.clone(),
                status: form.status,
                task_type: form.task_type,
                assignee: form.assignee.trim().to_string(),
                subtasks: form.subtasks.clone(),
            };
            Ok(task_ops::create_task(&app.store, &app.tasks, draft))
        }
        Some(id) => {
            // The form carries every field, so the patch is always full
            let patch = TaskPatch {
                title: Some(form.title.trim().to_string()),
                description: Some(form.description.clone()),
                status: Some(form.status),
                task_type: Some(form.task_type),
                assignee: Some(form.assignee.trim().to_string()),
                subtasks: Some(form.subtasks.clone()),
            };
            task_ops::edit_task(&app.store, &app.tasks, id, patch)
        }
    };

    match result {
        Ok((tasks, task, report)) => {
            let verb = if form.task_id.is_some() {
                "updated"
            } else {
                "added"
            };
            app.apply_saved(tasks, &report);
            if app.status_message.is_none() {
                app.status_message = Some(format!("{} \"{}\"", verb, task.title));
            }
            app.mode = Mode::Navigate;
        }
        Err(err) => {
            form.error = Some(err.to_string());
            app.form = Some(form);
        }
    }
}
