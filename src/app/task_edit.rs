use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::app::codec::encode_date;
use crate::app::models::{TodoEntry, TodoId};
use crate::app::storage::KeyValueStorage;
use crate::app::todo_store::TodoStore;
use crate::app::ui::Theme;

// Index of the last input line of the dialog
const LAST_LINE: usize = 1;

// State object for the task edit dialog
// Keeps track of the state of the dialog and the content of the task being edited
#[derive(Default)]
pub struct TaskEditDialogState {
    pub dialog_active: bool,
    task_id: Option<TodoId>,
    content: TaskEditDialogContent,
    error_message: Option<String>,
    cursor_position: (usize, usize),
}

// Current content of the task being edited/created
#[derive(Default)]
struct TaskEditDialogContent {
    text: String,
    due_date: String,
}

impl TaskEditDialogState {
    // Opens the dialog and prepares to accept an input for the new task
    pub fn create_a_new_task(&mut self) {
        *self = TaskEditDialogState {
            dialog_active: true,
            ..Default::default()
        };
    }

    // Opens the dialog and prepares to accept an input for the existing task
    pub fn edit_task(&mut self, task: &TodoEntry) {
        *self = TaskEditDialogState {
            dialog_active: true,
            task_id: Some(task.id),
            content: TaskEditDialogContent {
                text: task.text.clone(),
                due_date: task.due_date.as_ref().map(encode_date).unwrap_or_default(),
            },
            error_message: None,
            cursor_position: (task.text.chars().count(), 0),
        };
    }

    pub fn cancel(&mut self) {
        self.dialog_active = false;
        self.error_message = None;
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    // Move the cursor one line BELOW the current one.
    // The horizontal cursor position is kept if the line is long enough
    pub fn move_cursor_down(&mut self) {
        let y = (self.cursor_position.1 + 1).min(LAST_LINE);
        self.cursor_position = (self.cursor_position.0.min(self.line_len(y)), y);
    }

    // Move the cursor one line ABOVE the current one.
    pub fn move_cursor_up(&mut self) {
        let y = self.cursor_position.1.saturating_sub(1);
        self.cursor_position = (self.cursor_position.0.min(self.line_len(y)), y);
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_position.0 = self.cursor_position.0.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        let (x, y) = self.cursor_position;
        self.cursor_position.0 = (x + 1).min(self.line_len(y));
    }

    // Delete the char before the cursor
    pub fn delete_char(&mut self) {
        let (x, y) = self.cursor_position;
        if x == 0 {
            return;
        }

        let line = self.line_mut(y);
        let at = byte_index(line, x - 1);
        line.remove(at);
        self.move_cursor_left();
    }

    // Handles the input of a char by inserting it at the cursor of the active line
    pub fn input(&mut self, to_insert: char) {
        let (x, y) = self.cursor_position;
        let line = self.line_mut(y);
        let at = byte_index(line, x);
        line.insert(at, to_insert);
        self.move_cursor_right();
    }

    // Creates or updates the task in the store.
    // A rejected task keeps the dialog open and shows why.
    pub fn save_task<S: KeyValueStorage>(&mut self, store: &mut TodoStore<S>) {
        let due_date = Some(self.content.due_date.as_str());
        let result = match self.task_id {
            Some(id) => store
                .update(id, &self.content.text, due_date)
                .map(|_| ()),
            None => store.create(&self.content.text, due_date).map(|_| ()),
        };

        match result {
            Ok(()) => {
                self.error_message = None;
                self.dialog_active = false;
            }
            Err(err) => {
                if !err.is_rejection() {
                    tracing::error!(error = %err, "Failed to save a task");
                }
                self.error_message = Some(err.to_string());
            }
        }
    }

    fn line(&self, y: usize) -> &str {
        match y {
            0 => &self.content.text,
            _ => &self.content.due_date,
        }
    }

    fn line_mut(&mut self, y: usize) -> &mut String {
        match y {
            0 => &mut self.content.text,
            _ => &mut self.content.due_date,
        }
    }

    fn line_len(&self, y: usize) -> usize {
        self.line(y).chars().count()
    }
}

// Byte offset of the char at `char_index`, or the end of the string
fn byte_index(line: &str, char_index: usize) -> usize {
    line.char_indices()
        .nth(char_index)
        .map_or(line.len(), |(at, _)| at)
}

// Returns the UI content for the task edit dialog
pub fn get_task_edit_ui<'a>(state: &'a TaskEditDialogState, theme: Theme) -> Vec<Line<'a>> {
    let gray_text = Style::new().fg(Color::Rgb(128, 128, 128));
    let plain_text = theme.text();
    let cursor = theme.cursor();
    let mut text = Vec::new();

    struct TextDialogInputLine<'a> {
        prefix: &'static str,
        placeholder: &'static str,
        value: &'a str,
    }

    // Define the lines (input fields) of the dialog
    let lines = [
        TextDialogInputLine {
            prefix: "Task:     ",
            placeholder: "Describe the task",
            value: &state.content.text,
        },
        TextDialogInputLine {
            prefix: "Due date: ",
            placeholder: "2023-11-23 (optional)",
            value: &state.content.due_date,
        },
    ];

    let (cursor_x, cursor_y) = state.cursor_position;

    for (i, line) in lines.iter().enumerate() {
        let mut spans = vec![Span::styled(line.prefix, plain_text)];

        if line.value.is_empty() {
            if cursor_y == i {
                // First placeholder char stands in for the cursor
                spans.push(Span::styled(
                    line.placeholder.chars().take(1).collect::<String>(),
                    cursor,
                ));
                spans.push(Span::styled(
                    line.placeholder.chars().skip(1).collect::<String>(),
                    gray_text,
                ));
            } else {
                spans.push(Span::styled(line.placeholder, gray_text));
            }
        } else if cursor_y == i {
            let chars: Vec<char> = line.value.chars().collect();
            spans.push(Span::styled(
                chars.iter().take(cursor_x).collect::<String>(),
                plain_text,
            ));
            match chars.get(cursor_x) {
                Some(under_cursor) => {
                    spans.push(Span::styled(under_cursor.to_string(), cursor));
                    spans.push(Span::styled(
                        chars.iter().skip(cursor_x + 1).collect::<String>(),
                        plain_text,
                    ));
                }
                None => spans.push(Span::styled(" ", cursor)),
            }
        } else {
            spans.push(Span::styled(line.value, plain_text));
        }

        text.push(Line::from(spans));
    }

    text.push(Line::raw(""));

    if let Some(error_message) = state.error_message() {
        text.push(Line::from(Span::styled(
            error_message,
            Style::new().fg(Color::Red),
        )));
        text.push(Line::raw(""));
    }

    text.push(Line::from(Span::styled(
        "Enter - save, Esc - cancel",
        plain_text,
    )));

    text
}
