use chrono::NaiveDate;
use ratatui::style::{Color, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::*;

use crate::app::models::{TodoEntry, TodoId};
use crate::app::storage::KeyValueStorage;
use crate::app::todo_store::TodoStore;
use crate::app::ui::Theme;

// Selection and search query over the store's tasks
#[derive(Default)]
pub struct TaskList {
    pub state: ListState,
    pub query: String,
    pub searching: bool,
}

impl TaskList {
    // The tasks currently on screen
    pub fn visible<'s, S: KeyValueStorage>(&self, store: &'s TodoStore<S>) -> Vec<&'s TodoEntry> {
        store.search(&self.query)
    }

    // Move the selection to the next item, wrapping to the top
    pub fn next(&mut self, len: usize) {
        let i = match self.state.selected() {
            Some(i) if len > 0 && i < len - 1 => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    // Move the selection to the previous item, wrapping to the bottom
    pub fn previous(&mut self, len: usize) {
        let i = match self.state.selected() {
            Some(0) | None => len.saturating_sub(1),
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn unselect(&mut self) {
        self.state.select(None);
    }

    // Keep the selection on a visible row after the list shrinks
    pub fn clamp(&mut self, len: usize) {
        match self.state.selected() {
            Some(_) if len == 0 => self.unselect(),
            Some(i) if i >= len => self.state.select(Some(len - 1)),
            _ => {}
        }
    }

    // Id of the selected task
    pub fn selected_id<S: KeyValueStorage>(&self, store: &TodoStore<S>) -> Option<TodoId> {
        let i = self.state.selected()?;
        self.visible(store).get(i).map(|task| task.id)
    }

    pub fn push_query(&mut self, c: char) {
        self.query.push(c);
        self.state.select(None);
    }

    pub fn pop_query(&mut self) {
        self.query.pop();
        self.state.select(None);
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
        self.searching = false;
        self.state.select(None);
    }
}

// Build the UI (list) for task list
pub fn get_list_items_ui<'a>(tasks: &[&'a TodoEntry], theme: Theme) -> Vec<ListItem<'a>> {
    tasks
        .iter()
        .map(|task| {
            let mut lines = Vec::new();

            let title = Span::from(task.text.as_str());
            lines.push(Line::from(vec![
                Span::from(if task.success { "[✓] " } else { "[ ] " }),
                if task.success { title.crossed_out() } else { title.bold() },
            ]));

            let due = task
                .due_date
                .map(|due| format!("    Due: {}", due.format("%d.%m.%Y")))
                .unwrap_or_else(|| "    No due date".to_string());
            lines.push(Line::from(vec![
                Span::from(due),
                Span::from(format!(
                    "  Created: {}",
                    task.created_on_local_day().format("%d.%m.%Y")
                ))
                .fg(Color::Gray),
            ]));
            ListItem::new(lines).style(theme.text())
        })
        .collect()
}

// Build the UI (lines) for statistics infobox
pub fn get_statistics_ui<'a>(tasks: &[TodoEntry], today: NaiveDate) -> Vec<Line<'a>> {
    let uncompleted = tasks.iter().filter(|task| !task.success).count();
    let overdue = tasks.iter().filter(|task| task.is_overdue(today)).count();
    vec![
        Line::from(format!("Total tasks: {}", tasks.len())),
        Line::from(format!("Uncompleted tasks: {uncompleted}")),
        Line::from(format!("Overdue: {overdue}")),
    ]
}

// Build the UI (lines) for instructions infobox
pub fn get_instructions_ui<'a>() -> Vec<Line<'a>> {
    vec![
        "Enter - toggle do/done".into(),
        "a - add a task".into(),
        "e - edit a task".into(),
        "x - delete a task".into(),
        "/ - search".into(),
        "t - toggle dark/light".into(),
        "q - quit".into(),
    ]
}
