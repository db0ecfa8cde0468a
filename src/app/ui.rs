use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{prelude::*, widgets::*};
use std::{
    io,
    time::{Duration, Instant},
};
use tracing::{debug, error};

use crate::app::error::StoreResult;
use crate::app::models::Notification;
use crate::app::storage::KeyValueStorage;
use crate::app::todo_store::TodoStore;
use crate::app::{task_edit::*, task_list::*};

pub const COLOR_MODE_KEY: &str = "color_mode";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    // Read the colour mode saved by a previous session
    pub fn load(storage: &impl KeyValueStorage) -> Theme {
        match storage.get(COLOR_MODE_KEY) {
            Ok(Some(mode)) if mode == "light" => Theme::Light,
            Ok(_) => Theme::Dark,
            Err(err) => {
                error!(error = %err, "Failed to read colour mode");
                Theme::Dark
            }
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn text(self) -> Style {
        match self {
            Theme::Dark => Style::new().fg(Color::White).bg(Color::Black),
            Theme::Light => Style::new().fg(Color::Black).bg(Color::White),
        }
    }

    pub fn cursor(self) -> Style {
        self.text().add_modifier(Modifier::REVERSED)
    }

    fn highlight(self) -> Style {
        let bg = match self {
            Theme::Dark => Color::LightGreen,
            Theme::Light => Color::Green,
        };
        Style::default()
            .fg(Color::Black)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    }
}

// A transient acknowledgement shown in the corner of the screen
pub struct Toast {
    pub message: String,
    pub expires_at: Instant,
}

pub struct App<S: KeyValueStorage> {
    pub store: TodoStore<S>,
    pub items: TaskList,
    pub task_edit_dialog_state: TaskEditDialogState,
    pub toasts: Vec<Toast>,
    pub theme: Theme,
    toast_duration: Duration,
}

impl<S: KeyValueStorage> App<S> {
    pub fn new(store: TodoStore<S>, toast_duration: Duration) -> App<S> {
        let theme = Theme::load(store.storage());
        App {
            store,
            items: TaskList::default(),
            task_edit_dialog_state: TaskEditDialogState::default(),
            toasts: Vec::new(),
            theme,
            toast_duration,
        }
    }

    // Apply one key press. Returns false once the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.task_edit_dialog_state.dialog_active {
            // Handle input for the task edit dialog
            let dialog = &mut self.task_edit_dialog_state;
            match code {
                KeyCode::Down => dialog.move_cursor_down(),
                KeyCode::Up => dialog.move_cursor_up(),
                KeyCode::Esc => dialog.cancel(),
                KeyCode::Enter => dialog.save_task(&mut self.store),
                KeyCode::Left => dialog.move_cursor_left(),
                KeyCode::Right => dialog.move_cursor_right(),
                KeyCode::Backspace => dialog.delete_char(),
                KeyCode::Char(to_insert) => dialog.input(to_insert),
                _ => {}
            }
        } else if self.items.searching {
            // Handle input for the search query
            match code {
                KeyCode::Esc => self.items.clear_query(),
                KeyCode::Enter => self.items.searching = false,
                KeyCode::Backspace => self.items.pop_query(),
                KeyCode::Char(c) => self.items.push_query(c),
                _ => {}
            }
        } else {
            // Handle input for the task list navigation and state change
            let visible = self.items.visible(&self.store).len();
            match code {
                KeyCode::Char('q') => return false,
                KeyCode::Char('x') => {
                    if let Some(id) = self.items.selected_id(&self.store) {
                        report(self.store.delete(id));
                    }
                }
                KeyCode::Left => self.items.unselect(),
                KeyCode::Down => self.items.next(visible),
                KeyCode::Up => self.items.previous(visible),
                KeyCode::Char('a') => self.task_edit_dialog_state.create_a_new_task(),
                KeyCode::Char('e') => {
                    if let Some(task) = self
                        .items
                        .selected_id(&self.store)
                        .and_then(|id| self.store.get(id))
                    {
                        self.task_edit_dialog_state.edit_task(task);
                    }
                }
                KeyCode::Char('/') => self.items.searching = true,
                KeyCode::Esc => self.items.clear_query(),
                KeyCode::Char('t') => self.toggle_theme(),
                KeyCode::Enter => {
                    if let Some(id) = self.items.selected_id(&self.store) {
                        report(self.store.toggle_completed(id));
                    }
                }
                _ => {}
            }
        }

        let visible = self.items.visible(&self.store).len();
        self.items.clamp(visible);
        self.collect_notifications(Instant::now());
        true
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        if let Err(err) = self.store.storage().set(COLOR_MODE_KEY, self.theme.as_str()) {
            error!(error = %err, "Failed to save colour mode");
        }
    }

    // Turn store notifications into toasts. Reopening a task is not acknowledged.
    fn collect_notifications(&mut self, now: Instant) {
        for notification in self.store.drain_notifications() {
            match notification {
                Notification::Completed { .. } | Notification::Deleted { .. } => {
                    self.toasts.push(Toast {
                        message: notification.to_string(),
                        expires_at: now + self.toast_duration,
                    })
                }
                Notification::Reopened { .. } => {
                    debug!(text = notification.text(), "Reopened task not acknowledged")
                }
            }
        }
    }

    pub fn expire_toasts(&mut self, now: Instant) {
        self.toasts.retain(|toast| toast.expires_at > now);
    }
}

// Store failures never stop the UI; rejections are expected and only logged
fn report<T>(result: StoreResult<T>) {
    if let Err(err) = result {
        if err.is_rejection() {
            debug!(error = %err, "Change rejected");
        } else {
            error!(error = %err, "Change not saved");
        }
    }
}

pub fn run_app<B: Backend, S: KeyValueStorage>(
    terminal: &mut Terminal<B>,
    mut app: App<S>,
    tick_rate: Duration,
) -> io::Result<()> {
    loop {
        app.expire_toasts(Instant::now());
        terminal.draw(|f| draw_ui(f, &mut app))?;

        if crossterm::event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && !app.handle_key(key.code) {
                    return Ok(());
                }
            }
        }
    }
}

// Draws the whole user interface
fn draw_ui<S: KeyValueStorage>(f: &mut Frame, app: &mut App<S>) {
    let theme = app.theme;
    f.render_widget(Block::default().style(theme.text()), f.size());

    // Create two chunks of screen in 60-40 ratio
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(f.size());

    // DRAW LEFT PART
    // Search line on top, the filtered tasks below
    let left_side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(chunks[0]);

    let search_title = if app.items.searching {
        "Search (Enter - keep, Esc - clear)"
    } else {
        "Search (/)"
    };
    let search = Paragraph::new(app.items.query.as_str())
        .block(Block::default().borders(Borders::ALL).title(search_title))
        .style(theme.text());
    f.render_widget(search, left_side[0]);

    let visible = app.items.visible(&app.store);
    let list_block = Block::default().borders(Borders::ALL).title("List");
    if visible.is_empty() {
        let empty = Paragraph::new("No tasks")
            .alignment(Alignment::Center)
            .block(list_block)
            .style(theme.text());
        f.render_widget(empty, left_side[1]);
    } else {
        let task_list = List::new(get_list_items_ui(&visible, theme))
            .block(list_block)
            .style(theme.text())
            .highlight_style(theme.highlight())
            .highlight_symbol(">> ");
        f.render_stateful_widget(task_list, left_side[1], &mut app.items.state);
    }

    // DRAW RIGHT PART
    if app.task_edit_dialog_state.dialog_active {
        let create_or_edit_task = Paragraph::new(get_task_edit_ui(&app.task_edit_dialog_state, theme))
            .block(Block::new().title("Add/Edit Task").borders(Borders::ALL))
            .style(theme.text());

        f.render_widget(create_or_edit_task, chunks[1]);
    } else {
        // If not editing, display statistics and instructions in vertically split layout
        let right_side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);

        let instructions = Paragraph::new(get_instructions_ui())
            .block(Block::new().title("Commands").borders(Borders::ALL))
            .style(theme.text());

        let statistics = Paragraph::new(get_statistics_ui(
            app.store.entries(),
            Local::now().date_naive(),
        ))
        .block(Block::new().title("Statistics").borders(Borders::ALL))
        .style(theme.text());

        f.render_widget(instructions, right_side[0]);
        f.render_widget(statistics, right_side[1]);
    }

    draw_toasts(f, &app.toasts, theme);
}

// Stack the toasts in the top right corner
fn draw_toasts(f: &mut Frame, toasts: &[Toast], theme: Theme) {
    let area = f.size();
    let width = area.width.min(40);
    for (i, toast) in toasts.iter().enumerate() {
        let y = area.y + 1 + 3 * i as u16;
        if y + 3 > area.bottom() {
            break;
        }
        let rect = Rect::new(area.right() - width, y, width, 3);
        let popup = Paragraph::new(toast.message.as_str())
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL))
            .style(theme.highlight());
        f.render_widget(Clear, rect);
        f.render_widget(popup, rect);
    }
}
