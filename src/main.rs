use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::{error::Error, fs::OpenOptions, io, sync::Mutex, time::Duration};
use tracing::info;

use todo_store::app::{config::Config, ui};
use todo_store::{SqliteStorage, TodoStore};

// Start the app.
// Terminal handling based on:
// https://github.com/ratatui-org/ratatui/blob/main/examples/list.rs
pub fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::from_env();

    // The terminal belongs to the UI, so logs go to a file
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(log_file))
        .init();
    info!(?config, "Starting todo list");

    let storage = SqliteStorage::open(&config.db_path)?;
    let store = TodoStore::open(storage);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Redraw at least every 250 ms so toasts disappear on time
    let tick_rate = Duration::from_millis(250);
    let app = ui::App::new(store, config.toast_duration);
    let res = ui::run_app(&mut terminal, app, tick_rate);

    // Restore previous terminal state after exit
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "Terminal loop failed");
        println!("{err:?}");
    }

    Ok(())
}
