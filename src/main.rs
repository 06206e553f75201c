use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use slashdoc::app::{r#loop::run_loop, state::AppState};
use slashdoc::config::Config;
use slashdoc::infrastructure::{markdown_buffer::MarkdownBuffer, media::LocalMedia};
use slashdoc::logging;

fn setup_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));
}

fn load_document(path: Option<&PathBuf>) -> Result<MarkdownBuffer> {
    match path {
        Some(path) if path.exists() => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok(MarkdownBuffer::from_text(&text))
        }
        _ => Ok(MarkdownBuffer::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_panic_hook();

    let config = Config::load();
    let _log_guard = match config.log_dir() {
        Some(dir) => match logging::init(&dir) {
            Ok(guard) => Some(guard),
            Err(e) => {
                eprintln!("slashdoc: logging disabled: {e}");
                None
            }
        },
        None => None,
    };

    // Read the document BEFORE terminal setup so a bad path doesn't leave the
    // terminal in raw mode.
    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let document = load_document(path.as_ref())?;
    tracing::info!(path = ?path, lines = document.lines().len(), "starting slashdoc");

    let app_state = AppState::new(&config, document, path);
    let media = Arc::new(LocalMedia::new(config.picker.clone()));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let res = run_loop(&mut terminal, app_state, media).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "slashdoc exited with an error");
        println!("{:?}", err);
    }

    Ok(())
}
