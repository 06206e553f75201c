use anyhow::Result;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};

/// Hands the terminal to an external program for the duration of `f`.
///
/// The caller should clear the terminal afterwards so the next frame repaints
/// everything the program may have left behind.
pub fn with_suspended_terminal<T>(f: impl FnOnce() -> T) -> Result<T> {
    // 1. Suspend TUI
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::LeaveAlternateScreen,
        DisableMouseCapture,
        crossterm::cursor::Show
    )?;

    // 2. Run external tool
    let result = f();

    // 3. Resume TUI
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::EnterAlternateScreen,
        EnableMouseCapture,
        crossterm::cursor::Hide
    )?;

    Ok(result)
}
