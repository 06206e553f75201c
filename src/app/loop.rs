use crate::app::{
    action::{Action, PickedFile},
    command::Command,
    input::map_event_to_action,
    reducer,
    state::AppState,
    ui, uploads,
};
use crate::domain::media::MediaFacade;

use anyhow::Result;
use crossterm::event::{self, Event};
use ratatui::{backend::Backend, Terminal};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

const TICK_RATE: Duration = Duration::from_millis(250);

pub async fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: AppState,
    media: Arc<dyn MediaFacade>,
) -> Result<()> {
    // User input channel
    let (event_tx, event_rx) = mpsc::channel(100);
    tokio::task::spawn_blocking(move || loop {
        match event::read() {
            Ok(evt) => {
                if event_tx.blocking_send(Ok(evt)).is_err() {
                    break;
                }
            }
            Err(e) => {
                let _ = event_tx.blocking_send(Err(e));
                break;
            }
        }
    });

    run_loop_with_events(terminal, app_state, media, event_rx).await?;
    Ok(())
}

/// Drives the app until it quits and hands back the final state.
pub async fn run_loop_with_events<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app_state: AppState,
    media: Arc<dyn MediaFacade>,
    mut event_rx: mpsc::Receiver<Result<Event, std::io::Error>>,
) -> Result<AppState> {
    let (action_tx, mut action_rx) = mpsc::channel(100);
    let mut interval = interval(TICK_RATE);

    loop {
        // --- 1. Render ---
        terminal.draw(|f| {
            ui::draw(f, &mut app_state);
        })?;

        // --- 2. Event Handling (TEA Runtime) ---
        let action = tokio::select! {
            _ = interval.tick() => Some(Action::Tick),

            // User Input
            Some(res) = event_rx.recv() => {
                let event = match res {
                    Ok(e) => e,
                    Err(e) => return Err(e.into()),
                };
                map_event_to_action(event, &app_state, terminal.size()?)
            },

            // Async Results
            Some(a) = action_rx.recv() => Some(a),
        };

        // --- 3. Update (Reducer) ---
        let Some(action) = action else {
            continue;
        };
        let command = reducer::update(&mut app_state, action);
        if app_state.should_quit {
            break;
        }

        match command {
            Some(Command::PickImageFile) => {
                let picked = media.pick_image();
                terminal.clear()?;
                let action = match picked {
                    Ok(Some(path)) => Action::ImageFilePicked(Some(PickedFile {
                        blob: media.local_reference(&path),
                        path,
                    })),
                    Ok(None) => Action::ImageFilePicked(None),
                    Err(e) => Action::ErrorOccurred(format!("File picker failed: {e}")),
                };
                let _ = action_tx.send(action).await;
            }
            Some(cmd) => uploads::handle_command(cmd, media.clone(), action_tx.clone())?,
            None => {}
        }
    }

    Ok(app_state)
}

#[cfg(test)]
#[path = "loop_tests.rs"]
mod tests;
