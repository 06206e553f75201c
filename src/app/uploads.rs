use crate::app::{action::Action, command::Command, state::UploadId};
use crate::domain::media::MediaFacade;
use crate::domain::models::{FileKind, PendingFile};
use anyhow::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub fn handle_command(
    command: Command,
    media: Arc<dyn MediaFacade>,
    tx: mpsc::Sender<Action>,
) -> Result<()> {
    match command {
        Command::ReadImageFile {
            id,
            path,
            blob,
            token,
        } => {
            tokio::spawn(read_image_file(id, path, blob, token, media, tx));
        }
        Command::SaveDocument { path, text } => {
            tokio::spawn(async move {
                let name = path.display().to_string();
                let _ = tx
                    .send(Action::OperationStarted(format!("Saving {name}...")))
                    .await;
                let result = match tokio::fs::write(&path, text).await {
                    Ok(()) => {
                        tracing::info!(path = %name, "document saved");
                        Ok(format!("Saved {name}"))
                    }
                    Err(e) => {
                        tracing::error!(path = %name, error = %e, "save failed");
                        Err(format!("Failed to save {name}: {e}"))
                    }
                };
                let _ = tx.send(Action::OperationCompleted(result)).await;
            });
        }
        Command::PickImageFile => {
            // Needs the terminal; the event loop runs it inline.
            tracing::warn!("picker command reached the background handler");
        }
    }
    Ok(())
}

/// Reads and encodes a picked image, reporting back unless `token` fires first.
pub async fn read_image_file(
    id: UploadId,
    path: PathBuf,
    blob: String,
    token: CancellationToken,
    media: Arc<dyn MediaFacade>,
    tx: mpsc::Sender<Action>,
) {
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let read = tokio::select! {
        () = token.cancelled() => {
            tracing::debug!(%filename, "image read cancelled");
            return;
        }
        read = media.read_file(&path) => read,
    };
    if token.is_cancelled() {
        tracing::debug!(%filename, "image read finished after cancellation");
        return;
    }

    let action = match read {
        Ok(bytes) => {
            tracing::info!(%filename, bytes = bytes.len(), "image read");
            Action::ImageFileLoaded(
                id,
                PendingFile {
                    kind: FileKind::Images,
                    blob,
                    filename,
                    content: STANDARD.encode(bytes),
                },
            )
        }
        Err(e) => {
            tracing::error!(%filename, error = %e, "image read failed");
            Action::ImageFileFailed(id, format!("Failed to read {filename}: {e}"))
        }
    };
    let _ = tx.send(action).await;
}
