use crate::app::state::{UploadId, UrlFocus};
use crate::domain::models::PendingFile;
use crossterm::event::KeyEvent;
use std::path::PathBuf;

/// A file chosen in the picker, with the local reference to show meanwhile.
#[derive(Debug, Clone, PartialEq)]
pub struct PickedFile {
    pub path: PathBuf,
    pub blob: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // --- System / Terminal ---
    Tick,
    Resize(u16, u16),
    Quit,
    Save,

    // --- Document ---
    EditorInput(KeyEvent), // Key typed into the document

    // --- Slash Menu ---
    SlashMenuNext,          // Next item (wraps)
    SlashMenuPrev,          // Previous item (wraps)
    SlashMenuSelect(usize), // Run the item at index (click)
    SlashMenuConfirm,       // Run the highlighted item (Enter)
    CloseSlashMenu,         // Esc or click outside

    // --- Image Menu ---
    ImageMenuNext,
    ImageMenuPrev,
    ImageMenuActivate(usize), // Click on an entry
    ImageMenuConfirm,         // Enter on the highlighted entry
    ImageUrlInput(KeyEvent),  // Typing into the URL field
    ImageUrlSubmit,           // Enter in the URL field
    ImageUrlDone,             // Click on the Done button
    ImageUrlCancel,           // Esc in the URL field
    ImageUrlFocus(UrlFocus),  // Focus moved within the URL form
    CloseImageMenu,           // Outer cancel: close the whole menu

    // --- Async Results ---
    ImageFilePicked(Option<PickedFile>),    // Picker finished (None = dismissed)
    ImageFileLoaded(UploadId, PendingFile), // Bytes read and encoded
    ImageFileFailed(UploadId, String),      // Read failed
    OperationStarted(String),
    OperationCompleted(Result<String, String>),
    ErrorOccurred(String),
}
