use super::key_hooks::KeyHooks;
use crate::config::Config;
use crate::domain::models::DocumentContext;
use crate::infrastructure::markdown_buffer::MarkdownBuffer;
use crate::theme::Theme;
use std::path::PathBuf;

pub mod error;
pub mod image_menu;
pub mod input;
pub mod slash_menu;

// Re-exports
pub use error::ErrorState;
pub use image_menu::{ImageMenuState, ImageMode, UploadId, UrlFocus, UrlForm};
pub use input::AppTextArea;
pub use slash_menu::SlashMenuState;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum AppMode {
    Editing,   // Typing into the document
    SlashMenu, // Slash command list is open
    ImageMenu, // Image upload / URL menu is open
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    // --- Connectivity & Status ---
    pub should_quit: bool,
    pub mode: AppMode,
    pub last_error: Option<ErrorState>,
    pub status_message: Option<String>,
    pub active_tasks: Vec<String>,

    // --- Document ---
    pub document: MarkdownBuffer,
    pub document_path: Option<PathBuf>,
    pub document_context: DocumentContext,

    // --- Menus ---
    pub slash_menu: Option<SlashMenuState>,
    pub image_menu: Option<ImageMenuState>,
    pub key_hooks: KeyHooks,
    pub next_upload_id: u64,

    // --- Animation ---
    pub frame_count: u64,

    // --- Config ---
    pub max_menu_height: u16,
    pub theme: Theme,
}

impl AppState {
    #[must_use]
    pub fn new(config: &Config, document: MarkdownBuffer, path: Option<PathBuf>) -> Self {
        let theme = Theme::from_palette_type(config.theme);
        let mut document = document;
        document.set_theme(&theme);
        Self {
            document,
            document_path: path,
            max_menu_height: config.max_menu_height,
            theme,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn pending_file_count(&self) -> usize {
        self.document_context.files().len()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            should_quit: false,
            mode: AppMode::Editing,
            last_error: None,
            status_message: None,
            active_tasks: Vec::new(),
            document: MarkdownBuffer::default(),
            document_path: None,
            document_context: DocumentContext::default(),
            slash_menu: None,
            image_menu: None,
            key_hooks: KeyHooks::default(),
            next_upload_id: 0,
            frame_count: 0,
            max_menu_height: Config::default().max_menu_height,
            theme: Theme::default(),
        }
    }
}
