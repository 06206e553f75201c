use super::input::AppTextArea;
use crate::app::key_hooks::HookId;
use crate::components::command_list::CommandListState;
use crate::domain::models::{CommandItem, Icon, Range};
use crate::domain::validation::ImageError;
use tokio_util::sync::CancellationToken;

pub const IMAGE_UPLOAD: &str = "Image Upload";
pub const IMAGE_FROM_URL: &str = "Image from URL";
pub const URL_PLACEHOLDER: &str = "Insert link here";

#[must_use]
pub fn image_items() -> Vec<CommandItem> {
    vec![
        CommandItem::new(
            IMAGE_UPLOAD,
            "Upload or embed with a link.",
            &["upload", "picture", "media"],
            Icon::Upload,
        ),
        CommandItem::new(
            IMAGE_FROM_URL,
            "Upload or embed with a link.",
            &["photo", "picture", "media"],
            Icon::Link,
        ),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlFocus {
    Input,
    Done,
    /// Focus is outside the form, e.g. after a click elsewhere.
    Away,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UrlForm {
    pub input: AppTextArea<'static>,
    pub error: Option<ImageError>,
    pub focus: UrlFocus,
}

impl Default for UrlForm {
    fn default() -> Self {
        Self {
            input: AppTextArea::single_line(URL_PLACEHOLDER),
            error: None,
            focus: UrlFocus::Input,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImageMode {
    Choosing,
    UrlEntry(UrlForm),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UploadId(pub u64);

/// A file read started by this menu; cancelled when the menu goes away.
#[derive(Debug, Clone)]
pub struct PendingUpload {
    pub id: UploadId,
    pub token: CancellationToken,
}

impl PartialEq for PendingUpload {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageMenuState {
    /// Trigger text to replace with the image; `None` once it has been deleted.
    pub range: Option<Range>,
    pub mode: ImageMode,
    pub items: Vec<CommandItem>,
    pub selected_index: usize,
    pub list: CommandListState,
    /// Key hook held while mounted.
    pub hook: HookId,
    pub upload: Option<PendingUpload>,
}
