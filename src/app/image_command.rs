//! The "insert image" flow: choose between uploading a local file and
//! embedding a remote URL.

use crate::app::key_hooks::HookId;
use crate::app::state::image_menu::{
    image_items, ImageMenuState, ImageMode, PendingUpload, UploadId, UrlFocus, UrlForm,
    IMAGE_UPLOAD,
};
use crate::components::command_list::CommandListState;
use crate::domain::editor::{DocumentEditor, EditorChain};
use crate::domain::models::{ImageAttrs, Range};
use crate::domain::validation::{is_valid_url, ImageError};
use anyhow::Result;
use tokio_util::sync::CancellationToken;

/// What the host has to do after the menu handled an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOutcome {
    Idle,
    /// Run the file picker and report back with `file_picked`.
    PickFile,
    /// The image is in the document; the menu can be unmounted.
    Inserted,
}

impl ImageMenuState {
    #[must_use]
    pub fn new(range: Range, hook: HookId) -> Self {
        Self {
            range: Some(range),
            mode: ImageMode::Choosing,
            items: image_items(),
            selected_index: 0,
            list: CommandListState::default(),
            hook,
            upload: None,
        }
    }

    #[must_use]
    pub fn is_choosing(&self) -> bool {
        self.mode == ImageMode::Choosing
    }

    pub fn select_next(&mut self) {
        if self.is_choosing() {
            self.selected_index = (self.selected_index + 1) % self.items.len();
        }
    }

    pub fn select_prev(&mut self) {
        if self.is_choosing() {
            let len = self.items.len();
            self.selected_index = (self.selected_index + len - 1) % len;
        }
    }

    /// Same as clicking the highlighted entry.
    pub fn activate_selected(&mut self, editor: &mut dyn DocumentEditor) -> Result<ImageOutcome> {
        self.activate(self.selected_index, editor)
    }

    pub fn activate(
        &mut self,
        index: usize,
        editor: &mut dyn DocumentEditor,
    ) -> Result<ImageOutcome> {
        if !self.is_choosing() {
            return Ok(ImageOutcome::Idle);
        }
        let Some(item) = self.items.get(index) else {
            return Ok(ImageOutcome::Idle);
        };

        if item.title == IMAGE_UPLOAD {
            self.focus_and_delete_trigger(editor)?;
            Ok(ImageOutcome::PickFile)
        } else {
            self.mode = ImageMode::UrlEntry(UrlForm::default());
            Ok(ImageOutcome::Idle)
        }
    }

    /// Optimistically points the document at the picked file's local reference.
    pub fn file_picked(&mut self, blob: &str, editor: &mut dyn DocumentEditor) -> Result<()> {
        EditorChain::new(editor)
            .focus()
            .set_image(ImageAttrs {
                src: blob.to_string(),
                alt: String::new(),
                title: None,
            })
            .run()
    }

    /// Registers a file read owned by this menu. Any previous read is cancelled.
    pub fn begin_upload(&mut self, id: UploadId) -> CancellationToken {
        if let Some(previous) = self.upload.take() {
            previous.token.cancel();
        }
        let token = CancellationToken::new();
        self.upload = Some(PendingUpload {
            id,
            token: token.clone(),
        });
        token
    }

    #[must_use]
    pub fn owns_upload(&self, id: UploadId) -> bool {
        self.upload
            .as_ref()
            .is_some_and(|upload| upload.id == id && !upload.token.is_cancelled())
    }

    pub fn finish_upload(&mut self, id: UploadId) {
        if self.upload.as_ref().is_some_and(|upload| upload.id == id) {
            self.upload = None;
        }
    }

    pub fn submit_url(&mut self, editor: &mut dyn DocumentEditor) -> Result<ImageOutcome> {
        let ImageMode::UrlEntry(form) = &mut self.mode else {
            return Ok(ImageOutcome::Idle);
        };

        let url = form.input.value();
        if !is_valid_url(&url) {
            tracing::debug!(%url, "rejected image url");
            form.error = Some(ImageError::InvalidUrl);
            return Ok(ImageOutcome::Idle);
        }
        form.error = None;

        self.focus_and_delete_trigger(editor)?;
        EditorChain::new(editor)
            .focus()
            .set_image(ImageAttrs {
                src: url,
                alt: String::new(),
                title: Some(String::new()),
            })
            .insert_content("")
            .run()?;
        EditorChain::new(editor).blur().run()?;

        self.mode = ImageMode::Choosing;
        Ok(ImageOutcome::Inserted)
    }

    /// Focuses the editor and removes the trigger text, unless an earlier
    /// activation already did.
    fn focus_and_delete_trigger(&mut self, editor: &mut dyn DocumentEditor) -> Result<()> {
        let chain = EditorChain::new(editor).focus();
        match self.range {
            Some(range) => {
                chain.delete_range(range).run()?;
                self.range = None;
                Ok(())
            }
            None => chain.run(),
        }
    }

    pub fn cancel_url(&mut self) {
        if !self.is_choosing() {
            self.mode = ImageMode::Choosing;
        }
    }

    /// Moves focus within the URL form. Focusing the input clears the error.
    pub fn set_url_focus(&mut self, focus: UrlFocus) {
        if let ImageMode::UrlEntry(form) = &mut self.mode {
            if focus == UrlFocus::Input && form.focus != UrlFocus::Input {
                form.error = None;
            }
            form.focus = focus;
        }
    }

    /// Cancels any in-flight read and hands back the key hook to release.
    pub fn unmount(self) -> HookId {
        if let Some(upload) = self.upload {
            upload.token.cancel();
        }
        self.hook
    }
}
