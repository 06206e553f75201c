use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Access to local media: choosing a file and reading it back.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaFacade: Send + Sync {
    /// Asks the user for an image. `Ok(None)` means the picker was dismissed.
    fn pick_image(&self) -> Result<Option<PathBuf>>;

    async fn read_file(&self, path: &Path) -> Result<Vec<u8>>;

    /// A transient URI the document can point at until the file is persisted.
    fn local_reference(&self, path: &Path) -> String;
}
