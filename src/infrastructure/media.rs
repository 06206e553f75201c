use crate::config::PickerConfig;
use crate::domain::media::MediaFacade;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use url::Url;

/// Local files, chosen through an external picker program.
pub struct LocalMedia {
    picker: PickerConfig,
}

impl LocalMedia {
    pub fn new(picker: PickerConfig) -> Self {
        Self { picker }
    }
}

#[async_trait]
impl MediaFacade for LocalMedia {
    fn pick_image(&self) -> Result<Option<PathBuf>> {
        let args: Vec<&str> = self.picker.args.iter().map(String::as_str).collect();
        let output = crate::app::external::with_suspended_terminal(|| {
            Command::new(&self.picker.program)
                .args(&args)
                .stdin(Stdio::inherit())
                .stderr(Stdio::inherit())
                .output()
                .with_context(|| format!("failed to run picker `{}`", self.picker.program))
        })??;

        if !output.status.success() {
            tracing::debug!(status = ?output.status, "picker dismissed");
            return Ok(None);
        }
        Ok(parse_picker_output(&String::from_utf8_lossy(&output.stdout)))
    }

    async fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))
    }

    fn local_reference(&self, path: &Path) -> String {
        local_reference(path)
    }
}

/// First non-empty line of the picker's stdout.
pub fn parse_picker_output(stdout: &str) -> Option<PathBuf> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(PathBuf::from)
}

/// `file://` URI for `path`, made absolute against the working directory.
pub fn local_reference(path: &Path) -> String {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    Url::from_file_path(&absolute)
        .map(String::from)
        .unwrap_or_else(|()| absolute.display().to_string())
}
