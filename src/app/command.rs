use crate::app::state::UploadId;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub enum Command {
    PickImageFile,
    ReadImageFile {
        id: UploadId,
        path: PathBuf,
        blob: String,
        token: CancellationToken,
    },
    SaveDocument {
        path: PathBuf,
        text: String,
    },
}
