pub mod markup;
pub mod region;

use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::WriteOrdering;
use crate::error::UploadError;
use crate::models::{Selection, UploadOutcome};
use crate::services::preview::encode_preview;
use crate::services::uploader::{Uploader, upload_file};

pub use region::{MarkupRegion, RenderTarget, TerminalRegion};

/// Previews and uploads the first file of each selection.
///
/// The preview and upload of a selection run as two independent tasks;
/// neither waits for the other. Under [`WriteOrdering::LatestSelection`] a
/// region write is applied only while its selection is still the newest one,
/// so stale previews or messages never overwrite a newer selection's output.
/// Superseded uploads are not cancelled and still reach the server.
pub struct UploadWidget {
    uploader: Arc<dyn Uploader>,
    preview: Arc<dyn RenderTarget>,
    message: Arc<dyn RenderTarget>,
    ordering: WriteOrdering,
    latest: Arc<Mutex<u64>>,
}

impl UploadWidget {
    pub fn new(
        uploader: Arc<dyn Uploader>,
        preview: Arc<dyn RenderTarget>,
        message: Arc<dyn RenderTarget>,
        ordering: WriteOrdering,
    ) -> Self {
        Self {
            uploader,
            preview,
            message,
            ordering,
            latest: Arc::new(Mutex::new(0)),
        }
    }

    /// Starts preview and upload for the first selected file.
    ///
    /// Returns `None` and touches nothing when the selection is empty.
    /// Must be called from within a tokio runtime.
    pub fn handle_selection(&self, selection: Selection) -> Option<SelectionHandle> {
        let extra = selection.files.len().saturating_sub(1);
        let Some(file) = selection.into_first() else {
            debug!("Selection carried no files, ignoring");
            return None;
        };
        if extra > 0 {
            debug!("Ignoring {} additional selected file(s)", extra);
        }

        let generation = {
            let mut latest = lock(&self.latest);
            *latest += 1;
            *latest
        };

        info!(
            "Selection #{}: {} ({} bytes, type '{}')",
            generation,
            file.name,
            file.size(),
            file.media_type
        );

        let preview_writer = self.writer(self.preview.clone(), generation);
        let preview_file = file.clone();
        let preview = tokio::spawn(async move {
            match encode_preview(preview_file).await {
                Ok(data_uri) => {
                    preview_writer.write(markup::preview(&data_uri));
                }
                // No user-visible feedback for local read failures
                Err(e) => warn!("Preview for selection #{} failed: {}", generation, e),
            }
        });

        let message_writer = self.writer(self.message.clone(), generation);
        let uploader = self.uploader.clone();
        let upload = tokio::spawn(async move {
            let outcome = upload_file(uploader.as_ref(), &file).await;
            match &outcome {
                UploadOutcome::Uploaded { url } => {
                    info!("Selection #{} uploaded to {}", generation, url)
                }
                UploadOutcome::Rejected { message } => {
                    info!("Selection #{} rejected by server: {}", generation, message)
                }
                UploadOutcome::Failed { description } => {
                    warn!("Selection #{} failed: {}", generation, description)
                }
            }
            message_writer.write(markup::outcome(&outcome));
            outcome
        });

        Some(SelectionHandle {
            generation,
            preview,
            upload,
        })
    }

    fn writer(&self, target: Arc<dyn RenderTarget>, generation: u64) -> RegionWriter {
        RegionWriter {
            target,
            generation,
            ordering: self.ordering,
            latest: self.latest.clone(),
        }
    }
}

/// Writes into one region on behalf of one selection.
struct RegionWriter {
    target: Arc<dyn RenderTarget>,
    generation: u64,
    ordering: WriteOrdering,
    latest: Arc<Mutex<u64>>,
}

impl RegionWriter {
    fn write(&self, markup: String) -> bool {
        // Held across render so a newer selection can't slip in between check and write
        let latest = lock(&self.latest);
        if self.ordering == WriteOrdering::LatestSelection && *latest != self.generation {
            debug!(
                "Dropping write from selection #{} (latest is #{})",
                self.generation, *latest
            );
            return false;
        }
        self.target.render(markup);
        true
    }
}

fn lock(latest: &Mutex<u64>) -> std::sync::MutexGuard<'_, u64> {
    latest.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// The two tasks started for one selection.
pub struct SelectionHandle {
    generation: u64,
    preview: JoinHandle<()>,
    upload: JoinHandle<UploadOutcome>,
}

impl SelectionHandle {
    /// Sequence number of the selection, starting at 1
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_finished(&self) -> bool {
        self.preview.is_finished() && self.upload.is_finished()
    }

    /// Cancels whichever of the two tasks is still running.
    pub fn abort(&self) {
        self.preview.abort();
        self.upload.abort();
    }

    /// Waits for both tasks and returns the upload outcome.
    pub async fn join(self) -> Result<UploadOutcome, UploadError> {
        let (preview, upload) = tokio::join!(self.preview, self.upload);
        if let Err(e) = preview {
            if !e.is_cancelled() {
                warn!("Preview task for selection #{} panicked: {}", self.generation, e);
            }
        }
        upload.map_err(|e| UploadError::Task(e.to_string()))
    }
}
