//! Asynchronous file-to-URL transfer with progress tracking.
//!
//! Each image slot owns an [`UploadSlot`]. Selecting a file calls
//! [`UploadSlot::begin`], which issues a new generation token; the returned
//! [`UploadTask`] only acts on the slot while its token is still current.
//! Superseded transfers are not cancelled, their results are dropped.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::UploadError;
use crate::value::FileHandle;

pub type ProgressFn = Arc<dyn Fn(f64) + Send + Sync>;
pub type ResolvedFn = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub enum UploadState {
    Idle,
    Uploading { progress: f64 },
    Resolved { url: String },
    Failed { message: String },
}

impl UploadState {
    pub fn progress(&self) -> f64 {
        match self {
            UploadState::Idle | UploadState::Failed { .. } => 0.0,
            UploadState::Uploading { progress } => *progress,
            UploadState::Resolved { .. } => 1.0,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, UploadState::Uploading { .. })
    }
}

/// What the storage collaborator is asked to do.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadRequest {
    pub file: FileHandle,
    /// Destination metadata, e.g. `{"type": "thumbnail"}`.
    #[serde(default)]
    pub input: Value,
    #[serde(default)]
    pub temporary: bool,
}

/// Response of the storage collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub path: Map<String, Value>,
}

impl UploadedImage {
    pub fn new(url: &str, size: u64) -> Self {
        Self {
            url: url.to_string(),
            thumbnail_url: None,
            size,
            uploaded_at: Utc::now(),
            metadata: Map::new(),
            path: Map::new(),
        }
    }
}

#[async_trait]
pub trait Uploader: Send + Sync {
    /// Transfers the file, reporting progress in `[0, 1]` through `on_progress`.
    async fn upload(&self, request: UploadRequest, on_progress: ProgressFn) -> Result<UploadedImage, UploadError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    Resolved(String),
    Failed(UploadError),
    /// A newer selection replaced this file before the transfer finished.
    Superseded,
}

struct SlotInner {
    generation: u64,
    file: Option<FileHandle>,
    state: UploadState,
    on_resolved: Option<ResolvedFn>,
}

/// Upload state of one image slot. Clones share the same state.
#[derive(Clone)]
pub struct UploadSlot {
    inner: Arc<Mutex<SlotInner>>,
    destination: Value,
    temporary: bool,
}

impl fmt::Debug for UploadSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("UploadSlot")
            .field("generation", &inner.generation)
            .field("state", &inner.state)
            .field("destination", &self.destination)
            .finish()
    }
}

impl UploadSlot {
    pub fn new(destination: Value, temporary: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SlotInner {
                generation: 0,
                file: None,
                state: UploadState::Idle,
                on_resolved: None,
            })),
            destination,
            temporary,
        }
    }

    /// Registers the listener told about each resolved URL of the current selection.
    pub fn on_resolved<F>(self, listener: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.lock().on_resolved = Some(Arc::new(listener));
        self
    }

    fn lock(&self) -> MutexGuard<'_, SlotInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn state(&self) -> UploadState {
        self.lock().state.clone()
    }

    pub fn progress(&self) -> f64 {
        self.lock().state.progress()
    }

    pub fn url(&self) -> Option<String> {
        match &self.lock().state {
            UploadState::Resolved { url } => Some(url.clone()),
            _ => None,
        }
    }

    /// The resolved URL, but only when it belongs to `file`.
    pub fn url_for(&self, file: &FileHandle) -> Option<String> {
        let inner = self.lock();
        match (&inner.file, &inner.state) {
            (Some(current), UploadState::Resolved { url }) if current == file => Some(url.clone()),
            _ => None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Starts a new transfer for `file`, superseding any transfer in flight.
    pub fn begin(&self, file: FileHandle) -> UploadTask {
        let generation = {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.file = Some(file.clone());
            inner.state = UploadState::Uploading { progress: 0.0 };
            inner.generation
        };
        log::debug!("Upload #{} started for '{}' ({} bytes)", generation, file.name, file.size);
        UploadTask {
            slot: self.clone(),
            generation,
            request: UploadRequest {
                file,
                input: self.destination.clone(),
                temporary: self.temporary,
            },
        }
    }

    /// Forgets the current selection; a transfer still in flight becomes stale.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.file = None;
        inner.state = UploadState::Idle;
    }

    fn apply_progress(&self, generation: u64, progress: f64) {
        let mut inner = self.lock();
        if inner.generation != generation {
            return;
        }
        let current = match inner.state {
            UploadState::Uploading { progress } => progress,
            _ => return,
        };
        let progress = progress.clamp(0.0, 1.0);
        if progress >= current {
            inner.state = UploadState::Uploading { progress };
        }
    }

    fn finish(&self, generation: u64, result: Result<UploadedImage, UploadError>) -> UploadOutcome {
        let listener = {
            let mut inner = self.lock();
            if inner.generation != generation {
                log::debug!("Dropping result of superseded upload #{} (current #{})", generation, inner.generation);
                return UploadOutcome::Superseded;
            }
            match &result {
                Ok(image) => {
                    inner.state = UploadState::Resolved { url: image.url.clone() };
                    inner.on_resolved.clone()
                }
                Err(e) => {
                    log::error!("Image upload failed: {}", e);
                    inner.state = UploadState::Failed { message: e.to_string() };
                    None
                }
            }
        };

        match result {
            Ok(image) => {
                if let Some(listener) = listener {
                    listener(&image.url);
                }
                UploadOutcome::Resolved(image.url)
            }
            Err(e) => UploadOutcome::Failed(e),
        }
    }
}

/// One transfer, bound to the generation it was started with.
pub struct UploadTask {
    slot: UploadSlot,
    generation: u64,
    request: UploadRequest,
}

impl fmt::Debug for UploadTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadTask")
            .field("generation", &self.generation)
            .field("file", &self.request.file.name)
            .finish()
    }
}

impl UploadTask {
    pub fn file(&self) -> &FileHandle {
        &self.request.file
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn request(&self) -> &UploadRequest {
        &self.request
    }

    pub async fn run(self, uploader: &dyn Uploader) -> UploadOutcome {
        let progress_slot = self.slot.clone();
        let generation = self.generation;
        let on_progress: ProgressFn = Arc::new(move |p| progress_slot.apply_progress(generation, p));
        let result = uploader.upload(self.request, on_progress).await;
        self.slot.finish(generation, result)
    }
}

/// Runs independent transfers concurrently; one slow upload does not hold back the others.
pub async fn run_all(tasks: Vec<UploadTask>, uploader: &dyn Uploader) -> Vec<UploadOutcome> {
    futures::future::join_all(tasks.into_iter().map(|t| t.run(uploader))).await
}
