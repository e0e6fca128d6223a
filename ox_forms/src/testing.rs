//! In-process uploader used by the demo and the test suites.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::UploadError;
use crate::upload::{ProgressFn, UploadRequest, UploadedImage, Uploader};

/// Reports a fixed progress script, optionally waits, then succeeds or fails.
pub struct ScriptedUploader {
    steps: Vec<f64>,
    delay: Duration,
    failure: Option<UploadError>,
    base_url: String,
    calls: Mutex<Vec<UploadRequest>>,
}

impl ScriptedUploader {
    pub fn new(base_url: &str) -> Self {
        Self {
            steps: vec![0.0, 0.3, 0.7, 1.0],
            delay: Duration::ZERO,
            failure: None,
            base_url: base_url.trim_end_matches('/').to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_steps(mut self, steps: Vec<f64>) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing(mut self, error: UploadError) -> Self {
        self.failure = Some(error);
        self
    }

    pub fn calls(&self) -> Vec<UploadRequest> {
        self.calls.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn url_for(&self, request: &UploadRequest) -> String {
        format!("{}/{}/{}", self.base_url, request.file.id, request.file.name)
    }
}

#[async_trait]
impl Uploader for ScriptedUploader {
    async fn upload(&self, request: UploadRequest, on_progress: ProgressFn) -> Result<UploadedImage, UploadError> {
        self.calls.lock().unwrap_or_else(|p| p.into_inner()).push(request.clone());
        let pause = self.delay / (self.steps.len().max(1) as u32);
        for step in &self.steps {
            if !pause.is_zero() {
                tokio::time::sleep(pause).await;
            }
            on_progress(*step);
        }
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        Ok(UploadedImage::new(&self.url_for(&request), request.file.size))
    }
}
