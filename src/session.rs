//! Dashboard session state and the actions that drive it.
//!
//! A detect action is split in three so the state is never borrowed across
//! the network call:
//!
//! 1. [`AppState::begin_detection`] snapshots the selected image and settings,
//! 2. [`DetectionRequest::send`] runs the client,
//! 3. [`AppState::finish`] folds the response back in.
//!
//! Each selected image gets a fresh selection id. A response is only applied
//! when it carries the id of the image that is still selected.

use crate::{
    config::{DEFAULT_ENDPOINT, DetectorConfig},
    detection::DetectionClient,
    error::Error,
    history::{HistoryRecord, HistoryStore},
    models::DetectionResult,
    upload::UploadedImage,
};

/// All mutable state of one dashboard session.
#[derive(Debug, Clone)]
pub struct AppState {
    settings: DetectorConfig,
    current_image: Option<UploadedImage>,
    results: Option<DetectionResult>,
    error: Option<String>,
    history: HistoryStore,
    processing: bool,
    selection: u64,
}

/// Snapshot handed out by [`AppState::begin_detection`].
#[derive(Debug, Clone)]
pub struct DetectionRequest {
    selection: u64,
    image: UploadedImage,
    settings: DetectorConfig,
}

/// Outcome of a [`DetectionRequest`], to be passed to [`AppState::finish`].
#[derive(Debug)]
pub struct DetectionResponse {
    selection: u64,
    image: UploadedImage,
    outcome: Result<DetectionResult, Error>,
}

/// What [`AppState::finish`] did with a response.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Result stored and recorded in history.
    Applied,
    /// Detection failed; the message is now the current error.
    Failed(String),
    /// The image changed while the request was in flight; response dropped.
    Stale,
}

impl DetectionRequest {
    pub fn image(&self) -> &UploadedImage {
        &self.image
    }

    pub fn settings(&self) -> &DetectorConfig {
        &self.settings
    }

    /// Run detection with the snapshotted image and settings.
    pub async fn send(self, client: &DetectionClient) -> DetectionResponse {
        let outcome = client.detect(&self.image, &self.settings).await;
        DetectionResponse {
            selection: self.selection,
            image: self.image,
            outcome,
        }
    }
}

impl DetectionResponse {
    pub fn outcome(&self) -> &Result<DetectionResult, Error> {
        &self.outcome
    }
}

impl AppState {
    /// Empty session using `settings`.
    pub fn new(settings: DetectorConfig) -> Self {
        Self {
            settings,
            current_image: None,
            results: None,
            error: None,
            history: HistoryStore::new(),
            processing: false,
            selection: 0,
        }
    }

    pub fn settings(&self) -> &DetectorConfig {
        &self.settings
    }

    pub fn set_endpoint(&mut self, endpoint: impl Into<String>) {
        self.settings.endpoint = endpoint.into();
    }

    pub fn reset_endpoint(&mut self) {
        self.settings.endpoint = DEFAULT_ENDPOINT.to_string();
    }

    pub fn set_use_mock(&mut self, use_mock: bool) {
        self.settings.use_mock = use_mock;
    }

    pub fn current_image(&self) -> Option<&UploadedImage> {
        self.current_image.as_ref()
    }

    pub fn results(&self) -> Option<&DetectionResult> {
        self.results.as_ref()
    }

    /// Message from the last failed detection, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// Whether the detect action is currently available.
    pub fn can_detect(&self) -> bool {
        self.current_image.is_some() && !self.processing
    }

    /// Make `image` the current image and clear the previous result and error.
    pub fn select_image(&mut self, image: UploadedImage) {
        self.selection += 1;
        self.current_image = Some(image);
        self.results = None;
        self.error = None;
    }

    /// Validate a file from the picker and select it.
    ///
    /// On rejection the error is stored as the current message and the
    /// previous selection is left alone.
    pub fn upload(&mut self, bytes: Vec<u8>, declared_mime: Option<&str>) -> Result<(), Error> {
        match UploadedImage::from_bytes(bytes, declared_mime) {
            Ok(image) => {
                self.select_image(image);
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Drop the current image, result and error.
    pub fn clear(&mut self) {
        self.selection += 1;
        self.current_image = None;
        self.results = None;
        self.error = None;
    }

    /// Start a detect action.
    ///
    /// Returns `None` when no image is selected or a request is already in flight.
    pub fn begin_detection(&mut self) -> Option<DetectionRequest> {
        if !self.can_detect() {
            return None;
        }
        let image = self.current_image.clone()?;

        self.processing = true;
        self.error = None;

        Some(DetectionRequest {
            selection: self.selection,
            image,
            settings: self.settings.clone(),
        })
    }

    /// Apply a finished request.
    pub fn finish(&mut self, response: DetectionResponse) -> Completion {
        self.processing = false;

        if response.selection != self.selection {
            tracing::warn!(
                response_selection = response.selection,
                current_selection = self.selection,
                "dropping detection response for an image that is no longer selected"
            );
            return Completion::Stale;
        }

        match response.outcome {
            Ok(result) => {
                self.history
                    .append(HistoryRecord::new(response.image, result.clone()));
                self.results = Some(result);
                Completion::Applied
            }
            Err(e) => {
                tracing::error!(error = %e, "error processing image");
                let message = e.to_string();
                self.error = Some(message.clone());
                Completion::Failed(message)
            }
        }
    }

    /// Run the whole detect action for the current image.
    ///
    /// Returns `None` when the action is unavailable (see [`Self::begin_detection`]).
    pub async fn process_image(&mut self, client: &DetectionClient) -> Option<Completion> {
        let request = self.begin_detection()?;
        let response = request.send(client).await;
        Some(self.finish(response))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}
