mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from wastelens for tests
pub use wastelens::{
    AppState, BoundingBox, Completion, Detection, DetectionClient, DetectionResult,
    DetectorConfig, Error, Renderer, UploadedImage,
};
