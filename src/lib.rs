pub mod config;
pub mod detection;
pub mod error;
pub mod history;
pub mod logging;
pub mod models;
pub mod render;
pub mod session;
pub mod summary;
pub mod upload;

pub use config::{AppConfig, DetectorConfig};
pub use detection::DetectionClient;
pub use error::{Error, Result};
pub use history::{HistoryRecord, HistoryStore};
pub use models::{BoundingBox, Detection, DetectionResult};
pub use render::{AnnotatedImage, Annotation, Renderer};
pub use session::{AppState, Completion, DetectionRequest, DetectionResponse};
pub use summary::{Summary, summarize};
pub use upload::UploadedImage;
