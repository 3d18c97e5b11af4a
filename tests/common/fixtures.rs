use std::time::Duration;

use image::{ImageBuffer, ImageFormat, Rgb};
use tempfile::NamedTempFile;
use wastelens::{DetectionClient, DetectorConfig, UploadedImage};

/// Background color of every generated test image.
pub const BACKGROUND: Rgb<u8> = Rgb([30u8, 30u8, 30u8]);

/// Encodes a solid `BACKGROUND` image of the given size.
pub fn encoded_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = ImageBuffer::from_fn(width, height, |_, _| BACKGROUND);
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, format)
        .expect("Failed to encode test image");
    out.into_inner()
}

/// A validated PNG upload of the given size.
pub fn uploaded_png(width: u32, height: u32) -> UploadedImage {
    UploadedImage::from_bytes(encoded_image(width, height, ImageFormat::Png), Some("image/png"))
        .expect("Failed to build test upload")
}

/// Writes a test image to a temp file with the given suffix.
/// The file will be automatically cleaned up when dropped.
pub fn image_file(suffix: &str, format: ImageFormat) -> NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp image file");
    std::fs::write(file.path(), encoded_image(64, 48, format)).expect("Failed to write test image");
    file
}

/// Live-mode settings pointing at `endpoint`.
pub fn live_config(endpoint: &str) -> DetectorConfig {
    DetectorConfig {
        endpoint: endpoint.to_string(),
        use_mock: false,
        timeout: Duration::from_secs(5),
        mock_delay: Duration::ZERO,
    }
}

/// Mock-mode settings with no artificial delay.
pub fn mock_config(endpoint: &str) -> DetectorConfig {
    DetectorConfig {
        use_mock: true,
        ..live_config(endpoint)
    }
}

pub fn test_client() -> DetectionClient {
    DetectionClient::new(Duration::from_secs(5)).expect("Failed to build client")
}

/// JSON body the detection service sends for a single plastic bottle.
pub fn plastic_response() -> serde_json::Value {
    serde_json::json!({
        "detections": [
            {"box": [50.0, 50.0, 200.0, 150.0], "class_name": "plastic", "confidence": 0.92}
        ],
        "processing_time": 0.12,
        "class_counts": {"plastic": 1}
    })
}
