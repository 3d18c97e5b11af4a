use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Bounding box in source-image pixel coordinates.
///
/// On the wire this is the four-element array `[x, y, width, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// The same box with non-negative width and height.
    ///
    /// A negative extent means the box spans left of `x` (or above `y`).
    pub fn normalized(&self) -> Self {
        let (x, width) = if self.width < 0.0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        Self { x, y, width, height }
    }

    pub fn is_finite(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
    }

    /// Coordinates rounded to whole pixels, as shown in the history dialog.
    pub fn rounded(&self) -> [i64; 4] {
        [
            self.x.round() as i64,
            self.y.round() as i64,
            self.width.round() as i64,
            self.height.round() as i64,
        ]
    }
}

impl From<[f32; 4]> for BoundingBox {
    fn from([x, y, width, height]: [f32; 4]) -> Self {
        Self { x, y, width, height }
    }
}

impl From<BoundingBox> for [f32; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x, b.y, b.width, b.height]
    }
}

/// One recognized object: where it is, what it is and how sure the model was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
    pub class_name: String,
    /// Model confidence in `[0, 1]`.
    pub confidence: f32,
}

impl Detection {
    pub fn new(bbox: BoundingBox, class_name: impl Into<String>, confidence: f32) -> Self {
        Self {
            bbox,
            class_name: class_name.into(),
            confidence,
        }
    }

    /// Confidence as a whole percentage, rounded half up.
    pub fn confidence_percent(&self) -> i64 {
        (self.confidence * 100.0).round() as i64
    }

    /// Label painted above the box, e.g. `plastic 92%`.
    pub fn label(&self) -> String {
        format!("{} {}%", self.class_name, self.confidence_percent())
    }
}

/// Everything the detection service returns for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub detections: Vec<Detection>,
    /// Server-side inference time in seconds.
    pub processing_time: f64,
    pub class_counts: BTreeMap<String, u32>,
}

impl DetectionResult {
    /// Build a result whose class counts are derived from the detections.
    pub fn from_detections(detections: Vec<Detection>, processing_time: f64) -> Self {
        let class_counts = tally(&detections);
        Self {
            detections,
            processing_time,
            class_counts,
        }
    }

    /// Check the shape constraints a response must satisfy before it is shown.
    pub fn validate(&self) -> Result<(), String> {
        if !self.processing_time.is_finite() || self.processing_time < 0.0 {
            return Err(format!("invalid processing_time {}", self.processing_time));
        }

        for (idx, detection) in self.detections.iter().enumerate() {
            if !detection.bbox.is_finite() {
                return Err(format!(
                    "detection {} has a non-finite box {:?}",
                    idx,
                    <[f32; 4]>::from(detection.bbox)
                ));
            }
            if !(0.0..=1.0).contains(&detection.confidence) {
                return Err(format!(
                    "detection {} has confidence {} outside [0, 1]",
                    idx, detection.confidence
                ));
            }
        }

        let expected = tally(&self.detections);
        if expected != self.class_counts {
            return Err(format!(
                "class_counts {:?} do not match detections {:?}",
                self.class_counts, expected
            ));
        }

        Ok(())
    }

    pub fn object_count(&self) -> usize {
        self.detections.len()
    }
}

/// Count detections per class name.
pub fn tally(detections: &[Detection]) -> BTreeMap<String, u32> {
    let mut counts = BTreeMap::new();
    for detection in detections {
        *counts.entry(detection.class_name.clone()).or_insert(0) += 1;
    }
    counts
}
