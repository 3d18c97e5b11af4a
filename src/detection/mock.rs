use crate::models::{BoundingBox, Detection, DetectionResult};

/// Canned result returned in mock mode, for working on the dashboard
/// without a detection backend.
pub fn fixture() -> DetectionResult {
    DetectionResult::from_detections(
        vec![
            Detection::new(BoundingBox::new(50.0, 50.0, 200.0, 150.0), "plastic", 0.92),
            Detection::new(BoundingBox::new(300.0, 100.0, 150.0, 200.0), "paper", 0.87),
            Detection::new(BoundingBox::new(150.0, 300.0, 100.0, 100.0), "glass", 0.76),
        ],
        0.45,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_is_consistent() {
        let result = fixture();
        assert!(result.validate().is_ok());
        assert_eq!(result.object_count(), 3);
        assert_eq!(result.class_counts.len(), 3);
        assert!(result.class_counts.values().all(|&n| n == 1));
    }
}
