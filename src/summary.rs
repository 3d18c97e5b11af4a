use std::{collections::BTreeMap, fmt};

use serde::Serialize;

use crate::models::DetectionResult;

/// Figures shown on the results card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub object_count: usize,
    pub processing_time_seconds: f64,
    pub class_counts: BTreeMap<String, u32>,
}

/// Derive display statistics from a detection result.
pub fn summarize(result: &DetectionResult) -> Summary {
    Summary {
        object_count: result.detections.len(),
        processing_time_seconds: result.processing_time,
        class_counts: result.class_counts.clone(),
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Objects Detected: {}", self.object_count)?;
        writeln!(f, "Processing Time: {:.2}s", self.processing_time_seconds)?;
        write!(f, "Detected Classes:")?;
        if self.class_counts.is_empty() {
            write!(f, " none")?;
        }
        for (class_name, count) in &self.class_counts {
            write!(f, "\n  {}: {}", class_name, count)?;
        }
        Ok(())
    }
}
