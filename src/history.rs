use time::OffsetDateTime;
use uuid::Uuid;

use crate::{models::DetectionResult, upload::UploadedImage};

/// Snapshot of one successful detection run.
///
/// Records are never modified after creation; fields are only reachable
/// through accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    id: Uuid,
    image: UploadedImage,
    timestamp: OffsetDateTime,
    results: DetectionResult,
}

impl HistoryRecord {
    /// New record stamped with the current UTC time.
    pub fn new(image: UploadedImage, results: DetectionResult) -> Self {
        Self::at(image, results, OffsetDateTime::now_utc())
    }

    /// New record with an explicit timestamp.
    pub fn at(image: UploadedImage, results: DetectionResult, timestamp: OffsetDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            image,
            timestamp,
            results,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn image(&self) -> &UploadedImage {
        &self.image
    }

    pub fn timestamp(&self) -> OffsetDateTime {
        self.timestamp
    }

    pub fn results(&self) -> &DetectionResult {
        &self.results
    }
}

/// Session-lifetime list of past runs, most recent first.
///
/// There is no update or delete; records go away with the store.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    records: Vec<HistoryRecord>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `record` ahead of every existing record.
    pub fn append(&mut self, record: HistoryRecord) {
        self.records.insert(0, record);
    }

    /// Records, most recent first.
    pub fn list(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn get(&self, id: Uuid) -> Option<&HistoryRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::mock;
    use image::{ImageBuffer, ImageFormat, Rgb};

    fn sample_image() -> UploadedImage {
        let img = ImageBuffer::from_fn(8, 8, |_, _| Rgb([255u8, 255u8, 255u8]));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        UploadedImage::from_bytes(out.into_inner(), Some("image/png")).unwrap()
    }

    #[test]
    fn starts_empty() {
        let store = HistoryStore::new();
        assert!(store.is_empty());
        assert!(store.list().is_empty());
    }

    #[test]
    fn most_recent_first() {
        let mut store = HistoryStore::new();
        let r1 = HistoryRecord::new(sample_image(), mock::fixture());
        let r2 = HistoryRecord::new(sample_image(), DetectionResult::from_detections(vec![], 0.1));
        let (id1, id2) = (r1.id(), r2.id());

        store.append(r1);
        store.append(r2);

        let ids: Vec<Uuid> = store.list().iter().map(HistoryRecord::id).collect();
        assert_eq!(ids, vec![id2, id1]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn ids_are_unique_and_resolvable() {
        let mut store = HistoryStore::new();
        for _ in 0..5 {
            store.append(HistoryRecord::new(sample_image(), mock::fixture()));
        }

        let mut ids: Vec<Uuid> = store.list().iter().map(HistoryRecord::id).collect();
        for id in &ids {
            assert_eq!(store.get(*id).map(HistoryRecord::id), Some(*id));
        }
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
        assert!(store.get(Uuid::new_v4()).is_none());
    }

    #[test]
    fn record_keeps_its_own_copy() {
        let image = sample_image();
        let record = HistoryRecord::new(image.clone(), mock::fixture());
        drop(image);
        assert_eq!(record.image().dimensions(), (8, 8));
        assert_eq!(record.results(), &mock::fixture());
    }
}
