use serde::{Deserialize, Serialize};

use crate::security::{JammingEvent, PatternDetection, SpoofingEvent};

/// A detector event handed to an evidence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvidenceRecord {
    Jamming(JammingEvent),
    Spoofing(SpoofingEvent),
    Threat(PatternDetection),
}

impl EvidenceRecord {
    pub fn timestamp_ms(&self) -> u32 {
        match self {
            EvidenceRecord::Jamming(event) => event.timestamp_ms,
            EvidenceRecord::Spoofing(event) => event.timestamp_ms,
            EvidenceRecord::Threat(detection) => detection.timestamp_ms,
        }
    }
}

/// Receives every new detector event exactly once, in the order raised.
///
/// Persisting, chaining or gating access to the records is the sink's concern.
pub trait EvidenceSink {
    fn record(&mut self, record: &EvidenceRecord);
}

impl EvidenceSink for Vec<EvidenceRecord> {
    fn record(&mut self, record: &EvidenceRecord) {
        self.push(record.clone());
    }
}
