/// Audit trail of add/delete mutations made since the last sync.
///
/// Entries are display data only: they are never replayed onto the document.
/// An add followed by a delete of the same card keeps both entries.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Add,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeDetails {
    /// Section identifier the change applied to.
    pub profile_type: String,
    pub card_id: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub id: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    pub details: ChangeDetails,
    /// Position in the log's sequence; never reused, survives `clear`.
    #[serde(skip)]
    seq: u64,
}

impl ChangeRecord {
    /// Local wall-clock time of the change, e.g. `14:03:27`.
    pub fn time_label(&self) -> String {
        chrono::DateTime::from_timestamp_millis(self.timestamp)
            .map(|utc| {
                utc.with_timezone(&chrono::Local)
                    .format("%H:%M:%S")
                    .to_string()
            })
            .unwrap_or_default()
    }

    pub fn title(&self) -> &'static str {
        match self.change_type {
            ChangeType::Add => "Added Card",
            ChangeType::Delete => "Deleted Card",
        }
    }
}

#[derive(Debug, Default)]
pub struct ChangeLog {
    records: Vec<ChangeRecord>,
    next_seq: u64,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record stamped with the current time.
    pub fn record(&mut self, change_type: ChangeType, details: ChangeDetails) -> &ChangeRecord {
        let timestamp = chrono::Utc::now().timestamp_millis();
        self.record_at(timestamp, change_type, details)
    }

    pub fn record_at(
        &mut self,
        timestamp: i64,
        change_type: ChangeType,
        details: ChangeDetails,
    ) -> &ChangeRecord {
        // Sequence suffix keeps ids unique within one millisecond.
        let seq = self.next_seq;
        self.next_seq += 1;
        let id = format!("{}-{}", timestamp, seq);
        self.records.push(ChangeRecord {
            id,
            timestamp,
            change_type,
            details,
            seq,
        });
        &self.records[self.records.len() - 1]
    }

    pub fn records(&self) -> &[ChangeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Sequence mark for everything recorded so far. Records added later,
    /// including after a `clear`, sort at or above it.
    pub fn mark(&self) -> u64 {
        self.next_seq
    }

    /// Drop the records made before `mark` (those covered by a completed write).
    pub fn drain_before(&mut self, mark: u64) {
        self.records.retain(|r| r.seq >= mark);
    }
}
