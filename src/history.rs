use crate::TransactionRecord;

/// Shown in place of the history when nothing has been recorded.
pub const EMPTY_HISTORY: &str = "No transactions yet.";

/// Append-only log of finished fills, in completion order.
#[derive(Debug, Default)]
pub struct TransactionHistory {
    records: Vec<TransactionRecord>,
}

impl TransactionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: TransactionRecord) {
        self.records.push(record);
    }

    pub fn all(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// One line per record, or the empty placeholder.
    pub fn render(&self) -> String {
        if self.is_empty() {
            return EMPTY_HISTORY.to_string();
        }
        self.records
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
