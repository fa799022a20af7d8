use crate::v16::interface::{SessionHistory, SessionRecord};

/// Append-only history kept in memory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryHistory {
    records: Vec<SessionRecord>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl SessionHistory for InMemoryHistory {
    fn append(&mut self, record: SessionRecord) {
        self.records.push(record);
    }

    fn read_all(&self) -> Vec<SessionRecord> {
        self.records.clone()
    }
}
