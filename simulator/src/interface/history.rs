use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use ocppsim_client::v16::{SessionHistory, SessionRecord};

/// Session history persisted as one pretty-printed JSON array per file.
pub struct JsonFileHistory {
    path: PathBuf,
    records: Vec<SessionRecord>,
}

impl JsonFileHistory {
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let records = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("reading history {}", path.display()))?;
            if raw.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&raw)
                    .with_context(|| format!("parsing history {}", path.display()))?
            }
        } else {
            Vec::new()
        };
        Ok(Self { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> anyhow::Result<()> {
        fs::write(&self.path, self.export_json())
            .with_context(|| format!("writing history {}", self.path.display()))
    }
}

impl SessionHistory for JsonFileHistory {
    fn append(&mut self, record: SessionRecord) {
        self.records.push(record);
        if let Err(e) = self.persist() {
            log::error!("{:#}", e);
        }
    }

    fn read_all(&self) -> Vec<SessionRecord> {
        self.records.clone()
    }
}
