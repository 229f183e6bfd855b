use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use uuid::Uuid;

/// One persisted status observation for a workflow entity.
///
/// Only translated external values are ever written here; internal machine
/// state and context are rebuilt from scratch on reload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub entity: Uuid,
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

pub struct StatusJournal {
    journal_file: std::path::PathBuf,
}

impl StatusJournal {
    pub fn new(journal_file: std::path::PathBuf) -> Self {
        Self { journal_file }
    }

    /// Append a status observation for an entity.
    /// Format: entity|status|timestamp
    pub fn record(&self, entity: Uuid, status: &str) -> Result<()> {
        let entry = format!("{}|{}|{}\n", entity, status, Utc::now().to_rfc3339());

        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.journal_file)
            .context("Failed to open status journal")?
            .write_all(entry.as_bytes())
            .context("Failed to write journal entry")?;

        Ok(())
    }

    /// Get all journal entries. Malformed lines are skipped.
    pub fn entries(&self) -> Result<Vec<JournalEntry>> {
        if !self.journal_file.exists() {
            return Ok(Vec::new());
        }

        let content =
            fs::read_to_string(&self.journal_file).context("Failed to read status journal")?;

        let entries: Vec<JournalEntry> = content
            .lines()
            .filter_map(|line| {
                let parts: Vec<&str> = line.split('|').collect();
                if parts.len() != 3 {
                    return None;
                }
                Some(JournalEntry {
                    entity: parts[0].parse().ok()?,
                    status: parts[1].to_string(),
                    timestamp: DateTime::parse_from_rfc3339(parts[2])
                        .ok()?
                        .with_timezone(&Utc),
                })
            })
            .collect();

        Ok(entries)
    }

    /// Get entries for a specific entity.
    pub fn entity_entries(&self, entity: Uuid) -> Result<Vec<JournalEntry>> {
        let entries = self.entries()?;
        Ok(entries.into_iter().filter(|e| e.entity == entity).collect())
    }

    /// Get the most recently recorded status for an entity, if any.
    /// The reload path feeds this through the status translation functions
    /// to rebuild an entity's external view.
    pub fn last_status(&self, entity: Uuid) -> Option<String> {
        self.entries()
            .ok()?
            .into_iter()
            .rev()
            .find(|e| e.entity == entity)
            .map(|e| e.status)
    }

    pub fn reset(&self) -> Result<()> {
        if self.journal_file.exists() {
            fs::remove_file(&self.journal_file).context("Failed to remove status journal")?;
        }
        Ok(())
    }
}
