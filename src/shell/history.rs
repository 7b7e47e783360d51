use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::output::Output;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: usize,
    pub timestamp: DateTime<Utc>,
    /// The line as typed; empty for the boot banner
    pub command: String,
    pub output: Output,
}

/// What the input line should show after a recall key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecallStep {
    Select(String),
    ClearInput,
    /// Nothing to recall
    Unchanged,
}

/// Append-only log of executed commands and their outputs
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
    next_id: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// History seeded with a boot banner at index 0
    pub fn with_banner(banner: impl Into<String>) -> Self {
        let mut history = Self::new();
        history.append("", Output::Text(banner.into()));
        history
    }

    pub fn append(&mut self, command: impl Into<String>, output: Output) -> &HistoryEntry {
        let entry = HistoryEntry {
            id: self.next_id,
            timestamp: Utc::now(),
            command: command.into(),
            output,
        };
        self.next_id += 1;
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    /// Truncate to empty. Ids keep increasing so the front end never reuses a key.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Submitted command lines in order, excluding the banner
    pub fn commands(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|entry| entry.command.as_str())
            .filter(|command| !command.is_empty())
            .collect()
    }

    /// Step one command further into the past. The cursor stops at the oldest command.
    pub fn recall_up(&self, cursor: usize) -> (usize, RecallStep) {
        let commands = self.commands();
        if commands.is_empty() {
            return (cursor, RecallStep::Unchanged);
        }

        let cursor = (cursor + 1).min(commands.len());
        let selected = commands[commands.len() - cursor].to_string();
        (cursor, RecallStep::Select(selected))
    }

    /// Step one command back toward the present; reaching zero clears the input
    pub fn recall_down(&self, cursor: usize) -> (usize, RecallStep) {
        let commands = self.commands();
        if commands.is_empty() {
            return (cursor, RecallStep::Unchanged);
        }

        let cursor = cursor.min(commands.len()).saturating_sub(1);
        if cursor > 0 {
            let selected = commands[commands.len() - cursor].to_string();
            (cursor, RecallStep::Select(selected))
        } else {
            (0, RecallStep::ClearInput)
        }
    }
}
