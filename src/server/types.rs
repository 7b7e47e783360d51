//! Request and response bodies for the HTTP API

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::citation::{Claims, TextSegment};
use crate::commands::CommandMode;
use crate::shell::{DispatchOutcome, HistoryEntry};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Active shell sessions
    pub sessions: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub mode: Option<CommandMode>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub mode: CommandMode,
    pub created_at: String,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub command: String,
}

#[derive(Debug, Serialize)]
pub struct CommandResponse {
    #[serde(flatten)]
    pub outcome: DispatchOutcome,
    /// Mode after the command ran
    pub mode: CommandMode,
    /// The command asked for a reset and the session was restarted
    pub restarted: bool,
}

/// Omit `mode` to toggle
#[derive(Debug, Default, Deserialize)]
pub struct SetModeRequest {
    #[serde(default)]
    pub mode: Option<CommandMode>,
}

#[derive(Debug, Serialize)]
pub struct ModeResponse {
    pub mode: CommandMode,
}

#[derive(Debug, Default, Deserialize)]
pub struct CompleteQuery {
    #[serde(default)]
    pub input: String,
}

#[derive(Debug, Serialize)]
pub struct CompleteResponse {
    pub completion: Option<String>,
    pub suggestion: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SegmentRequest {
    pub text: String,
    #[serde(default)]
    pub claims: Claims,
}

#[derive(Debug, Serialize)]
pub struct SegmentResponse {
    pub segments: Vec<TextSegment>,
    pub root_claims: Vec<String>,
    /// Longest parent chain above each claim
    pub depths: BTreeMap<String, usize>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: &str) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
        }
    }
}
