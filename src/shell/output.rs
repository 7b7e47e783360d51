use serde::{Deserialize, Serialize};

use crate::commands::{Component, CommandMode, Renderable};

/// One row of the help listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDescription {
    pub name: String,
    pub description: String,
}

/// Commands invocable in `mode`, sorted by name. Clicking one should call
/// [`ShellSession::fill_input`](super::ShellSession::fill_input).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpPayload {
    pub mode: CommandMode,
    pub commands: Vec<CommandDescription>,
}

/// A normalized command result, as stored in history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Output {
    Text(String),
    Help(HelpPayload),
    /// The front end should reset the terminal (see [`ShellSession::restart`](super::ShellSession::restart))
    Restart,
    Component(Component),
    Rich(Renderable),
}

impl Output {
    pub fn text(text: impl Into<String>) -> Self {
        Output::Text(text.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Output::Text(text) => Some(text),
            _ => None,
        }
    }
}

pub fn mode_info_text(mode: CommandMode) -> String {
    let (other, effect) = match mode {
        CommandMode::Normal => (CommandMode::Advanced, "unlock the simulated shell commands"),
        CommandMode::Advanced => (CommandMode::Normal, "hide the simulated shell commands"),
    };
    format!(
        "Current mode: {} ({}).\nToggle {} mode to {}.",
        mode,
        mode.description(),
        other,
        effect
    )
}
