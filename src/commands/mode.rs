use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Site commands, invocable in every mode
pub const NORMAL_MODE_COMMANDS: &[&str] = &[
    "help",
    "about",
    "github",
    "linkedin",
    "projects",
    "weather",
    "games",
    "music",
    "clear",
    "mode",
    "rodrodrod",
];

/// Simulated shell commands that advanced mode adds on top
pub const SHELL_COMMANDS: &[&str] = &[
    "echo", "whoami", "ls", "cd", "date", "vi", "vim", "nvim", "emacs", "sudo",
];

/// Visibility tier controlling which registered commands can be invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandMode {
    /// Essential site commands only
    #[default]
    Normal,
    /// Everything in normal mode plus the simulated shell commands
    Advanced,
}

impl CommandMode {
    /// Get the list of command names invocable in this mode
    pub fn enabled_commands(&self) -> Vec<&'static str> {
        match self {
            CommandMode::Normal => NORMAL_MODE_COMMANDS.to_vec(),
            CommandMode::Advanced => NORMAL_MODE_COMMANDS
                .iter()
                .chain(SHELL_COMMANDS.iter())
                .copied()
                .collect(),
        }
    }

    /// Check if a command may be invoked in this mode. Expects a lower-cased name.
    pub fn is_command_available(&self, name: &str) -> bool {
        match self {
            CommandMode::Normal => NORMAL_MODE_COMMANDS.contains(&name),
            CommandMode::Advanced => {
                NORMAL_MODE_COMMANDS.contains(&name) || SHELL_COMMANDS.contains(&name)
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandMode::Normal => "normal",
            CommandMode::Advanced => "advanced",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CommandMode::Normal => "essential site commands",
            CommandMode::Advanced => "site commands plus simulated shell commands",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            CommandMode::Normal => CommandMode::Advanced,
            CommandMode::Advanced => CommandMode::Normal,
        }
    }
}

impl fmt::Display for CommandMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CommandMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "normal" => Ok(CommandMode::Normal),
            "advanced" => Ok(CommandMode::Advanced),
            _ => Err(anyhow::anyhow!(
                "Invalid mode '{}'. Expected 'normal' or 'advanced'",
                s
            )),
        }
    }
}
