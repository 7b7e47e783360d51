mod descriptions;
mod games;
mod mode;
mod registry;
mod site;
mod unix;

pub use descriptions::{description_for, DEFAULT_DESCRIPTION};
pub use mode::{CommandMode, NORMAL_MODE_COMMANDS, SHELL_COMMANDS};
pub use registry::CommandRegistry;
pub use site::{CLEAR_COMMAND, RESTART_COMMAND};

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{Config, ProfileConfig, ProjectConfig};
use crate::games::GameState;
use crate::services::Services;

/// Rich UI components a command can ask the front end to mount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    /// Music player with audio visualizer
    Music,
}

impl Component {
    pub fn name(&self) -> &'static str {
        match self {
            Component::Music => "music",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An opaque value for the display layer, passed through the shell unchanged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Renderable {
    /// Which front-end view knows how to draw `props`
    pub component: String,
    pub props: serde_json::Value,
}

impl Renderable {
    pub fn new(component: impl Into<String>, props: serde_json::Value) -> Self {
        Self {
            component: component.into(),
            props,
        }
    }
}

/// What a command handler hands back to the shell
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    /// Rendered verbatim
    Text(String),
    /// Replaced by the shell with the mode-filtered command listing
    Help,
    /// Replaced by the shell with a description of the current mode
    ModeInfo,
    /// Asks the front end to reset the whole terminal
    Restart,
    /// Asks the front end to mount a rich component
    Component(Component),
    Rich(Renderable),
}

impl From<String> for CommandOutput {
    fn from(text: String) -> Self {
        CommandOutput::Text(text)
    }
}

impl From<&str> for CommandOutput {
    fn from(text: &str) -> Self {
        CommandOutput::Text(text.to_string())
    }
}

/// Process-wide data shared by every session: who the terminal belongs to
/// and the clients for external services
pub struct Environment {
    pub profile: ProfileConfig,
    pub projects: Vec<ProjectConfig>,
    pub services: Services,
}

impl Environment {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            profile: config.profile.clone(),
            projects: config.projects.clone(),
            services: Services::from_config(&config.services, &config.cache)?,
        })
    }
}

/// Per-invocation context handed to a command handler
pub struct CommandContext<'a> {
    pub mode: CommandMode,
    pub env: &'a Environment,
    /// Game state owned by the invoking session
    pub games: &'a mut GameState,
}

#[async_trait]
pub trait Command: Send + Sync {
    fn name(&self) -> &str;

    /// Hidden commands can be invoked but are left out of `help`
    fn hidden(&self) -> bool {
        false
    }

    /// Run the command. Failures are the handler's own business and must be
    /// turned into a user-facing [`CommandOutput::Text`].
    async fn execute(&self, args: &[String], ctx: &mut CommandContext<'_>) -> CommandOutput;
}
