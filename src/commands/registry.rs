use std::collections::BTreeMap;
use std::sync::Arc;

use super::games::GamesCommand;
use super::site::{
    AboutCommand, ClearCommand, GitHubCommand, HelpCommand, LinkedInCommand, ModeCommand,
    MusicCommand, ProjectsCommand, RestartCommand, WeatherCommand,
};
use super::unix::{CannedCommand, DateCommand, EchoCommand, LsCommand, WhoamiCommand};
use super::Command;

/// Name → handler table, built once and then shared read-only
pub struct CommandRegistry {
    commands: BTreeMap<String, Arc<dyn Command>>,
}

impl CommandRegistry {
    /// An empty registry, for assembling a custom command set
    pub fn new() -> Self {
        Self {
            commands: BTreeMap::new(),
        }
    }

    /// Every command the terminal ships with
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        // Site commands
        registry.register(Arc::new(HelpCommand));
        registry.register(Arc::new(AboutCommand));
        registry.register(Arc::new(GitHubCommand));
        registry.register(Arc::new(LinkedInCommand));
        registry.register(Arc::new(ProjectsCommand));
        registry.register(Arc::new(WeatherCommand));
        registry.register(Arc::new(GamesCommand));
        registry.register(Arc::new(MusicCommand));
        registry.register(Arc::new(ClearCommand));
        registry.register(Arc::new(ModeCommand));
        registry.register(Arc::new(RestartCommand));
        // Simulated shell
        registry.register(Arc::new(EchoCommand));
        registry.register(Arc::new(WhoamiCommand));
        registry.register(Arc::new(LsCommand));
        registry.register(Arc::new(DateCommand));
        registry.register(Arc::new(CannedCommand::new(
            "cd",
            "unfortunately, i cannot afford more directories.",
        )));
        registry.register(Arc::new(CannedCommand::new(
            "vi",
            "woah, you still use 'vi'? just try 'vim'.",
        )));
        registry.register(Arc::new(CannedCommand::new(
            "vim",
            "'vim' is so outdated. how about 'nvim'?",
        )));
        registry.register(Arc::new(CannedCommand::new(
            "nvim",
            "'nvim'? too fancy. why not 'emacs'?",
        )));
        registry.register(Arc::new(CannedCommand::new(
            "emacs",
            "you know what? just use vscode.",
        )));
        registry.register(Arc::new(CannedCommand::new(
            "sudo",
            "Permission denied: with little power comes... no responsibility? ",
        )));
        registry
    }

    /// Add a command; a later registration under the same name replaces the earlier one
    pub fn register(&mut self, command: Arc<dyn Command>) {
        self.commands.insert(command.name().to_string(), command);
    }

    pub fn with(mut self, command: Arc<dyn Command>) -> Self {
        self.register(command);
        self
    }

    /// Exact, case-sensitive lookup. Callers lower-case the typed word first.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.get(name).cloned()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn is_hidden(&self, name: &str) -> bool {
        self.commands.get(name).is_some_and(|command| command.hidden())
    }

    /// All registered names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Registered names starting with `partial`, sorted
    pub fn matching_prefix<'a>(&'a self, partial: &'a str) -> impl Iterator<Item = &'a str> {
        self.names().filter(move |name| name.starts_with(partial))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
