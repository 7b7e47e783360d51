//! Command shell for the terminal portfolio
//!
//! A [`ShellSession`] owns everything one visitor can change: the current
//! mode, the history, the recall cursor, the live input line and any game
//! in progress. The registry and the service clients are shared between
//! sessions behind `Arc`s.
//!
//! [`ShellSession::dispatch`] runs one submitted line through
//! parse → resolve → mode gate → execute → normalize and commits the
//! result to history.

mod completion;
mod history;
mod output;
mod render;

pub use completion::{complete, suggest};
pub use history::{History, HistoryEntry, RecallStep};
pub use output::{mode_info_text, CommandDescription, HelpPayload, Output};
pub use render::{banner, render_plain};

use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::commands::{
    description_for, Command, CommandContext, CommandMode, CommandOutput, CommandRegistry,
    Environment, CLEAR_COMMAND,
};
use crate::games::GameState;

/// What a submitted line did to the history
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// History was truncated
    Cleared,
    /// Empty line; nothing recorded
    Blank,
    Appended { entry: HistoryEntry },
}

/// What [`ShellSession::begin`] made of a line
pub enum Dispatch {
    /// Nothing left to run; already committed
    Done(DispatchOutcome),
    Pending(PendingCommand),
}

/// A resolved command detached from its session
pub struct PendingCommand {
    line: String,
    command: Arc<dyn Command>,
    args: Vec<String>,
    mode: CommandMode,
    env: Arc<Environment>,
    /// Snapshot of the session's games
    games: GameState,
}

impl PendingCommand {
    pub fn line(&self) -> &str {
        &self.line
    }

    pub async fn run(self) -> CompletedCommand {
        let before = self.games.clone();
        let mut games = self.games;
        let mut ctx = CommandContext {
            mode: self.mode,
            env: &self.env,
            games: &mut games,
        };
        let output = self.command.execute(&self.args, &mut ctx).await;

        CompletedCommand {
            line: self.line,
            mode: self.mode,
            output,
            // Only handlers that touched the games write them back
            games: (games != before).then_some(games),
        }
    }
}

/// Handler result waiting for [`ShellSession::finish`]
pub struct CompletedCommand {
    line: String,
    mode: CommandMode,
    output: CommandOutput,
    games: Option<GameState>,
}

pub struct ShellSession {
    id: String,
    registry: Arc<CommandRegistry>,
    env: Arc<Environment>,
    mode: CommandMode,
    history: History,
    cursor: usize,
    input: String,
    games: GameState,
}

impl ShellSession {
    /// A fresh session in normal mode with the boot banner in history
    pub fn new(registry: Arc<CommandRegistry>, env: Arc<Environment>) -> Self {
        let history = History::with_banner(banner(&env.profile));
        Self {
            id: Uuid::new_v4().to_string(),
            registry,
            env,
            mode: CommandMode::default(),
            history,
            cursor: 0,
            input: String::new(),
            games: GameState::default(),
        }
    }

    pub fn with_mode(mut self, mode: CommandMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn mode(&self) -> CommandMode {
        self.mode
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn games(&self) -> &GameState {
        &self.games
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Run one line and commit its result
    pub async fn dispatch(&mut self, line: &str) -> DispatchOutcome {
        match self.begin(line) {
            Dispatch::Done(outcome) => outcome,
            Dispatch::Pending(pending) => {
                let completed = pending.run().await;
                self.finish(completed)
            }
        }
    }

    /// Dispatch the live input line
    pub async fn submit(&mut self) -> DispatchOutcome {
        let line = std::mem::take(&mut self.input);
        self.dispatch(&line).await
    }

    /// Parse, resolve and gate `line` without awaiting anything.
    ///
    /// Lines that need no handler are committed right away. Otherwise the
    /// returned [`PendingCommand`] owns everything the handler needs and can
    /// run on another task while the session keeps taking input; hand its
    /// result to [`ShellSession::finish`].
    pub fn begin(&mut self, line: &str) -> Dispatch {
        self.cursor = 0;
        self.input.clear();

        let mut tokens = line.split_whitespace();
        let Some(first) = tokens.next() else {
            return Dispatch::Done(DispatchOutcome::Blank);
        };
        let word = first.to_lowercase();

        // `clear` is resolved before lookup so it works with any registry
        if word == CLEAR_COMMAND {
            tracing::debug!("clearing history");
            self.history.clear();
            return Dispatch::Done(DispatchOutcome::Cleared);
        }

        let output = match self.registry.get(&word) {
            None => {
                tracing::debug!(command = %word, "unknown command");
                Output::Text(format!(
                    "shell: command not found: {}. Try 'help' to get started.",
                    word
                ))
            }
            Some(_) if !self.mode.is_command_available(&word) => {
                tracing::debug!(command = %word, mode = %self.mode, "command gated by mode");
                Output::Text(format!(
                    "shell: command not available in {} mode. Toggle advanced mode to access this command.",
                    self.mode
                ))
            }
            Some(command) => {
                let args: Vec<String> = tokens.map(str::to_string).collect();
                tracing::debug!(command = %word, args = args.len(), "executing");
                return Dispatch::Pending(PendingCommand {
                    line: line.to_string(),
                    command,
                    args,
                    mode: self.mode,
                    env: self.env.clone(),
                    games: self.games.clone(),
                });
            }
        };

        let entry = self.history.append(line, output).clone();
        Dispatch::Done(DispatchOutcome::Appended { entry })
    }

    /// Commit a handler result to history
    pub fn finish(&mut self, completed: CompletedCommand) -> DispatchOutcome {
        if let Some(games) = completed.games {
            self.games = games;
        }
        let output = self.normalize(completed.output, completed.mode);
        let entry = self.history.append(completed.line, output).clone();
        DispatchOutcome::Appended { entry }
    }

    /// Expand directives into history outputs, in the mode the command ran in
    fn normalize(&self, raw: CommandOutput, mode: CommandMode) -> Output {
        match raw {
            CommandOutput::Text(text) => Output::Text(text),
            CommandOutput::Help => Output::Help(self.help_payload_for(mode)),
            CommandOutput::ModeInfo => Output::Text(mode_info_text(mode)),
            CommandOutput::Restart => Output::Restart,
            CommandOutput::Component(component) => Output::Component(component),
            CommandOutput::Rich(rich) => Output::Rich(rich),
        }
    }

    /// Mode-filtered, name-sorted listing of visible commands
    pub fn help_payload(&self) -> HelpPayload {
        self.help_payload_for(self.mode)
    }

    fn help_payload_for(&self, mode: CommandMode) -> HelpPayload {
        let commands = self
            .registry
            .names()
            .filter(|name| mode.is_command_available(name) && !self.registry.is_hidden(name))
            .map(|name| CommandDescription {
                name: name.to_string(),
                description: description_for(name).to_string(),
            })
            .collect();

        HelpPayload { mode, commands }
    }

    pub fn recall_up(&mut self) {
        let (cursor, step) = self.history.recall_up(self.cursor);
        self.apply_recall(cursor, step);
    }

    pub fn recall_down(&mut self) {
        let (cursor, step) = self.history.recall_down(self.cursor);
        self.apply_recall(cursor, step);
    }

    fn apply_recall(&mut self, cursor: usize, step: RecallStep) {
        self.cursor = cursor;
        match step {
            RecallStep::Select(command) => self.input = command,
            RecallStep::ClearInput => self.input.clear(),
            RecallStep::Unchanged => {}
        }
    }

    /// Ctrl+C: drop the current line and the recall position
    pub fn interrupt(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    /// Ctrl+L
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Mode changes never touch history
    pub fn toggle_mode(&mut self) -> CommandMode {
        self.mode = self.mode.toggle();
        self.mode
    }

    pub fn set_mode(&mut self, mode: CommandMode) {
        self.mode = mode;
    }

    /// Reset to how a new visitor finds the terminal
    pub fn restart(&mut self) {
        tracing::debug!(session = %self.id, "restarting session");
        self.history = History::with_banner(banner(&self.env.profile));
        self.mode = CommandMode::default();
        self.games.reset();
        self.input.clear();
        self.cursor = 0;
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    /// Click-to-fill from the help listing
    pub fn fill_input(&mut self, command: &str) {
        self.input = command.to_string();
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Tab: replace the input with its single completion, if there is one
    pub fn complete_input(&mut self) -> bool {
        match complete(&self.registry, &self.input) {
            Some(completion) => {
                self.input = completion;
                true
            }
            None => false,
        }
    }

    pub fn completion(&self) -> Option<String> {
        complete(&self.registry, &self.input)
    }

    pub fn suggestion(&self) -> Option<String> {
        suggest(&self.registry, &self.input)
    }

    /// Whether the first word of `input` would run in the current mode
    pub fn is_recognized(&self, input: &str) -> bool {
        input
            .split_whitespace()
            .next()
            .map(str::to_lowercase)
            .is_some_and(|word| {
                self.registry.exists(&word) && self.mode.is_command_available(&word)
            })
    }
}
