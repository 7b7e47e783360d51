use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use termfolio::commands::{Command, CommandContext, CommandOutput, CommandRegistry, Environment};
use termfolio::config::Config;
use termfolio::shell::{DispatchOutcome, HistoryEntry, ShellSession};

/// Config whose external services point at `base_url`
pub fn config_with_services(base_url: &str) -> Config {
    let mut config = Config::default();
    config.services.weather_url = base_url.to_string();
    config.services.github_api_url = base_url.to_string();
    config
}

pub fn environment(config: &Config) -> Arc<Environment> {
    Arc::new(Environment::from_config(config).expect("environment"))
}

pub fn builtin_session() -> ShellSession {
    ShellSession::new(
        Arc::new(CommandRegistry::builtin()),
        environment(&Config::default()),
    )
}

pub fn session_with(registry: CommandRegistry) -> ShellSession {
    ShellSession::new(Arc::new(registry), environment(&Config::default()))
}

pub fn appended(outcome: DispatchOutcome) -> HistoryEntry {
    match outcome {
        DispatchOutcome::Appended { entry } => entry,
        other => panic!("expected an appended entry, got {:?}", other),
    }
}

/// Counts invocations and echoes its arguments
pub struct RecordingCommand {
    name: &'static str,
    calls: Arc<AtomicUsize>,
}

impl RecordingCommand {
    pub fn new(name: &'static str) -> (Arc<Self>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let command = Arc::new(Self {
            name,
            calls: calls.clone(),
        });
        (command, calls)
    }
}

#[async_trait]
impl Command for RecordingCommand {
    fn name(&self) -> &str {
        self.name
    }

    async fn execute(&self, args: &[String], _ctx: &mut CommandContext<'_>) -> CommandOutput {
        self.calls.fetch_add(1, Ordering::SeqCst);
        CommandOutput::Text(args.join(" "))
    }
}
