//! Simulated POSIX shell commands, available in advanced mode

use async_trait::async_trait;

use super::{Command, CommandContext, CommandOutput};

pub struct EchoCommand;

#[async_trait]
impl Command for EchoCommand {
    fn name(&self) -> &str {
        "echo"
    }

    async fn execute(&self, args: &[String], _ctx: &mut CommandContext<'_>) -> CommandOutput {
        args.join(" ").into()
    }
}

pub struct WhoamiCommand;

#[async_trait]
impl Command for WhoamiCommand {
    fn name(&self) -> &str {
        "whoami"
    }

    async fn execute(&self, _args: &[String], ctx: &mut CommandContext<'_>) -> CommandOutput {
        ctx.env.profile.ps1_username.clone().into()
    }
}

pub struct LsCommand;

#[async_trait]
impl Command for LsCommand {
    fn name(&self) -> &str {
        "ls"
    }

    async fn execute(&self, args: &[String], _ctx: &mut CommandContext<'_>) -> CommandOutput {
        if args.first().map(String::as_str) == Some("-a") {
            "a\nbunch\nof\nfake\ndirectories\n.you\n.know\n.your\n.shell\n.commands!".into()
        } else {
            "a\nbunch\nof\nfake\ndirectories".into()
        }
    }
}

pub struct DateCommand;

#[async_trait]
impl Command for DateCommand {
    fn name(&self) -> &str {
        "date"
    }

    async fn execute(&self, _args: &[String], _ctx: &mut CommandContext<'_>) -> CommandOutput {
        chrono::Local::now()
            .format("%a %b %d %Y %H:%M:%S GMT%z")
            .to_string()
            .into()
    }
}

/// A command that always answers with the same line
pub struct CannedCommand {
    name: &'static str,
    reply: &'static str,
}

impl CannedCommand {
    pub fn new(name: &'static str, reply: &'static str) -> Self {
        Self { name, reply }
    }
}

#[async_trait]
impl Command for CannedCommand {
    fn name(&self) -> &str {
        self.name
    }

    async fn execute(&self, _args: &[String], _ctx: &mut CommandContext<'_>) -> CommandOutput {
        self.reply.into()
    }
}
