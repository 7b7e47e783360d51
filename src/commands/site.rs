//! Commands about the site owner and the terminal itself

use async_trait::async_trait;

use super::{Command, CommandContext, CommandOutput, Component, Renderable};
use crate::services::GitHubStats;

/// Truncates history; intercepted by the shell before lookup
pub const CLEAR_COMMAND: &str = "clear";

/// Hidden command that resets the terminal when given `start`
pub const RESTART_COMMAND: &str = "rodrodrod";

pub struct HelpCommand;

#[async_trait]
impl Command for HelpCommand {
    fn name(&self) -> &str {
        "help"
    }

    async fn execute(&self, _args: &[String], _ctx: &mut CommandContext<'_>) -> CommandOutput {
        CommandOutput::Help
    }
}

pub struct AboutCommand;

#[async_trait]
impl Command for AboutCommand {
    fn name(&self) -> &str {
        "about"
    }

    async fn execute(&self, _args: &[String], ctx: &mut CommandContext<'_>) -> CommandOutput {
        let profile = &ctx.env.profile;
        format!(
            "Hi, I'm {}.\n\n{}\n\nMore about me:\n'linkedin' - my LinkedIn profile.\n'github' - my GitHub profile.",
            profile.name, profile.about
        )
        .into()
    }
}

pub struct GitHubCommand;

impl GitHubCommand {
    fn format_stats(user: &str, stats: &GitHubStats) -> String {
        let mut out = format!(
            "GitHub stats for {}\n  Public repos: {}\n  Total stars:  {}\n  Total forks:  {}",
            user, stats.public_repos, stats.total_stars, stats.total_forks
        );
        if !stats.top_repos.is_empty() {
            out.push_str("\n\nTop repositories:");
            for repo in &stats.top_repos {
                out.push_str(&format!("\n  {} (★ {})", repo.name, repo.stars));
            }
        }
        out
    }
}

#[async_trait]
impl Command for GitHubCommand {
    fn name(&self) -> &str {
        "github"
    }

    async fn execute(&self, args: &[String], ctx: &mut CommandContext<'_>) -> CommandOutput {
        let user = &ctx.env.profile.github;

        match args.first().map(String::as_str) {
            Some("stats") => match ctx.env.services.github.stats(user).await {
                Ok(stats) => Self::format_stats(user, &stats).into(),
                Err(e) => {
                    tracing::warn!(error = %e, "github stats lookup failed");
                    "Failed to fetch GitHub stats. Please try again later.".into()
                }
            },
            _ => format!("Opening github...\nhttps://github.com/{}/", user).into(),
        }
    }
}

pub struct LinkedInCommand;

#[async_trait]
impl Command for LinkedInCommand {
    fn name(&self) -> &str {
        "linkedin"
    }

    async fn execute(&self, _args: &[String], ctx: &mut CommandContext<'_>) -> CommandOutput {
        format!(
            "Opening linkedin...\nhttps://www.linkedin.com/in/{}/",
            ctx.env.profile.linkedin
        )
        .into()
    }
}

/// Renders the configured projects as a rich `projects` view
pub struct ProjectsCommand;

#[async_trait]
impl Command for ProjectsCommand {
    fn name(&self) -> &str {
        "projects"
    }

    async fn execute(&self, _args: &[String], ctx: &mut CommandContext<'_>) -> CommandOutput {
        if ctx.env.projects.is_empty() {
            return "No projects configured. Add [[projects]] entries to your config file.".into();
        }

        CommandOutput::Rich(Renderable::new(
            "projects",
            serde_json::json!({ "projects": ctx.env.projects }),
        ))
    }
}

pub struct WeatherCommand;

#[async_trait]
impl Command for WeatherCommand {
    fn name(&self) -> &str {
        "weather"
    }

    async fn execute(&self, args: &[String], ctx: &mut CommandContext<'_>) -> CommandOutput {
        let city = args.join("+");
        if city.is_empty() {
            return "Usage: weather [city]. Example: weather casablanca".into();
        }

        match ctx.env.services.weather.forecast(&city).await {
            Ok(report) => report.into(),
            Err(e) => {
                tracing::warn!(city = %city, error = %e, "weather lookup failed");
                format!("Could not fetch the weather for '{}'. Please try again later.", args.join(" ")).into()
            }
        }
    }
}

pub struct MusicCommand;

#[async_trait]
impl Command for MusicCommand {
    fn name(&self) -> &str {
        "music"
    }

    async fn execute(&self, _args: &[String], _ctx: &mut CommandContext<'_>) -> CommandOutput {
        CommandOutput::Component(Component::Music)
    }
}

/// Registry entry that makes `clear` listed, completable and mode-checked.
/// The shell truncates history itself before any lookup, so a session never
/// runs this handler.
pub struct ClearCommand;

#[async_trait]
impl Command for ClearCommand {
    fn name(&self) -> &str {
        CLEAR_COMMAND
    }

    async fn execute(&self, _args: &[String], _ctx: &mut CommandContext<'_>) -> CommandOutput {
        CommandOutput::Text(String::new())
    }
}

pub struct ModeCommand;

#[async_trait]
impl Command for ModeCommand {
    fn name(&self) -> &str {
        "mode"
    }

    async fn execute(&self, _args: &[String], _ctx: &mut CommandContext<'_>) -> CommandOutput {
        CommandOutput::ModeInfo
    }
}

pub struct RestartCommand;

#[async_trait]
impl Command for RestartCommand {
    fn name(&self) -> &str {
        RESTART_COMMAND
    }

    fn hidden(&self) -> bool {
        true
    }

    async fn execute(&self, args: &[String], _ctx: &mut CommandContext<'_>) -> CommandOutput {
        match args.first().map(String::as_str) {
            Some("start") => CommandOutput::Restart,
            other => format!(
                "{}: unknown command '{}'",
                RESTART_COMMAND,
                other.unwrap_or_default()
            )
            .into(),
        }
    }
}
