use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use termfolio::commands::{CommandMode, CommandRegistry, Environment};
use termfolio::config::Config;
use termfolio::shell::{render_plain, DispatchOutcome, ShellSession};
use termfolio::{server, tui};

#[derive(Parser)]
#[command(name = "termfolio")]
#[command(about = "A portfolio you explore from the terminal", long_about = None)]
struct Cli {
    /// Path to the config file (default: the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the full-screen terminal (default)
    Shell,
    /// Run one command line and print its output
    Run {
        /// Start the session in advanced mode
        #[arg(long)]
        advanced: bool,
        /// The command line, e.g. `termfolio run weather paris`
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },
    /// Serve the HTTP API
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
        /// Allow cross-origin requests from any origin
        #[arg(long)]
        cors: bool,
    },
    /// Show or initialize the configuration
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
        /// Write the default configuration if no file exists yet
        #[arg(long)]
        init: bool,
    },
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn config_path(cli_path: Option<PathBuf>) -> Result<PathBuf> {
    match cli_path {
        Some(path) => Ok(path),
        None => Config::config_path(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Shell);

    // The full-screen UI owns stdout, so keep log noise down while it runs
    let default_filter = match command {
        Commands::Shell => "termfolio=warn",
        _ => "termfolio=info",
    };
    init_tracing(default_filter);

    let path = config_path(cli.config)?;
    let config = Config::load_from(&path)?;

    match command {
        Commands::Shell => run_shell(config).await?,
        Commands::Run { advanced, words } => run_once(config, advanced, &words.join(" ")).await?,
        Commands::Serve { host, port, cors } => {
            let mut config = config;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.server.cors_enabled |= cors;
            server::start_server(config).await?;
        }
        Commands::Config { show, init } => handle_config(&config, &path, show, init)?,
    }

    Ok(())
}

fn new_session(config: &Config) -> Result<ShellSession> {
    let env = Environment::from_config(config)?;
    Ok(ShellSession::new(
        Arc::new(CommandRegistry::builtin()),
        Arc::new(env),
    ))
}

async fn run_shell(config: Config) -> Result<()> {
    let session = new_session(&config)?;
    tui::run(session, &config.profile).await
}

async fn run_once(config: Config, advanced: bool, line: &str) -> Result<()> {
    let mode = if advanced {
        CommandMode::Advanced
    } else {
        CommandMode::Normal
    };
    let mut session = new_session(&config)?.with_mode(mode);

    match session.dispatch(line).await {
        DispatchOutcome::Appended { entry } => println!("{}", render_plain(&entry.output)),
        DispatchOutcome::Cleared | DispatchOutcome::Blank => {}
    }
    Ok(())
}

fn handle_config(config: &Config, path: &Path, show: bool, init: bool) -> Result<()> {
    if init {
        if path.exists() {
            println!("Config already exists at {}", path.display());
        } else {
            config.save_to(path)?;
            println!("Wrote default config to {}", path.display());
        }
    }

    if show || !init {
        let text = toml::to_string_pretty(config).context("Failed to serialize config")?;
        println!("# {}\n{}", path.display(), text);
    }

    Ok(())
}
