use std::sync::atomic::Ordering;

use termfolio::commands::{
    CommandMode, CommandRegistry, DEFAULT_DESCRIPTION, NORMAL_MODE_COMMANDS, SHELL_COMMANDS,
};
use termfolio::shell::{complete, Dispatch, DispatchOutcome, Output};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::*;

#[test]
fn test_advanced_mode_is_superset() {
    let registry = CommandRegistry::builtin();
    for name in registry.names() {
        if CommandMode::Normal.is_command_available(name) {
            assert!(CommandMode::Advanced.is_command_available(name), "{}", name);
        }
    }
}

#[tokio::test]
async fn test_empty_line_records_nothing() {
    let mut shell = builtin_session();
    shell.set_input("   ");
    let before = shell.history().len();

    assert_eq!(shell.submit().await, DispatchOutcome::Blank);
    assert_eq!(shell.dispatch("").await, DispatchOutcome::Blank);
    assert_eq!(shell.history().len(), before);
    assert_eq!(shell.input(), "");
}

#[tokio::test]
async fn test_clear_empties_history() {
    let mut shell = builtin_session().with_mode(CommandMode::Advanced);
    shell.dispatch("about").await;
    shell.dispatch("echo one").await;
    assert_eq!(shell.history().len(), 3);

    assert_eq!(shell.dispatch("clear").await, DispatchOutcome::Cleared);
    assert!(shell.history().is_empty());

    // still works on an empty history, in any case
    assert_eq!(shell.dispatch("CLEAR").await, DispatchOutcome::Cleared);
    assert!(shell.history().is_empty());
}

#[tokio::test]
async fn test_clear_needs_no_registered_handler() {
    let (help, _) = RecordingCommand::new("help");
    let mut shell = session_with(CommandRegistry::new().with(help));
    assert_eq!(shell.dispatch("clear").await, DispatchOutcome::Cleared);
    assert!(shell.history().is_empty());

    // the builtin entry only makes it listed and completable
    let builtin = builtin_session();
    assert_eq!(complete(builtin.registry(), "cle"), Some("clear".to_string()));
    assert!(builtin
        .help_payload()
        .commands
        .iter()
        .any(|c| c.name == "clear"));
}

#[tokio::test]
async fn test_unknown_command_appends_one_entry() {
    let mut shell = builtin_session();
    let before = shell.history().len();

    let entry = appended(shell.dispatch("nosuchcmd").await);
    assert_eq!(shell.history().len(), before + 1);
    assert_eq!(
        entry.output,
        Output::text("shell: command not found: nosuchcmd. Try 'help' to get started.")
    );
}

#[tokio::test]
async fn test_gated_command_is_not_executed() {
    let (echo, calls) = RecordingCommand::new("echo");
    let mut shell = session_with(CommandRegistry::builtin().with(echo));
    let before = shell.history().len();

    let entry = appended(shell.dispatch("echo hi").await);
    assert_eq!(shell.history().len(), before + 1);
    assert!(entry
        .output
        .as_text()
        .unwrap()
        .contains("not available in normal mode"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    shell.toggle_mode();
    let entry = appended(shell.dispatch("echo hi").await);
    assert_eq!(entry.output, Output::text("hi"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_completion_requires_single_match() {
    let (help, _) = RecordingCommand::new("help");
    let (history, _) = RecordingCommand::new("history");

    let only_help = CommandRegistry::new().with(help.clone());
    assert_eq!(complete(&only_help, "he"), Some("help".to_string()));

    let both = CommandRegistry::new().with(help).with(history);
    assert_eq!(complete(&both, "h"), None);
    assert_eq!(complete(&both, "hi"), Some("history".to_string()));
}

#[tokio::test]
async fn test_recall_through_session() {
    let mut shell = builtin_session().with_mode(CommandMode::Advanced);
    for line in ["echo a", "echo b", "echo c"] {
        shell.dispatch(line).await;
    }

    let mut seen = Vec::new();
    for _ in 0..4 {
        shell.recall_up();
        seen.push(shell.input().to_string());
    }
    assert_eq!(seen, vec!["echo c", "echo b", "echo a", "echo a"]);
    assert_eq!(shell.cursor(), 3);

    shell.recall_down();
    assert_eq!(shell.input(), "echo b");
    shell.recall_down();
    assert_eq!(shell.input(), "echo c");
    shell.recall_down();
    assert_eq!(shell.input(), "");
    assert_eq!(shell.cursor(), 0);
}

#[tokio::test]
async fn test_submit_resets_cursor() {
    let mut shell = builtin_session();
    shell.dispatch("about").await;
    shell.recall_up();
    assert_eq!(shell.cursor(), 1);

    shell.submit().await;
    assert_eq!(shell.cursor(), 0);
    assert_eq!(shell.input(), "");
}

#[tokio::test]
async fn test_help_lists_mode_commands_sorted() {
    let mut shell = builtin_session();

    let entry = appended(shell.dispatch("help").await);
    let Output::Help(payload) = entry.output else {
        panic!("help should produce a help payload");
    };
    assert_eq!(payload.mode, CommandMode::Normal);

    let names: Vec<&str> = payload.commands.iter().map(|c| c.name.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    assert!(names.iter().all(|n| CommandMode::Normal.is_command_available(n)));
    assert!(!names.contains(&"echo"));
    assert!(!names.contains(&"rodrodrod"));
    assert!(payload.commands.iter().all(|c| !c.description.is_empty()));

    shell.toggle_mode();
    let entry = appended(shell.dispatch("help").await);
    let Output::Help(payload) = entry.output else {
        panic!("help should produce a help payload");
    };
    // every visible command of both tiers, minus the hidden one
    assert_eq!(
        payload.commands.len(),
        NORMAL_MODE_COMMANDS.len() + SHELL_COMMANDS.len() - 1
    );
}

#[tokio::test]
async fn test_help_lists_only_registered_commands() {
    let (help, _) = RecordingCommand::new("help");
    let (weather, _) = RecordingCommand::new("weather");
    let (echo, _) = RecordingCommand::new("echo");
    let shell = session_with(CommandRegistry::new().with(help).with(weather).with(echo));

    let payload = shell.help_payload();
    let names: Vec<&str> = payload.commands.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["help", "weather"]);
    assert!(payload
        .commands
        .iter()
        .all(|c| c.description != DEFAULT_DESCRIPTION));
}

#[tokio::test]
async fn test_help_click_fills_input() {
    let mut shell = builtin_session();
    let payload = shell.help_payload();
    let first = &payload.commands[0].name;
    shell.fill_input(first);
    assert_eq!(shell.input(), first);
    assert!(shell.is_recognized(shell.input()));
}

#[tokio::test]
async fn test_mode_toggle_leaves_history_alone() {
    let mut shell = builtin_session();
    shell.dispatch("about").await;
    let before = shell.history().entries().to_vec();

    assert_eq!(shell.toggle_mode(), CommandMode::Advanced);
    assert_eq!(shell.toggle_mode(), CommandMode::Normal);
    assert_eq!(shell.history().entries(), before.as_slice());
}

#[tokio::test]
async fn test_games_state_is_per_session() {
    let mut first = builtin_session();
    let mut second = builtin_session();

    first.dispatch("games tictactoe").await;
    let entry = appended(second.dispatch("games move 5").await);
    assert!(entry
        .output
        .as_text()
        .unwrap()
        .starts_with("No Tic Tac Toe game in progress."));

    let entry = appended(first.dispatch("games move 5").await);
    assert!(entry.output.as_text().unwrap().ends_with("Player O's turn!"));
}

#[tokio::test]
async fn test_weather_goes_through_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/san+francisco"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("Foggy\nFollow @igor_chubin for wttr.in updates"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let env = environment(&config_with_services(&server.uri()));
    let mut shell =
        termfolio::shell::ShellSession::new(std::sync::Arc::new(CommandRegistry::builtin()), env);

    let entry = appended(shell.dispatch("weather san francisco").await);
    assert_eq!(entry.output, Output::text("Foggy\n"));
    let entry = appended(shell.dispatch("weather san francisco").await);
    assert_eq!(entry.output, Output::text("Foggy\n"));
}

#[tokio::test]
async fn test_handler_failure_becomes_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let env = environment(&config_with_services(&server.uri()));
    let mut shell =
        termfolio::shell::ShellSession::new(std::sync::Arc::new(CommandRegistry::builtin()), env);

    let entry = appended(shell.dispatch("github stats").await);
    assert_eq!(
        entry.output,
        Output::text("Failed to fetch GitHub stats. Please try again later.")
    );
}

#[tokio::test]
async fn test_results_commit_in_arrival_order() {
    let mut shell = builtin_session();

    let Dispatch::Pending(game) = shell.begin("games tictactoe") else {
        panic!("games should run a handler");
    };
    let Dispatch::Pending(about) = shell.begin("about") else {
        panic!("about should run a handler");
    };
    assert_eq!(shell.history().len(), 1);

    let game = game.run().await;
    let about = about.run().await;

    appended(shell.finish(game));
    // a handler that left the games alone does not overwrite them
    let entry = appended(shell.finish(about));
    assert_eq!(entry.command, "about");
    assert!(shell.games().active().is_some());

    let commands: Vec<&str> = shell.history().commands();
    assert_eq!(commands, vec!["games tictactoe", "about"]);
}

#[test]
fn test_begin_commits_errors_immediately() {
    let mut shell = builtin_session();
    shell.set_input("nosuchcmd");

    let Dispatch::Done(outcome) = shell.begin("nosuchcmd") else {
        panic!("unknown commands have nothing to run");
    };
    appended(outcome);
    assert_eq!(shell.input(), "");
    assert!(matches!(shell.begin("   "), Dispatch::Done(DispatchOutcome::Blank)));
}
