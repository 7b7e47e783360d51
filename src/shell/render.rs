//! Plain-text rendering of history outputs, for the CLI and the terminal UI

use crate::config::{ProfileConfig, ProjectConfig};

use super::output::{HelpPayload, Output};

pub fn banner(profile: &ProfileConfig) -> String {
    format!(
        "Welcome to {}'s terminal portfolio.\n\nType 'help' to see the list of available commands.",
        profile.name
    )
}

pub fn render_plain(output: &Output) -> String {
    match output {
        Output::Text(text) => text.clone(),
        Output::Help(payload) => render_help(payload),
        Output::Restart => "Restarting...".to_string(),
        Output::Component(component) => format!("[{} player]", component),
        Output::Rich(rich) if rich.component == "projects" => {
            match serde_json::from_value::<Vec<ProjectConfig>>(rich.props["projects"].clone()) {
                Ok(projects) => render_projects(&projects),
                Err(_) => rich.props.to_string(),
            }
        }
        Output::Rich(rich) => {
            serde_json::to_string_pretty(&rich.props).unwrap_or_else(|_| rich.props.to_string())
        }
    }
}

fn render_help(payload: &HelpPayload) -> String {
    let width = payload
        .commands
        .iter()
        .map(|c| c.name.len())
        .max()
        .unwrap_or(0);

    let mut out = String::from("Welcome! Here are all the available commands:\n\n");
    for command in &payload.commands {
        out.push_str(&format!(
            "  {:<width$}  {}\n",
            command.name,
            command.description,
            width = width
        ));
    }
    out.push_str("\n[tab]: trigger completion.\n[ctrl+l]/clear: clear terminal.\n");
    out.push_str("\nTip: Toggle between normal and advanced mode with ctrl+t.");
    out
}

fn render_projects(projects: &[ProjectConfig]) -> String {
    let blocks: Vec<String> = projects
        .iter()
        .map(|project| {
            let mut block = format!("{}\n  {}", project.name, project.description);
            if !project.tech_stack.is_empty() {
                block.push_str(&format!("\n  Tech: {}", project.tech_stack.join(", ")));
            }
            for feature in &project.features {
                block.push_str(&format!("\n  - {}", feature));
            }
            if let Some(url) = &project.url {
                block.push_str(&format!("\n  {}", url));
            }
            block
        })
        .collect();
    blocks.join("\n\n")
}
