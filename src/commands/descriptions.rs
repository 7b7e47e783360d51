use std::collections::HashMap;

/// Shown by `help` for commands missing from the table
pub const DEFAULT_DESCRIPTION: &str = "No description available";

lazy_static::lazy_static! {
    static ref DESCRIPTIONS: HashMap<&'static str, &'static str> = HashMap::from([
        ("help", "Show all available commands"),
        ("about", "Learn about me"),
        ("github", "Open my GitHub profile ('github stats' for numbers)"),
        ("linkedin", "Open my LinkedIn profile"),
        ("projects", "View my work"),
        ("weather", "Show the weather for a city"),
        ("games", "Play tic-tac-toe or a number guessing game"),
        ("music", "Open the music player"),
        ("clear", "Clear the terminal"),
        ("mode", "Show the current command mode"),
        ("echo", "Print the arguments"),
        ("whoami", "Print the current user"),
        ("ls", "List directory contents"),
        ("cd", "Change directory"),
        ("date", "Print the current date and time"),
        ("vi", "Open the vi editor"),
        ("vim", "Open the vim editor"),
        ("nvim", "Open the neovim editor"),
        ("emacs", "Open the emacs editor"),
        ("sudo", "Run a command as superuser"),
    ]);
}

/// Human description of a command for the help listing
pub fn description_for(name: &str) -> &'static str {
    DESCRIPTIONS.get(name).copied().unwrap_or(DEFAULT_DESCRIPTION)
}
