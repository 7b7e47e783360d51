//! Prefix completion over registered command names

use crate::commands::CommandRegistry;

/// The only registered name starting with `partial`, if exactly one does
pub fn complete(registry: &CommandRegistry, partial: &str) -> Option<String> {
    let mut matches = registry.matching_prefix(partial);
    let first = matches.next()?;
    if matches.next().is_some() {
        return None;
    }
    Some(first.to_string())
}

/// Ghost-text suggestion for a non-empty input; never the input itself
pub fn suggest(registry: &CommandRegistry, input: &str) -> Option<String> {
    if input.is_empty() {
        return None;
    }
    complete(registry, input).filter(|candidate| candidate != input)
}
