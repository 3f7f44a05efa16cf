use crate::{console::Console, error::TrackerError};

/// Prompt shown before each read.
pub const CHOICE_PROMPT: &str = "\nEnter your choice: ";
/// Notice framed after malformed input.
pub const INVALID_CHOICE: &str = "Invalid input. Please enter a valid number or command.";

const BACK_COMMANDS: [&str; 2] = ["back", "b"];
const QUIT_COMMANDS: [&str; 4] = ["quit", "q", "exit", "e"];

/// A validated menu selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// A position present in the menu.
    Number(usize),
    /// Leave the current menu without selecting anything.
    Back,
    /// End the whole process.
    Quit,
}

/// Input that is neither a command nor a valid position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid menu choice: {0:?}")]
pub struct InvalidChoice(pub String);

/// Map one raw input line to a choice.
///
/// Whitespace is trimmed and letters case-folded before matching commands.
pub fn parse_choice(raw: &str, valid_positions: &[usize]) -> Result<Choice, InvalidChoice> {
    let normalized = raw.trim().to_lowercase();
    if BACK_COMMANDS.contains(&normalized.as_str()) {
        return Ok(Choice::Back);
    }
    if QUIT_COMMANDS.contains(&normalized.as_str()) {
        return Ok(Choice::Quit);
    }
    normalized
        .parse::<usize>()
        .ok()
        .filter(|position| valid_positions.contains(position))
        .map(Choice::Number)
        .ok_or(InvalidChoice(normalized))
}

/// Prompt until the input parses as a choice.
///
/// There is no attempt limit; only a valid line, a command or a closed
/// input stream ends the loop.
pub fn read_choice(console: &mut Console, valid_positions: &[usize]) -> Result<Choice, TrackerError> {
    loop {
        let raw = console.prompt(CHOICE_PROMPT)?;
        match parse_choice(&raw, valid_positions) {
            Ok(choice) => return Ok(choice),
            Err(err) => {
                tracing::debug!("{err}");
                console.encased([INVALID_CHOICE])?;
            }
        }
    }
}
