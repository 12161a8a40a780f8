use nu_ansi_term::{Color, Style};
use reedline::{Highlighter, StyledText};

use crate::commands::COMMANDS;

/// Colors the command name, node ids and trailing JSON.
#[derive(Default)]
pub struct ReplHighlighter;

impl ReplHighlighter {
    pub fn new() -> Self {
        Self
    }
}

/// Leading words before a JSON payload, for commands that take one.
fn words_before_json(command: &str) -> Option<usize> {
    match command {
        "insert" | "add" | "set" => Some(2),
        _ => None,
    }
}

impl Highlighter for ReplHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled = StyledText::new();
        if line.is_empty() {
            return styled;
        }

        let (command, rest) = match line.find(char::is_whitespace) {
            Some(pos) => line.split_at(pos),
            None => (line, ""),
        };
        let command_lower = command.to_lowercase();
        let command_style = if COMMANDS.contains(&command_lower.as_str()) {
            Style::new().bold().fg(Color::Cyan)
        } else {
            Style::new().fg(Color::Red)
        };
        styled.push((command_style, command.to_string()));
        if rest.is_empty() {
            return styled;
        }

        let args_style = Style::new().fg(Color::Yellow);
        match words_before_json(&command_lower).and_then(|n| split_after_words(rest, n)) {
            Some((args, payload)) => {
                styled.push((args_style, args.to_string()));
                styled.push((Style::new().fg(Color::Green), payload.to_string()));
            }
            None => styled.push((args_style, rest.to_string())),
        }

        styled
    }
}

/// Split `text` after its first `n` words and the whitespace that follows them.
fn split_after_words(text: &str, n: usize) -> Option<(&str, &str)> {
    let mut pos = 0;
    for _ in 0..n {
        let start = pos + text[pos..].find(|c: char| !c.is_whitespace())?;
        pos = start + text[start..].find(char::is_whitespace)?;
    }
    let payload = pos + text[pos..].find(|c: char| !c.is_whitespace())?;
    Some(text.split_at(payload))
}
