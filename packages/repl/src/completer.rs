use reedline::{Completer, Span, Suggestion};

/// Completes command names at the start of the line.
pub struct ReplCompleter {
    commands: Vec<(&'static str, &'static str)>,
}

impl ReplCompleter {
    pub fn new() -> Self {
        Self {
            commands: vec![
                ("help", "Show help"),
                ("exit", "Exit the shell"),
                ("tree", "Print the layout tree"),
                ("show", "Print one node"),
                ("insert", "Insert a node"),
                ("move", "Move a node"),
                ("remove", "Remove a subtree"),
                ("set", "Set a prop"),
                ("unset", "Remove a prop"),
                ("select", "Select a node"),
                ("selected", "Print the selection"),
                ("ancestors", "Print a breadcrumb"),
                ("deps", "List custom components"),
                ("check", "Verify tree integrity"),
                ("dump", "Print the raw tree"),
                ("render", "Render through plugins"),
                ("plugins", "List plugins"),
                ("load", "Load a saved tree"),
                ("save", "Save the tree"),
            ],
        }
    }
}

impl Default for ReplCompleter {
    fn default() -> Self {
        Self::new()
    }
}

impl Completer for ReplCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let line_to_pos = &line[..pos];
        let prefix = line_to_pos.trim_start();
        if prefix.contains(char::is_whitespace) {
            return Vec::new();
        }
        let start = pos - prefix.len();

        self.commands
            .iter()
            .filter(|(name, _)| name.starts_with(prefix))
            .map(|(name, description)| Suggestion {
                value: name.to_string(),
                description: Some(description.to_string()),
                style: None,
                extra: None,
                span: Span::new(start, pos),
                append_whitespace: true,
                match_indices: None,
            })
            .collect()
    }
}
