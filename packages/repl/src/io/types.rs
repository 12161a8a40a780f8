//! Values passed between the shell core and its host.

/// One line the user entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputLine {
    pub line: String,
}

/// Key chords the host reports instead of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Ctrl+C
    Interrupt,
    /// Ctrl+D
    Eof,
}

/// Text for the host to print, with a hint on how to present it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub text: String,
    pub style: OutputStyle,
}

impl Output {
    fn styled(text: impl Into<String>, style: OutputStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn normal(text: impl Into<String>) -> Self {
        Self::styled(text, OutputStyle::Normal)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::styled(text, OutputStyle::Error)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::styled(text, OutputStyle::Info)
    }

    pub fn banner(text: impl Into<String>) -> Self {
        Self::styled(text, OutputStyle::Banner)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputStyle {
    /// Printed as is; command output carries its own colors.
    #[default]
    Normal,
    Error,
    Info,
    Banner,
}

/// What the prompt shows about the tree being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptConfig {
    pub node_count: usize,
    /// Type of the selected node, if any.
    pub selected: Option<String>,
}

/// Why [`ReplCore::run`](crate::core::ReplCore::run) returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// `exit`, `quit` or `q`.
    UserExit,
    /// Ctrl+D, or the host ran out of input.
    Eof,
}
