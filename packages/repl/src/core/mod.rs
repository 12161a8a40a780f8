//! Host-independent shell loop.
//!
//! The loop talks to the outside world only through [`IoHost`], so the same
//! core drives the terminal and the tests.

use crate::commands::{self, CommandResult};
use crate::context::EditorContext;
use crate::io::{ExitReason, IoError, IoHost, Output, PromptConfig, Signal};

pub struct ReplCore {
    ctx: EditorContext,
}

impl ReplCore {
    pub fn new(ctx: EditorContext) -> Self {
        Self { ctx }
    }

    /// Read, execute and print until the user exits or input ends.
    pub fn run(&mut self, io: &mut impl IoHost) -> Result<ExitReason, IoError> {
        io.write_output(Output::banner(BANNER))?;
        for diagnostic in self.ctx.diagnostics() {
            io.write_output(Output::error(diagnostic.to_string()))?;
        }

        loop {
            io.write_prompt(self.prompt())?;
            io.wait_for_input()?;

            if let Some(signal) = io.read_signal()? {
                match signal {
                    Signal::Eof => {
                        io.write_output(Output::info("Goodbye!"))?;
                        io.flush()?;
                        return Ok(ExitReason::Eof);
                    }
                    Signal::Interrupt => {
                        io.write_output(Output::info("^C (use 'exit' to quit)"))?;
                        continue;
                    }
                }
            }

            let Some(input) = io.read_input()? else {
                continue;
            };

            match commands::execute(&input.line, &mut self.ctx) {
                CommandResult::Ok { display: None } => {}
                CommandResult::Ok {
                    display: Some(output),
                } => io.write_output(Output::normal(output))?,
                CommandResult::Error(msg) => {
                    tracing::debug!(line = %input.line, error = %msg, "command failed");
                    io.write_output(Output::error(msg))?;
                }
                CommandResult::Help => io.write_output(Output::normal(commands::format_help()))?,
                CommandResult::Exit => {
                    io.write_output(Output::info("Goodbye!"))?;
                    io.flush()?;
                    return Ok(ExitReason::UserExit);
                }
            }

            io.flush()?;
        }
    }

    pub fn context(&self) -> &EditorContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut EditorContext {
        &mut self.ctx
    }

    fn prompt(&self) -> PromptConfig {
        let state = self.ctx.state();
        PromptConfig {
            node_count: state.len(),
            selected: state.get_selected().map(|node| node.kind.to_string()),
        }
    }
}

const BANNER: &str = r#"
 _            _ _ _
| |_ _ _ ___ | | (_)___
|  _| '_/ -_)| | | (_-<
 \__|_| \___||_|_|_/__/

Type 'help' for available commands, 'exit' to quit.
"#;
