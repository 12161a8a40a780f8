//! I/O seam between the shell core and where it runs.

pub mod types;

#[cfg(test)]
pub mod test_host;

pub use types::*;

#[cfg(test)]
pub use test_host::TestHost;

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line editor error: {0}")]
    Editor(String),
}

/// Everything the shell core needs from its host.
pub trait IoHost {
    /// Wait for input to become available.
    ///
    /// Terminal hosts block here. Afterwards exactly one of `read_input` or
    /// `read_signal` has something.
    fn wait_for_input(&mut self) -> Result<(), IoError>;

    /// The line received by the last `wait_for_input`, if any.
    fn read_input(&mut self) -> Result<Option<InputLine>, IoError>;

    /// Read any pending signal (Ctrl+C, Ctrl+D).
    ///
    /// Returns `None` if no signal is pending.
    fn read_signal(&mut self) -> Result<Option<Signal>, IoError>;

    /// Write output to the user.
    fn write_output(&mut self, output: Output) -> Result<(), IoError>;

    /// Set what the next prompt shows.
    fn write_prompt(&mut self, config: PromptConfig) -> Result<(), IoError>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), IoError> {
        Ok(())
    }
}
