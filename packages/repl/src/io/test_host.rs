//! In-memory host for driving the shell loop from tests.

use std::collections::VecDeque;

use super::{InputLine, IoError, IoHost, Output, OutputStyle, PromptConfig, Signal};

/// Queued lines and signals in, buffered output out.
///
/// A queued signal is delivered before the next queued line.
#[derive(Debug, Default)]
pub struct TestHost {
    inputs: VecDeque<String>,
    signals: VecDeque<Signal>,
    outputs: Vec<Output>,
    last_prompt: Option<PromptConfig>,
    flushes: usize,
}

impl TestHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_input(&mut self, line: impl Into<String>) {
        self.inputs.push_back(line.into());
    }

    pub fn queue_inputs(&mut self, lines: impl IntoIterator<Item = impl Into<String>>) {
        lines.into_iter().for_each(|line| self.queue_input(line));
    }

    pub fn queue_signal(&mut self, signal: Signal) {
        self.signals.push_back(signal);
    }

    pub fn output(&self) -> &[Output] {
        &self.outputs
    }

    /// All output text, concatenated.
    pub fn output_text(&self) -> String {
        self.outputs.iter().map(|o| o.text.as_str()).collect()
    }

    pub fn errors(&self) -> Vec<&str> {
        self.outputs
            .iter()
            .filter(|o| o.style == OutputStyle::Error)
            .map(|o| o.text.as_str())
            .collect()
    }

    pub fn last_prompt(&self) -> Option<&PromptConfig> {
        self.last_prompt.as_ref()
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }
}

impl IoHost for TestHost {
    fn wait_for_input(&mut self) -> Result<(), IoError> {
        // Ran dry: behave like the user pressed Ctrl+D.
        if self.inputs.is_empty() && self.signals.is_empty() {
            self.signals.push_back(Signal::Eof);
        }
        Ok(())
    }

    fn read_input(&mut self) -> Result<Option<InputLine>, IoError> {
        Ok(self.inputs.pop_front().map(|line| InputLine { line }))
    }

    fn read_signal(&mut self) -> Result<Option<Signal>, IoError> {
        Ok(self.signals.pop_front())
    }

    fn write_output(&mut self, output: Output) -> Result<(), IoError> {
        self.outputs.push(output);
        Ok(())
    }

    fn write_prompt(&mut self, config: PromptConfig) -> Result<(), IoError> {
        self.last_prompt = Some(config);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), IoError> {
        self.flushes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signals_come_before_lines() {
        let mut host = TestHost::new();
        host.queue_inputs(["first", "second"]);
        host.queue_signal(Signal::Interrupt);

        host.wait_for_input().unwrap();
        assert!(matches!(host.read_signal().unwrap(), Some(Signal::Interrupt)));
        assert_eq!(host.read_input().unwrap().unwrap().line, "first");
        assert_eq!(host.read_input().unwrap().unwrap().line, "second");
        assert!(host.read_input().unwrap().is_none());
    }

    #[test]
    fn running_dry_ends_input() {
        let mut host = TestHost::new();
        host.wait_for_input().unwrap();
        assert!(matches!(host.read_signal().unwrap(), Some(Signal::Eof)));
    }

    #[test]
    fn output_is_buffered_by_style() {
        let mut host = TestHost::new();
        host.write_output(Output::normal("a\n")).unwrap();
        host.write_output(Output::error("bad")).unwrap();
        host.write_output(Output::info("b")).unwrap();
        host.flush().unwrap();

        assert_eq!(host.output().len(), 3);
        assert_eq!(host.output_text(), "a\nbadb");
        assert_eq!(host.errors(), vec!["bad"]);
        assert_eq!(host.flush_count(), 1);
    }

    #[test]
    fn remembers_last_prompt() {
        let mut host = TestHost::new();
        assert!(host.last_prompt().is_none());
        host.write_prompt(PromptConfig {
            node_count: 3,
            selected: Some("Row".to_string()),
        })
        .unwrap();
        assert_eq!(host.last_prompt().unwrap().node_count, 3);
    }
}
