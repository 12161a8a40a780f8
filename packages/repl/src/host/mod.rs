//! Hosts that run the shell against a real terminal.

pub mod terminal;

pub use terminal::TerminalHost;
