//! Non-fatal problems found while aggregating plugins.

use std::fmt;

use crate::error::PluginError;

/// A problem with one registration entry. Aggregation carries on regardless.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    NotAFactory { index: usize, kind: String },
    FactoryFailed { index: usize, error: PluginError },
    NameConflict { name: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NotAFactory { index, kind } => write!(
                f,
                "Error at plugins[{}]: Expected plugin to be a function, instead got a {}",
                index, kind
            ),
            Diagnostic::FactoryFailed { index, error } => {
                write!(f, "Error at plugins[{}]: {}", index, error)
            }
            Diagnostic::NameConflict { name } => write!(
                f,
                "Plugin name conflict. More than one plugin with the name \"{}\". \
                 Ensure you are not using multiple copies of one plugin.",
                name
            ),
        }
    }
}

/// Where aggregation reports its diagnostics.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic)
    }
}

/// Collects diagnostics in report order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    pub fn conflicts(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|d| match d {
            Diagnostic::NameConflict { name } => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl DiagnosticSink for Diagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Emits every diagnostic as a `tracing` error event.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        tracing::error!(target: "trellis::plugins", "{}", diagnostic);
    }
}

/// Forwards every diagnostic to two sinks.
#[derive(Debug, Default)]
pub struct Tee<A, B>(pub A, pub B);

impl<A: DiagnosticSink, B: DiagnosticSink> DiagnosticSink for Tee<A, B> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.0.report(diagnostic.clone());
        self.1.report(diagnostic);
    }
}
