//! # trellis-repl
//!
//! An interactive shell for editing a Trellis layout tree.
//!
//! Every line is one edit or query against the current snapshot; the
//! tree can be rendered through the configured plugins at any time.
//!
//! ## Features
//!
//! - Insert, move, remove and select nodes by id
//! - Set and unset props by path
//! - Load and save layouts as JSON
//! - Tab completion and highlighting for commands
//! - Vi mode (detected from EDITOR, .inputrc, or TRELLIS_EDIT_MODE)
//! - Command history
//!
//! ## Usage
//!
//! ```bash
//! trellis --config trellis.json
//!
//! # Inside the shell:
//! > insert root 0 Row
//! ok k3x9a
//! > set k3x9a gap 4
//! > tree
//! > save home.json
//! ```

pub mod commands;
pub mod completer;
pub mod context;
pub mod core;
pub mod highlighter;
pub mod host;
pub mod io;

pub use context::EditorContext;

use host::TerminalHost;
use io::{ExitReason, IoError};

/// Run the shell on the terminal until the user leaves.
pub fn run(ctx: EditorContext) -> Result<ExitReason, IoError> {
    let mut host = TerminalHost::new()?;
    crate::core::ReplCore::new(ctx).run(&mut host)
}
