//! State shared by shell commands.

use std::path::{Path, PathBuf};

use trellis::layout::LayoutState;
use trellis::{Builder, BuilderConfig, Diagnostics, EditCommand, NodeId, PluginCatalog};

/// The builder being edited plus what the shell remembers between commands.
pub struct EditorContext {
    builder: Builder,
    diagnostics: Diagnostics,
    /// File last loaded or saved.
    file: Option<PathBuf>,
}

impl EditorContext {
    pub fn new(builder: Builder, diagnostics: Diagnostics) -> Self {
        Self {
            builder,
            diagnostics,
            file: None,
        }
    }

    /// A context over a default builder with the standard plugin catalog.
    pub fn with_defaults() -> trellis::Result<Self> {
        let mut diagnostics = Diagnostics::new();
        let builder = Builder::from_config(
            &BuilderConfig::default(),
            &PluginCatalog::standard(),
            &mut diagnostics,
        )?;
        Ok(Self::new(builder, diagnostics))
    }

    #[must_use]
    pub fn with_file(mut self, file: Option<PathBuf>) -> Self {
        self.file = file;
        self
    }

    pub fn builder(&self) -> &Builder {
        &self.builder
    }

    pub fn state(&self) -> &LayoutState {
        self.builder.state()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn apply(&mut self, command: EditCommand) -> trellis::Result<Option<NodeId>> {
        self.builder.apply(command)
    }

    /// Replace the tree with one read from `path`, keeping the current tunables.
    pub fn load(&mut self, path: &Path) -> Result<(), String> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
        let state = LayoutState::from_json_str(&json)
            .map_err(|e| e.to_string())?
            .with_config(self.state().config());
        self.builder.session_mut().replace(state);
        self.file = Some(path.to_path_buf());
        Ok(())
    }

    /// Write the tree to `path`, or to the remembered file.
    pub fn save(&mut self, path: Option<&Path>) -> Result<PathBuf, String> {
        let path = match path.or(self.file.as_deref()) {
            Some(path) => path.to_path_buf(),
            None => return Err("no file given and none loaded".to_string()),
        };
        let json = self.state().to_json_pretty().map_err(|e| e.to_string())?;
        std::fs::write(&path, json)
            .map_err(|e| format!("cannot write {}: {}", path.display(), e))?;
        self.file = Some(path.clone());
        Ok(path)
    }
}
