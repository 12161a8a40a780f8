use std::path::PathBuf;

use trellis_layout::LayoutError;
use trellis_plugins::RenderError;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {message}")]
    Invalid { message: String },
}

#[derive(thiserror::Error, Debug)]
pub enum TrellisError {
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

pub type Result<T> = std::result::Result<T, TrellisError>;
