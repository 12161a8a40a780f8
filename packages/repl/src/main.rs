use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use trellis::plugins::Tee;
use trellis::{Builder, BuilderConfig, Diagnostics, PluginCatalog, TracingSink};
use trellis_repl::EditorContext;

/// Trellis - interactive layout tree editor
#[derive(Parser, Debug)]
#[command(name = "trellis")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Builder config file (JSON)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Layout file to open; overrides the config's layout
    layout: Option<PathBuf>,

    /// Force vi editing mode
    #[arg(long)]
    vi: bool,

    /// Force emacs editing mode
    #[arg(long, conflicts_with = "vi")]
    emacs: bool,
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if args.vi {
        std::env::set_var("TRELLIS_EDIT_MODE", "vi");
    } else if args.emacs {
        std::env::set_var("TRELLIS_EDIT_MODE", "emacs");
    }

    let ctx = match open(&args) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = trellis_repl::run(ctx) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn open(args: &Args) -> trellis::Result<EditorContext> {
    let mut config = match &args.config {
        Some(path) => BuilderConfig::from_file(path)?,
        None => BuilderConfig::default(),
    };
    if args.layout.is_some() {
        config.layout = args.layout.clone();
    }

    let mut diagnostics = Diagnostics::new();
    let builder = Builder::from_config(
        &config,
        &PluginCatalog::standard(),
        &mut Tee(&mut diagnostics, TracingSink),
    )?;
    Ok(EditorContext::new(builder, diagnostics).with_file(config.layout))
}
