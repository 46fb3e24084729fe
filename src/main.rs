use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use css_partial_import::{ImportOptions, PartialImport};

#[derive(Parser)]
#[command(name = "css-partial-import", version, about = "Inline local CSS @import directives")]
struct Cli {
    /// Entry stylesheet
    input: PathBuf,

    /// Persist resolved imports in this directory
    #[arg(long)]
    cachedir: Option<PathBuf>,

    /// Also write <name>-created.<ext> next to the input
    #[arg(long)]
    generate: bool,

    /// Options file (defaults to partial-import.json next to the input)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the merged stylesheet here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut options = match &cli.config {
        Some(path) => ImportOptions::load_from_path(path),
        None => ImportOptions::load_from_dir(cli.input.parent().unwrap_or(Path::new("."))),
    };
    if let Some(dir) = cli.cachedir {
        options.cachedir = Some(dir);
    }
    if cli.generate {
        options.generate = true;
    }

    let resolution = match PartialImport::new(options).process_file(&cli.input) {
        Ok(resolution) => resolution,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    for warning in &resolution.warnings {
        tracing::warn!("{}", warning);
    }

    let css = resolution.css();
    match cli.output {
        Some(path) => {
            if let Err(e) = fs::write(&path, css) {
                eprintln!("error: failed to write {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        }
        None => print!("{css}"),
    }

    ExitCode::SUCCESS
}
