//! go-references CLI binary
//!
//! This is the main entry point for the go-references command-line interface.
//! The CLI is a thin adapter over the library - NO logic is implemented here.

use go_references::cli::{self, CliErrorPayload, Commands, ReferencesPayload};
use go_references::document::{Document, Position, TextDocument};
use go_references::references::{ReferenceFinder, ReferenceRequest};
use go_references::tool::ToolConfig;
use go_references::workspace::FsWorkspace;
use go_references::{ReferencesError, Result};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = cli::parse_args();

    // RUST_LOG still overrides the level when set.
    if cli.verbose {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .parse_default_env()
            .init();
    }

    let json = matches!(cli.command, Commands::Find { json: true, .. });

    let result = match cli.command {
        Commands::Find {
            file,
            line,
            column,
            root,
            gopath,
            byte_offsets,
            lenient,
            include_declaration,
            json,
        } => {
            let mut config = match gopath {
                Some(dir) => ToolConfig::new(dir),
                None => ToolConfig::from_env(),
            };
            config = config
                .with_offset_encoding(cli::offset_encoding(byte_offsets))
                .with_decode_mode(cli::decode_mode(lenient));
            let request = ReferenceRequest {
                position: Position::new(line, column),
                include_declaration,
            };
            execute_find(&file, root.as_deref(), config, &request, json)
        }
        Commands::Offset {
            file,
            line,
            column,
            byte_offsets,
        } => execute_offset(
            &file,
            Position::new(line, column),
            cli::offset_encoding(byte_offsets),
        ),
    };

    match result {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            if json {
                match serde_json::to_string(&CliErrorPayload::from_error(&e)) {
                    Ok(payload) => println!("{}", payload),
                    Err(_) => eprintln!("Error: {}", e),
                }
            } else {
                eprintln!("Error: {}", e);
            }
            ExitCode::from(1)
        }
    }
}

/// Execute the find command.
///
/// Loads the document from disk, runs the finder against a file-system
/// workspace and renders the result as text or JSON.
fn execute_find(
    file: &Path,
    root: Option<&Path>,
    config: ToolConfig,
    request: &ReferenceRequest,
    json: bool,
) -> Result<String> {
    let document = TextDocument::open(absolute(file)?)?;
    let root = match root {
        Some(root) => absolute(root)?,
        None => current_dir()?,
    };

    log::debug!(
        "Finding references in {} (root {})",
        document.path().display(),
        root.display()
    );

    let finder = ReferenceFinder::from_config(FsWorkspace::new(root), config);
    let references = finder.find_references(&document, request)?;

    if json {
        return serde_json::to_string_pretty(&ReferencesPayload::new(references))
            .map_err(|e| ReferencesError::Other(format!("Failed to encode JSON: {}", e)));
    }

    Ok(references
        .unwrap_or_default()
        .iter()
        .map(cli::format_reference)
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Execute the offset command.
fn execute_offset(
    file: &Path,
    position: Position,
    encoding: go_references::document::OffsetEncoding,
) -> Result<String> {
    let document = TextDocument::open(file)?;
    let offset = document.offset_at(position, encoding)?;
    Ok(offset.to_string())
}

fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().map_err(|e| ReferencesError::io(".", e))
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(current_dir()?.join(path))
    }
}
