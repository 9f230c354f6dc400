use molgraph::core::io::molfile::MolfileError;
use molgraph::core::templates::registry::TemplateLoadError;
use molgraph::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Templates(#[from] TemplateLoadError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read molfile '{path}': {source}", path = path.display())]
    Molfile {
        path: PathBuf,
        #[source]
        source: MolfileError,
    },

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
