use super::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid match configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    /// The search gave up before finding a mapping or proving there is none.
    #[error("Search aborted after exceeding the budget of {limit} steps")]
    SearchBudgetExceeded { limit: u64 },

    #[error("Internal logic error: {0}")]
    Internal(String),
}
