//! Error types for the curator library.

use std::path::PathBuf;
use thiserror::Error;

use crate::model::SourceName;

/// Main error type for curator operations.
#[derive(Debug, Error)]
pub enum CuratorError {
    /// The requested provider has no registered adapter.
    #[error("Unknown source: '{0}'")]
    UnknownSource(String),

    /// A provider-required request field is absent.
    #[error("Missing parameter '{parameter}' for source {provider}")]
    MissingParameter {
        provider: SourceName,
        parameter: &'static str,
    },

    /// A request field is present but unusable (e.g. start year after end year).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Network, HTTP or payload failure at a provider.
    #[error(transparent)]
    DataSource(#[from] DataSourceError),

    /// Cleaning produced nothing usable.
    #[error("Cleaning failed: {message} ({rows} rows, {columns} columns)")]
    Cleaning {
        message: String,
        rows: usize,
        columns: usize,
    },

    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no data to parse.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CuratorError {
    /// Wrap an IO error with the path that caused it.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CuratorError::Io {
            path: path.into(),
            source,
        }
    }

    /// Build a cleaning error carrying diagnostic counts.
    pub fn cleaning(message: impl Into<String>, rows: usize, columns: usize) -> Self {
        CuratorError::Cleaning {
            message: message.into(),
            rows,
            columns,
        }
    }
}

/// Failure talking to a provider. Every variant names the provider and the cause.
#[derive(Debug, Error)]
pub enum DataSourceError {
    /// The request never produced a response.
    #[error("{provider}: network failure: {cause}")]
    Network { provider: SourceName, cause: String },

    /// The provider answered with a non-2xx status.
    #[error("{provider}: HTTP {status}: {cause}")]
    Http {
        provider: SourceName,
        status: u16,
        cause: String,
    },

    /// The provider answered but returned no observations.
    #[error("{provider}: empty result: {cause}")]
    Empty { provider: SourceName, cause: String },

    /// The payload could not be parsed.
    #[error("{provider}: malformed payload: {cause}")]
    Malformed { provider: SourceName, cause: String },
}

impl DataSourceError {
    /// The provider the failure came from.
    pub fn provider(&self) -> SourceName {
        match self {
            DataSourceError::Network { provider, .. }
            | DataSourceError::Http { provider, .. }
            | DataSourceError::Empty { provider, .. }
            | DataSourceError::Malformed { provider, .. } => *provider,
        }
    }

    pub fn empty(provider: SourceName, cause: impl Into<String>) -> Self {
        DataSourceError::Empty {
            provider,
            cause: cause.into(),
        }
    }

    pub fn malformed(provider: SourceName, cause: impl Into<String>) -> Self {
        DataSourceError::Malformed {
            provider,
            cause: cause.into(),
        }
    }
}

/// Result type alias for curator operations.
pub type Result<T> = std::result::Result<T, CuratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_source_error_reports_provider() {
        let err = DataSourceError::Http {
            provider: SourceName::WorldBank,
            status: 503,
            cause: "Service Unavailable".to_string(),
        };
        assert_eq!(err.provider(), SourceName::WorldBank);
        assert_eq!(err.to_string(), "worldbank: HTTP 503: Service Unavailable");
    }

    #[test]
    fn test_cleaning_error_carries_counts() {
        let err = CuratorError::cleaning("no rows left", 0, 4);
        assert_eq!(err.to_string(), "Cleaning failed: no rows left (0 rows, 4 columns)");
    }
}
