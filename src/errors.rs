use thiserror::Error;

/// Main error type for catalog resolution.
///
/// Every variant is `Clone` so that all callers waiting on the same in-flight
/// resolution receive the same outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The remote catalog reports that the resource does not exist.
    /// Terminal for that key; never retried.
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// Network or server failure. Safe to retry with backoff at the caller's discretion.
    #[error("Resource unavailable: {resource}: {reason}")]
    Unavailable { resource: String, reason: String },

    /// The payload did not match the expected shape.
    #[error("Malformed payload from {resource}: {reason}")]
    MalformedPayload { resource: String, reason: String },

    /// An evolution chain referenced a species already on the path from its root.
    #[error("Evolution cycle detected at species {species_id}")]
    CycleDetected { species_id: u32 },
}

impl CatalogError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        CatalogError::NotFound {
            resource: resource.into(),
        }
    }

    pub fn unavailable(resource: impl Into<String>, reason: impl ToString) -> Self {
        CatalogError::Unavailable {
            resource: resource.into(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed(resource: impl Into<String>, reason: impl ToString) -> Self {
        CatalogError::MalformedPayload {
            resource: resource.into(),
            reason: reason.to_string(),
        }
    }

    /// Only transient failures are worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CatalogError::Unavailable { .. })
    }

    /// Short machine-friendly name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogError::NotFound { .. } => "not_found",
            CatalogError::Unavailable { .. } => "unavailable",
            CatalogError::MalformedPayload { .. } => "malformed_payload",
            CatalogError::CycleDetected { .. } => "cycle_detected",
        }
    }

    /// Attach the resource a local parsing error came from. Other kinds already
    /// carry their resource and are returned unchanged.
    pub(crate) fn with_resource(self, resource: &str) -> Self {
        match self {
            CatalogError::MalformedPayload { resource: r, reason } if r.is_empty() => {
                CatalogError::MalformedPayload {
                    resource: resource.to_string(),
                    reason,
                }
            }
            other => other,
        }
    }
}

/// Errors raised while loading or validating a `CatalogConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Invalid config value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Type alias for Results using CatalogError
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Type alias for Results using ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
