//! Error types for BDR Assist.

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Integration error: {0}")]
    Integration(#[from] IntegrationError),

    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Event classification failures.
///
/// These are dead-ends on the dispatch path, not faults: the dispatcher
/// logs them and drops the event without notifying the error sink.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("{subscription_type} event missing objectId")]
    MissingObjectId { subscription_type: String },
}

/// Errors from the external API integrations (HubSpot, Slack, Claude).
#[derive(Debug, thiserror::Error)]
pub enum IntegrationError {
    #[error("{service} request failed: {reason}")]
    RequestFailed { service: String, reason: String },

    #[error("{service} returned {status}: {body}")]
    ApiError {
        service: String,
        status: u16,
        body: String,
    },

    #[error("{service} credentials not configured")]
    NotConfigured { service: String },

    #[error("Invalid response from {service}: {reason}")]
    InvalidResponse { service: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Workflow execution errors.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("Integration error: {0}")]
    Integration(#[from] IntegrationError),

    #[error("{entity} {id} not found in CRM")]
    SubjectNotFound { entity: String, id: String },

    #[error("Workflow {name} failed: {reason}")]
    Failed { name: String, reason: String },
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;
