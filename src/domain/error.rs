use thiserror::Error;

/// Core domain errors raised by collaborators (providers, stores, operations)
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Malformed or missing operation parameters
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    /// Language model backend or its transport failed
    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Duplicate registration
    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    /// Messaging or checkpoint store failure
    #[error("Storage error: {message}")]
    Storage { message: String },
}

macro_rules! message_constructors {
    ($($name:ident => $variant:ident),* $(,)?) => {
        $(
            pub fn $name(message: impl Into<String>) -> Self {
                Self::$variant {
                    message: message.into(),
                }
            }
        )*
    };
}

impl DomainError {
    message_constructors! {
        not_found => NotFound,
        validation => Validation,
        permission_denied => PermissionDenied,
        configuration => Configuration,
        conflict => Conflict,
        internal => Internal,
        storage => Storage,
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }
}
