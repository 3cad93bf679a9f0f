//! Errors raised while building the locale routing tables.

use thiserror::Error;

/// Invalid router configuration. Always fatal: the host must refuse to start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("at least one locale must be configured")]
    NoLocales,

    #[error("locale identifiers must not be empty")]
    EmptyLocale,

    #[error("default locale must be specified")]
    MissingDefaultLocale,

    #[error("default locale '{0}' is not one of the configured locales")]
    UnknownDefaultLocale(String),

    #[error("path segment '{segment}' is used by both '{first}' and '{second}'")]
    DuplicatePathSegment {
        segment: String,
        first: String,
        second: String,
    },

    #[error("locale '{0}' is configured more than once")]
    DuplicateLocale(String),

    #[error("locale '{locale}' has invalid path segment '{segment}'")]
    InvalidPathSegment { locale: String, segment: String },
}
