use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Represents the different types of errors that can occur while serving a
/// classifier request.
///
/// Every variant maps onto a stable HTTP-like status code (see [`NlcError::code`])
/// and a short label (see [`NlcError::error`]) that callers can branch on.
/// The `Display` output is the human readable description.
#[derive(Debug, Error)]
pub enum NlcError {
    /// A required request parameter was absent or empty
    #[error("Missing required parameters: {0}")]
    MissingParameter(&'static str),
    /// The training metadata was not a JSON object with a language
    #[error("Missing metadata: {0}")]
    MissingMetadata(String),
    /// A training line could not be split into a phrase and a class
    #[error("Malformed data: {0}")]
    MalformedData(String),
    /// Fewer training lines than the configured minimum
    #[error("Data too small: found {found} training instances, at least {min} are required")]
    DataTooSmall { found: usize, min: usize },
    /// More training lines than the configured maximum
    #[error("Too many data instances: found {found} training instances, the maximum is {max}")]
    TooManyInstances { found: usize, max: usize },
    /// A single phrase exceeded the configured length
    #[error("Phrase too long: phrase on line {line} has {length} characters, the maximum is {max}")]
    PhraseTooLong { line: usize, length: usize, max: usize },
    /// More distinct classes than the configured maximum
    #[error("Too many classes: found {found} classes, the maximum is {max}")]
    TooManyClasses { found: usize, max: usize },
    /// The store already holds the maximum number of classifiers
    #[error("Entitlement error: this account is limited to {max} classifiers")]
    EntitlementError { max: usize },
    /// The referenced classifier does not exist
    #[error("Cannot find classifier with ID {0}")]
    NotFound(String),
    /// The store rejected the credentials as malformed or invalid
    #[error("Not Authorized: {0}")]
    Unauthorized(String),
    /// The store was reachable but refused access
    #[error("Forbidden: {0}")]
    Forbidden(String),
    /// Any other failure reported by the document store
    #[error("Store error: {0}")]
    Store(String),
}

/// Serializable form of an [`NlcError`], as printed by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub code: u16,
    pub error: String,
    pub description: String,
}

impl NlcError {
    /// HTTP-like status code for this error.
    pub fn code(&self) -> u16 {
        match self {
            Self::MissingParameter(_)
            | Self::MissingMetadata(_)
            | Self::MalformedData(_)
            | Self::DataTooSmall { .. }
            | Self::TooManyInstances { .. }
            | Self::PhraseTooLong { .. }
            | Self::TooManyClasses { .. }
            | Self::EntitlementError { .. } => 400,
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Store(_) => 500,
        }
    }

    /// Short, stable label for this error.
    pub fn error(&self) -> String {
        match self {
            Self::MissingParameter(name) => format!("Missing required parameters: {}", name),
            Self::MissingMetadata(_) => "Missing metadata".into(),
            Self::MalformedData(_) => "Malformed data".into(),
            Self::DataTooSmall { .. } => "Data too small".into(),
            Self::TooManyInstances { .. } => "Too many data instances".into(),
            Self::PhraseTooLong { .. } => "Phrase too long".into(),
            Self::TooManyClasses { .. } => "Too many classes".into(),
            Self::EntitlementError { .. } => "Entitlement error".into(),
            Self::NotFound(_) => "Not found".into(),
            Self::Unauthorized(_) => "Not Authorized".into(),
            Self::Forbidden(_) => "Forbidden".into(),
            Self::Store(_) => "Internal Server Error".into(),
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code(),
            error: self.error(),
            description: self.to_string(),
        }
    }
}

impl From<StoreError> for NlcError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidCredentials(msg) => NlcError::Unauthorized(msg),
            StoreError::AccessDenied(msg) => NlcError::Forbidden(msg),
            StoreError::NotFound(id) => NlcError::NotFound(id),
            other => NlcError::Store(other.to_string()),
        }
    }
}
