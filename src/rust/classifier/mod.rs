use serde::{Deserialize, Serialize};

mod error;
pub mod record;
pub mod repository;
pub mod scorer;
pub mod training;
mod utils;

pub use error::{ErrorBody, NlcError};
pub use record::ClassifierRecord;
pub use repository::ClassifierRepository;
pub use training::{InputSource, TrainingData, TrainingLimits, TrainingMetadata};

/// Public view of a classifier, returned by create and list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierSummary {
    pub classifier_id: String,
    pub url: String,
    pub name: Option<String>,
    pub language: String,
    /// ISO-8601 creation time in UTC
    pub created: String,
}

/// Result of listing classifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierList {
    pub classifiers: Vec<ClassifierSummary>,
}

/// Result of a status request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierStatus {
    pub classifier_id: String,
    pub name: Option<String>,
    pub language: String,
    pub created: String,
    pub url: String,
    pub status: String,
    pub status_description: String,
}

/// One scored class of a classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedClass {
    pub class_name: String,
    pub confidence: f64,
}

/// Result of classifying a text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub classifier_id: String,
    pub url: String,
    pub text: String,
    pub top_class: String,
    pub classes: Vec<ClassifiedClass>,
}

/// Empty result object, serialized as `{}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}
