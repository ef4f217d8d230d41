//! A stand-in for a cloud natural language classifier API, backed by a
//! document store.
//!
//! Client code written against the cloud service's operations (create, list,
//! status, classify, delete) can run against a local or throwaway store
//! instead. "Classification" is a literal substring match of the input text
//! against each class's concatenated training phrases.
//!
//! # Basic Usage
//!
//! ```rust
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use nlc_stub::{
//!     ClassifierParams, ClassifyParams, CreateClassifierParams, MemoryStore,
//!     NaturalLanguageClassifier, NlcConfig,
//! };
//!
//! let nlc = NaturalLanguageClassifier::connect(MemoryStore::new(), NlcConfig::default()).await?;
//!
//! let created = nlc
//!     .create_classifier(CreateClassifierParams::new(
//!         r#"{"name": "greetings", "language": "en"}"#,
//!         "hello,greet\nbye,farewell\nhi,greet\nhey,greet\nsee ya,farewell\n",
//!     ))
//!     .await?;
//! let id = created.result.classifier_id;
//!
//! let classification = nlc.classify(ClassifyParams::new(id.as_str(), "see ya")).await?;
//! println!("Predicted class: {}", classification.result.top_class);
//!
//! nlc.delete_classifier(ClassifierParams::new(id.as_str())).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Errors
//!
//! Every failure is an [`NlcError`]; branch on the variant or on
//! [`NlcError::code`], not on the message.

pub mod classifier;
pub mod config;
pub mod service;
pub mod store;

pub use classifier::{
    Classification, ClassifiedClass, ClassifierList, ClassifierRecord, ClassifierRepository,
    ClassifierStatus, ClassifierSummary, Empty, ErrorBody, InputSource, NlcError, TrainingData,
    TrainingLimits, TrainingMetadata,
};
pub use config::{ConfigError, NlcConfig, StoreConfig};
pub use service::{
    ClassifierParams, ClassifyParams, CreateClassifierParams, NaturalLanguageClassifier, Response,
};
pub use store::{AccessFailure, DocumentStore, MemoryStore, StoreError};

pub fn init_logger() {
    env_logger::init();
}
