use log::{debug, info, warn};

use super::error::NlcError;
use super::record::{self, ClassifierRecord, CLASSIFIER_TYPE, DESIGN_NAME, LIST_VIEW};
use super::training::{parse_metadata, parse_training_data, InputSource, TrainingLimits};
use super::utils::{generate_classifier_id, timestamp_now};
use super::{ClassifierStatus, ClassifierSummary};
use crate::config::NlcConfig;
use crate::store::{Document, DocumentStore, StoreError};

const MAX_ID_ATTEMPTS: usize = 5;

/// Classifier records kept in a [`DocumentStore`].
///
/// The repository owns its store handle and configuration; construct one per
/// configuration and pass it to whoever needs it.
#[derive(Debug)]
pub struct ClassifierRepository<S> {
    store: S,
    config: NlcConfig,
}

impl<S: DocumentStore> ClassifierRepository<S> {
    pub fn new(store: S, config: NlcConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &NlcConfig {
        &self.config
    }

    fn db(&self) -> &str {
        &self.config.store.dbname
    }

    /// Creates the database if needed and registers the classifier views.
    pub async fn initialize(&self) -> Result<(), NlcError> {
        if self.store.create_database(self.db()).await? {
            info!("Created classifier database '{}'", self.db());
        }
        if self.store.put_design(self.db(), record::design_document()).await? {
            debug!("Registered design document '{}'", DESIGN_NAME);
        }
        Ok(())
    }

    /// Parses the training inputs and stores a new classifier.
    ///
    /// # Errors
    /// - `MissingMetadata` if the metadata cannot be read or parsed
    /// - any training data error from [`parse_training_data`]
    /// - `EntitlementError` if the store already holds `max_classifiers`
    pub async fn create(
        &self,
        metadata: InputSource,
        training_data: InputSource,
    ) -> Result<ClassifierSummary, NlcError> {
        let raw_metadata = metadata
            .read_all()
            .await
            .map_err(|e| NlcError::MissingMetadata(format!("failed to read metadata: {}", e)))?;
        let raw_training = training_data
            .read_all()
            .await
            .map_err(|e| NlcError::MalformedData(format!("failed to read training data: {}", e)))?;

        let metadata = parse_metadata(&raw_metadata)?;
        let text = String::from_utf8(raw_training)
            .map_err(|_| NlcError::MalformedData("training data is not valid UTF-8".into()))?;
        let training = parse_training_data(&text, &TrainingLimits::from(&self.config))?;

        let existing = self.list().await?.len();
        if existing >= self.config.max_classifiers {
            warn!(
                "Refusing to create classifier: {} of {} already exist",
                existing, self.config.max_classifiers
            );
            return Err(NlcError::EntitlementError {
                max: self.config.max_classifiers,
            });
        }

        let mut record = ClassifierRecord {
            id: String::new(),
            name: metadata.name,
            language: metadata.language,
            created: timestamp_now(),
            url: String::new(),
            classes: training.classes,
            kind: CLASSIFIER_TYPE.to_string(),
        };

        for attempt in 1..=MAX_ID_ATTEMPTS {
            record.id = generate_classifier_id();
            record.url = self.config.classifier_url(&record.id);
            let body = serde_json::to_value(&record).map_err(|e| NlcError::Store(e.to_string()))?;
            match self.store.insert(self.db(), &record.id, None, body).await {
                Ok(_) => {
                    info!(
                        "Created classifier {} ({} instances, {} classes)",
                        record.id,
                        training.instances,
                        record.classes.len()
                    );
                    return Ok(record.summary());
                }
                Err(StoreError::Conflict(id)) => {
                    warn!("Classifier id {} already taken (attempt {})", id, attempt);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(NlcError::Store(format!(
            "could not allocate a unique classifier id after {} attempts",
            MAX_ID_ATTEMPTS
        )))
    }

    /// Summaries of every stored classifier, in the store's view order.
    ///
    /// A database that was never initialized holds no classifiers.
    pub async fn list(&self) -> Result<Vec<ClassifierSummary>, NlcError> {
        let rows = match self.store.view(self.db(), DESIGN_NAME, LIST_VIEW).await {
            Ok(rows) => rows,
            Err(StoreError::DatabaseNotFound(db)) => {
                debug!("Database '{}' does not exist, no classifiers to list", db);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        rows.into_iter()
            .map(|row| {
                serde_json::from_value(row.value).map_err(|e| {
                    NlcError::Store(format!("invalid classifier row {}: {}", row.id, e))
                })
            })
            .collect()
    }

    /// Fetches the classifier document, treating a missing database or a
    /// document of another type as an unknown id.
    async fn fetch(&self, classifier_id: &str) -> Result<Document, NlcError> {
        let document = match self.store.get(self.db(), classifier_id).await {
            Ok(document) => document,
            Err(StoreError::DatabaseNotFound(_)) => {
                return Err(NlcError::NotFound(classifier_id.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        if !record::is_classifier(&document.body) {
            return Err(NlcError::NotFound(classifier_id.to_string()));
        }
        Ok(document)
    }

    /// Loads the full record of a classifier, corpus included.
    pub async fn find(&self, classifier_id: &str) -> Result<ClassifierRecord, NlcError> {
        let document = self.fetch(classifier_id).await?;
        serde_json::from_value(document.body).map_err(|e| {
            NlcError::Store(format!("invalid classifier document {}: {}", classifier_id, e))
        })
    }

    pub async fn get(&self, classifier_id: &str) -> Result<ClassifierStatus, NlcError> {
        Ok(self.find(classifier_id).await?.status())
    }

    /// Deletes a classifier, conditioned on the revision just read.
    pub async fn delete(&self, classifier_id: &str) -> Result<(), NlcError> {
        let document = self.fetch(classifier_id).await?;
        self.store
            .destroy(self.db(), classifier_id, &document.rev)
            .await?;
        info!("Deleted classifier {}", classifier_id);
        Ok(())
    }
}
