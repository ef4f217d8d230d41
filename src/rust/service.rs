//! Request façade mirroring the cloud classifier's method surface.
//!
//! Every operation validates its parameters before touching the store or
//! reading a stream, then resolves to a [`Response`] envelope or an
//! [`NlcError`], never both.

use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;

use crate::classifier::{
    scorer, Classification, ClassifierList, ClassifierRepository, ClassifierStatus,
    ClassifierSummary, Empty, InputSource, NlcError,
};
use crate::config::NlcConfig;
use crate::store::DocumentStore;

/// Envelope around every successful result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response<T> {
    pub status: u16,
    pub status_text: String,
    pub headers: BTreeMap<String, String>,
    pub result: T,
}

impl<T> Response<T> {
    pub fn ok(result: T) -> Self {
        let headers = BTreeMap::from([(
            "content-type".to_string(),
            "application/json".to_string(),
        )]);
        Self {
            status: 200,
            status_text: "OK".to_string(),
            headers,
            result,
        }
    }
}

/// Parameters of `create_classifier`.
#[derive(Debug, Default)]
pub struct CreateClassifierParams {
    /// JSON object with `language` and optional `name`
    pub training_metadata: Option<InputSource>,
    /// `phrase,class_name` lines
    pub training_data: Option<InputSource>,
}

impl CreateClassifierParams {
    pub fn new(
        training_metadata: impl Into<InputSource>,
        training_data: impl Into<InputSource>,
    ) -> Self {
        Self {
            training_metadata: Some(training_metadata.into()),
            training_data: Some(training_data.into()),
        }
    }

    pub fn validate(&self) -> Result<(), NlcError> {
        if is_missing_source(&self.training_metadata) {
            return Err(NlcError::MissingParameter("training_metadata"));
        }
        if is_missing_source(&self.training_data) {
            return Err(NlcError::MissingParameter("training_data"));
        }
        Ok(())
    }
}

/// Parameters of `get_classifier` and `delete_classifier`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifierParams {
    pub classifier_id: Option<String>,
}

impl ClassifierParams {
    pub fn new(classifier_id: impl Into<String>) -> Self {
        Self {
            classifier_id: Some(classifier_id.into()),
        }
    }

    pub fn validate(&self) -> Result<&str, NlcError> {
        required(&self.classifier_id, "classifier_id")
    }
}

/// Parameters of `classify`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifyParams {
    pub classifier_id: Option<String>,
    pub text: Option<String>,
}

impl ClassifyParams {
    pub fn new(classifier_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            classifier_id: Some(classifier_id.into()),
            text: Some(text.into()),
        }
    }

    pub fn validate(&self) -> Result<(&str, &str), NlcError> {
        let classifier_id = required(&self.classifier_id, "classifier_id")?;
        let text = required(&self.text, "text")?;
        Ok((classifier_id, text))
    }
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, NlcError> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(NlcError::MissingParameter(name)),
    }
}

fn is_missing_source(source: &Option<InputSource>) -> bool {
    match source {
        None => true,
        Some(InputSource::Text(text)) => text.is_empty(),
        Some(InputSource::Bytes(bytes)) => bytes.is_empty(),
        Some(InputSource::Stream(_)) => false,
    }
}

/// A natural language classifier served from a document store.
///
/// ```
/// # #[tokio::main]
/// # async fn main() -> Result<(), nlc_stub::NlcError> {
/// use nlc_stub::{
///     ClassifyParams, CreateClassifierParams, MemoryStore, NaturalLanguageClassifier, NlcConfig,
/// };
///
/// let nlc = NaturalLanguageClassifier::connect(MemoryStore::new(), NlcConfig::default()).await?;
/// let created = nlc
///     .create_classifier(CreateClassifierParams::new(
///         r#"{"name": "greetings", "language": "en"}"#,
///         "hello,greet\nbye,farewell\nhi,greet\nhey,greet\nsee ya,farewell",
///     ))
///     .await?;
///
/// let response = nlc
///     .classify(ClassifyParams::new(created.result.classifier_id, "hello"))
///     .await?;
/// assert_eq!(response.result.top_class, "greet");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct NaturalLanguageClassifier<S> {
    repository: ClassifierRepository<S>,
}

impl<S: DocumentStore> NaturalLanguageClassifier<S> {
    /// Wraps a store without touching it.
    ///
    /// Creating classifiers needs the database that [`connect`](Self::connect)
    /// prepares; before that, reads see no classifiers.
    pub fn new(store: S, config: NlcConfig) -> Self {
        Self {
            repository: ClassifierRepository::new(store, config),
        }
    }

    /// Wraps a store and prepares its database and views
    pub async fn connect(store: S, config: NlcConfig) -> Result<Self, NlcError> {
        let nlc = Self::new(store, config);
        nlc.repository.initialize().await?;
        Ok(nlc)
    }

    pub fn repository(&self) -> &ClassifierRepository<S> {
        &self.repository
    }

    pub async fn create_classifier(
        &self,
        params: CreateClassifierParams,
    ) -> Result<Response<ClassifierSummary>, NlcError> {
        params.validate()?;
        let (Some(metadata), Some(training_data)) =
            (params.training_metadata, params.training_data)
        else {
            return Err(NlcError::MissingParameter("training_data"));
        };
        debug!("create_classifier");
        let summary = self.repository.create(metadata, training_data).await?;
        Ok(Response::ok(summary))
    }

    pub async fn list_classifiers(&self) -> Result<Response<ClassifierList>, NlcError> {
        debug!("list_classifiers");
        let classifiers = self.repository.list().await?;
        Ok(Response::ok(ClassifierList { classifiers }))
    }

    pub async fn get_classifier(
        &self,
        params: ClassifierParams,
    ) -> Result<Response<ClassifierStatus>, NlcError> {
        let classifier_id = params.validate()?;
        debug!("get_classifier {}", classifier_id);
        let status = self.repository.get(classifier_id).await?;
        Ok(Response::ok(status))
    }

    pub async fn delete_classifier(
        &self,
        params: ClassifierParams,
    ) -> Result<Response<Empty>, NlcError> {
        let classifier_id = params.validate()?;
        debug!("delete_classifier {}", classifier_id);
        self.repository.delete(classifier_id).await?;
        Ok(Response::ok(Empty {}))
    }

    pub async fn classify(
        &self,
        params: ClassifyParams,
    ) -> Result<Response<Classification>, NlcError> {
        let (classifier_id, text) = params.validate()?;
        debug!("classify {} ({} chars)", classifier_id, text.chars().count());
        let record = self.repository.find(classifier_id).await?;

        let classes = scorer::score(&record.classes, text, self.repository.config().max_results);
        let top_class = classes
            .first()
            .map(|c| c.class_name.clone())
            .unwrap_or_default();

        Ok(Response::ok(Classification {
            classifier_id: record.id,
            url: record.url,
            text: text.to_string(),
            top_class,
            classes,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_parameters() {
        assert!(matches!(
            ClassifyParams::default().validate(),
            Err(NlcError::MissingParameter("classifier_id"))
        ));
        let params = ClassifyParams {
            classifier_id: Some("abc".into()),
            text: Some(String::new()),
        };
        assert!(matches!(params.validate(), Err(NlcError::MissingParameter("text"))));

        assert!(matches!(
            ClassifierParams::new("").validate(),
            Err(NlcError::MissingParameter("classifier_id"))
        ));
        assert_eq!(ClassifierParams::new("abc").validate().unwrap(), "abc");
    }

    #[test]
    fn test_create_parameters() {
        let params = CreateClassifierParams {
            training_metadata: None,
            training_data: Some("hello,greet".into()),
        };
        assert!(matches!(
            params.validate(),
            Err(NlcError::MissingParameter("training_metadata"))
        ));

        let params = CreateClassifierParams {
            training_metadata: Some(r#"{"language": "en"}"#.into()),
            training_data: Some(Vec::new().into()),
        };
        assert!(matches!(
            params.validate(),
            Err(NlcError::MissingParameter("training_data"))
        ));

        let params = CreateClassifierParams {
            training_metadata: Some(r#"{"language": "en"}"#.into()),
            training_data: Some(InputSource::stream(tokio_test::io::Builder::new().build())),
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_envelope() {
        let response = Response::ok(Empty {});
        assert_eq!(response.status, 200);
        assert_eq!(response.status_text, "OK");
        assert_eq!(response.headers["content-type"], "application/json");
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["result"], serde_json::json!({}));
    }
}
