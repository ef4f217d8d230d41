use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{ClassifierStatus, ClassifierSummary};
use crate::store::{DesignDocument, ViewDefinition};

/// Discriminator stored in the `type` field of every classifier document.
pub const CLASSIFIER_TYPE: &str = "classifier";
/// Design document holding the classifier views.
pub const DESIGN_NAME: &str = "classifiers";
/// View listing classifier summaries.
pub const LIST_VIEW: &str = "list";

pub const STATUS_AVAILABLE: &str = "Available";
pub const STATUS_DESCRIPTION: &str =
    "The classifier instance is now available and is ready to take classifier requests.";

/// A classifier as persisted in the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub language: String,
    pub created: String,
    pub url: String,
    pub classes: BTreeMap<String, String>,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ClassifierRecord {
    pub fn summary(&self) -> ClassifierSummary {
        ClassifierSummary {
            classifier_id: self.id.clone(),
            url: self.url.clone(),
            name: self.name.clone(),
            language: self.language.clone(),
            created: self.created.clone(),
        }
    }

    pub fn status(&self) -> ClassifierStatus {
        ClassifierStatus {
            classifier_id: self.id.clone(),
            name: self.name.clone(),
            language: self.language.clone(),
            created: self.created.clone(),
            url: self.url.clone(),
            status: STATUS_AVAILABLE.to_string(),
            status_description: STATUS_DESCRIPTION.to_string(),
        }
    }
}

pub fn is_classifier(body: &Value) -> bool {
    body["type"] == CLASSIFIER_TYPE
}

/// Map function of the list view: one summary row per classifier document.
fn summary_row(id: &str, body: &Value) -> Option<(String, Value)> {
    if !is_classifier(body) {
        return None;
    }
    Some((
        id.to_string(),
        json!({
            "classifier_id": id,
            "url": body["url"],
            "name": body["name"],
            "language": body["language"],
            "created": body["created"],
        }),
    ))
}

pub fn design_document() -> DesignDocument {
    DesignDocument::new(DESIGN_NAME).with_view(ViewDefinition::new(LIST_VIEW, summary_row))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ClassifierRecord {
        ClassifierRecord {
            id: "abcdefx123-nlc-45678".into(),
            name: Some("diet".into()),
            language: "ja".into(),
            created: "2017-05-02T10:11:12.345Z".into(),
            url: "http://localhost/v1/classifiers/abcdefx123-nlc-45678".into(),
            classes: BTreeMap::from([("greet".to_string(), "hellohi".to_string())]),
            kind: CLASSIFIER_TYPE.into(),
        }
    }

    #[test]
    fn test_record_serializes_with_store_field_names() {
        let value = serde_json::to_value(record()).unwrap();
        assert_eq!(value["_id"], "abcdefx123-nlc-45678");
        assert_eq!(value["type"], "classifier");
        assert_eq!(value["classes"]["greet"], "hellohi");
    }

    #[test]
    fn test_summary_row_only_for_classifiers() {
        let value = serde_json::to_value(record()).unwrap();
        let (key, row) = summary_row("abcdefx123-nlc-45678", &value).unwrap();
        assert_eq!(key, "abcdefx123-nlc-45678");
        let summary: ClassifierSummary = serde_json::from_value(row).unwrap();
        assert_eq!(summary, record().summary());

        assert!(summary_row("other", &json!({"type": "note"})).is_none());
    }

    #[test]
    fn test_status_is_always_available() {
        let status = record().status();
        assert_eq!(status.status, "Available");
        assert_eq!(status.status_description, STATUS_DESCRIPTION);
    }
}
