use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::Path;

use log::debug;
use serde::Deserialize;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::error::NlcError;
use super::utils::strip_quotes;
use crate::config::NlcConfig;

/// Where training metadata or training data comes from.
///
/// Buffers are used as-is; streams are drained completely before anything
/// is parsed.
pub enum InputSource {
    /// In-memory text
    Text(String),
    /// In-memory bytes, expected to be UTF-8
    Bytes(Vec<u8>),
    /// Any async byte stream, e.g. an opened file
    Stream(Box<dyn AsyncRead + Send + Unpin>),
}

impl InputSource {
    /// Wraps an async reader
    pub fn stream<R>(reader: R) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        Self::Stream(Box::new(reader))
    }

    /// Opens a file as a streaming source
    pub async fn open_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = tokio::fs::File::open(path).await?;
        Ok(Self::stream(file))
    }

    /// Drains the source into memory
    pub async fn read_all(self) -> io::Result<Vec<u8>> {
        match self {
            Self::Text(text) => Ok(text.into_bytes()),
            Self::Bytes(bytes) => Ok(bytes),
            Self::Stream(mut reader) => {
                let mut buffer = Vec::new();
                reader.read_to_end(&mut buffer).await?;
                Ok(buffer)
            }
        }
    }
}

impl fmt::Debug for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(&text.len()).finish(),
            Self::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl From<String> for InputSource {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for InputSource {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<u8>> for InputSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

/// Name and language of a classifier, supplied alongside its training data.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrainingMetadata {
    #[serde(default)]
    pub name: Option<String>,
    pub language: String,
}

/// Structural limits applied to training data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingLimits {
    pub min_instances: usize,
    pub max_instances: usize,
    pub max_phrase_length: usize,
    pub max_classes: usize,
}

impl Default for TrainingLimits {
    fn default() -> Self {
        Self {
            min_instances: 5,
            max_instances: 20_000,
            max_phrase_length: 1024,
            max_classes: 3000,
        }
    }
}

impl From<&NlcConfig> for TrainingLimits {
    fn from(config: &NlcConfig) -> Self {
        Self {
            min_instances: config.min_instances,
            max_instances: config.max_instances,
            max_phrase_length: config.max_phrase_length,
            max_classes: config.max_classes,
        }
    }
}

/// Parsed training data: one concatenated corpus per class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingData {
    /// Number of training lines that were read
    pub instances: usize,
    /// Class name to corpus, ordered by class name
    pub classes: BTreeMap<String, String>,
}

/// Parses the metadata blob.
///
/// The blob must be a JSON object with a non-empty string `language`;
/// `name` is optional. Anything else is [`NlcError::MissingMetadata`].
pub fn parse_metadata(raw: &[u8]) -> Result<TrainingMetadata, NlcError> {
    let value: serde_json::Value = serde_json::from_slice(raw)
        .map_err(|e| NlcError::MissingMetadata(e.to_string()))?;
    if !value.is_object() {
        return Err(NlcError::MissingMetadata("metadata must be a JSON object".into()));
    }
    let metadata: TrainingMetadata = serde_json::from_value(value)
        .map_err(|e| NlcError::MissingMetadata(e.to_string()))?;
    if metadata.language.trim().is_empty() {
        return Err(NlcError::MissingMetadata("language cannot be empty".into()));
    }
    Ok(metadata)
}

/// Splits training text into lines, dropping the empty line produced by a
/// final newline.
fn training_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    if lines.last() == Some(&"") {
        lines.pop();
    }
    lines
}

/// Parses `phrase,class_name` training lines.
///
/// Checks run in this order:
/// - line count against `min_instances` and `max_instances`
/// - per line, in one pass: a missing comma or an empty phrase or class is
///   malformed, then phrase length against `max_phrase_length`
/// - distinct class count against `max_classes`
///
/// Phrases of the same class are concatenated with no separator.
pub fn parse_training_data(
    text: &str,
    limits: &TrainingLimits,
) -> Result<TrainingData, NlcError> {
    let lines = training_lines(text);

    if lines.len() < limits.min_instances {
        return Err(NlcError::DataTooSmall {
            found: lines.len(),
            min: limits.min_instances,
        });
    }
    if lines.len() > limits.max_instances {
        return Err(NlcError::TooManyInstances {
            found: lines.len(),
            max: limits.max_instances,
        });
    }

    let mut classes: BTreeMap<String, String> = BTreeMap::new();
    for (index, line) in lines.iter().enumerate() {
        let line_number = index + 1;
        let (phrase, class_name) = line.split_once(',').ok_or_else(|| {
            NlcError::MalformedData(format!("line {} has no class column", line_number))
        })?;
        let phrase = strip_quotes(phrase);
        let class_name = strip_quotes(class_name);

        if phrase.is_empty() {
            return Err(NlcError::MalformedData(format!(
                "line {} has an empty phrase",
                line_number
            )));
        }
        if class_name.is_empty() {
            return Err(NlcError::MalformedData(format!(
                "line {} has an empty class name",
                line_number
            )));
        }

        let length = phrase.chars().count();
        if length > limits.max_phrase_length {
            return Err(NlcError::PhraseTooLong {
                line: line_number,
                length,
                max: limits.max_phrase_length,
            });
        }

        classes
            .entry(class_name.to_string())
            .or_default()
            .push_str(phrase);
    }

    if classes.len() > limits.max_classes {
        return Err(NlcError::TooManyClasses {
            found: classes.len(),
            max: limits.max_classes,
        });
    }

    debug!("Parsed {} training instances into {} classes", lines.len(), classes.len());
    Ok(TrainingData {
        instances: lines.len(),
        classes,
    })
}
