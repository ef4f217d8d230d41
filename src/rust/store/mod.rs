//! Document store abstraction.
//!
//! The [`DocumentStore`] trait is the only contract the classifier layer has
//! with persistence: create a database, register a design document holding
//! views, and get/insert/destroy/query documents. Updates and deletes are
//! guarded by revision tokens (optimistic concurrency).
//!
//! [`MemoryStore`] is the bundled implementation. Anything else (a CouchDB
//! compatible HTTP client, for instance) plugs in by implementing the trait.

pub mod memory;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use memory::{AccessFailure, MemoryStore};

/// Errors reported by a document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The credentials are malformed or were not recognised
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),
    /// The store is reachable but refused the request
    #[error("access denied: {0}")]
    AccessDenied(String),
    /// No document with the given id
    #[error("document not found: {0}")]
    NotFound(String),
    /// No database with the given name
    #[error("database not found: {0}")]
    DatabaseNotFound(String),
    /// Revision token missing or stale
    #[error("document update conflict: {0}")]
    Conflict(String),
    /// No view with the given design/view name
    #[error("view not found: {0}")]
    ViewNotFound(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A stored document together with its current revision token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub rev: String,
    pub body: Value,
}

/// A row emitted by a view's map function.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewRow {
    pub id: String,
    pub key: String,
    pub value: Value,
}

/// Map function of a view: given a document id and body, optionally emit
/// a `(key, value)` row.
pub type MapFn = fn(&str, &Value) -> Option<(String, Value)>;

/// A named view inside a design document.
#[derive(Clone)]
pub struct ViewDefinition {
    pub name: String,
    pub map: MapFn,
}

impl fmt::Debug for ViewDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewDefinition").field("name", &self.name).finish_non_exhaustive()
    }
}

impl ViewDefinition {
    pub fn new(name: impl Into<String>, map: MapFn) -> Self {
        Self { name: name.into(), map }
    }
}

/// A design document groups the views of one consumer of the database.
#[derive(Debug, Clone)]
pub struct DesignDocument {
    pub name: String,
    pub views: Vec<ViewDefinition>,
}

impl DesignDocument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            views: Vec::new(),
        }
    }

    pub fn with_view(mut self, view: ViewDefinition) -> Self {
        self.views.push(view);
        self
    }
}

/// Primitives consumed from a document database.
///
/// All operations are async so remote stores can be plugged in; in-memory
/// implementations return immediately-ready futures.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Creates the database if it does not exist. Returns `true` when it
    /// was created by this call.
    async fn create_database(&self, db: &str) -> StoreResult<bool>;

    /// Registers a design document unless one with the same name already
    /// exists. Returns `true` when it was written by this call.
    async fn put_design(&self, db: &str, design: DesignDocument) -> StoreResult<bool>;

    /// Fetches a document by id.
    async fn get(&self, db: &str, id: &str) -> StoreResult<Document>;

    /// Inserts a new document (`rev == None`) or updates an existing one
    /// whose current revision equals `rev`. Returns the new revision.
    async fn insert(
        &self,
        db: &str,
        id: &str,
        rev: Option<&str>,
        body: Value,
    ) -> StoreResult<String>;

    /// Deletes a document whose current revision equals `rev`.
    async fn destroy(&self, db: &str, id: &str, rev: &str) -> StoreResult<()>;

    /// Runs a view and returns its rows in the store's native order.
    async fn view(&self, db: &str, design: &str, view: &str) -> StoreResult<Vec<ViewRow>>;
}

#[async_trait]
impl<S: DocumentStore + ?Sized> DocumentStore for Arc<S> {
    async fn create_database(&self, db: &str) -> StoreResult<bool> {
        self.as_ref().create_database(db).await
    }

    async fn put_design(&self, db: &str, design: DesignDocument) -> StoreResult<bool> {
        self.as_ref().put_design(db, design).await
    }

    async fn get(&self, db: &str, id: &str) -> StoreResult<Document> {
        self.as_ref().get(db, id).await
    }

    async fn insert(
        &self,
        db: &str,
        id: &str,
        rev: Option<&str>,
        body: Value,
    ) -> StoreResult<String> {
        self.as_ref().insert(db, id, rev, body).await
    }

    async fn destroy(&self, db: &str, id: &str, rev: &str) -> StoreResult<()> {
        self.as_ref().destroy(db, id, rev).await
    }

    async fn view(&self, db: &str, design: &str, view: &str) -> StoreResult<Vec<ViewRow>> {
        self.as_ref().view(db, design, view).await
    }
}
