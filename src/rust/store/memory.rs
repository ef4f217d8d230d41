//! In-memory document store with optional JSON snapshot persistence.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::{debug, info, warn};
use parking_lot::RwLock;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;

use super::{DesignDocument, Document, DocumentStore, StoreError, StoreResult, ViewRow};

/// Simulated credential failure, used to exercise the authorization paths
/// of callers without a real remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessFailure {
    /// Credentials are malformed or unknown to the store
    InvalidKey,
    /// The store answers but refuses the request
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredDocument {
    rev: String,
    body: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Database {
    docs: BTreeMap<String, StoredDocument>,
    #[serde(skip)]
    designs: HashMap<String, DesignDocument>,
}

/// A document-level change, applied to a staged copy for the snapshot and
/// then to the live databases.
enum Mutation {
    CreateDatabase,
    Put { id: String, doc: StoredDocument },
    Remove { id: String },
}

impl Mutation {
    fn apply(&self, databases: &mut HashMap<String, Database>, db: &str) {
        match self {
            Self::CreateDatabase => {
                databases.entry(db.to_string()).or_default();
            }
            Self::Put { id, doc } => {
                if let Some(database) = databases.get_mut(db) {
                    database.docs.insert(id.clone(), doc.clone());
                }
            }
            Self::Remove { id } => {
                if let Some(database) = databases.get_mut(db) {
                    database.docs.remove(id);
                }
            }
        }
    }
}

/// Thread-safe in-memory implementation of [`DocumentStore`].
///
/// Documents are kept per database in id order, which is also the order
/// views emit rows in. When opened with a snapshot path every mutation is
/// written to that file as JSON before it becomes visible in memory, so a
/// failed write leaves the store unchanged. Design documents are not
/// persisted and must be registered again after reopening.
#[derive(Debug, Default)]
pub struct MemoryStore {
    databases: RwLock<HashMap<String, Database>>,
    denial: Option<AccessFailure>,
    snapshot: Option<PathBuf>,
    write_lock: Mutex<()>,
}

impl MemoryStore {
    /// Creates an empty store that lives only as long as the process
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a store mirrored to `path`, loading existing documents if the
    /// file is present.
    pub async fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let databases = if tokio::fs::try_exists(&path).await? {
            let raw = tokio::fs::read_to_string(&path).await?;
            let loaded: HashMap<String, Database> = serde_json::from_str(&raw)?;
            info!("Loaded snapshot {:?} ({} databases)", path, loaded.len());
            loaded
        } else {
            info!("Snapshot {:?} does not exist yet, starting empty", path);
            HashMap::new()
        };

        Ok(Self {
            databases: RwLock::new(databases),
            snapshot: Some(path),
            ..Self::default()
        })
    }

    /// Makes every subsequent request fail with the given credential error
    pub fn deny(mut self, failure: AccessFailure) -> Self {
        self.denial = Some(failure);
        self
    }

    /// Number of documents in `db` (0 when the database does not exist)
    pub fn document_count(&self, db: &str) -> usize {
        self.databases.read().get(db).map_or(0, |d| d.docs.len())
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot.as_deref()
    }

    fn check_access(&self) -> StoreResult<()> {
        match self.denial {
            None => Ok(()),
            Some(AccessFailure::InvalidKey) => Err(StoreError::InvalidCredentials(
                "the supplied credentials were not recognised".into(),
            )),
            Some(AccessFailure::Rejected) => Err(StoreError::AccessDenied(
                "the store refused access for the supplied credentials".into(),
            )),
        }
    }

    fn next_revision(previous: Option<&str>) -> String {
        let generation = previous
            .and_then(|rev| rev.split('-').next())
            .and_then(|n| n.parse::<u64>().ok())
            .unwrap_or(0)
            + 1;
        let mut rng = rand::rng();
        let token: String = (0..32)
            .map(|_| char::from_digit(rng.random_range(0..16), 16).unwrap_or('0'))
            .collect();
        format!("{}-{}", generation, token)
    }

    /// Applies `mutation`, writing the resulting snapshot first.
    ///
    /// Callers hold `write_lock` from validation through commit.
    async fn commit(&self, db: &str, mutation: &Mutation) -> StoreResult<()> {
        if let Some(path) = &self.snapshot {
            let mut staged = self.databases.read().clone();
            mutation.apply(&mut staged, db);
            let serialized = serde_json::to_string(&staged)?;
            write_snapshot(path, serialized).await?;
        }
        mutation.apply(&mut self.databases.write(), db);
        Ok(())
    }
}

async fn write_snapshot(path: &Path, serialized: String) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, serialized).await?;
    debug!("Wrote snapshot {:?}", path);
    Ok(())
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create_database(&self, db: &str) -> StoreResult<bool> {
        self.check_access()?;
        let _guard = self.write_lock.lock().await;
        let exists = self.databases.read().contains_key(db);
        if exists {
            return Ok(false);
        }
        self.commit(db, &Mutation::CreateDatabase).await?;
        info!("Created database '{}'", db);
        Ok(true)
    }

    async fn put_design(&self, db: &str, design: DesignDocument) -> StoreResult<bool> {
        self.check_access()?;
        let mut databases = self.databases.write();
        let database = databases
            .get_mut(db)
            .ok_or_else(|| StoreError::DatabaseNotFound(db.to_string()))?;
        if database.designs.contains_key(&design.name) {
            return Ok(false);
        }
        debug!("Registered design document '{}' in '{}'", design.name, db);
        database.designs.insert(design.name.clone(), design);
        Ok(true)
    }

    async fn get(&self, db: &str, id: &str) -> StoreResult<Document> {
        self.check_access()?;
        let databases = self.databases.read();
        let database = databases
            .get(db)
            .ok_or_else(|| StoreError::DatabaseNotFound(db.to_string()))?;
        database
            .docs
            .get(id)
            .map(|stored| Document {
                id: id.to_string(),
                rev: stored.rev.clone(),
                body: stored.body.clone(),
            })
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn insert(
        &self,
        db: &str,
        id: &str,
        rev: Option<&str>,
        body: Value,
    ) -> StoreResult<String> {
        self.check_access()?;
        let _guard = self.write_lock.lock().await;
        let doc = {
            let databases = self.databases.read();
            let database = databases
                .get(db)
                .ok_or_else(|| StoreError::DatabaseNotFound(db.to_string()))?;
            let current = database.docs.get(id).map(|stored| stored.rev.as_str());
            if current != rev {
                warn!("Revision mismatch writing '{}' (have {:?}, got {:?})", id, current, rev);
                return Err(StoreError::Conflict(id.to_string()));
            }
            StoredDocument {
                rev: Self::next_revision(rev),
                body,
            }
        };
        let new_rev = doc.rev.clone();
        let mutation = Mutation::Put {
            id: id.to_string(),
            doc,
        };
        self.commit(db, &mutation).await?;
        debug!("Wrote document '{}' at revision {}", id, new_rev);
        Ok(new_rev)
    }

    async fn destroy(&self, db: &str, id: &str, rev: &str) -> StoreResult<()> {
        self.check_access()?;
        let _guard = self.write_lock.lock().await;
        {
            let databases = self.databases.read();
            let database = databases
                .get(db)
                .ok_or_else(|| StoreError::DatabaseNotFound(db.to_string()))?;
            match database.docs.get(id) {
                None => return Err(StoreError::NotFound(id.to_string())),
                Some(stored) if stored.rev != rev => {
                    return Err(StoreError::Conflict(id.to_string()));
                }
                Some(_) => {}
            }
        }
        self.commit(db, &Mutation::Remove { id: id.to_string() }).await?;
        debug!("Deleted document '{}'", id);
        Ok(())
    }

    async fn view(&self, db: &str, design: &str, view: &str) -> StoreResult<Vec<ViewRow>> {
        self.check_access()?;
        let databases = self.databases.read();
        let database = databases
            .get(db)
            .ok_or_else(|| StoreError::DatabaseNotFound(db.to_string()))?;
        let map = database
            .designs
            .get(design)
            .and_then(|d| d.views.iter().find(|v| v.name == view))
            .map(|v| v.map)
            .ok_or_else(|| StoreError::ViewNotFound(format!("{}/{}", design, view)))?;

        Ok(database
            .docs
            .iter()
            .filter_map(|(id, stored)| {
                map(id, &stored.body).map(|(key, value)| ViewRow {
                    id: id.clone(),
                    key,
                    value,
                })
            })
            .collect())
    }
}
