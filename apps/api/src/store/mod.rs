//! Persistence seam. Handlers only ever see `Arc<dyn Store>`, so tests and
//! alternative backends can stand in for the flat-file implementation.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::profile::ProfileDocument;
use crate::models::user::UserRecord;

pub mod file;

pub use file::FileStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt JSON in {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Profile document has no owner metadata")]
    MissingMeta,

    #[error("Blocking store task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn get_user(&self, username: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Inserts a new user. Returns `false`, leaving the store untouched,
    /// when the username is already taken.
    async fn create_user(&self, username: &str, record: UserRecord) -> Result<bool, StoreError>;

    async fn put_user(&self, username: &str, record: &UserRecord) -> Result<(), StoreError>;

    /// The authoritative (highest revision) profile document for a user.
    async fn current_profile(&self, username: &str)
        -> Result<Option<ProfileDocument>, StoreError>;

    /// Persists a new analysis run and returns it with its metadata filled in.
    async fn create_profile(
        &self,
        username: &str,
        document: ProfileDocument,
    ) -> Result<ProfileDocument, StoreError>;

    /// Overwrites the document previously returned by `current_profile`.
    async fn put_profile(&self, username: &str, document: &ProfileDocument)
        -> Result<(), StoreError>;
}
