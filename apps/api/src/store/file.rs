//! Flat-file store: `users.json` plus one JSON document per analysis run in
//! `parsed_resumes/`.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::models::profile::{ProfileDocument, ProfileMeta};
use crate::models::user::UserRecord;
use crate::store::{Store, StoreError};

const USERS_FILE: &str = "users.json";
const PROFILES_DIR: &str = "parsed_resumes";

pub struct FileStore {
    users_path: PathBuf,
    profiles_dir: PathBuf,
    /// Serialises read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

/// A profile document found on disk, with the data used to rank it.
struct ProfileCandidate {
    path: PathBuf,
    created_at: DateTime<Utc>,
    document: ProfileDocument,
}

impl FileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            users_path: data_dir.join(USERS_FILE),
            profiles_dir: data_dir.join(PROFILES_DIR),
            write_lock: Mutex::new(()),
        }
    }

    pub fn profiles_dir(&self) -> &Path {
        &self.profiles_dir
    }

    fn profile_path(&self, username: &str, slug: &str) -> PathBuf {
        self.profiles_dir.join(format!("{username}_{slug}.json"))
    }

    async fn load_users(&self) -> Result<BTreeMap<String, UserRecord>, StoreError> {
        let bytes = match tokio::fs::read(&self.users_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.users_path.clone(),
                    source,
                })
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(BTreeMap::new());
        }

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            path: self.users_path.clone(),
            source,
        })
    }

    async fn save_users(&self, users: &BTreeMap<String, UserRecord>) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(users).map_err(|source| StoreError::Corrupt {
            path: self.users_path.clone(),
            source,
        })?;
        write_atomic(self.users_path.clone(), bytes).await
    }

    /// Every readable document belonging to `username`.
    async fn scan_profiles(&self, username: &str) -> Result<Vec<ProfileCandidate>, StoreError> {
        let mut dir = match tokio::fs::read_dir(&self.profiles_dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.profiles_dir.clone(),
                    source,
                })
            }
        };

        let prefix = format!("{username}_");
        let mut candidates = Vec::new();

        loop {
            let entry = match dir.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(source) => {
                    return Err(StoreError::Io {
                        path: self.profiles_dir.clone(),
                        source,
                    })
                }
            };

            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            let Some(slug) = file_name
                .strip_prefix(&prefix)
                .and_then(|rest| rest.strip_suffix(".json"))
            else {
                continue;
            };

            let path = entry.path();
            match read_candidate(&path, username, slug).await {
                Ok(Some(candidate)) => candidates.push(candidate),
                Ok(None) => debug!("Skipping {} (owned by another user)", path.display()),
                Err(e) => warn!("Skipping unreadable profile document: {e}"),
            }
        }

        Ok(candidates)
    }
}

async fn read_candidate(
    path: &Path,
    username: &str,
    slug: &str,
) -> Result<Option<ProfileCandidate>, StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    let metadata = tokio::fs::metadata(path).await.map_err(io_err)?;
    let bytes = tokio::fs::read(path).await.map_err(io_err)?;
    let mut document: ProfileDocument =
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;

    let file_time = metadata
        .created()
        .or_else(|_| metadata.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH);

    if document
        .meta
        .as_ref()
        .is_some_and(|meta| meta.owner != username)
    {
        return Ok(None);
    }
    // Documents written before metadata existed rank by file time.
    if document.meta.is_none() {
        document.meta = Some(ProfileMeta {
            owner: username.to_string(),
            slug: slug.to_string(),
            revision: 0,
            created_at: DateTime::<Utc>::from(file_time),
        });
    }

    let created_at = document
        .meta
        .as_ref()
        .map(|m| m.created_at)
        .unwrap_or_else(|| DateTime::<Utc>::from(file_time));

    Ok(Some(ProfileCandidate {
        path: path.to_path_buf(),
        created_at,
        document,
    }))
}

fn latest(candidates: Vec<ProfileCandidate>) -> Option<ProfileCandidate> {
    candidates
        .into_iter()
        .max_by_key(|c| (c.created_at, c.document.revision()))
}

/// Writes to a temporary file in the target directory, then renames it over
/// the target so readers never observe a partial document.
async fn write_atomic(path: PathBuf, bytes: Vec<u8>) -> Result<(), StoreError> {
    tokio::task::spawn_blocking(move || {
        let io_err = |source| StoreError::Io {
            path: path.clone(),
            source,
        };

        let parent = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        std::fs::create_dir_all(&parent).map_err(io_err)?;

        let mut temp_file = NamedTempFile::new_in(&parent).map_err(io_err)?;
        temp_file.write_all(&bytes).map_err(io_err)?;
        temp_file.flush().map_err(io_err)?;
        temp_file.persist(&path).map_err(|e| io_err(e.error))?;
        Ok(())
    })
    .await?
}

#[async_trait]
impl Store for FileStore {
    async fn get_user(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.load_users().await?.remove(username))
    }

    async fn create_user(&self, username: &str, record: UserRecord) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut users = self.load_users().await?;
        if users.contains_key(username) {
            return Ok(false);
        }
        users.insert(username.to_string(), record);
        self.save_users(&users).await?;
        info!("Registered user {username}");
        Ok(true)
    }

    async fn put_user(&self, username: &str, record: &UserRecord) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut users = self.load_users().await?;
        users.insert(username.to_string(), record.clone());
        self.save_users(&users).await
    }

    async fn current_profile(
        &self,
        username: &str,
    ) -> Result<Option<ProfileDocument>, StoreError> {
        let candidates = self.scan_profiles(username).await?;
        Ok(latest(candidates).map(|c| {
            debug!("Current profile for {username}: {}", c.path.display());
            c.document
        }))
    }

    async fn create_profile(
        &self,
        username: &str,
        mut document: ProfileDocument,
    ) -> Result<ProfileDocument, StoreError> {
        let _guard = self.write_lock.lock().await;

        let revision = self
            .scan_profiles(username)
            .await?
            .iter()
            .map(|c| c.document.revision())
            .max()
            .unwrap_or(0)
            + 1;
        let slug = document.primary_skill_slug();

        document.meta = Some(ProfileMeta {
            owner: username.to_string(),
            slug: slug.clone(),
            revision,
            created_at: Utc::now(),
        });

        let path = self.profile_path(username, &slug);
        let bytes = serde_json::to_vec_pretty(&document).map_err(|source| {
            StoreError::Corrupt {
                path: path.clone(),
                source,
            }
        })?;
        write_atomic(path.clone(), bytes).await?;

        info!(
            "Saved profile revision {revision} for {username} to {}",
            path.display()
        );
        Ok(document)
    }

    async fn put_profile(
        &self,
        username: &str,
        document: &ProfileDocument,
    ) -> Result<(), StoreError> {
        let meta = document.meta.as_ref().ok_or(StoreError::MissingMeta)?;
        let path = self.profile_path(username, &meta.slug);
        let bytes = serde_json::to_vec_pretty(document).map_err(|source| StoreError::Corrupt {
            path: path.clone(),
            source,
        })?;

        let _guard = self.write_lock.lock().await;
        write_atomic(path, bytes).await
    }
}
