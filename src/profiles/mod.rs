// SPDX-License-Identifier: MIT
//! Filesystem store for persisted browser profiles.
//!
//! A profile is a subdirectory of the configured profiles root, created here
//! and populated by the renderer itself (cookies, local storage). Name
//! validation is the traversal defense: only validated names are ever joined
//! onto the root, and the orchestrator downstream consumes resolved paths
//! exclusively.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Allowed profile names: 1–64 chars of `[A-Za-z0-9_-]`. Rules out path
/// separators, `..`, and empty names.
static PROFILE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,64}$").expect("profile name regex"));

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("invalid profile name: {0:?}")]
    InvalidName(String),
    #[error("Profile '{0}' already exists")]
    AlreadyExists(String),
    #[error("Profile '{0}' not found")]
    NotFound(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Everything the API reports about one profile directory.
#[derive(Debug, Clone)]
pub struct ProfileDirInfo {
    pub name: String,
    pub path: PathBuf,
    pub exists: bool,
    /// Total bytes of all files under the profile, when it exists.
    pub size_bytes: Option<u64>,
    /// RFC 3339 mtime of the profile directory, when it exists.
    pub last_modified: Option<String>,
}

pub struct ProfileStore {
    root: PathBuf,
}

impl ProfileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn validate_name(name: &str) -> Result<(), ProfileError> {
        if PROFILE_NAME.is_match(name) {
            Ok(())
        } else {
            Err(ProfileError::InvalidName(name.to_string()))
        }
    }

    /// Validate `name` and resolve it to its directory path under the root.
    /// The directory is not required to exist — the renderer creates it on
    /// first use.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, ProfileError> {
        Self::validate_name(name)?;
        Ok(self.root.join(name))
    }

    /// Names of all existing profiles, sorted.
    pub async fn list(&self) -> Result<Vec<String>, ProfileError> {
        let mut profiles = Vec::new();
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(profiles),
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                profiles.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        profiles.sort();
        Ok(profiles)
    }

    /// Create a new empty profile directory.
    pub async fn create(&self, name: &str) -> Result<PathBuf, ProfileError> {
        let path = self.resolve(name)?;
        if tokio::fs::try_exists(&path).await? {
            return Err(ProfileError::AlreadyExists(name.to_string()));
        }
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::create_dir(&path).await?;
        Ok(path)
    }

    /// Inspect a profile directory: existence, recursive size, last modified.
    pub async fn info(&self, name: &str) -> Result<ProfileDirInfo, ProfileError> {
        let path = self.resolve(name)?;
        if !tokio::fs::try_exists(&path).await? {
            return Ok(ProfileDirInfo {
                name: name.to_string(),
                path,
                exists: false,
                size_bytes: None,
                last_modified: None,
            });
        }

        let last_modified = tokio::fs::metadata(&path)
            .await
            .ok()
            .and_then(|m| m.modified().ok())
            .map(|mtime| chrono::DateTime::<chrono::Utc>::from(mtime).to_rfc3339());

        // Recursive size walk is blocking fs work — keep it off the runtime.
        let walk_root = path.clone();
        let size_bytes = tokio::task::spawn_blocking(move || dir_size(&walk_root))
            .await
            .map_err(|e| std::io::Error::other(e.to_string()))??;

        Ok(ProfileDirInfo {
            name: name.to_string(),
            path,
            exists: true,
            size_bytes: Some(size_bytes),
            last_modified,
        })
    }

    /// Delete a profile and everything in it.
    pub async fn delete(&self, name: &str) -> Result<(), ProfileError> {
        let path = self.resolve(name)?;
        if !tokio::fs::try_exists(&path).await? {
            return Err(ProfileError::NotFound(name.to_string()));
        }
        tokio::fs::remove_dir_all(&path).await?;
        Ok(())
    }
}

/// Total size in bytes of all regular files under `path`.
fn dir_size(path: &Path) -> std::io::Result<u64> {
    let mut total = 0;
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        let meta = entry.metadata()?;
        if meta.is_dir() {
            total += dir_size(&entry.path())?;
        } else if meta.is_file() {
            total += meta.len();
        }
    }
    Ok(total)
}
