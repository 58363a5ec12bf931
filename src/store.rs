// src/store.rs
//! The persisted post collection: one pretty-printed JSON array on disk.
//!
//! The sync orchestrator is the only writer. Writes go to `<file>.tmp` first
//! and are renamed into place, so readers never observe a half-written file.
//! Nothing here locks across processes: run at most one syncing process per
//! store file.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::{Result, SyncError};
use crate::model::NormalizedPost;

pub const DEFAULT_STORE_PATH: &str = "data/medium-posts.json";

#[derive(Debug, Clone)]
pub struct PostStore {
    path: PathBuf,
}

impl PostStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "medium-posts.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// `Ok(None)` when the file does not exist yet.
    pub async fn try_load(&self) -> Result<Option<Vec<NormalizedPost>>> {
        let bytes = match fs::read(&self.path).await {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(SyncError::StoreRead {
                    path: self.path.clone(),
                    message: e.to_string(),
                })
            }
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| SyncError::StoreRead {
                path: self.path.clone(),
                message: e.to_string(),
            })
    }

    /// Never fails: absent or broken files read as an empty collection.
    pub async fn load(&self) -> Vec<NormalizedPost> {
        match self.try_load().await {
            Ok(Some(posts)) => posts,
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(target: "store", error = %e, "ignoring unreadable store");
                Vec::new()
            }
        }
    }

    pub async fn save(&self, posts: &[NormalizedPost]) -> Result<()> {
        self.write_atomic(posts).await.map_err(|source| SyncError::StoreWrite {
            path: self.path.clone(),
            source,
        })?;
        tracing::info!(target: "store", path = %self.path.display(), count = posts.len(), "saved posts");
        Ok(())
    }

    async fn write_atomic(&self, posts: &[NormalizedPost]) -> io::Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            if fs::metadata(dir).await.is_err() {
                fs::create_dir_all(dir).await?;
                tracing::info!(target: "store", dir = %dir.display(), "created data directory");
            }
        }
        let json = serde_json::to_vec_pretty(posts)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let tmp = self.tmp_path();
        fs::write(&tmp, &json).await?;
        if let Err(e) = fs::rename(&tmp, &self.path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, PostSource};
    use chrono::{NaiveDate, Utc};

    fn post(url: &str) -> NormalizedPost {
        NormalizedPost {
            id: url.into(),
            title: "T".into(),
            excerpt: String::new(),
            content: String::new(),
            date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            category: Category::Life,
            read_time: 1,
            tags: vec![],
            slug: "t".into(),
            featured: false,
            color: "orange".into(),
            medium_url: url.into(),
            source: PostSource::Medium,
            last_sync: Utc::now(),
        }
    }

    #[tokio::test]
    async fn absent_file_is_empty_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = PostStore::new(dir.path().join("nope.json"));
        assert!(store.try_load().await.unwrap().is_none());
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn invalid_json_is_read_error_but_load_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("posts.json");
        std::fs::write(&p, "{not json").unwrap();
        let store = PostStore::new(&p);
        assert!(matches!(
            store.try_load().await,
            Err(SyncError::StoreRead { .. })
        ));
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn save_creates_dirs_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("data").join("posts.json");
        let store = PostStore::new(&p);
        store.save(&[post("a"), post("b")]).await.unwrap();

        let text = std::fs::read_to_string(&p).unwrap();
        assert!(text.starts_with("[\n"), "pretty-printed array expected");
        assert!(!dir.path().join("data").join("posts.json.tmp").exists());
        let back = store.load().await;
        assert_eq!(back.len(), 2);
        assert_eq!(back[1].medium_url, "b");
    }

    #[tokio::test]
    async fn write_into_a_file_path_fails_loudly() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let store = PostStore::new(blocker.join("posts.json"));
        let err = store.save(&[post("a")]).await.unwrap_err();
        assert!(matches!(err, SyncError::StoreWrite { .. }));
    }
}
