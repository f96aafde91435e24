//! Sled-based Transcript Cache Implementation

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sled::Db;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::application::ports::{CacheError, CacheStats, TranscriptCachePort};

const KEY_PREFIX: &str = "transcript:";

/// 内部缓存条目
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TranscriptEntry {
    transcript: String,
    created_at: i64,
}

/// Sled 转写缓存
pub struct SledTranscriptCache {
    db: Db,
    hit_count: AtomicU64,
    miss_count: AtomicU64,
}

impl SledTranscriptCache {
    /// 打开（或创建）缓存数据库
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CacheError> {
        let db = sled::open(path.as_ref()).map_err(|e| CacheError::DatabaseError(e.to_string()))?;

        tracing::info!(
            db_path = %path.as_ref().display(),
            entries = db.scan_prefix(KEY_PREFIX).count(),
            "SledTranscriptCache initialized"
        );

        Ok(Self {
            db,
            hit_count: AtomicU64::new(0),
            miss_count: AtomicU64::new(0),
        })
    }

    /// 刷新数据库
    pub fn flush(&self) -> Result<(), CacheError> {
        self.db
            .flush()
            .map_err(|e| CacheError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl TranscriptCachePort for SledTranscriptCache {
    async fn get(&self, cache_key: &str) -> Result<Option<String>, CacheError> {
        let key = format!("{}{}", KEY_PREFIX, cache_key);

        match self.db.get(&key) {
            Ok(Some(data)) => {
                let entry: TranscriptEntry = bincode::deserialize(&data)
                    .map_err(|e| CacheError::SerializationError(e.to_string()))?;
                self.hit_count.fetch_add(1, Ordering::Relaxed);
                Ok(Some(entry.transcript))
            }
            Ok(None) => {
                self.miss_count.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
            Err(e) => Err(CacheError::DatabaseError(e.to_string())),
        }
    }

    async fn put(&self, cache_key: &str, transcript: &str) -> Result<(), CacheError> {
        let entry = TranscriptEntry {
            transcript: transcript.to_string(),
            created_at: Utc::now().timestamp(),
        };
        let entry_bytes =
            bincode::serialize(&entry).map_err(|e| CacheError::SerializationError(e.to_string()))?;

        self.db
            .insert(format!("{}{}", KEY_PREFIX, cache_key), entry_bytes)
            .map_err(|e| CacheError::DatabaseError(e.to_string()))?;

        tracing::debug!(cache_key = %cache_key, "Transcript cached");
        Ok(())
    }

    async fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.db.scan_prefix(KEY_PREFIX).count(),
            hit_count: self.hit_count.load(Ordering::Relaxed),
            miss_count: self.miss_count.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_cache_put_get() {
        let dir = tempdir().unwrap();
        let cache = SledTranscriptCache::open(dir.path().join("test.sled")).unwrap();

        assert_eq!(cache.get("alice.wav:abc").await.unwrap(), None);

        cache.put("alice.wav:abc", "Hello there.").await.unwrap();
        let result = cache.get("alice.wav:abc").await.unwrap();
        assert_eq!(result.as_deref(), Some("Hello there."));

        let stats = cache.stats().await;
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.hit_count, 1);
        assert_eq!(stats.miss_count, 1);
    }

    #[tokio::test]
    async fn test_cache_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.sled");

        {
            let cache = SledTranscriptCache::open(&path).unwrap();
            cache.put("k", "persisted").await.unwrap();
            cache.flush().unwrap();
        }

        let cache = SledTranscriptCache::open(&path).unwrap();
        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("persisted"));
    }
}
