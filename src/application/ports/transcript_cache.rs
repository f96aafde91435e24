//! Transcript Cache Port - 参考音频转写缓存
//!
//! 避免每次请求都对同一参考音频重复转写，具体实现使用 Sled

use async_trait::async_trait;
use thiserror::Error;

/// Transcript Cache 错误
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// 缓存统计信息
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub total_entries: usize,
    pub hit_count: u64,
    pub miss_count: u64,
}

/// Transcript Cache Port
///
/// 缓存 key 由标签 + 源文件内容校验和组成，
/// 重新上传同名音色后内容变化，旧条目自然失效
#[async_trait]
pub trait TranscriptCachePort: Send + Sync {
    async fn get(&self, cache_key: &str) -> Result<Option<String>, CacheError>;

    async fn put(&self, cache_key: &str, transcript: &str) -> Result<(), CacheError>;

    async fn stats(&self) -> CacheStats;
}

/// 生成缓存 key
///
/// 使用 label + md5(源文件内容)
pub fn generate_transcript_key(label: &str, source: &[u8]) -> String {
    let digest = md5::compute(source);
    format!("{}:{:x}", label, digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_depends_on_content() {
        let a = generate_transcript_key("alice", b"one");
        let b = generate_transcript_key("alice", b"two");
        assert_ne!(a, b);
        assert!(a.starts_with("alice:"));
        assert_eq!(a, generate_transcript_key("alice", b"one"));
    }
}
