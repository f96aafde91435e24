//! Sled 嵌入式 KV 存储

mod transcript_cache;

pub use transcript_cache::SledTranscriptCache;
