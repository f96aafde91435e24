//! Persistence Layer - 数据持久化
//!
//! Sled 转写缓存

pub mod sled;

pub use self::sled::SledTranscriptCache;
