//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Voice Context: 参考音色（标签、格式、语速）
//! - Speech Context: 合成片段与拼接
//!
//! 以及共享的文本分块器

pub mod speech;
pub mod voice;

mod text_segmenter;

pub use text_segmenter::{segment, split_sentences, word_count, TextChunk, DEFAULT_MAX_WORDS_PER_CHUNK};
