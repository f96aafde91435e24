//! Speech Context - 合成结果限界上下文
//!
//! 职责:
//! - 每个文本块对应的合成片段
//! - 多片段交叉淡化拼接

mod stitcher;
mod waveform;

pub use stitcher::{stitch, StitchError, DEFAULT_CROSSFADE_MS};
pub use waveform::{StitchedAudio, SynthesisSegment};
