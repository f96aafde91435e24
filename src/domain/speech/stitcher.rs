//! 音频拼接器
//!
//! 将按顺序排列的合成片段拼接成一段连续波形，接缝处做线性交叉淡化

use thiserror::Error;

use super::{StitchedAudio, SynthesisSegment};

/// 默认交叉淡化时长（毫秒）
pub const DEFAULT_CROSSFADE_MS: u32 = 50;

#[derive(Debug, Error, PartialEq)]
pub enum StitchError {
    #[error("No segments to stitch")]
    EmptyInput,

    #[error("Sample rate mismatch at segment {index}: expected {expected} Hz, got {actual} Hz")]
    SampleRateMismatch {
        index: usize,
        expected: u32,
        actual: u32,
    },
}

/// 拼接片段
///
/// - 0 个片段：`EmptyInput`
/// - 1 个片段：原样返回，不做任何处理
/// - 多个片段：相邻片段重叠 `crossfade_ms`，前者线性淡出、后者线性淡入。
///   片段短于淡化窗口时，重叠长度取较短一侧
pub fn stitch(
    segments: Vec<SynthesisSegment>,
    crossfade_ms: u32,
) -> Result<StitchedAudio, StitchError> {
    let sample_rate = segments
        .first()
        .map(|s| s.sample_rate)
        .ok_or(StitchError::EmptyInput)?;

    if let Some(bad) = segments.iter().find(|s| s.sample_rate != sample_rate) {
        return Err(StitchError::SampleRateMismatch {
            index: bad.index,
            expected: sample_rate,
            actual: bad.sample_rate,
        });
    }

    let mut iter = segments.into_iter();
    let mut combined = match iter.next() {
        Some(first) => first.samples,
        None => return Err(StitchError::EmptyInput),
    };

    let window = (sample_rate as u64 * crossfade_ms as u64 / 1000) as usize;

    for segment in iter {
        append_with_crossfade(&mut combined, &segment.samples, window);
    }

    Ok(StitchedAudio {
        samples: combined,
        sample_rate,
    })
}

fn append_with_crossfade(combined: &mut Vec<f32>, next: &[f32], window: usize) {
    let overlap = window.min(combined.len()).min(next.len());
    let start = combined.len() - overlap;

    for i in 0..overlap {
        let t = i as f32 / overlap as f32;
        let tail = combined[start + i];
        combined[start + i] = tail * (1.0 - t) + next[i] * t;
    }

    combined.extend_from_slice(&next[overlap..]);
}
