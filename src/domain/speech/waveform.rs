//! Speech Context - Waveforms

/// 单个文本块的合成结果
///
/// 不变量: index 与对应 TextChunk 的 index 一致
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisSegment {
    pub index: usize,
    /// 单声道 PCM 样本，范围 [-1.0, 1.0]
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl SynthesisSegment {
    pub fn new(index: usize, samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            index,
            samples,
            sample_rate,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        samples_to_ms(self.samples.len(), self.sample_rate)
    }
}

/// 最终输出波形（请求结束即丢弃，不持久化）
#[derive(Debug, Clone, PartialEq)]
pub struct StitchedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl StitchedAudio {
    pub fn duration_ms(&self) -> u64 {
        samples_to_ms(self.samples.len(), self.sample_rate)
    }
}

impl From<SynthesisSegment> for StitchedAudio {
    fn from(segment: SynthesisSegment) -> Self {
        Self {
            samples: segment.samples,
            sample_rate: segment.sample_rate,
        }
    }
}

fn samples_to_ms(samples: usize, sample_rate: u32) -> u64 {
    if sample_rate == 0 {
        return 0;
    }
    (samples as u64 * 1000) / sample_rate as u64
}
