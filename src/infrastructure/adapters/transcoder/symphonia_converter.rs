//! Symphonia Converter - 基于 symphonia 的音频格式转换器
//!
//! 支持：
//! - WAV / MP3 / FLAC / OGG(Vorbis) 解码与探测
//! - 混音为单声道、线性重采样
//! - 16 位 PCM WAV 编码

use async_trait::async_trait;
use std::io::Cursor;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::{
    AudioConverterPort, AudioInfo, CanonicalFormat, ConvertError, MonoWaveform,
};

/// 音频格式转换器
///
/// 解码是 CPU 密集操作，`convert` 放到 blocking 线程池执行
#[derive(Debug, Clone, Default)]
pub struct SymphoniaConverter;

impl SymphoniaConverter {
    pub fn new() -> Self {
        Self
    }

    /// 使用 symphonia 解码任意受支持格式，得到交错的 f32 样本
    fn decode(&self, data: &[u8], extension: Option<&str>) -> Result<DecodedAudio, ConvertError> {
        let cursor = Cursor::new(data.to_vec());
        let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = extension {
            hint.with_extension(ext);
        }

        let format_opts = FormatOptions::default();
        let metadata_opts = MetadataOptions::default();

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &format_opts, &metadata_opts)
            .map_err(|e| ConvertError::UnsupportedFormat(format!("Probe failed: {}", e)))?;

        let mut format = probed.format;

        let track = format
            .default_track()
            .ok_or_else(|| ConvertError::DecodingError("No audio track found".to_string()))?;

        let sample_rate = track
            .codec_params
            .sample_rate
            .ok_or_else(|| ConvertError::DecodingError("Unknown sample rate".to_string()))?;

        let mut channels = track.codec_params.channels.map(|c| c.count() as u8);

        let decoder_opts = DecoderOptions::default();
        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &decoder_opts)
            .map_err(|e| ConvertError::DecodingError(format!("Decoder creation failed: {}", e)))?;

        let mut samples: Vec<f32> = Vec::new();
        let track_id = track.id;

        loop {
            let packet = match format.next_packet() {
                Ok(p) => p,
                Err(SymphoniaError::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(SymphoniaError::ResetRequired) => break,
                Err(e) => {
                    return Err(ConvertError::DecodingError(format!(
                        "Packet read error: {}",
                        e
                    )));
                }
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(d) => d,
                Err(SymphoniaError::DecodeError(e)) => {
                    tracing::warn!("Decode error (skipping packet): {}", e);
                    continue;
                }
                Err(e) => {
                    return Err(ConvertError::DecodingError(format!("Decode failed: {}", e)));
                }
            };

            let spec = *decoded.spec();
            // 部分格式（如 MP3）只有解码后才知道声道数
            channels.get_or_insert(spec.channels.count() as u8);
            let num_frames = decoded.frames();
            let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
            sample_buf.copy_interleaved_ref(decoded);
            let actual_samples = num_frames * spec.channels.count();
            samples.extend(&sample_buf.samples()[..actual_samples]);
        }

        let channels = channels
            .filter(|c| *c > 0)
            .ok_or_else(|| ConvertError::DecodingError("Unknown channel count".to_string()))?;

        if samples.is_empty() {
            return Err(ConvertError::InvalidInput("No audio samples decoded".to_string()));
        }

        Ok(DecodedAudio {
            samples,
            sample_rate,
            channels,
        })
    }

    /// 混音为单声道（各声道取平均）
    fn downmix_to_mono(&self, audio: DecodedAudio) -> DecodedAudio {
        if audio.channels <= 1 {
            return audio;
        }

        let channel_count = audio.channels as usize;
        let samples = audio
            .samples
            .chunks(channel_count)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect();

        DecodedAudio {
            samples,
            sample_rate: audio.sample_rate,
            channels: 1,
        }
    }

    /// 简单线性重采样
    fn resample(&self, samples: &[f32], from_rate: u32, to_rate: u32, channels: u8) -> Vec<f32> {
        if from_rate == to_rate {
            return samples.to_vec();
        }

        let ratio = to_rate as f64 / from_rate as f64;
        let channel_count = channels as usize;
        let frame_count = samples.len() / channel_count;
        let new_frame_count = (frame_count as f64 * ratio) as usize;
        let mut resampled = Vec::with_capacity(new_frame_count * channel_count);

        for i in 0..new_frame_count {
            let src_pos = i as f64 / ratio;
            let src_idx = src_pos as usize;
            let frac = src_pos - src_idx as f64;

            for ch in 0..channel_count {
                let idx0 = src_idx * channel_count + ch;
                let idx1 = ((src_idx + 1).min(frame_count - 1)) * channel_count + ch;

                let s0 = samples.get(idx0).copied().unwrap_or(0.0);
                let s1 = samples.get(idx1).copied().unwrap_or(s0);

                // 线性插值
                let value = s0 + (s1 - s0) * frac as f32;
                resampled.push(value);
            }
        }

        resampled
    }

    /// 转换为目标规范格式
    fn to_canonical(&self, audio: DecodedAudio, target: CanonicalFormat) -> DecodedAudio {
        let audio = if target.channels == 1 {
            self.downmix_to_mono(audio)
        } else {
            audio
        };

        let samples = self.resample(&audio.samples, audio.sample_rate, target.sample_rate, audio.channels);

        DecodedAudio {
            samples,
            sample_rate: target.sample_rate,
            channels: audio.channels,
        }
    }

    /// 将 PCM f32 样本编码为 16 位 WAV
    fn encode_pcm16(&self, samples: &[f32], sample_rate: u32, channels: u8) -> Vec<u8> {
        let bits_per_sample: u16 = 16;
        let num_channels = channels as u16;
        let byte_rate = sample_rate * num_channels as u32 * (bits_per_sample / 8) as u32;
        let block_align = num_channels * (bits_per_sample / 8);

        let data_size = samples.len() * 2;
        let file_size = 36 + data_size;

        let mut wav = Vec::with_capacity(44 + data_size);

        // RIFF header
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(file_size as u32).to_le_bytes());
        wav.extend_from_slice(b"WAVE");

        // fmt chunk
        wav.extend_from_slice(b"fmt ");
        wav.extend_from_slice(&16u32.to_le_bytes()); // chunk size
        wav.extend_from_slice(&1u16.to_le_bytes()); // PCM format
        wav.extend_from_slice(&num_channels.to_le_bytes());
        wav.extend_from_slice(&sample_rate.to_le_bytes());
        wav.extend_from_slice(&byte_rate.to_le_bytes());
        wav.extend_from_slice(&block_align.to_le_bytes());
        wav.extend_from_slice(&bits_per_sample.to_le_bytes());

        // data chunk
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&(data_size as u32).to_le_bytes());

        // f32 → i16，与解码端的 x/32768 对称
        for &s in samples {
            let value = (s * 32768.0).round().clamp(-32768.0, 32767.0) as i16;
            wav.extend_from_slice(&value.to_le_bytes());
        }

        wav
    }
}

#[derive(Debug)]
struct DecodedAudio {
    /// 交错样本
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u8,
}

impl DecodedAudio {
    fn info(&self) -> AudioInfo {
        let frames = self.samples.len() as u64 / self.channels.max(1) as u64;
        AudioInfo {
            duration_ms: if self.sample_rate > 0 {
                frames * 1000 / self.sample_rate as u64
            } else {
                0
            },
            sample_rate: self.sample_rate,
            channels: self.channels,
        }
    }
}

#[async_trait]
impl AudioConverterPort for SymphoniaConverter {
    async fn convert(
        &self,
        input: &Path,
        output: &Path,
        target: CanonicalFormat,
    ) -> Result<AudioInfo, ConvertError> {
        let data = tokio::fs::read(input)
            .await
            .map_err(|e| ConvertError::IoError(format!("{}: {}", input.display(), e)))?;
        let extension = input
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase());

        let converter = self.clone();
        let (wav, info) = tokio::task::spawn_blocking(move || {
            let decoded = converter.decode(&data, extension.as_deref())?;
            let canonical = converter.to_canonical(decoded, target);
            let wav = converter.encode_pcm16(&canonical.samples, canonical.sample_rate, canonical.channels);
            Ok::<_, ConvertError>((wav, canonical.info()))
        })
        .await
        .map_err(|e| ConvertError::DecodingError(format!("Conversion task failed: {}", e)))??;

        tokio::fs::write(output, &wav)
            .await
            .map_err(|e| ConvertError::IoError(format!("{}: {}", output.display(), e)))?;

        tracing::debug!(
            input = %input.display(),
            output = %output.display(),
            duration_ms = info.duration_ms,
            sample_rate = info.sample_rate,
            "Converted audio"
        );

        Ok(info)
    }

    fn probe(&self, data: &[u8], extension: Option<&str>) -> Result<AudioInfo, ConvertError> {
        Ok(self.decode(data, extension)?.info())
    }

    fn decode_wav(&self, data: &[u8]) -> Result<MonoWaveform, ConvertError> {
        let mono = self.downmix_to_mono(self.decode(data, Some("wav"))?);
        Ok(MonoWaveform {
            samples: mono.samples,
            sample_rate: mono.sample_rate,
        })
    }

    fn encode_wav(&self, samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, ConvertError> {
        if sample_rate == 0 {
            return Err(ConvertError::InvalidInput("Sample rate must be positive".to_string()));
        }
        Ok(self.encode_pcm16(samples, sample_rate, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn create_test_wav(sample_rate: u32, channels: u8, seconds: f32) -> Vec<u8> {
        let converter = SymphoniaConverter::new();
        let frames = (sample_rate as f32 * seconds) as usize;
        let samples: Vec<f32> = (0..frames * channels as usize)
            .map(|i| ((i / channels as usize) as f32 * 0.05).sin() * 0.5)
            .collect();
        converter.encode_pcm16(&samples, sample_rate, channels)
    }

    #[test]
    fn test_probe_wav() {
        let converter = SymphoniaConverter::new();
        let wav = create_test_wav(16000, 1, 1.0);

        let info = converter.probe(&wav, Some("wav")).unwrap();
        assert_eq!(info.sample_rate, 16000);
        assert_eq!(info.channels, 1);
        assert!(info.duration_ms >= 990 && info.duration_ms <= 1010); // ~1000ms
    }

    #[test]
    fn test_probe_rejects_garbage() {
        let converter = SymphoniaConverter::new();
        assert!(converter.probe(b"this is plain text, not audio", Some("wav")).is_err());
        assert!(converter.probe(&[], None).is_err());
    }

    #[test]
    fn test_encode_decode_wav() {
        let converter = SymphoniaConverter::new();
        let samples: Vec<f32> = (0..2205).map(|i| (i as f32 * 0.01).sin() * 0.8).collect();

        let wav = converter.encode_wav(&samples, 22050).unwrap();
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(wav.len(), 44 + samples.len() * 2);

        let decoded = converter.decode_wav(&wav).unwrap();
        assert_eq!(decoded.sample_rate, 22050);
        assert_eq!(decoded.samples.len(), samples.len());
        for (a, b) in decoded.samples.iter().zip(&samples) {
            assert!((a - b).abs() < 1e-3);
        }
    }

    #[test]
    fn test_pcm16_survives_decode_encode_unchanged() {
        let converter = SymphoniaConverter::new();
        let original: [i16; 8] = [1, 100, 1000, 16384, 32767, -1, -100, -32768];

        let mut wav = converter.encode_pcm16(&[0.0; 8], 22050, 1);
        for (i, v) in original.iter().enumerate() {
            let at = 44 + i * 2;
            wav[at..at + 2].copy_from_slice(&v.to_le_bytes());
        }

        let decoded = converter.decode_wav(&wav).unwrap();
        let out = converter.encode_wav(&decoded.samples, decoded.sample_rate).unwrap();

        assert_eq!(out, wav);
        let samples: Vec<i16> = out[44..]
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect();
        assert_eq!(samples, original);
    }

    #[test]
    fn test_encode_clamps_out_of_range() {
        let converter = SymphoniaConverter::new();
        let wav = converter.encode_wav(&[1.5, -1.5, 1.0], 8000).unwrap();
        let samples: Vec<i16> = wav[44..]
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect();
        assert_eq!(samples, vec![i16::MAX, i16::MIN, i16::MAX]);
    }

    #[test]
    fn test_downmix_stereo() {
        let converter = SymphoniaConverter::new();
        let stereo = DecodedAudio {
            samples: vec![0.2, 0.4, -1.0, 1.0],
            sample_rate: 8000,
            channels: 2,
        };

        let mono = converter.downmix_to_mono(stereo);
        assert_eq!(mono.channels, 1);
        assert_eq!(mono.samples.len(), 2);
        assert!((mono.samples[0] - 0.3).abs() < 1e-6);
        assert_eq!(mono.samples[1], 0.0);
    }

    #[test]
    fn test_resample_length() {
        let converter = SymphoniaConverter::new();
        let samples = vec![0.0f32; 44100];
        let resampled = converter.resample(&samples, 44100, 22050, 1);
        assert_eq!(resampled.len(), 22050);
    }

    #[tokio::test]
    async fn test_convert_to_canonical() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.wav");
        let output = dir.path().join("out.wav");
        std::fs::write(&input, create_test_wav(44100, 2, 0.5)).unwrap();

        let converter = SymphoniaConverter::new();
        let info = converter
            .convert(&input, &output, CanonicalFormat::default())
            .await
            .unwrap();

        assert_eq!(info.sample_rate, 22050);
        assert_eq!(info.channels, 1);
        assert!(info.duration_ms >= 490 && info.duration_ms <= 510);

        let probed = converter.probe(&std::fs::read(&output).unwrap(), Some("wav")).unwrap();
        assert_eq!(probed.sample_rate, 22050);
        assert_eq!(probed.channels, 1);
    }

    #[tokio::test]
    async fn test_convert_missing_input() {
        let dir = tempdir().unwrap();
        let converter = SymphoniaConverter::new();
        let err = converter
            .convert(&dir.path().join("nope.mp3"), &dir.path().join("out.wav"), CanonicalFormat::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::IoError(_)));
    }
}
