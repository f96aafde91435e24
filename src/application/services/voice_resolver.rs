//! Voice Resolver - 参考音色解析
//!
//! 按标签在音色存储中定位参考音频，必要时转换为规范 WAV，
//! 并得到与之匹配的转写文本

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    generate_transcript_key, AudioConverterPort, CanonicalFormat, StoredAsset,
    TranscriberPort, TranscriptCachePort, VoiceStorePort,
};
use crate::application::scratch::RequestScratch;
use crate::domain::voice::{AudioFormat, VoiceLabel, VoiceReference};

/// 内置默认音色
///
/// 转写文本已知，解析时不调用转写引擎
#[derive(Debug, Clone)]
pub struct DefaultVoice {
    pub label: VoiceLabel,
    pub transcript: String,
}

/// 只解析了波形的参考音色
#[derive(Debug, Clone)]
pub struct ResolvedWaveform {
    /// 规范 WAV 路径（存储中的 WAV，或 scratch 中的转换结果）
    pub path: PathBuf,
    /// 存储中的原始文件
    pub source: StoredAsset,
    /// 是否为内置默认音色
    pub is_default: bool,
}

pub struct VoiceResolver {
    store: Arc<dyn VoiceStorePort>,
    converter: Arc<dyn AudioConverterPort>,
    transcriber: Arc<dyn TranscriberPort>,
    cache: Arc<dyn TranscriptCachePort>,
    default_voice: DefaultVoice,
    canonical: CanonicalFormat,
}

impl VoiceResolver {
    pub fn new(
        store: Arc<dyn VoiceStorePort>,
        converter: Arc<dyn AudioConverterPort>,
        transcriber: Arc<dyn TranscriberPort>,
        cache: Arc<dyn TranscriptCachePort>,
        default_voice: DefaultVoice,
        canonical: CanonicalFormat,
    ) -> Self {
        Self {
            store,
            converter,
            transcriber,
            cache,
            default_voice,
            canonical,
        }
    }

    pub fn default_voice(&self) -> &DefaultVoice {
        &self.default_voice
    }

    /// 解析参考音色（波形 + 转写文本）
    pub async fn resolve(
        &self,
        label: &VoiceLabel,
        scratch: &RequestScratch,
    ) -> Result<VoiceReference, ApplicationError> {
        let resolved = self.resolve_waveform(label, scratch).await?;

        let transcript = if resolved.is_default {
            tracing::debug!(label = %label, "Using known transcript of default voice");
            self.default_voice.transcript.clone()
        } else {
            self.transcript_for(&resolved).await?
        };

        Ok(VoiceReference::new(label.clone(), resolved.path, transcript))
    }

    /// 只解析波形
    ///
    /// 优先使用存储中的 WAV；否则取第一个受支持格式的文件转换到 scratch
    pub async fn resolve_waveform(
        &self,
        label: &VoiceLabel,
        scratch: &RequestScratch,
    ) -> Result<ResolvedWaveform, ApplicationError> {
        let candidates = self.store.find_by_prefix(label).await?;
        if candidates.is_empty() {
            return Err(ApplicationError::not_found("Voice", label.as_str()));
        }

        let default_path = self
            .store
            .asset_path(&self.default_voice.label, AudioFormat::Wav);

        if let Some(wav) = candidates
            .iter()
            .find(|a| a.format == Some(AudioFormat::Wav))
        {
            tracing::debug!(label = %label, file = %wav.file_name, "Resolved stored WAV");
            return Ok(ResolvedWaveform {
                path: wav.path.clone(),
                is_default: wav.path == default_path,
                source: wav.clone(),
            });
        }

        let source = candidates
            .iter()
            .find(|a| a.format.is_some())
            .ok_or_else(|| {
                ApplicationError::format(format!(
                    "No supported audio file for voice '{}' (found: {})",
                    label,
                    candidates
                        .iter()
                        .map(|a| a.file_name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })?;

        let output = scratch.file(&format!("ref_{}.wav", label));
        let info = self
            .converter
            .convert(&source.path, &output, self.canonical)
            .await?;

        tracing::info!(
            label = %label,
            source = %source.file_name,
            duration_ms = info.duration_ms,
            sample_rate = info.sample_rate,
            "Converted reference audio to WAV"
        );

        Ok(ResolvedWaveform {
            path: output,
            source: source.clone(),
            is_default: false,
        })
    }

    /// 转写参考音频，结果按 文件名 + 内容校验和 缓存
    async fn transcript_for(&self, resolved: &ResolvedWaveform) -> Result<String, ApplicationError> {
        let source_bytes = tokio::fs::read(&resolved.source.path).await?;
        let cache_key = generate_transcript_key(&resolved.source.file_name, &source_bytes);

        match self.cache.get(&cache_key).await {
            Ok(Some(transcript)) => {
                tracing::debug!(cache_key = %cache_key, "Transcript cache hit");
                return Ok(transcript);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(cache_key = %cache_key, error = %e, "Transcript cache read failed"),
        }

        let transcript = self
            .transcriber
            .transcribe(&resolved.path)
            .await
            .map_err(|e| {
                ApplicationError::ExternalServiceError(format!(
                    "Failed to transcribe reference '{}': {}",
                    resolved.source.file_name, e
                ))
            })?
            .trim()
            .to_string();

        if transcript.is_empty() {
            tracing::warn!(file = %resolved.source.file_name, "Reference transcript is empty");
            return Err(ApplicationError::validation(format!(
                "No speech detected in reference audio '{}'",
                resolved.source.file_name
            )));
        }

        if let Err(e) = self.cache.put(&cache_key, &transcript).await {
            tracing::warn!(cache_key = %cache_key, error = %e, "Transcript cache write failed");
        }

        Ok(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{AudioInfo, CacheError, CacheStats, ConvertError, MonoWaveform, TtsError};
    use crate::infrastructure::adapters::storage::FileVoiceStore;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tempfile::tempdir;

    const DEFAULT_TRANSCRIPT: &str = "Some call me nature, others call me mother nature.";

    /// 把输入文件原样复制到输出，记录调用次数
    #[derive(Default)]
    struct CopyConverter {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AudioConverterPort for CopyConverter {
        async fn convert(&self, input: &Path, output: &Path, target: CanonicalFormat) -> Result<AudioInfo, ConvertError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::fs::copy(input, output).map_err(|e| ConvertError::IoError(e.to_string()))?;
            Ok(AudioInfo { duration_ms: 1000, sample_rate: target.sample_rate, channels: target.channels })
        }

        fn probe(&self, _data: &[u8], _extension: Option<&str>) -> Result<AudioInfo, ConvertError> {
            unimplemented!()
        }

        fn decode_wav(&self, _data: &[u8]) -> Result<MonoWaveform, ConvertError> {
            unimplemented!()
        }

        fn encode_wav(&self, _samples: &[f32], _sample_rate: u32) -> Result<Vec<u8>, ConvertError> {
            unimplemented!()
        }
    }

    #[derive(Default)]
    struct CountingTranscriber {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TranscriberPort for CountingTranscriber {
        async fn transcribe(&self, audio: &Path) -> Result<String, TtsError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let name = audio.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            Ok(format!("  transcript of {}  ", name))
        }
    }

    /// 总是返回空白转写
    struct SilentTranscriber;

    #[async_trait]
    impl TranscriberPort for SilentTranscriber {
        async fn transcribe(&self, _audio: &Path) -> Result<String, TtsError> {
            Ok("   ".to_string())
        }
    }

    #[derive(Default)]
    struct MemoryCache {
        entries: Mutex<HashMap<String, String>>,
    }

    #[async_trait]
    impl TranscriptCachePort for MemoryCache {
        async fn get(&self, cache_key: &str) -> Result<Option<String>, CacheError> {
            Ok(self.entries.lock().unwrap().get(cache_key).cloned())
        }

        async fn put(&self, cache_key: &str, transcript: &str) -> Result<(), CacheError> {
            self.entries.lock().unwrap().insert(cache_key.to_string(), transcript.to_string());
            Ok(())
        }

        async fn stats(&self) -> CacheStats {
            CacheStats { total_entries: self.entries.lock().unwrap().len(), ..Default::default() }
        }
    }

    struct Fixture {
        resolver: VoiceResolver,
        converter: Arc<CopyConverter>,
        transcriber: Arc<CountingTranscriber>,
        voices: tempfile::TempDir,
        work: tempfile::TempDir,
    }

    fn fixture(files: &[&str]) -> Fixture {
        let voices = tempdir().unwrap();
        let work = tempdir().unwrap();
        for name in files {
            std::fs::write(voices.path().join(name), name.as_bytes()).unwrap();
        }

        let converter = Arc::new(CopyConverter::default());
        let transcriber = Arc::new(CountingTranscriber::default());
        let resolver = VoiceResolver::new(
            Arc::new(FileVoiceStore::new(voices.path())),
            converter.clone(),
            transcriber.clone(),
            Arc::new(MemoryCache::default()),
            DefaultVoice {
                label: VoiceLabel::new("default_en").unwrap(),
                transcript: DEFAULT_TRANSCRIPT.to_string(),
            },
            CanonicalFormat::default(),
        );

        Fixture { resolver, converter, transcriber, voices, work }
    }

    fn label(s: &str) -> VoiceLabel {
        VoiceLabel::new(s).unwrap()
    }

    #[tokio::test]
    async fn test_default_voice_uses_known_transcript() {
        let f = fixture(&["default_en.wav"]);
        let scratch = RequestScratch::create_in(f.work.path()).unwrap();

        let voice = f.resolver.resolve(&label("default_en"), &scratch).await.unwrap();

        assert_eq!(voice.transcript(), DEFAULT_TRANSCRIPT);
        assert_eq!(voice.waveform(), f.voices.path().join("default_en.wav"));
        assert_eq!(f.transcriber.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_label_is_not_found() {
        let f = fixture(&["default_en.wav"]);
        let scratch = RequestScratch::create_in(f.work.path()).unwrap();

        let err = f.resolver.resolve(&label("nobody"), &scratch).await.unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_wav_preferred_over_other_formats() {
        let f = fixture(&["alice.mp3", "alice.wav"]);
        let scratch = RequestScratch::create_in(f.work.path()).unwrap();

        let voice = f.resolver.resolve(&label("alice"), &scratch).await.unwrap();

        assert_eq!(voice.waveform(), f.voices.path().join("alice.wav"));
        assert_eq!(voice.transcript(), "transcript of alice.wav");
        assert_eq!(f.converter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_non_wav_converted_into_scratch() {
        let f = fixture(&["bob.flac"]);
        let scratch = RequestScratch::create_in(f.work.path()).unwrap();

        let voice = f.resolver.resolve(&label("bob"), &scratch).await.unwrap();

        assert!(voice.waveform().starts_with(scratch.path()));
        assert!(voice.waveform().exists());
        assert_eq!(f.converter.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_only_unsupported_files_is_format_error() {
        let f = fixture(&["carol.txt"]);
        let scratch = RequestScratch::create_in(f.work.path()).unwrap();

        let err = f.resolver.resolve(&label("carol"), &scratch).await.unwrap_err();
        assert!(matches!(err, ApplicationError::FormatError(_)));
    }

    #[tokio::test]
    async fn test_resolve_is_idempotent_and_cached() {
        let f = fixture(&["dave.ogg"]);

        let first = {
            let scratch = RequestScratch::create_in(f.work.path()).unwrap();
            f.resolver.resolve(&label("dave"), &scratch).await.unwrap()
        };
        let scratch = RequestScratch::create_in(f.work.path()).unwrap();
        let second = f.resolver.resolve(&label("dave"), &scratch).await.unwrap();

        assert_eq!(first.transcript(), second.transcript());
        assert_eq!(first.label(), second.label());
        assert_eq!(std::fs::read(second.waveform()).unwrap(), b"dave.ogg");
        // 第二次命中缓存
        assert_eq!(f.transcriber.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_resolve_waveform_skips_transcription() {
        let f = fixture(&["erin.wav"]);
        let scratch = RequestScratch::create_in(f.work.path()).unwrap();

        let resolved = f.resolver.resolve_waveform(&label("erin"), &scratch).await.unwrap();

        assert!(!resolved.is_default);
        assert_eq!(resolved.source.file_name, "erin.wav");
        assert_eq!(f.transcriber.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_transcript_is_rejected_and_not_cached() {
        let voices = tempdir().unwrap();
        let work = tempdir().unwrap();
        std::fs::write(voices.path().join("frank.wav"), b"frank.wav").unwrap();

        let cache = Arc::new(MemoryCache::default());
        let resolver = VoiceResolver::new(
            Arc::new(FileVoiceStore::new(voices.path())),
            Arc::new(CopyConverter::default()),
            Arc::new(SilentTranscriber),
            cache.clone(),
            DefaultVoice {
                label: VoiceLabel::new("default_en").unwrap(),
                transcript: DEFAULT_TRANSCRIPT.to_string(),
            },
            CanonicalFormat::default(),
        );
        let scratch = RequestScratch::create_in(work.path()).unwrap();

        let err = resolver.resolve(&label("frank"), &scratch).await.unwrap_err();

        assert!(matches!(err, ApplicationError::ValidationError(_)));
        assert_eq!(cache.stats().await.total_entries, 0);
    }
}
