//! Voice Command Handlers

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::commands::UploadVoice;
use crate::application::error::ApplicationError;
use crate::application::ports::{AudioConverterPort, CanonicalFormat, VoiceStorePort};
use crate::application::scratch::RequestScratch;
use crate::domain::voice::{AudioFormat, VoiceLabel, SUPPORTED_EXTENSIONS};

/// 上传音色响应
#[derive(Debug, Clone)]
pub struct UploadVoiceResponse {
    pub label: String,
    pub stored_files: Vec<String>,
    pub duration_ms: u64,
}

/// UploadVoice Handler 配置
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    /// 上传文件最大大小（字节）
    pub max_upload_size: u64,
    /// 保留标签（内置默认音色），不允许覆盖
    pub reserved_label: VoiceLabel,
    pub canonical: CanonicalFormat,
}

/// UploadVoice Handler
pub struct UploadVoiceHandler {
    store: Arc<dyn VoiceStorePort>,
    converter: Arc<dyn AudioConverterPort>,
    policy: UploadPolicy,
    work_dir: PathBuf,
}

impl UploadVoiceHandler {
    pub fn new(
        store: Arc<dyn VoiceStorePort>,
        converter: Arc<dyn AudioConverterPort>,
        policy: UploadPolicy,
        work_dir: PathBuf,
    ) -> Self {
        Self {
            store,
            converter,
            policy,
            work_dir,
        }
    }

    /// 校验并保存参考音频
    ///
    /// 所有校验（含规范 WAV 转换）在写入存储之前完成，失败时不写任何文件
    pub async fn handle(&self, command: UploadVoice) -> Result<UploadVoiceResponse, ApplicationError> {
        let label = VoiceLabel::new(command.label)?;
        if label == self.policy.reserved_label {
            return Err(ApplicationError::validation(format!(
                "Label '{}' is reserved for the built-in voice",
                label
            )));
        }

        let format = AudioFormat::from_file_name(&command.file_name).ok_or_else(|| {
            ApplicationError::validation(format!(
                "Invalid file type. Allowed types are: {}",
                SUPPORTED_EXTENSIONS.join(", ")
            ))
        })?;

        if command.audio_data.is_empty() {
            return Err(ApplicationError::validation("Audio file is empty"));
        }
        if command.audio_data.len() as u64 > self.policy.max_upload_size {
            return Err(ApplicationError::validation(format!(
                "File size is over limit. Max size is {} bytes.",
                self.policy.max_upload_size
            )));
        }

        self.converter
            .probe(&command.audio_data, Some(format.extension()))
            .map_err(|e| ApplicationError::validation(format!("Invalid file content: {}", e)))?;

        let scratch = RequestScratch::create_in(&self.work_dir)?;
        let upload_path = scratch.file(&format!("upload.{}", format.extension()));
        tokio::fs::write(&upload_path, &command.audio_data).await?;

        let canonical_path = scratch.file("canonical.wav");
        let info = self
            .converter
            .convert(&upload_path, &canonical_path, self.policy.canonical)
            .await
            .map_err(|e| ApplicationError::validation(format!("Invalid file content: {}", e)))?;
        let canonical_data = tokio::fs::read(&canonical_path).await?;

        let mut stored_files = Vec::new();
        if format != AudioFormat::Wav {
            let path = self.store.save(&label, format, &command.audio_data).await?;
            stored_files.push(file_name_of(&path));
        }
        let path = self.store.save(&label, AudioFormat::Wav, &canonical_data).await?;
        stored_files.push(file_name_of(&path));

        tracing::info!(
            label = %label,
            file = %command.file_name,
            duration_ms = info.duration_ms,
            stored = ?stored_files,
            "Voice uploaded"
        );

        Ok(UploadVoiceResponse {
            label: label.to_string(),
            stored_files,
            duration_ms: info.duration_ms,
        })
    }
}

fn file_name_of(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::storage::FileVoiceStore;
    use crate::infrastructure::adapters::transcoder::SymphoniaConverter;
    use tempfile::tempdir;

    fn sine_wav(sample_rate: u32, seconds: f32) -> Vec<u8> {
        let converter = SymphoniaConverter::new();
        let samples: Vec<f32> = (0..(sample_rate as f32 * seconds) as usize)
            .map(|i| (i as f32 * 440.0 * 2.0 * std::f32::consts::PI / sample_rate as f32).sin() * 0.5)
            .collect();
        converter.encode_wav(&samples, sample_rate).unwrap()
    }

    struct Fixture {
        handler: UploadVoiceHandler,
        voices: tempfile::TempDir,
        _work: tempfile::TempDir,
    }

    fn fixture(max_upload_size: u64) -> Fixture {
        let voices = tempdir().unwrap();
        let work = tempdir().unwrap();
        let handler = UploadVoiceHandler::new(
            Arc::new(FileVoiceStore::new(voices.path())),
            Arc::new(SymphoniaConverter::new()),
            UploadPolicy {
                max_upload_size,
                reserved_label: VoiceLabel::new("default_en").unwrap(),
                canonical: CanonicalFormat::default(),
            },
            work.path().to_path_buf(),
        );
        Fixture {
            handler,
            voices,
            _work: work,
        }
    }

    fn stored_files(dir: &std::path::Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_upload_wav_stores_canonical_wav() {
        let f = fixture(5 * 1024 * 1024);

        let response = f
            .handler
            .handle(UploadVoice {
                label: "alice".to_string(),
                file_name: "alice-source.wav".to_string(),
                audio_data: sine_wav(44100, 0.5),
            })
            .await
            .unwrap();

        assert_eq!(response.label, "alice");
        assert_eq!(response.stored_files, vec!["alice.wav"]);
        assert_eq!(stored_files(f.voices.path()), vec!["alice.wav"]);

        let stored = std::fs::read(f.voices.path().join("alice.wav")).unwrap();
        let decoded = SymphoniaConverter::new().decode_wav(&stored).unwrap();
        assert_eq!(decoded.sample_rate, 22050);
    }

    #[tokio::test]
    async fn test_non_audio_rejected_without_writing() {
        let f = fixture(5 * 1024 * 1024);

        let err = f
            .handler
            .handle(UploadVoice {
                label: "x".to_string(),
                file_name: "x.wav".to_string(),
                audio_data: b"definitely not a wave file".to_vec(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::ValidationError(_)));
        assert!(stored_files(f.voices.path()).is_empty());
    }

    #[tokio::test]
    async fn test_disallowed_extension_rejected() {
        let f = fixture(5 * 1024 * 1024);

        let err = f
            .handler
            .handle(UploadVoice {
                label: "x".to_string(),
                file_name: "x.txt".to_string(),
                audio_data: sine_wav(22050, 0.1),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::ValidationError(ref m) if m.contains("Invalid file type")));
        assert!(stored_files(f.voices.path()).is_empty());
    }

    #[tokio::test]
    async fn test_oversized_upload_rejected() {
        let f = fixture(1024);

        let err = f
            .handler
            .handle(UploadVoice {
                label: "big".to_string(),
                file_name: "big.wav".to_string(),
                audio_data: sine_wav(22050, 1.0),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::ValidationError(ref m) if m.contains("over limit")));
        assert!(stored_files(f.voices.path()).is_empty());
    }

    #[tokio::test]
    async fn test_reserved_and_invalid_labels_rejected() {
        let f = fixture(5 * 1024 * 1024);

        for label in ["default_en", "../escape", ""] {
            let err = f
                .handler
                .handle(UploadVoice {
                    label: label.to_string(),
                    file_name: "v.wav".to_string(),
                    audio_data: sine_wav(22050, 0.1),
                })
                .await
                .unwrap_err();
            assert!(matches!(err, ApplicationError::ValidationError(_)), "label {:?}", label);
        }
        assert!(stored_files(f.voices.path()).is_empty());
    }
}
