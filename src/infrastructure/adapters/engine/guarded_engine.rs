//! Guarded Engine - 串行化的引擎句柄
//!
//! 模型推理与转写共享一把 tokio Mutex，进程内同一时刻只有一个调用在执行

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::ports::{
    InferRequest, InferResponse, InferenceEnginePort, TranscriberPort, TtsError,
};

/// 引擎句柄，显式传给编排器与音色解析器
pub struct GuardedEngine {
    inference: Arc<dyn InferenceEnginePort>,
    transcriber: Arc<dyn TranscriberPort>,
    lock: Mutex<()>,
}

impl GuardedEngine {
    pub fn new<E>(engine: E) -> Self
    where
        E: InferenceEnginePort + TranscriberPort + 'static,
    {
        let engine = Arc::new(engine);
        Self {
            inference: engine.clone(),
            transcriber: engine,
            lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl InferenceEnginePort for GuardedEngine {
    async fn infer(&self, request: InferRequest) -> Result<InferResponse, TtsError> {
        let _guard = self.lock.lock().await;
        self.inference.infer(request).await
    }

    fn name(&self) -> &str {
        self.inference.name()
    }

    async fn health_check(&self) -> bool {
        self.inference.health_check().await
    }
}

#[async_trait]
impl TranscriberPort for GuardedEngine {
    async fn transcribe(&self, audio: &Path) -> Result<String, TtsError> {
        let _guard = self.lock.lock().await;
        self.transcriber.transcribe(audio).await
    }
}
