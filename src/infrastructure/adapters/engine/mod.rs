//! Engine Adapter - 模型推理 / 转写实现

mod fake_engine;
mod guarded_engine;
mod http_inference_client;

pub use fake_engine::{FakeInferenceEngine, FakeInferenceEngineConfig};
pub use guarded_engine::GuardedEngine;
pub use http_inference_client::{HttpInferenceClient, HttpInferenceClientConfig};
