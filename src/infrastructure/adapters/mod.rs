//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod engine;
pub mod storage;
pub mod transcoder;

pub use engine::*;
pub use storage::*;
pub use transcoder::*;
