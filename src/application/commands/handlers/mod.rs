//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod speech_handlers;
mod voice_handlers;

pub use speech_handlers::*;
pub use voice_handlers::*;
