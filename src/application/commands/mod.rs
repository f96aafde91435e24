//! 应用层 - 命令（写操作 / 合成）
//!
//! CQRS 命令侧

mod speech_commands;
mod voice_commands;

pub mod handlers;

pub use speech_commands::*;
pub use voice_commands::*;
