//! Transcoder Adapter - 音频解码 / 重采样 / WAV 编码

mod symphonia_converter;

pub use symphonia_converter::SymphoniaConverter;
