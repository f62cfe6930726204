pub mod haptics;
pub mod microphone;
pub mod runtime;
