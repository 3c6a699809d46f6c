//! Audio module - tone output
//!
//! This module provides:
//! - `ToneSink` trait for non-blocking tone requests
//! - Voice bank shared with the audio thread
//! - Tone engine for cpal integration

mod engine;
mod traits;
mod voices;

// Re-export public types
pub use engine::ToneEngine;
pub use traits::ToneSink;
