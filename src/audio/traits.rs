//! Tone output trait
//!
//! The capture path only needs "play this pitch for this long". Keeping
//! that behind a trait lets the session run against a recording sink in
//! tests and against the cpal engine in the app.

use std::time::Duration;

/// Something that can sound a tone without blocking the caller
pub trait ToneSink {
    /// Start a sine tone
    ///
    /// # Arguments
    /// * `frequency` - Tone frequency in Hz
    /// * `duration` - How long the tone sounds before stopping on its own
    ///
    /// Failures are handled inside the sink. The caller never waits for
    /// the tone to finish.
    fn play_tone(&mut self, frequency: f64, duration: Duration);
}
