//! Tone voices shared between the UI thread and the audio thread
//!
//! The UI thread starts voices with `VoiceBank::start()`, the audio
//! callback mixes them with `VoiceBank::mix_into()`. Finished voices are
//! dropped by the audio thread.
//!
//! ## Design Notes
//!
//! A plain `Arc<Mutex<T>>` is enough here. The audio thread only ever
//! calls `try_lock()`, so a busy UI thread costs one block of silence
//! rather than a stalled callback.

use std::f32::consts::TAU;
use std::sync::{Arc, Mutex};

/// Length of the linear fade at each end of a tone, in seconds
const FADE_SECONDS: f32 = 0.005;

/// A single fixed-length sine tone
#[derive(Clone, Debug)]
pub struct ToneVoice {
    /// Oscillator frequency in Hz
    frequency: f32,
    /// Output gain (0.0 to 1.0)
    gain: f32,
    /// Total length in samples
    length: usize,
    /// Samples rendered so far
    position: usize,
    /// Fade length in samples
    fade: usize,
}

impl ToneVoice {
    /// Create a voice
    ///
    /// # Arguments
    /// * `frequency` - Tone frequency in Hz
    /// * `seconds` - How long the tone lasts
    /// * `gain` - Output gain
    /// * `sample_rate` - Device sample rate
    pub fn new(frequency: f32, seconds: f32, gain: f32, sample_rate: f32) -> Self {
        let length = (seconds.max(0.0) * sample_rate) as usize;
        let fade = ((FADE_SECONDS * sample_rate) as usize).min(length / 2);
        Self {
            frequency,
            gain,
            length,
            position: 0,
            fade,
        }
    }

    /// Whether the voice has played its whole length
    pub fn is_finished(&self) -> bool {
        self.position >= self.length
    }

    /// Envelope at the current position
    fn envelope(&self) -> f32 {
        if self.fade == 0 {
            return 1.0;
        }
        let from_start = self.position;
        let to_end = self.length - self.position;
        let edge = from_start.min(to_end).min(self.fade);
        edge as f32 / self.fade as f32
    }

    /// Render the next sample, or `None` once the voice is done
    pub fn next_sample(&mut self, sample_rate: f32) -> Option<f32> {
        if self.is_finished() {
            return None;
        }
        let t = self.position as f32 / sample_rate;
        let value = (TAU * self.frequency * t).sin() * self.gain * self.envelope();
        self.position += 1;
        Some(value)
    }
}

/// Thread-safe collection of sounding voices
pub struct VoiceBank {
    inner: Arc<Mutex<Vec<ToneVoice>>>,
}

impl VoiceBank {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Start a voice. Called from the UI thread.
    ///
    /// # Returns
    /// `false` if the bank lock was poisoned and the voice was dropped
    pub fn start(&self, voice: ToneVoice) -> bool {
        match self.inner.lock() {
            Ok(mut voices) => {
                voices.push(voice);
                true
            }
            Err(_) => false,
        }
    }

    /// Number of voices still sounding
    pub fn active(&self) -> usize {
        self.inner.lock().map(|v| v.len()).unwrap_or(0)
    }

    /// Mix all voices into `out` (mono), replacing its contents.
    /// Called from the audio thread.
    ///
    /// Outputs silence if the lock is held elsewhere.
    pub fn mix_into(&self, out: &mut [f32], sample_rate: f32) {
        out.iter_mut().for_each(|s| *s = 0.0);

        let Ok(mut voices) = self.inner.try_lock() else {
            return;
        };

        for voice in voices.iter_mut() {
            for slot in out.iter_mut() {
                match voice.next_sample(sample_rate) {
                    Some(v) => *slot += v,
                    None => break,
                }
            }
        }

        voices.retain(|v| !v.is_finished());

        for slot in out.iter_mut() {
            *slot = slot.clamp(-1.0, 1.0);
        }
    }

    /// Share the bank with the audio thread
    pub fn clone_ref(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Default for VoiceBank {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for VoiceBank {
    fn clone(&self) -> Self {
        self.clone_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_length() {
        let mut voice = ToneVoice::new(440.0, 0.2, 1.0, 1000.0);
        let mut count = 0;
        while voice.next_sample(1000.0).is_some() {
            count += 1;
        }
        assert_eq!(count, 200);
        assert!(voice.is_finished());
    }

    #[test]
    fn test_voice_fades_from_silence() {
        let mut voice = ToneVoice::new(440.0, 0.2, 1.0, 48_000.0);
        let first = voice.next_sample(48_000.0).unwrap();
        assert_eq!(first, 0.0);
    }

    #[test]
    fn test_bank_drops_finished_voices() {
        let bank = VoiceBank::new();
        bank.start(ToneVoice::new(100.0, 0.01, 0.5, 1000.0)); // 10 samples
        bank.start(ToneVoice::new(200.0, 0.02, 0.5, 1000.0)); // 20 samples
        assert_eq!(bank.active(), 2);

        let mut out = [0.0f32; 16];
        bank.mix_into(&mut out, 1000.0);
        assert_eq!(bank.active(), 1);

        bank.mix_into(&mut out, 1000.0);
        assert_eq!(bank.active(), 0);
    }

    #[test]
    fn test_overlapping_voices_are_clamped() {
        let bank = VoiceBank::new();
        for _ in 0..8 {
            bank.start(ToneVoice::new(50.0, 1.0, 1.0, 1000.0));
        }
        let mut out = [0.0f32; 256];
        bank.mix_into(&mut out, 1000.0);
        assert!(out.iter().all(|s| (-1.0..=1.0).contains(s)));
        assert!(out.iter().any(|s| *s == 1.0));
    }

    #[test]
    fn test_shared_bank() {
        let bank = VoiceBank::new();
        let audio_side = bank.clone_ref();
        bank.start(ToneVoice::new(100.0, 0.1, 0.5, 1000.0));
        assert_eq!(audio_side.active(), 1);
    }
}
