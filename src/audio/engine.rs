//! Tone engine - handles cpal audio output
//!
//! The output stream is opened lazily on the first tone request and kept
//! alive for the rest of the session. Every request becomes a voice in the
//! shared `VoiceBank`; the stream callback mixes whatever is sounding.
//!
//! Audio is optional. If no device can be opened the engine logs the
//! reason once and quietly drops every later request.

use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample};
use thiserror::Error;

use super::traits::ToneSink;
use super::voices::{ToneVoice, VoiceBank};

/// Errors that can occur while opening the output stream
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("No output device found")]
    NoDevice,

    #[error("Failed to get default output config: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),

    #[error("Unsupported sample format: {0:?}")]
    UnsupportedFormat(cpal::SampleFormat),

    #[error("Failed to build stream: {0}")]
    Build(#[from] cpal::BuildStreamError),

    #[error("Failed to start stream: {0}")]
    Play(#[from] cpal::PlayStreamError),
}

/// Share of the Nyquist frequency a tone may be played at
const MAX_NYQUIST_RATIO: f32 = 0.95;

/// Write mixed voices to an interleaved device buffer of any sample format
fn write_tone_samples<T: Sample + FromSample<f32>>(
    data: &mut [T],
    channels: usize,
    voices: &VoiceBank,
    mono: &mut Vec<f32>,
    sample_rate: f32,
) {
    let num_frames = data.len() / channels;
    mono.resize(num_frames, 0.0);
    voices.mix_into(mono, sample_rate);

    // Same signal on every channel
    for (frame, &value) in data.chunks_mut(channels).zip(mono.iter()) {
        for ch in frame.iter_mut() {
            *ch = T::from_sample(value);
        }
    }
}

/// Build the output stream for one concrete sample type
fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    voices: VoiceBank,
    sample_rate: f32,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: cpal::SizedSample + FromSample<f32>,
{
    let channels = config.channels as usize;
    let mut mono = Vec::new();
    device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            write_tone_samples(data, channels, &voices, &mut mono, sample_rate);
        },
        |err| log::error!("Audio stream error: {}", err),
        None,
    )
}

/// Open the default output device and start a stream mixing `voices`
///
/// # Returns
/// The running stream and its sample rate
fn open_stream(voices: &VoiceBank) -> Result<(cpal::Stream, f32), AudioError> {
    let host = cpal::default_host();
    let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

    let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
    log::info!("Using output device: {}", device_name);

    let supported = device.default_output_config()?;
    log::info!("Audio config: {:?}", supported);

    let sample_rate = supported.sample_rate().0 as f32;
    let sample_format = supported.sample_format();
    let config: cpal::StreamConfig = supported.into();

    let stream = match sample_format {
        cpal::SampleFormat::F32 => {
            build_stream::<f32>(&device, &config, voices.clone_ref(), sample_rate)?
        }
        cpal::SampleFormat::I16 => {
            build_stream::<i16>(&device, &config, voices.clone_ref(), sample_rate)?
        }
        cpal::SampleFormat::U16 => {
            build_stream::<u16>(&device, &config, voices.clone_ref(), sample_rate)?
        }
        format => return Err(AudioError::UnsupportedFormat(format)),
    };

    stream.play()?;
    Ok((stream, sample_rate))
}

/// Fire-and-forget tone output
pub struct ToneEngine {
    /// Voices shared with the audio callback
    voices: VoiceBank,

    /// The audio output stream (kept alive to continue playback)
    stream: Option<cpal::Stream>,

    /// Set once opening the stream has failed; no further attempts
    unavailable: bool,

    /// Sample rate of the output device
    sample_rate: f32,

    /// Output gain (0.0 to 1.0)
    volume: f32,

    /// Status message
    pub status: String,
}

impl ToneEngine {
    /// Create a tone engine. No device is touched until the first tone.
    pub fn new(volume: f32) -> Self {
        Self {
            voices: VoiceBank::new(),
            stream: None,
            unavailable: false,
            sample_rate: 48000.0,
            volume: volume.clamp(0.0, 1.0),
            status: "Audio idle".to_string(),
        }
    }

    /// Number of tones currently sounding
    pub fn active_tones(&self) -> usize {
        self.voices.active()
    }

    /// Open the stream if it isn't open yet
    ///
    /// # Returns
    /// `true` if a stream is running
    fn ensure_stream(&mut self) -> bool {
        if self.stream.is_some() {
            return true;
        }
        if self.unavailable {
            return false;
        }

        log::info!("Starting tone engine...");
        match open_stream(&self.voices) {
            Ok((stream, sample_rate)) => {
                self.stream = Some(stream);
                self.sample_rate = sample_rate;
                self.status = format!("Audio: {:.0} Hz", sample_rate);
                log::info!("Audio started successfully");
                true
            }
            Err(e) => {
                self.unavailable = true;
                self.status = "Audio unavailable".to_string();
                log::warn!("Audio unavailable, tones disabled: {}", e);
                false
            }
        }
    }

    /// Frequency actually sent to the oscillator
    fn playback_frequency(&self, frequency: f64) -> f32 {
        let ceiling = self.sample_rate / 2.0 * MAX_NYQUIST_RATIO;
        (frequency as f32).min(ceiling)
    }
}

impl ToneSink for ToneEngine {
    fn play_tone(&mut self, frequency: f64, duration: Duration) {
        if !self.ensure_stream() {
            return;
        }

        let playback = self.playback_frequency(frequency);
        if (playback as f64) < frequency {
            log::debug!("Clamped tone {:.0} Hz to {:.0} Hz", frequency, playback);
        }

        let voice = ToneVoice::new(
            playback,
            duration.as_secs_f32(),
            self.volume,
            self.sample_rate,
        );
        if !self.voices.start(voice) {
            log::warn!("Voice bank unavailable, tone dropped");
        }
    }
}

impl Drop for ToneEngine {
    fn drop(&mut self) {
        if self.stream.take().is_some() {
            log::info!("Audio stopped");
        }
    }
}
