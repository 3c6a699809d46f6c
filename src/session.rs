//! Session state - press capture and per-frame evaluation
//!
//! A session owns the two append-only sequences (press timestamps and the
//! intervals between them) for as long as the window is open. Presses
//! and frames both run on the UI thread, so the log is plain owned data.

use std::time::Duration;

use crate::audio::ToneSink;
use crate::render::{BarChart, Surface};
use crate::score::{self, ScoreMode};

/// Append-only record of presses
#[derive(Debug, Default, Clone)]
pub struct PressLog {
    /// Press times in ms since the session epoch, non-decreasing
    timestamps: Vec<u64>,
    /// `timestamps[i + 1] - timestamps[i]`
    intervals: Vec<u64>,
}

impl PressLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press at `now_ms`
    ///
    /// The interval is measured against the last recorded press. A time
    /// earlier than that press is treated as simultaneous with it.
    ///
    /// # Returns
    /// The interval closed by this press, or `None` for the first press
    pub fn record(&mut self, now_ms: u64) -> Option<u64> {
        let Some(&last) = self.timestamps.last() else {
            self.timestamps.push(now_ms);
            return None;
        };

        let now_ms = now_ms.max(last);
        let interval = now_ms - last;
        self.timestamps.push(now_ms);
        self.intervals.push(interval);
        Some(interval)
    }

    pub fn timestamps(&self) -> &[u64] {
        &self.timestamps
    }

    pub fn intervals(&self) -> &[u64] {
        &self.intervals
    }

    /// Number of recorded presses
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Press log plus the score published by the last frame
pub struct Session {
    log: PressLog,
    score: u64,
    mode: ScoreMode,
    tone_duration: Duration,
}

impl Session {
    pub fn new(mode: ScoreMode, tone_duration: Duration) -> Self {
        Self {
            log: PressLog::new(),
            score: 0,
            mode,
            tone_duration,
        }
    }

    pub fn log(&self) -> &PressLog {
        &self.log
    }

    /// Score as of the last rendered frame
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Handle one spacebar press (repeats included)
    ///
    /// Every press after the first closes an interval and sounds a tone
    /// derived from it.
    pub fn press<T: ToneSink>(&mut self, now_ms: u64, tones: &mut T) {
        match self.log.record(now_ms) {
            Some(interval) => {
                let frequency = score::frequency_for_interval(interval);
                log::debug!(
                    "Press #{} at {} ms, interval {} ms, tone {:.0} Hz",
                    self.log.len(),
                    now_ms,
                    interval,
                    frequency
                );
                tones.play_tone(frequency, self.tone_duration);
            }
            None => log::debug!("First press at {} ms", now_ms),
        }
    }

    /// Redraw the chart and recompute the score from scratch
    ///
    /// # Returns
    /// The newly published score
    pub fn render_frame<S: Surface>(&mut self, chart: &BarChart, surface: &mut S) -> u64 {
        chart.draw(surface, self.log.len(), self.log.intervals());
        self.refresh_score()
    }

    /// Recompute and publish the score without drawing
    pub fn refresh_score(&mut self) -> u64 {
        self.score = score::frame_score(self.log.intervals(), self.log.timestamps(), self.mode);
        self.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingSurface;

    /// Tone sink that remembers every request
    #[derive(Default)]
    struct RecordingSink {
        tones: Vec<(f64, Duration)>,
    }

    impl ToneSink for RecordingSink {
        fn play_tone(&mut self, frequency: f64, duration: Duration) {
            self.tones.push((frequency, duration));
        }
    }

    fn session() -> Session {
        Session::new(ScoreMode::PerFrame, Duration::from_millis(200))
    }

    #[test]
    fn test_intervals_from_timestamps() {
        let mut log = PressLog::new();
        assert_eq!(log.record(1000), None);
        assert_eq!(log.record(1500), Some(500));
        assert_eq!(log.record(2300), Some(800));
        assert_eq!(log.timestamps(), &[1000, 1500, 2300]);
        assert_eq!(log.intervals(), &[500, 800]);
    }

    #[test]
    fn test_interval_count_invariant() {
        let mut log = PressLog::new();
        assert_eq!(log.intervals().len(), 0);
        for (n, t) in [3u64, 3, 10, 250, 251, 900].into_iter().enumerate() {
            log.record(t);
            assert_eq!(log.len(), n + 1);
            assert_eq!(log.intervals().len(), log.len() - 1);
        }
    }

    #[test]
    fn test_interval_uses_latest_press() {
        let mut log = PressLog::new();
        log.record(100);
        log.record(150);
        // Compared against 150, not the first press
        assert_eq!(log.record(175), Some(25));
    }

    #[test]
    fn test_backwards_time_is_clamped() {
        let mut log = PressLog::new();
        log.record(500);
        assert_eq!(log.record(400), Some(0));
        assert_eq!(log.timestamps(), &[500, 500]);
    }

    #[test]
    fn test_tone_per_interval() {
        let mut session = session();
        let mut sink = RecordingSink::default();

        session.press(0, &mut sink);
        assert!(sink.tones.is_empty());

        session.press(0, &mut sink);
        session.press(3, &mut sink);
        assert_eq!(sink.tones.len(), 2);
        assert_eq!(sink.tones[0], (432.0, Duration::from_millis(200)));
        assert_eq!(sink.tones[1].0, 732.0);
    }

    #[test]
    fn test_render_frame_draws_and_scores() {
        let mut session = session();
        let mut sink = RecordingSink::default();
        let chart = BarChart::new();
        let mut surface = RecordingSurface::default();

        assert_eq!(session.render_frame(&chart, &mut surface), 0);
        assert!(surface.rects.is_empty());

        for t in [1000, 1500, 2000] {
            session.press(t, &mut sink);
        }
        assert_eq!(session.score(), 0); // not published until the next frame

        assert_eq!(session.render_frame(&chart, &mut surface), 1003);
        assert_eq!(session.score(), 1003);
        assert_eq!(surface.rects.len(), 3);
        assert_eq!(surface.rects[2].0.height, 500.0);
    }

    #[test]
    fn test_per_bar_mode_multiplies_score() {
        let mut session = Session::new(ScoreMode::PerBar, Duration::from_millis(200));
        let mut sink = RecordingSink::default();
        for t in [1000, 1500, 2000] {
            session.press(t, &mut sink);
        }
        // Three bars, two of them scored
        assert_eq!(session.refresh_score(), 2006);
    }

    #[test]
    fn test_frame_score_is_idempotent() {
        let mut session = session();
        let mut sink = RecordingSink::default();
        for t in [0, 120, 260] {
            session.press(t, &mut sink);
        }
        let first = session.refresh_score();
        assert_eq!(session.refresh_score(), first);
    }
}
