//! Rhythm scoring
//!
//! The score is never accumulated incrementally. Every frame it is
//! recomputed from the full interval and timestamp sequences, which keeps
//! it a pure function of the session:
//!
//! - steadiness of the last two intervals (0..=1)
//! - one point per recorded interval
//! - the raw sum of all intervals in milliseconds
//! - +20 for each gap whose derived tone lands on a reference note

use serde::{Deserialize, Serialize};

/// Reference pitches (Hz) that earn the note bonus
pub const MUSICAL_NOTES: [f64; 7] = [261.63, 293.66, 329.63, 349.23, 392.00, 432.00, 493.88];

/// Base pitch every tone is offset from
pub const BASE_FREQUENCY: f64 = 432.0;

/// Hz added per millisecond of interval
pub const FREQUENCY_SCALE: f64 = 100.0;

/// Maximum distance (exclusive) from a reference note to count as a hit
pub const NOTE_TOLERANCE: f64 = 10.0;

/// Bonus points per note hit
pub const NOTE_BONUS: f64 = 20.0;

/// How many times the score is evaluated per rendered frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreMode {
    /// One evaluation per frame
    #[default]
    PerFrame,
    /// One evaluation summed per non-first bar, so the total is
    /// multiplied by `presses - 1`
    PerBar,
}

impl ScoreMode {
    pub fn name(&self) -> &'static str {
        match self {
            ScoreMode::PerFrame => "per frame",
            ScoreMode::PerBar => "per bar",
        }
    }
}

/// Tone frequency for a press interval in milliseconds
pub fn frequency_for_interval(interval_ms: u64) -> f64 {
    BASE_FREQUENCY + (interval_ms as f64 * FREQUENCY_SCALE).floor()
}

/// Whether `frequency` lies within tolerance of any reference note
pub fn is_musical_note(frequency: f64) -> bool {
    MUSICAL_NOTES
        .iter()
        .any(|note| (frequency - note).abs() < NOTE_TOLERANCE)
}

/// Compute the score for the given sequences
///
/// # Arguments
/// * `intervals` - Gaps between consecutive presses (ms)
/// * `timestamps` - Press times (ms), non-decreasing
pub fn calculate_score(intervals: &[u64], timestamps: &[u64]) -> u64 {
    let mut score = 0.0;

    if let [.., second_last, last] = intervals {
        let (second_last, last) = (*second_last, *last);
        let peak = last.max(second_last);
        // Two zero gaps are as steady as it gets
        score += if peak == 0 {
            1.0
        } else {
            1.0 - last.abs_diff(second_last) as f64 / peak as f64
        };
    }

    score += intervals.len() as f64;
    score += intervals.iter().map(|&i| i as f64).sum::<f64>();

    for pair in timestamps.windows(2) {
        let gap = pair[1].saturating_sub(pair[0]);
        if is_musical_note(frequency_for_interval(gap)) {
            score += NOTE_BONUS;
        }
    }

    score.floor() as u64
}

/// Score published for one frame showing `timestamps.len()` bars
pub fn frame_score(intervals: &[u64], timestamps: &[u64], mode: ScoreMode) -> u64 {
    match mode {
        ScoreMode::PerFrame => calculate_score(intervals, timestamps),
        ScoreMode::PerBar => {
            let scored_bars = timestamps.len().saturating_sub(1) as u64;
            calculate_score(intervals, timestamps) * scored_bars
        }
    }
}
