//! Drawing surface trait
//!
//! The chart draws through this trait instead of an egui painter directly,
//! so a frame can be rendered into a recorder and inspected.

use eframe::egui::{Color32, Rect};

/// A fixed-size 2D surface with a top-left origin and Y growing downward
pub trait Surface {
    /// Wipe `region` back to the background
    fn clear(&mut self, region: Rect);

    /// Fill an axis-aligned rectangle
    ///
    /// # Arguments
    /// * `x`, `y` - Top-left corner in surface pixels
    /// * `width`, `height` - Size in pixels, drawn right and down
    /// * `color` - Fill color
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color32);
}
