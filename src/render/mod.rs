//! Render module - interval chart drawing
//!
//! This module provides:
//! - `Surface` trait for the drawing target
//! - Bar chart of press intervals
//! - egui painter adapter

mod chart;
mod traits;

pub use chart::{BarChart, ChartSettings, PainterSurface, SURFACE_HEIGHT, SURFACE_WIDTH};
pub use traits::Surface;

#[cfg(test)]
pub(crate) use chart::tests::RecordingSurface;
