//! Interval bar chart
//!
//! One bar per recorded press, laid out left to right:
//!
//! - Bar i starts at x = 50 + 50 * i, y = 300
//! - Every bar is 40 px wide
//! - The first bar is 40 px tall, every later bar is as tall as the
//!   interval (ms) that ended on it
//!
//! Heights are not clamped. A slow press draws a bar that runs off the
//! bottom of the surface.

use eframe::egui::{self, Color32, Pos2, Rect, Vec2};

use super::traits::Surface;

/// Surface width in pixels
pub const SURFACE_WIDTH: f32 = 800.0;
/// Surface height in pixels
pub const SURFACE_HEIGHT: f32 = 600.0;

const BAR_STRIDE: f32 = 50.0;
const BAR_OFFSET: f32 = 50.0;
const BAR_TOP: f32 = 300.0;
const BAR_WIDTH: f32 = 40.0;
const FIRST_BAR_HEIGHT: f32 = 40.0;

/// Display settings for the chart
#[derive(Clone)]
pub struct ChartSettings {
    /// Bar fill color
    pub bar_color: Color32,
    /// Surface background color
    pub background: Color32,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            bar_color: Color32::from_rgb(0, 0, 255),
            background: Color32::WHITE,
        }
    }
}

/// Geometry of one bar in surface pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bar {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Bar chart of press intervals
pub struct BarChart {
    pub settings: ChartSettings,
}

impl Default for BarChart {
    fn default() -> Self {
        Self::new()
    }
}

impl BarChart {
    pub fn new() -> Self {
        Self {
            settings: ChartSettings::default(),
        }
    }

    pub fn with_settings(settings: ChartSettings) -> Self {
        Self { settings }
    }

    /// Lay out one bar per press
    ///
    /// # Arguments
    /// * `presses` - Number of recorded presses
    /// * `intervals` - Gaps between presses, `presses - 1` long
    pub fn layout(presses: usize, intervals: &[u64]) -> Vec<Bar> {
        (0..presses)
            .map(|i| {
                let height = match i {
                    0 => FIRST_BAR_HEIGHT,
                    _ => intervals.get(i - 1).map_or(0.0, |&ms| ms as f32),
                };
                Bar {
                    x: i as f32 * BAR_STRIDE + BAR_OFFSET,
                    y: BAR_TOP,
                    width: BAR_WIDTH,
                    height,
                }
            })
            .collect()
    }

    /// Redraw the whole chart on `surface`
    ///
    /// # Returns
    /// Number of bars drawn
    pub fn draw<S: Surface>(&self, surface: &mut S, presses: usize, intervals: &[u64]) -> usize {
        surface.clear(Rect::from_min_size(
            Pos2::ZERO,
            Vec2::new(SURFACE_WIDTH, SURFACE_HEIGHT),
        ));

        let bars = Self::layout(presses, intervals);
        for bar in &bars {
            surface.fill_rect(bar.x, bar.y, bar.width, bar.height, self.settings.bar_color);
        }
        bars.len()
    }

    /// Allocate the fixed-size drawing area in `ui`
    ///
    /// # Returns
    /// The area's response and a painter clipped to it
    pub fn allocate(ui: &mut egui::Ui) -> (egui::Response, egui::Painter) {
        let (_, response) = ui.allocate_exact_size(
            Vec2::new(SURFACE_WIDTH, SURFACE_HEIGHT),
            egui::Sense::hover(),
        );
        let painter = ui.painter_at(response.rect);
        (response, painter)
    }
}

/// `Surface` backed by an egui painter clipped to the chart area
pub struct PainterSurface<'a> {
    painter: &'a egui::Painter,
    /// Screen position of the surface's top-left corner
    origin: Pos2,
    background: Color32,
}

impl<'a> PainterSurface<'a> {
    pub fn new(painter: &'a egui::Painter, origin: Pos2, background: Color32) -> Self {
        Self {
            painter,
            origin,
            background,
        }
    }

    fn to_screen(&self, rect: Rect) -> Rect {
        rect.translate(self.origin.to_vec2())
    }
}

impl Surface for PainterSurface<'_> {
    fn clear(&mut self, region: Rect) {
        self.painter
            .rect_filled(self.to_screen(region), 0.0, self.background);
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color32) {
        let rect = Rect::from_min_size(Pos2::new(x, y), Vec2::new(width, height));
        self.painter.rect_filled(self.to_screen(rect), 0.0, color);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Surface that records every call
    #[derive(Default)]
    pub(crate) struct RecordingSurface {
        pub clears: Vec<Rect>,
        pub rects: Vec<(Bar, Color32)>,
    }

    impl Surface for RecordingSurface {
        fn clear(&mut self, region: Rect) {
            self.clears.push(region);
            self.rects.clear();
        }

        fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color32) {
            self.rects.push((Bar { x, y, width, height }, color));
        }
    }

    #[test]
    fn test_layout_positions() {
        let bars = BarChart::layout(3, &[500, 800]);
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0], Bar { x: 50.0, y: 300.0, width: 40.0, height: 40.0 });
        assert_eq!(bars[1], Bar { x: 100.0, y: 300.0, width: 40.0, height: 500.0 });
        assert_eq!(bars[2], Bar { x: 150.0, y: 300.0, width: 40.0, height: 800.0 });
    }

    #[test]
    fn test_empty_layout() {
        assert!(BarChart::layout(0, &[]).is_empty());
    }

    #[test]
    fn test_draw_clears_then_fills() {
        let chart = BarChart::new();
        let mut surface = RecordingSurface::default();

        let drawn = chart.draw(&mut surface, 4, &[10, 20, 30]);
        assert_eq!(drawn, 4);
        assert_eq!(surface.clears.len(), 1);
        assert_eq!(surface.clears[0].width(), SURFACE_WIDTH);
        assert_eq!(surface.clears[0].height(), SURFACE_HEIGHT);
        assert_eq!(surface.rects.len(), 4);
        assert!(surface
            .rects
            .iter()
            .all(|(_, color)| *color == chart.settings.bar_color));
    }

    #[test]
    fn test_tall_bars_are_not_clamped() {
        let bars = BarChart::layout(2, &[5000]);
        assert_eq!(bars[1].height, 5000.0);
    }

    #[test]
    fn test_redraw_replaces_previous_frame() {
        let chart = BarChart::new();
        let mut surface = RecordingSurface::default();
        chart.draw(&mut surface, 2, &[100]);
        chart.draw(&mut surface, 3, &[100, 200]);
        assert_eq!(surface.clears.len(), 2);
        assert_eq!(surface.rects.len(), 3);
    }
}
