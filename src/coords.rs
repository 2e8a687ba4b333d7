//! Coordinate mapping between pointer pixels, chart-local pixels and timeline time.
//!
//! Every function here is pure. The engine calls them on each pointer event with
//! freshly read viewport and scroll values, since either can change between moves.

#[cfg(test)]
#[path = "coords_test.rs"]
mod coords_test;

use serde::{Deserialize, Serialize};

/// A point in either absolute (page) or chart-local pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    #[must_use]
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self { left, top, right, bottom }
    }

    /// Build a rectangle from its top-left corner and size.
    #[must_use]
    pub fn from_origin_size(origin: Point, width: f64, height: f64) -> Self {
        Self { left: origin.x, top: origin.y, right: origin.x + width, bottom: origin.y + height }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Top-left corner.
    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }
}

/// Timeline viewport: where the chart sits on the page and how time maps to pixels.
///
/// `origin` is the top-left of the timeline element in absolute pixels.
/// `left_global` is the time at local x = 0. `time_per_pixel` is milliseconds per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Viewport {
    pub origin: Point,
    pub left_global: i64,
    pub time_per_pixel: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { origin: Point::default(), left_global: 0, time_per_pixel: 1.0 }
    }
}

impl Viewport {
    /// Convert an absolute pointer position to chart-local pixels.
    #[must_use]
    pub fn to_chart_local(&self, pointer: Point) -> Point {
        Point { x: pointer.x - self.origin.x, y: pointer.y - self.origin.y }
    }

    /// Convert a chart-local position back to absolute pixels.
    #[must_use]
    pub fn to_absolute(&self, local: Point) -> Point {
        Point { x: local.x + self.origin.x, y: local.y + self.origin.y }
    }

    /// Convert a horizontal pixel distance to a time distance in milliseconds.
    #[must_use]
    pub fn pixel_delta_to_time_delta(&self, px: f64) -> f64 {
        px * self.time_per_pixel
    }

    /// Absolute time at a chart-local x coordinate, rounded to whole milliseconds.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn pixel_to_time(&self, local_x: f64) -> i64 {
        self.left_global + self.pixel_delta_to_time_delta(local_x).round() as i64
    }

    /// Chart-local x coordinate of an absolute time.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn time_to_pixel(&self, time: i64) -> f64 {
        (time - self.left_global) as f64 / self.time_per_pixel
    }
}

/// Index of the visible row under `local_y`.
///
/// Returns the last row whose `top + scroll_compensation` is at or above `local_y`.
/// Positions above the first row clamp to 0 and positions below the last row clamp
/// to the last index. Returns `None` only when `row_tops` is empty.
#[must_use]
pub fn row_index_at(local_y: f64, row_tops: &[f64], scroll_compensation: f64) -> Option<usize> {
    if row_tops.is_empty() {
        return None;
    }
    let below = row_tops
        .iter()
        .take_while(|top| **top + scroll_compensation <= local_y)
        .count();
    Some(below.saturating_sub(1).min(row_tops.len() - 1))
}
