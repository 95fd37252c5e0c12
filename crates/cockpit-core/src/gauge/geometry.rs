//! Arc geometry
//!
//! Angles are in degrees, measured clockwise from 12 o'clock. Screen
//! coordinates grow rightward and downward.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in screen space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position
    pub x: f64,
    /// Vertical position, growing downward
    pub y: f64,
}

impl Point {
    /// Create a point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Reflect across the vertical line through `axis_x`
    pub fn mirrored_x(self, axis_x: f64) -> Self {
        Self {
            x: 2.0 * axis_x - self.x,
            y: self.y,
        }
    }
}

/// Point on a circle at a clock-style angle
pub fn polar_to_cartesian(center: Point, radius: f64, angle_deg: f64) -> Point {
    let rad = (angle_deg - 90.0).to_radians();
    Point {
        x: center.x + radius * rad.cos(),
        y: center.y + radius * rad.sin(),
    }
}

/// A circular arc in SVG path-arc terms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcPath {
    /// Where the path begins (the point at the arc's end angle)
    pub start: Point,
    /// Where the path ends (the point at the arc's start angle)
    pub end: Point,
    /// Arc radius
    pub radius: f64,
    /// SVG large-arc-flag
    pub large_arc: bool,
    /// SVG sweep-flag
    pub sweep: bool,
}

impl ArcPath {
    /// Reflect across the vertical line through `axis_x`.
    ///
    /// Reflection reverses the drawing direction, so the sweep flag flips.
    pub fn mirrored_x(self, axis_x: f64) -> Self {
        Self {
            start: self.start.mirrored_x(axis_x),
            end: self.end.mirrored_x(axis_x),
            radius: self.radius,
            large_arc: self.large_arc,
            sweep: !self.sweep,
        }
    }
}

impl fmt::Display for ArcPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "M {} {} A {} {} 0 {} {} {} {}",
            self.start.x,
            self.start.y,
            self.radius,
            self.radius,
            u8::from(self.large_arc),
            u8::from(self.sweep),
            self.end.x,
            self.end.y
        )
    }
}

/// Arc covering `[start_angle, end_angle]`.
///
/// The path runs from the end angle back to the start angle with sweep
/// flag 0, which traces the same clockwise span on screen. Spans over 180°
/// set the large-arc flag.
pub fn describe_arc(center: Point, radius: f64, start_angle: f64, end_angle: f64) -> ArcPath {
    ArcPath {
        start: polar_to_cartesian(center, radius, end_angle),
        end: polar_to_cartesian(center, radius, start_angle),
        radius,
        large_arc: (end_angle - start_angle).abs() > 180.0,
        sweep: false,
    }
}

/// `value` clamped into `[0, max_value]`.
///
/// A non-positive or NaN `max_value`, or a non-finite `value`, yields 0.
pub fn clamp_value(value: f64, max_value: f64) -> f64 {
    if !(max_value > 0.0) || !value.is_finite() {
        return 0.0;
    }
    value.clamp(0.0, max_value)
}

/// Needle angle for a reading.
///
/// Returns `start_angle` when `max_value` is zero, so a degenerate gauge
/// never divides by zero.
pub fn current_angle(value: f64, max_value: f64, start_angle: f64, end_angle: f64) -> f64 {
    if !(max_value > 0.0) {
        return start_angle;
    }
    let fraction = clamp_value(value, max_value) / max_value;
    start_angle + fraction * (end_angle - start_angle)
}

/// One tick mark on the gauge face
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickMark {
    /// Position along the arc, 0 at the start angle
    pub index: usize,
    /// Clock-style angle in degrees
    pub angle: f64,
    /// Reading this tick stands for
    pub value: f64,
    /// Inner end of the tick line
    pub inner: Point,
    /// Outer end of the tick line
    pub outer: Point,
    /// At or below the current reading
    pub active: bool,
    /// Drawn heavier: every third tick starting from the first
    pub major: bool,
}

/// Radii between which tick marks are drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickBand {
    /// Radius where tick lines start
    pub inner_radius: f64,
    /// Radius where tick lines end
    pub outer_radius: f64,
}

/// Tick marks splitting the arc into `intervals` equal parts.
///
/// Produces `intervals + 1` marks, both ends included. Zero intervals
/// produce no marks.
pub fn tick_marks(
    center: Point,
    band: TickBand,
    intervals: usize,
    value: f64,
    max_value: f64,
    start_angle: f64,
    end_angle: f64,
) -> Vec<TickMark> {
    if intervals == 0 {
        return Vec::new();
    }
    let clamped = clamp_value(value, max_value);
    let span = end_angle - start_angle;
    let max_value = if max_value > 0.0 { max_value } else { 0.0 };

    (0..=intervals)
        .map(|i| {
            let fraction = i as f64 / intervals as f64;
            let angle = start_angle + fraction * span;
            let tick_value = fraction * max_value;
            TickMark {
                index: i,
                angle,
                value: tick_value,
                inner: polar_to_cartesian(center, band.inner_radius, angle),
                outer: polar_to_cartesian(center, band.outer_radius, angle),
                active: tick_value <= clamped,
                major: i % 3 == 0,
            }
        })
        .collect()
}
