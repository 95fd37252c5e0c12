//! Gauge Geometry Engine
//!
//! Turns a reading into the pieces a renderer needs to draw a two-tone
//! circular gauge: a background track, an active arc up to the reading, and
//! tick marks. The arc may span any segment, not just a semicircle, and can
//! be mirrored for symmetric dual-gauge layouts.
//!
//! Everything here is a pure function of its inputs.

pub mod geometry;

pub use geometry::{
    current_angle, describe_arc, polar_to_cartesian, tick_marks, ArcPath, Point, TickBand,
    TickMark,
};

use serde::{Deserialize, Serialize};

use crate::status::{Metric, Status};

/// Drawing-surface layout of a square gauge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaugeLayout {
    /// Side length of the square the gauge is drawn in
    pub size: f64,
    /// Width of the arc stroke
    pub stroke_width: f64,
    /// Tick marks start this far inside the track radius
    pub tick_inner_inset: f64,
    /// Tick marks end this far inside the track radius
    pub tick_outer_inset: f64,
    /// Reflect horizontally about the gauge center
    pub mirrored: bool,
}

impl Default for GaugeLayout {
    fn default() -> Self {
        Self {
            size: 280.0,
            stroke_width: 8.0,
            tick_inner_inset: 12.0,
            tick_outer_inset: 4.0,
            mirrored: false,
        }
    }
}

impl GaugeLayout {
    /// Center of the drawing square
    pub fn center(&self) -> Point {
        Point::new(self.size / 2.0, self.size / 2.0)
    }

    /// Radius of the arc track, inset so the stroke stays inside the square
    pub fn radius(&self) -> f64 {
        ((self.size - self.stroke_width * 2.0) / 2.0).max(0.0)
    }

    fn tick_band(&self) -> TickBand {
        let radius = self.radius();
        TickBand {
            inner_radius: (radius - self.tick_inner_inset).max(0.0),
            outer_radius: (radius - self.tick_outer_inset).max(0.0),
        }
    }
}

/// Everything needed to render one gauge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeSpec {
    /// Reading to show
    pub value: f64,
    /// Reading at the end of the arc
    pub max_value: f64,
    /// Degrees clockwise from 12 o'clock
    pub start_angle: f64,
    /// Degrees clockwise from 12 o'clock
    pub end_angle: f64,
    /// Number of equal intervals between tick marks
    pub tick_count: usize,
    /// Metric used to tint the gauge, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<Metric>,
    /// Drawing-surface layout
    #[serde(default)]
    pub layout: GaugeLayout,
}

impl Default for GaugeSpec {
    fn default() -> Self {
        Self {
            value: 0.0,
            max_value: 100.0,
            start_angle: -225.0,
            end_angle: 45.0,
            tick_count: 12,
            metric: None,
            layout: GaugeLayout::default(),
        }
    }
}

/// Speed gauge arc, roughly 7 o'clock to 11 o'clock
pub const COCKPIT_START_ANGLE: f64 = 210.0;
/// End of the cockpit gauge arc
pub const COCKPIT_END_ANGLE: f64 = 330.0;

impl GaugeSpec {
    /// Left-hand cockpit speed gauge, 0..240 km/h
    pub fn speed(speed: f64) -> Self {
        Self {
            value: speed,
            max_value: crate::telemetry::MAX_SPEED,
            start_angle: COCKPIT_START_ANGLE,
            end_angle: COCKPIT_END_ANGLE,
            metric: Some(Metric::Speed),
            ..Self::default()
        }
    }

    /// Right-hand cockpit RPM gauge: the speed arc mirrored, 0..8000
    pub fn rpm(rpm: f64) -> Self {
        Self {
            value: rpm,
            max_value: crate::telemetry::MAX_RPM,
            start_angle: COCKPIT_START_ANGLE,
            end_angle: COCKPIT_END_ANGLE,
            metric: Some(Metric::Rpm),
            layout: GaugeLayout {
                mirrored: true,
                ..GaugeLayout::default()
            },
            ..Self::default()
        }
    }
}

/// Rendered gauge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeRender {
    /// Full track
    pub background: ArcPath,
    /// Arc up to the reading. Absent when the clamped reading is 0.
    pub active: Option<ArcPath>,
    /// Tick marks, start to end
    pub ticks: Vec<TickMark>,
    /// Needle angle
    pub angle: f64,
    /// Reading after clamping into `[0, max_value]`
    pub clamped_value: f64,
    /// Classification of the raw reading, when the gauge names a metric
    pub status: Option<Status>,
}

impl GaugeRender {
    /// SVG path data for the background track
    pub fn background_path(&self) -> String {
        self.background.to_string()
    }

    /// SVG path data for the active arc
    pub fn active_path(&self) -> Option<String> {
        self.active.map(|arc| arc.to_string())
    }

    /// SVG path data for each tick line
    pub fn tick_paths(&self) -> Vec<String> {
        self.ticks
            .iter()
            .map(|t| format!("M {} {} L {} {}", t.inner.x, t.inner.y, t.outer.x, t.outer.y))
            .collect()
    }
}

/// Render a gauge
pub fn render(spec: &GaugeSpec) -> GaugeRender {
    let layout = &spec.layout;
    let center = layout.center();
    let radius = layout.radius();

    let clamped_value = geometry::clamp_value(spec.value, spec.max_value);
    let angle = current_angle(spec.value, spec.max_value, spec.start_angle, spec.end_angle);

    let mut background = describe_arc(center, radius, spec.start_angle, spec.end_angle);
    let mut active = (clamped_value > 0.0)
        .then(|| describe_arc(center, radius, spec.start_angle, angle));
    let mut ticks = tick_marks(
        center,
        layout.tick_band(),
        spec.tick_count,
        spec.value,
        spec.max_value,
        spec.start_angle,
        spec.end_angle,
    );

    if layout.mirrored {
        background = background.mirrored_x(center.x);
        active = active.map(|arc| arc.mirrored_x(center.x));
        for tick in &mut ticks {
            tick.inner = tick.inner.mirrored_x(center.x);
            tick.outer = tick.outer.mirrored_x(center.x);
        }
    }

    GaugeRender {
        background,
        active,
        ticks,
        angle,
        clamped_value,
        status: spec.metric.map(|m| m.classify(spec.value)),
    }
}
