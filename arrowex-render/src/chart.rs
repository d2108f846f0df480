//! Velocity and acceleration charts for a finished session

use anyhow::{anyhow, Context, Result};
use arrowex_core::Point;
use arrowex_experiment::{has_enough_data, Kinematics, KinematicsView, VisualizationOutcome};
use std::path::PathBuf;
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

const MARGIN: f32 = 40.0;
const MARKER_RADIUS: f32 = 2.5;

/// Writes a two-panel PNG chart: velocity on top, acceleration below.
pub struct ChartView {
    path: PathBuf,
    width: u32,
    height: u32,
}

impl ChartView {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            width: 800,
            height: 800,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

impl KinematicsView for ChartView {
    fn show(
        &mut self,
        trajectory: &[Point],
        kinematics: &Kinematics,
    ) -> Result<VisualizationOutcome> {
        if !has_enough_data(trajectory) {
            return Ok(VisualizationOutcome::InsufficientData);
        }
        let pm = render_chart(kinematics, self.width, self.height)?;
        pm.save_png(&self.path)
            .with_context(|| format!("Failed to write chart {}", self.path.display()))?;
        tracing::info!(path = %self.path.display(), points = kinematics.velocities.len(), "chart written");
        Ok(VisualizationOutcome::Rendered(self.path.clone()))
    }
}

pub fn render_chart(kinematics: &Kinematics, width: u32, height: u32) -> Result<Pixmap> {
    let mut pm =
        Pixmap::new(width, height).ok_or_else(|| anyhow!("Failed to create {width}x{height} chart"))?;
    pm.fill(Color::WHITE);

    let half = height as f32 / 2.0;
    let panels = [
        (
            0.0,
            &kinematics.times,
            &kinematics.velocities,
            Color::from_rgba8(31, 119, 180, 255),
        ),
        (
            half,
            &kinematics.accel_times,
            &kinematics.accelerations,
            Color::from_rgba8(214, 39, 40, 255),
        ),
    ];

    for (top, xs, ys, color) in panels {
        let Some(frame) = Rect::from_ltrb(
            MARGIN,
            top + MARGIN,
            width as f32 - MARGIN,
            top + half - MARGIN,
        ) else {
            continue;
        };
        draw_panel(&mut pm, frame, xs, ys, color);
    }
    Ok(pm)
}

fn draw_panel(pm: &mut Pixmap, frame: Rect, xs: &[f64], ys: &[f64], color: Color) {
    let mut axis = Paint::default();
    axis.set_color(Color::from_rgba8(120, 120, 120, 255));
    let thin = Stroke {
        width: 1.0,
        ..Stroke::default()
    };
    pm.stroke_path(
        &PathBuilder::from_rect(frame),
        &axis,
        &thin,
        Transform::identity(),
        None,
    );

    let points: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .map(|(&x, &y)| (x, y))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();
    if points.is_empty() {
        return;
    }

    let (mut lo, mut hi) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y)| {
            (lo.min(y), hi.max(y))
        });
    if hi - lo < f64::EPSILON {
        lo -= 1.0;
        hi += 1.0;
    }

    let map = |(x, y): (f64, f64)| -> (f32, f32) {
        let px = frame.left() + (x.clamp(0.0, 1.0) as f32) * frame.width();
        let py = frame.bottom() - ((y - lo) / (hi - lo)) as f32 * frame.height();
        (px, py)
    };

    // zero grid line
    if lo < 0.0 && hi > 0.0 {
        let (_, zy) = map((0.0, 0.0));
        let mut pb = PathBuilder::new();
        pb.move_to(frame.left(), zy);
        pb.line_to(frame.right(), zy);
        if let Some(path) = pb.finish() {
            pm.stroke_path(&path, &axis, &thin, Transform::identity(), None);
        }
    }

    let mut series = Paint::default();
    series.set_color(color);
    series.anti_alias = true;

    let mut pb = PathBuilder::new();
    for (i, &p) in points.iter().enumerate() {
        let (px, py) = map(p);
        if i == 0 {
            pb.move_to(px, py);
        } else {
            pb.line_to(px, py);
        }
    }
    if let Some(path) = pb.finish() {
        let line = Stroke {
            width: 1.5,
            ..Stroke::default()
        };
        pm.stroke_path(&path, &series, &line, Transform::identity(), None);
    }

    for &p in &points {
        let (px, py) = map(p);
        if let Some(dot) = PathBuilder::from_circle(px, py, MARKER_RADIUS) {
            pm.fill_path(&dot, &series, FillRule::Winding, Transform::identity(), None);
        }
    }
}
