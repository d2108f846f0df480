//! Trajectory analysis: kinematic series and path deviation.
//!
//! Everything here is a total function of its inputs. Short or degenerate
//! trajectories produce empty series or zero metrics instead of errors.

use arrowex_core::{Deviation, Point};

/// Floor for the horizontal step in the velocity ratio
pub const VELOCITY_EPSILON: f64 = 1e-6;
/// Floor for the time step between consecutive velocities
pub const TIME_EPSILON: f64 = 1e-9;
/// Net horizontal movement below this has no deviation area
pub const DEGENERATE_SPAN: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Kinematics {
    pub times: Vec<f64>,
    pub velocities: Vec<f64>,
    pub accel_times: Vec<f64>,
    pub accelerations: Vec<f64>,
}

impl Kinematics {
    pub fn is_empty(&self) -> bool {
        self.velocities.is_empty()
    }
}

/// Velocity and acceleration series of a pointer trajectory.
///
/// "Velocity" is the signed vertical-over-horizontal displacement ratio of
/// consecutive samples scaled by `sample_rate`. The horizontal step is
/// floored at [`VELOCITY_EPSILON`], so leftward steps divide by the floor
/// too. Times are a uniform grid over `[0, 1]`.
pub fn compute_kinematics(samples: &[Point], sample_rate: f64) -> Kinematics {
    if samples.len() < 2 {
        return Kinematics::default();
    }

    let velocities: Vec<f64> = samples
        .windows(2)
        .map(|w| (w[1].y - w[0].y) / (w[1].x - w[0].x).max(VELOCITY_EPSILON) * sample_rate)
        .collect();
    let times = unit_grid(velocities.len());

    let accelerations: Vec<f64> = velocities
        .windows(2)
        .zip(times.windows(2))
        .map(|(v, t)| (v[1] - v[0]) / (t[1] - t[0]).max(TIME_EPSILON))
        .collect();
    let accel_times = times[1..].to_vec();

    Kinematics {
        times,
        velocities,
        accel_times,
        accelerations,
    }
}

/// `n` evenly spaced values from 0 to 1 inclusive
fn unit_grid(n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => (0..n).map(|i| i as f64 / (n - 1) as f64).collect(),
    }
}

/// Area between the pointer path and the chord from `start` to `(end_x, start.y)`,
/// plus whether a baseline (motionless) round went above `reference_line_y`.
///
/// `end` falls back to the last sample when absent.
pub fn compute_deviation(
    start: Option<Point>,
    trajectory: &[Point],
    end: Option<Point>,
    motion_percent: u8,
    reference_line_y: f64,
) -> Deviation {
    let (Some(start), Some(last)) = (start, trajectory.last()) else {
        return Deviation::default();
    };

    let crossed = motion_percent == 0 && trajectory.iter().any(|p| p.y < reference_line_y);

    let end_x = end.map_or(last.x, |e| e.x);
    if (end_x - start.x).abs() < DEGENERATE_SPAN {
        return Deviation { area: 0.0, crossed };
    }

    let lo = start.x.min(end_x);
    let hi = start.x.max(end_x);
    let mut selected: Vec<Point> = trajectory
        .iter()
        .copied()
        .filter(|p| lo <= p.x && p.x <= hi)
        .collect();
    if selected.is_empty() {
        selected = vec![trajectory[0], *last];
    }

    if end_x >= start.x {
        selected.sort_by(|a, b| a.x.total_cmp(&b.x));
    } else {
        selected.sort_by(|a, b| b.x.total_cmp(&a.x));
    }

    let mut polygon = Vec::with_capacity(selected.len() + 2);
    polygon.push(start);
    polygon.extend(selected);
    polygon.push(Point::new(end_x, start.y));

    Deviation {
        area: polygon_area(&polygon),
        crossed,
    }
}

/// Shoelace area of a closed polygon; zero below three vertices.
pub fn polygon_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let n = points.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice.abs() / 2.0
}
