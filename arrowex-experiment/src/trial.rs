use crate::analysis::compute_deviation;
use arrowex_core::{Choice, Deviation, GlobalDirection, Point, TrialRecord};
use std::time::Duration;

/// One round, from start click to finalization
#[derive(Debug, Clone, PartialEq)]
pub struct Trial {
    pub round_index: usize,
    pub motion_percent: u8,
    pub direction: GlobalDirection,
    pub start_pos: Point,
    pub end_pos: Option<Point>,
    pub trajectory: Vec<Point>,
    pub activated_at: Duration,
    metrics: Option<Deviation>,
}

impl Trial {
    pub fn new(
        round_index: usize,
        motion_percent: u8,
        direction: GlobalDirection,
        start_pos: Point,
        activated_at: Duration,
    ) -> Self {
        Self {
            round_index,
            motion_percent,
            direction,
            start_pos,
            end_pos: None,
            trajectory: Vec::new(),
            activated_at,
            metrics: None,
        }
    }

    /// Appends a pointer sample; ignored once the trial is finalized.
    pub fn push_sample(&mut self, p: Point) {
        if self.metrics.is_none() {
            self.trajectory.push(p);
        }
    }

    /// Computes the deviation metrics. Later calls return the first result.
    pub fn finalize(&mut self, reference_line_y: f64) -> Deviation {
        if let Some(metrics) = self.metrics {
            return metrics;
        }
        let metrics = compute_deviation(
            Some(self.start_pos),
            &self.trajectory,
            self.end_pos,
            self.motion_percent,
            reference_line_y,
        );
        self.metrics = Some(metrics);
        metrics
    }

    pub fn metrics(&self) -> Option<Deviation> {
        self.metrics
    }

    pub fn is_finalized(&self) -> bool {
        self.metrics.is_some()
    }

    /// Persistence row; metrics default to zero before finalization.
    pub fn record(&self) -> TrialRecord {
        let metrics = self.metrics.unwrap_or_default();
        TrialRecord {
            round: self.round_index + 1,
            start_pos: self.start_pos,
            end_pos: self.end_pos,
            direction: self.direction,
            choice: Choice::None,
            motion_percent: self.motion_percent,
            zero_motion: u8::from(self.motion_percent == 0),
            crossed_line: u8::from(metrics.crossed),
            area: metrics.area,
        }
    }
}
