//! Visualization seam for session kinematics

use crate::analysis::Kinematics;
use anyhow::Result;
use arrowex_core::Point;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum VisualizationOutcome {
    Rendered(PathBuf),
    /// Fewer than two samples in the whole session
    InsufficientData,
}

pub trait KinematicsView {
    fn show(&mut self, trajectory: &[Point], kinematics: &Kinematics)
        -> Result<VisualizationOutcome>;
}

/// True when a session trajectory can be charted at all.
pub fn has_enough_data(trajectory: &[Point]) -> bool {
    trajectory.len() >= 2
}
