use crate::geometry::Point;
use crate::stimulus::GlobalDirection;
use serde::{Deserialize, Serialize};

/// Participant decision for a round.
///
/// Only `None` is ever recorded; the left/right regions are detected
/// but no transition turns a click on them into a choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    #[default]
    None,
    Left,
    Right,
}

/// Deviation of a pointer path from its start-to-end chord
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Deviation {
    pub area: f64,
    pub crossed: bool,
}

/// Recorded result per round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    /// 1-based round number
    pub round: usize,
    pub start_pos: Point,
    pub end_pos: Option<Point>,
    pub direction: GlobalDirection,
    pub choice: Choice,
    pub motion_percent: u8,
    pub zero_motion: u8,
    pub crossed_line: u8,
    pub area: f64,
}
