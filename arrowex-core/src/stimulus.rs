use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Heading shared by every moving element of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlobalDirection {
    Forward,
    Reverse,
}

impl GlobalDirection {
    pub const ALL: [GlobalDirection; 2] = [GlobalDirection::Forward, GlobalDirection::Reverse];

    /// Screen heading in degrees; 0 points right, 180 points left.
    pub fn degrees(&self) -> f64 {
        match self {
            GlobalDirection::Forward => 0.0,
            GlobalDirection::Reverse => 180.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GlobalDirection::Forward => "forward",
            GlobalDirection::Reverse => "reverse",
        }
    }
}

/// A single arrow of the stimulus field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StimulusElement {
    position: Point,
    orientation_deg: f64,
    moving: bool,
    velocity: (f64, f64),
}

impl StimulusElement {
    /// Static element; it never moves regardless of orientation.
    pub fn fixed(position: Point, orientation_deg: f64) -> Self {
        Self {
            position,
            orientation_deg,
            moving: false,
            velocity: (0.0, 0.0),
        }
    }

    /// Moving element travelling `speed` pixels per tick along its orientation.
    pub fn moving(position: Point, orientation_deg: f64, speed: f64) -> Self {
        let rad = orientation_deg.to_radians();
        Self {
            position,
            orientation_deg,
            moving: true,
            velocity: (rad.cos() * speed, rad.sin() * speed),
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn orientation_deg(&self) -> f64 {
        self.orientation_deg
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn velocity(&self) -> (f64, f64) {
        self.velocity
    }

    /// Displayed position after `ticks` ticks of motion.
    pub fn position_after(&self, ticks: u32) -> Point {
        let n = ticks as f64;
        self.position.offset(self.velocity.0 * n, self.velocity.1 * n)
    }
}

/// The arrows of one round, plus how their placement went
#[derive(Debug, Clone, PartialEq)]
pub struct StimulusField {
    pub elements: Vec<StimulusElement>,
    pub motion_percent: u8,
    pub direction: GlobalDirection,
    /// Rejection-sampling attempts spent on placement
    pub attempts: usize,
    /// Positions placed without the separation check after the attempt cap
    pub relaxed: usize,
}

impl StimulusField {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn moving_count(&self) -> usize {
        self.elements.iter().filter(|e| e.is_moving()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StimulusElement> {
        self.elements.iter()
    }

    /// Smallest pairwise distance between element positions, `None` below two elements.
    pub fn min_pairwise_distance(&self) -> Option<f64> {
        let mut best: Option<f64> = None;
        for (i, a) in self.elements.iter().enumerate() {
            for b in &self.elements[i + 1..] {
                let d = a.position().distance(&b.position());
                best = Some(best.map_or(d, |cur| cur.min(d)));
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moving_velocity_follows_orientation() {
        let e = StimulusElement::moving(Point::new(100.0, 100.0), 180.0, 2.5);
        let (dx, dy) = e.velocity();
        assert!((dx + 2.5).abs() < 1e-12);
        assert!(dy.abs() < 1e-12);
        let p = e.position_after(4);
        assert!((p.x - 90.0).abs() < 1e-9);
        assert!((p.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn fixed_elements_stay_put() {
        let e = StimulusElement::fixed(Point::new(5.0, 6.0), 73.0);
        assert!(!e.is_moving());
        assert_eq!(e.velocity(), (0.0, 0.0));
        assert_eq!(e.position_after(100), Point::new(5.0, 6.0));
    }

    #[test]
    fn direction_labels() {
        assert_eq!(GlobalDirection::Forward.degrees(), 0.0);
        assert_eq!(GlobalDirection::Reverse.degrees(), 180.0);
        assert_eq!(GlobalDirection::Reverse.label(), "reverse");
    }
}
