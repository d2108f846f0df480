use crate::config::{FieldBounds, FieldConfig};
use arrowex_core::{GlobalDirection, Point, StimulusElement, StimulusField};
use rand::Rng;

/// Number of moving elements in a field of `count` at `motion_percent`.
pub fn motion_count(count: usize, motion_percent: u8) -> usize {
    (count * motion_percent as usize / 100).min(count)
}

/// Places arrows by rejection sampling and assigns the round's motion
#[derive(Debug, Clone)]
pub struct FieldGenerator {
    bounds: FieldBounds,
    min_separation: f64,
    max_attempts: usize,
    speed: f64,
}

impl FieldGenerator {
    pub fn new(config: &FieldConfig) -> Self {
        Self {
            bounds: config.bounds,
            min_separation: config.min_separation,
            max_attempts: config.max_attempts,
            speed: config.speed,
        }
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn min_separation(&self) -> f64 {
        self.min_separation
    }

    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        count: usize,
        motion_percent: u8,
        direction: GlobalDirection,
    ) -> StimulusField {
        let num_motion = motion_count(count, motion_percent);
        let mut moving = vec![false; count];
        for i in rand::seq::index::sample(rng, count, num_motion).iter() {
            moving[i] = true;
        }

        let placement = self.place(rng, count);
        let elements = placement
            .positions
            .into_iter()
            .zip(moving)
            .map(|(pos, is_moving)| {
                if is_moving {
                    StimulusElement::moving(pos, direction.degrees(), self.speed)
                } else {
                    let orientation = rng.random_range(0..360u16) as f64;
                    StimulusElement::fixed(pos, orientation)
                }
            })
            .collect();

        StimulusField {
            elements,
            motion_percent,
            direction,
            attempts: placement.attempts,
            relaxed: placement.relaxed,
        }
    }

    fn place<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Placement {
        let min_sq = self.min_separation * self.min_separation;
        let mut positions: Vec<Point> = Vec::with_capacity(count);
        let mut attempts = 0;

        while positions.len() < count && attempts < self.max_attempts {
            attempts += 1;
            let candidate = self.random_point(rng);
            if positions
                .iter()
                .all(|p| p.distance_squared(&candidate) >= min_sq)
            {
                positions.push(candidate);
            }
        }

        let relaxed = count - positions.len();
        if relaxed > 0 {
            tracing::debug!(
                placed = positions.len(),
                relaxed,
                attempts,
                "placement search exhausted, filling without separation"
            );
        }
        while positions.len() < count {
            positions.push(self.random_point(rng));
        }

        Placement {
            positions,
            attempts,
            relaxed,
        }
    }

    fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Point {
        let b = &self.bounds;
        Point::new(
            rng.random_range(b.x_min..=b.x_max) as f64,
            rng.random_range(b.y_min..=b.y_max) as f64,
        )
    }
}

struct Placement {
    positions: Vec<Point>,
    attempts: usize,
    relaxed: usize,
}
