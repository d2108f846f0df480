use crate::geometry::{Point, Rect};
use crate::state::SessionState;
use serde::{Deserialize, Serialize};

/// Named clickable areas of the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Start,
    Results,
    LeftChoice,
    RightChoice,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickRegions {
    pub start: Rect,
    pub results: Rect,
    pub left_choice: Rect,
    pub right_choice: Rect,
}

impl Default for ClickRegions {
    fn default() -> Self {
        Self {
            start: Rect::new(380.0, 625.0, 140.0, 60.0),
            results: Rect::new(380.0, 625.0, 140.0, 60.0),
            left_choice: Rect::new(20.0, 20.0, 110.0, 50.0),
            right_choice: Rect::new(770.0, 20.0, 110.0, 50.0),
        }
    }
}

impl ClickRegions {
    pub fn rect(&self, region: Region) -> Rect {
        match region {
            Region::Start => self.start,
            Region::Results => self.results,
            Region::LeftChoice => self.left_choice,
            Region::RightChoice => self.right_choice,
        }
    }

    /// Region under `p` among those live in `state`.
    ///
    /// Start and results share screen space, so only the one belonging
    /// to the current state is considered.
    pub fn hit(&self, p: Point, state: SessionState) -> Option<Region> {
        let live: &[Region] = match state {
            SessionState::Idle => &[Region::Start],
            SessionState::Active | SessionState::Feedback => {
                &[Region::LeftChoice, Region::RightChoice]
            }
            SessionState::SessionComplete => &[Region::Results],
        };
        live.iter().copied().find(|r| self.rect(*r).contains(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_buttons_resolve_by_state() {
        let regions = ClickRegions::default();
        let p = regions.start.center();
        assert_eq!(regions.hit(p, SessionState::Idle), Some(Region::Start));
        assert_eq!(
            regions.hit(p, SessionState::SessionComplete),
            Some(Region::Results)
        );
        assert_eq!(regions.hit(p, SessionState::Active), None);
    }

    #[test]
    fn choice_regions_only_during_round() {
        let regions = ClickRegions::default();
        let left = regions.left_choice.center();
        assert_eq!(
            regions.hit(left, SessionState::Active),
            Some(Region::LeftChoice)
        );
        assert_eq!(
            regions.hit(regions.right_choice.center(), SessionState::Feedback),
            Some(Region::RightChoice)
        );
        assert_eq!(regions.hit(left, SessionState::Idle), None);
    }
}
