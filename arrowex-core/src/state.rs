/// Session states of the trial controller
#[derive(Copy, Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Waiting for the participant to press start
    #[default]
    Idle,
    /// Round running, pointer sampled every tick
    Active,
    /// Post-round message, only after rounds with motion
    Feedback,
    /// Every scheduled round is finished
    SessionComplete,
}

impl SessionState {
    pub fn accepts_start(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_sampling(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn shows_choice_regions(&self) -> bool {
        matches!(self, Self::Active | Self::Feedback)
    }

    pub fn shows_feedback(&self) -> bool {
        matches!(self, Self::Feedback)
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::SessionComplete)
    }
}
