use crate::analysis::{compute_kinematics, Kinematics};
use crate::config::ExperimentConfig;
use crate::field::FieldGenerator;
use crate::schedule::Schedule;
use crate::trial::Trial;
use arrowex_core::{
    ClickRegions, GlobalDirection, Point, Region, SessionState, StimulusField, TrialRecord,
};
use arrowex_timing::Timer;
use rand::Rng;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    RoundStarted {
        round: usize,
        motion_percent: u8,
        direction: GlobalDirection,
    },
    TrialFinalized(TrialRecord),
    FeedbackShown {
        round: usize,
    },
    /// A left/right region was clicked; it does not change the trial.
    ChoiceRegionClicked(Region),
    SessionCompleted {
        rounds: usize,
    },
    ResultsReady {
        trajectory: Vec<Point>,
        kinematics: Kinematics,
    },
}

/// What the input collaborator saw since the previous tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub pointer: Point,
    pub clicks: Vec<Point>,
}

impl TickInput {
    pub fn pointer(pointer: Point) -> Self {
        Self {
            pointer,
            clicks: Vec::new(),
        }
    }

    pub fn click(pointer: Point) -> Self {
        Self {
            pointer,
            clicks: vec![pointer],
        }
    }
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub state: SessionState,
    pub field: Option<&'a StimulusField>,
    /// Ticks sampled so far in the active round
    pub active_ticks: u32,
    /// 1-based round shown to the participant, and the total
    pub round_display: (usize, usize),
    pub regions: &'a ClickRegions,
    pub reference_line_y: f64,
    pub arrow_length: f64,
}

/// Round sequencing and sampling for one session
pub struct TrialController<R: Rng> {
    config: ExperimentConfig,
    rng: R,
    generator: FieldGenerator,
    schedule: Schedule,
    state: SessionState,
    round_index: usize,
    current: Option<Trial>,
    field: Option<StimulusField>,
    feedback_until: Option<Duration>,
    results: Vec<Trial>,
}

impl<R: Rng> TrialController<R> {
    /// Controller with a freshly shuffled schedule
    pub fn new(config: ExperimentConfig, mut rng: R) -> Self {
        let schedule = Schedule::shuffled(&config.motion_percents, config.repetitions, &mut rng);
        Self::with_schedule(config, rng, schedule)
    }

    pub fn with_schedule(config: ExperimentConfig, rng: R, schedule: Schedule) -> Self {
        let generator = FieldGenerator::new(&config.field);
        tracing::info!(
            rounds = schedule.len(),
            schedule = ?schedule.as_slice(),
            "session prepared"
        );
        let state = if schedule.is_empty() {
            SessionState::SessionComplete
        } else {
            SessionState::Idle
        };
        Self {
            config,
            rng,
            generator,
            schedule,
            state,
            round_index: 0,
            current: None,
            field: None,
            feedback_until: None,
            results: Vec::new(),
        }
    }

    /// Advances the session to `now` (monotonic time since session start).
    pub fn tick(&mut self, now: Duration, input: &TickInput) -> Vec<ControllerEvent> {
        let mut events = Vec::new();

        for &click in &input.clicks {
            self.handle_click(click, now, input.pointer, &mut events);
        }

        match self.state {
            SessionState::Active => self.update_active(now, input.pointer, &mut events),
            SessionState::Feedback => self.update_feedback(now, &mut events),
            SessionState::Idle | SessionState::SessionComplete => {}
        }

        events
    }

    /// [`tick`](Self::tick) at the timer's current reading
    pub fn tick_with<T: Timer>(&mut self, timer: &T, input: &TickInput) -> Vec<ControllerEvent> {
        self.tick(timer.since_start(), input)
    }

    fn handle_click(
        &mut self,
        click: Point,
        now: Duration,
        pointer: Point,
        events: &mut Vec<ControllerEvent>,
    ) {
        match self.config.regions.hit(click, self.state) {
            Some(Region::Start) => {
                if let Some(event) = self.start_round(now, pointer) {
                    events.push(event);
                }
            }
            Some(Region::Results) => events.push(self.results_ready()),
            Some(region @ (Region::LeftChoice | Region::RightChoice)) => {
                tracing::debug!(?region, round = self.round_index + 1, "choice region clicked");
                events.push(ControllerEvent::ChoiceRegionClicked(region));
            }
            None => {}
        }
    }

    fn start_round(&mut self, now: Duration, pointer: Point) -> Option<ControllerEvent> {
        if !self.state.accepts_start() {
            return None;
        }
        let motion_percent = self.schedule.get(self.round_index)?;
        let direction = if self.rng.random_bool(0.5) {
            GlobalDirection::Forward
        } else {
            GlobalDirection::Reverse
        };
        let field = self.generator.generate(
            &mut self.rng,
            self.config.element_count,
            motion_percent,
            direction,
        );

        tracing::info!(
            round = self.round_index + 1,
            motion_percent,
            direction = direction.label(),
            moving = field.moving_count(),
            "round started"
        );

        self.field = Some(field);
        self.current = Some(Trial::new(
            self.round_index,
            motion_percent,
            direction,
            pointer,
            now,
        ));
        self.state = SessionState::Active;

        Some(ControllerEvent::RoundStarted {
            round: self.round_index,
            motion_percent,
            direction,
        })
    }

    fn update_active(&mut self, now: Duration, pointer: Point, events: &mut Vec<ControllerEvent>) {
        let Some(trial) = &mut self.current else {
            return;
        };
        if now.saturating_sub(trial.activated_at) > self.config.active_duration() {
            self.finalize_round(now, events);
        } else {
            trial.push_sample(pointer);
        }
    }

    fn finalize_round(&mut self, now: Duration, events: &mut Vec<ControllerEvent>) {
        let Some(mut trial) = self.current.take() else {
            return;
        };
        self.field = None;

        let metrics = trial.finalize(self.config.reference_line_y);
        let record = trial.record();
        tracing::info!(
            round = record.round,
            samples = trial.trajectory.len(),
            area = metrics.area,
            crossed = metrics.crossed,
            "trial finalized"
        );

        let motion_percent = trial.motion_percent;
        self.results.push(trial);
        events.push(ControllerEvent::TrialFinalized(record));

        if motion_percent > 0 {
            self.state = SessionState::Feedback;
            self.feedback_until = Some(now + self.config.feedback_duration());
            events.push(ControllerEvent::FeedbackShown {
                round: self.round_index,
            });
        } else {
            self.advance_round(events);
        }
    }

    fn update_feedback(&mut self, now: Duration, events: &mut Vec<ControllerEvent>) {
        if self.feedback_until.is_some_and(|until| now > until) {
            self.feedback_until = None;
            self.advance_round(events);
        }
    }

    fn advance_round(&mut self, events: &mut Vec<ControllerEvent>) {
        self.round_index += 1;
        if self.round_index >= self.schedule.len() {
            self.state = SessionState::SessionComplete;
            tracing::info!(rounds = self.round_index, "session complete");
            events.push(ControllerEvent::SessionCompleted {
                rounds: self.round_index,
            });
        } else {
            self.state = SessionState::Idle;
        }
    }

    fn results_ready(&self) -> ControllerEvent {
        let trajectory = self.session_trajectory();
        let kinematics = compute_kinematics(&trajectory, self.config.tick_rate_hz);
        tracing::info!(samples = trajectory.len(), "results requested");
        ControllerEvent::ResultsReady {
            trajectory,
            kinematics,
        }
    }

    /// Every finalized trajectory, concatenated in round order
    pub fn session_trajectory(&self) -> Vec<Point> {
        self.results
            .iter()
            .flat_map(|t| t.trajectory.iter().copied())
            .collect()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn round_index(&self) -> usize {
        self.round_index
    }

    pub fn total_rounds(&self) -> usize {
        self.schedule.len()
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    pub fn current_trial(&self) -> Option<&Trial> {
        self.current.as_ref()
    }

    pub fn current_field(&self) -> Option<&StimulusField> {
        self.field.as_ref()
    }

    pub fn active_ticks(&self) -> u32 {
        self.current
            .as_ref()
            .map_or(0, |t| t.trajectory.len() as u32)
    }

    /// Finalized trials, in round order
    pub fn results(&self) -> &[Trial] {
        &self.results
    }

    pub fn records(&self) -> Vec<TrialRecord> {
        self.results.iter().map(Trial::record).collect()
    }

    pub fn scene(&self) -> Scene<'_> {
        let total = self.schedule.len();
        Scene {
            state: self.state,
            field: self.field.as_ref(),
            active_ticks: self.active_ticks(),
            round_display: ((self.round_index + 1).min(total), total),
            regions: &self.config.regions,
            reference_line_y: self.config.reference_line_y,
            arrow_length: self.config.field.arrow_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn controller(schedule: Vec<u8>) -> TrialController<StdRng> {
        TrialController::with_schedule(
            ExperimentConfig::default(),
            StdRng::seed_from_u64(5),
            Schedule::fixed(schedule),
        )
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn start_point() -> Point {
        ClickRegions::default().start.center()
    }

    #[test]
    fn start_click_activates_round() {
        let mut c = controller(vec![25]);
        assert_eq!(c.state(), SessionState::Idle);

        let events = c.tick(ms(0), &TickInput::click(start_point()));
        assert_eq!(c.state(), SessionState::Active);
        assert!(matches!(
            events[0],
            ControllerEvent::RoundStarted {
                round: 0,
                motion_percent: 25,
                ..
            }
        ));
        let field = c.current_field().unwrap();
        assert_eq!(field.len(), 40);
        assert_eq!(field.moving_count(), 10);
        // the start tick samples too
        assert_eq!(c.active_ticks(), 1);
        assert_eq!(c.current_trial().unwrap().start_pos, start_point());
    }

    #[test]
    fn clicks_outside_start_are_ignored() {
        let mut c = controller(vec![0]);
        let events = c.tick(ms(0), &TickInput::click(Point::new(5.0, 400.0)));
        assert!(events.is_empty());
        assert_eq!(c.state(), SessionState::Idle);
    }

    #[test]
    fn active_phase_ends_after_duration() {
        let mut c = controller(vec![50, 0]);
        c.tick(ms(0), &TickInput::click(start_point()));
        for t in (16..=800).step_by(16) {
            let events = c.tick(ms(t), &TickInput::pointer(Point::new(t as f64, 600.0)));
            assert!(events.is_empty());
        }
        assert_eq!(c.state(), SessionState::Active);
        // elapsed must exceed the duration, not just reach it
        assert!(c.tick(ms(800), &TickInput::pointer(Point::new(0.0, 0.0))).is_empty());

        let events = c.tick(ms(801), &TickInput::pointer(Point::new(0.0, 0.0)));
        assert_eq!(c.state(), SessionState::Feedback);
        assert!(matches!(events[0], ControllerEvent::TrialFinalized(_)));
        assert_eq!(events[1], ControllerEvent::FeedbackShown { round: 0 });
        assert!(c.current_field().is_none());
        assert_eq!(c.results().len(), 1);
        assert_eq!(c.round_index(), 0);

        // feedback holds for its full length
        assert!(c.tick(ms(1801), &TickInput::default()).is_empty());
        assert_eq!(c.state(), SessionState::Feedback);
        assert!(c.tick(ms(1802), &TickInput::default()).is_empty());
        assert_eq!(c.state(), SessionState::Idle);
        assert_eq!(c.round_index(), 1);
    }

    #[test]
    fn zero_motion_round_skips_feedback() {
        let mut c = controller(vec![0, 10]);
        c.tick(ms(0), &TickInput::click(start_point()));
        let events = c.tick(ms(900), &TickInput::pointer(start_point()));
        assert_eq!(events.len(), 1);
        let ControllerEvent::TrialFinalized(record) = &events[0] else {
            panic!("expected a finalized trial, got {events:?}");
        };
        assert_eq!(record.round, 1);
        assert_eq!(record.zero_motion, 1);
        assert_eq!(record.end_pos, None);
        assert_eq!(c.state(), SessionState::Idle);
        assert_eq!(c.round_index(), 1);
    }

    #[test]
    fn choice_regions_are_detected_but_unused() {
        let mut c = controller(vec![0]);
        c.tick(ms(0), &TickInput::click(start_point()));
        let left = ClickRegions::default().left_choice.center();
        let events = c.tick(ms(16), &TickInput::click(left));
        assert_eq!(
            events,
            vec![ControllerEvent::ChoiceRegionClicked(Region::LeftChoice)]
        );
        assert_eq!(c.state(), SessionState::Active);

        let events = c.tick(ms(1000), &TickInput::pointer(left));
        let ControllerEvent::TrialFinalized(record) = &events[0] else {
            panic!("expected a finalized trial");
        };
        assert_eq!(record.choice, arrowex_core::Choice::None);
    }

    #[test]
    fn empty_schedule_is_already_complete() {
        let c = controller(Vec::new());
        assert_eq!(c.state(), SessionState::SessionComplete);
        assert_eq!(c.scene().round_display, (0, 0));
    }

    #[test]
    fn results_click_reports_kinematics() {
        let mut c = controller(vec![0]);
        c.tick(ms(0), &TickInput::click(start_point()));
        c.tick(ms(16), &TickInput::pointer(Point::new(460.0, 650.0)));
        c.tick(ms(32), &TickInput::pointer(Point::new(470.0, 640.0)));
        let events = c.tick(ms(900), &TickInput::default());
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], ControllerEvent::SessionCompleted { rounds: 1 });
        assert_eq!(c.state(), SessionState::SessionComplete);

        let results = ClickRegions::default().results.center();
        let events = c.tick(ms(1000), &TickInput::click(results));
        let ControllerEvent::ResultsReady {
            trajectory,
            kinematics,
        } = &events[0]
        else {
            panic!("expected results");
        };
        assert_eq!(trajectory.len(), 3);
        assert_eq!(kinematics.velocities.len(), 2);
        assert_eq!(kinematics.accelerations.len(), 1);
    }

    #[test]
    fn scene_tracks_round_counter() {
        let mut c = controller(vec![10, 10]);
        assert_eq!(c.scene().round_display, (1, 2));
        assert!(c.scene().field.is_none());
        c.tick(ms(0), &TickInput::click(start_point()));
        let scene = c.scene();
        assert_eq!(scene.state, SessionState::Active);
        assert!(scene.field.is_some());
        assert_eq!(scene.active_ticks, 1);
    }
}
