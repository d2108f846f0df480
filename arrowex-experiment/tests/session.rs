use anyhow::Result;
use arrowex_core::{ClickRegions, Point, SessionState};
use arrowex_experiment::{
    dispatch, ControllerEvent, ExperimentConfig, Kinematics, KinematicsView, MemorySink,
    Schedule, TickInput, TrialController, VisualizationOutcome,
};
use arrowex_timing::{ManualTimer, TickPacer, Timer};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Records what it was asked to show
#[derive(Default)]
struct RecordingView {
    calls: Vec<(usize, usize)>,
}

impl KinematicsView for RecordingView {
    fn show(&mut self, trajectory: &[Point], kinematics: &Kinematics) -> Result<VisualizationOutcome> {
        self.calls.push((trajectory.len(), kinematics.velocities.len()));
        if trajectory.len() < 2 {
            return Ok(VisualizationOutcome::InsufficientData);
        }
        Ok(VisualizationOutcome::Rendered("memory".into()))
    }
}

/// Headless participant: clicks start, then drags the pointer right and up.
struct Harness {
    controller: TrialController<StdRng>,
    timer: ManualTimer,
    pacer: TickPacer,
    sink: MemorySink,
    view: RecordingView,
    events: Vec<ControllerEvent>,
    pointer: Point,
}

impl Harness {
    fn new(controller: TrialController<StdRng>) -> Self {
        let rate = controller.config().tick_rate_hz;
        Self {
            controller,
            timer: ManualTimer::new(),
            pacer: TickPacer::new(rate),
            sink: MemorySink::default(),
            view: RecordingView::default(),
            events: Vec::new(),
            pointer: ClickRegions::default().start.center(),
        }
    }

    fn step(&mut self, input: TickInput) -> Option<VisualizationOutcome> {
        let events = self.controller.tick_with(&self.timer, &input);
        let outcome = dispatch(&events, &mut self.sink, &mut self.view);
        self.events.extend(events);
        self.pacer.wait(&self.timer);
        outcome
    }

    fn play_round(&mut self) {
        let start = ClickRegions::default().start.center();
        self.pointer = start;
        self.step(TickInput::click(start));
        assert_eq!(self.controller.state(), SessionState::Active);
        while self.controller.state() == SessionState::Active {
            self.pointer = self.pointer.offset(4.0, -3.0);
            self.step(TickInput::pointer(self.pointer));
        }
        while self.controller.state() == SessionState::Feedback {
            self.step(TickInput::pointer(self.pointer));
        }
    }
}

fn seeded(seed: u64) -> TrialController<StdRng> {
    TrialController::new(ExperimentConfig::default(), StdRng::seed_from_u64(seed))
}

#[test]
fn full_session_reaches_completion() {
    let mut h = Harness::new(seeded(2024));
    let rounds = h.controller.total_rounds();
    assert_eq!(rounds, 10);

    for played in 1..=rounds {
        h.play_round();
        assert_eq!(h.controller.round_index(), played);
    }

    assert_eq!(h.controller.state(), SessionState::SessionComplete);
    assert_eq!(h.controller.round_index(), rounds);
    assert_eq!(h.sink.records.len(), rounds);
    assert_eq!(
        h.events
            .iter()
            .filter(|e| matches!(e, ControllerEvent::SessionCompleted { .. }))
            .count(),
        1
    );

    for (i, record) in h.sink.records.iter().enumerate() {
        assert_eq!(record.round, i + 1);
        assert_eq!(record.zero_motion, u8::from(record.motion_percent == 0));
        assert_eq!(record.end_pos, None);
        // the path climbs from y=655, crossing 525 only in baseline rounds
        assert_eq!(record.crossed_line, u8::from(record.motion_percent == 0));
        assert!(record.area > 0.0);
    }

    let mut percents: Vec<u8> = h.sink.records.iter().map(|r| r.motion_percent).collect();
    percents.sort_unstable();
    assert_eq!(percents, vec![0, 0, 10, 10, 25, 25, 50, 50, 80, 80]);

    let results = ClickRegions::default().results.center();
    let outcome = h.step(TickInput::click(results));
    assert_eq!(outcome, Some(VisualizationOutcome::Rendered("memory".into())));
    let total_samples = h.controller.session_trajectory().len();
    assert_eq!(h.view.calls, vec![(total_samples, total_samples - 1)]);
}

#[test]
fn rounds_sample_every_tick_for_the_active_window() {
    let mut h = Harness::new(seeded(1));
    h.play_round();
    let trial = &h.controller.results()[0];
    // 800 ms at 60 Hz, inclusive of the start tick and the tick at the boundary
    let samples = trial.trajectory.len();
    assert!((48..=50).contains(&samples), "got {samples} samples");
}

#[test]
fn seeded_sessions_are_identical() {
    let a = seeded(77);
    let b = seeded(77);
    assert_eq!(a.schedule(), b.schedule());

    let mut ha = Harness::new(a);
    let mut hb = Harness::new(b);
    let start = ClickRegions::default().start.center();
    ha.step(TickInput::click(start));
    hb.step(TickInput::click(start));
    assert_eq!(ha.controller.current_field(), hb.controller.current_field());
}

#[test]
fn results_without_samples_report_insufficient_data() {
    let controller = TrialController::with_schedule(
        ExperimentConfig::default(),
        StdRng::seed_from_u64(3),
        Schedule::fixed(Vec::new()),
    );
    let mut h = Harness::new(controller);
    assert_eq!(h.controller.state(), SessionState::SessionComplete);

    let results = ClickRegions::default().results.center();
    let outcome = h.step(TickInput::click(results));
    assert_eq!(outcome, Some(VisualizationOutcome::InsufficientData));
    assert_eq!(h.view.calls, vec![(0, 0)]);
}

#[test]
fn timer_drives_the_controller_clock() {
    let mut h = Harness::new(seeded(9));
    h.play_round();
    // paced ticks carry the shared clock past the active window
    assert!(h.timer.since_start() > std::time::Duration::from_millis(800));
    assert_eq!(h.pacer.overruns(), 0);
}
