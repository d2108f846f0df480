use crate::sink::TrialSink;
use crate::state::ControllerEvent;
use crate::view::{KinematicsView, VisualizationOutcome};

/// Routes controller events to the persistence and visualization collaborators.
///
/// Collaborator failures are logged and never stop the session. Returns the
/// outcome of the last visualization request, if any.
pub fn dispatch<S, V>(
    events: &[ControllerEvent],
    sink: &mut S,
    view: &mut V,
) -> Option<VisualizationOutcome>
where
    S: TrialSink + ?Sized,
    V: KinematicsView + ?Sized,
{
    let mut outcome = None;
    for event in events {
        match event {
            ControllerEvent::TrialFinalized(record) => {
                if let Err(e) = sink.record(record) {
                    tracing::error!(round = record.round, "failed to persist trial: {e:#}");
                }
            }
            ControllerEvent::SessionCompleted { .. } => {
                if let Err(e) = sink.flush() {
                    tracing::error!("failed to flush results: {e:#}");
                }
            }
            ControllerEvent::ResultsReady {
                trajectory,
                kinematics,
            } => match view.show(trajectory, kinematics) {
                Ok(VisualizationOutcome::InsufficientData) => {
                    tracing::warn!(samples = trajectory.len(), "not enough data to chart");
                    outcome = Some(VisualizationOutcome::InsufficientData);
                }
                Ok(rendered) => outcome = Some(rendered),
                Err(e) => tracing::error!("failed to render kinematics: {e:#}"),
            },
            ControllerEvent::RoundStarted { .. }
            | ControllerEvent::FeedbackShown { .. }
            | ControllerEvent::ChoiceRegionClicked(_) => {}
        }
    }
    outcome
}
