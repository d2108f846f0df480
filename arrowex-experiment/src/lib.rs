pub mod analysis;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod field;
pub mod schedule;
pub mod sink;
pub mod state;
pub mod trial;
pub mod view;

pub use analysis::{compute_deviation, compute_kinematics, polygon_area, Kinematics};
pub use config::{ExperimentConfig, FieldBounds, FieldConfig};
pub use dispatch::dispatch;
pub use error::ConfigError;
pub use field::{motion_count, FieldGenerator};
pub use schedule::Schedule;
pub use sink::{write_summary, JsonLinesSink, MemorySink, TrialSink};
pub use state::{ControllerEvent, Scene, TickInput, TrialController};
pub use trial::Trial;
pub use view::{has_enough_data, KinematicsView, VisualizationOutcome};
