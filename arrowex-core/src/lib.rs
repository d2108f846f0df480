pub mod geometry;
pub mod region;
pub mod state;
pub mod stimulus;
pub mod trial;

pub use geometry::{Point, Rect};
pub use region::{ClickRegions, Region};
pub use state::SessionState;
pub use stimulus::{GlobalDirection, StimulusElement, StimulusField};
pub use trial::{Choice, Deviation, TrialRecord};
