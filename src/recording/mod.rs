//! Recording module: ride timing sessions and saved rides.

pub mod clock;
pub mod desk;
pub mod session;
pub mod types;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use desk::{RideDesk, SessionId};
pub use session::{CheckpointFeedback, FinishFeedback, RideEvent, RideFrame, RideSession, SplitLine};
pub use types::{Mark, Ride, RideError, RideStatus};
