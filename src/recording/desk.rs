//! Ride desk: the context that owns the active ride session.
//!
//! At most one session exists at a time. Operations are addressed with the
//! [`SessionId`] handed out by [`RideDesk::start`]; a handle from a saved,
//! discarded or replaced session is rejected.

use uuid::Uuid;

use super::clock::Clock;
use super::session::{RideEvent, RideFrame, RideSession};
use super::types::{Mark, Ride, RideError};
use crate::routes::Route;
use crate::storage::config::DuelSettings;

/// Handle to a ride session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Underlying session UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

/// Holds the clock and the single active session.
pub struct RideDesk<C: Clock> {
    clock: C,
    settings: DuelSettings,
    session: Option<RideSession>,
}

impl<C: Clock> RideDesk<C> {
    /// Create a desk with no active session.
    pub fn new(clock: C, settings: DuelSettings) -> Self {
        Self {
            clock,
            settings,
            session: None,
        }
    }

    /// Start a ride. Fails while another session exists.
    pub fn start(&mut self, route: &Route, rides: &[Ride]) -> Result<SessionId, RideError> {
        if self.session.is_some() {
            tracing::warn!("Refusing to start a ride while another is in progress");
            return Err(RideError::SessionInProgress);
        }

        let session = RideSession::start(route, rides, self.clock.now_ms(), self.settings.clone())?;
        let id = SessionId(session.id());
        self.session = Some(session);
        Ok(id)
    }

    /// Mark the next checkpoint.
    pub fn mark_next_checkpoint(
        &mut self,
        id: SessionId,
        rides: &[Ride],
    ) -> Result<Vec<RideEvent>, RideError> {
        let now = self.clock.now_ms();
        self.session_mut(id)?.mark_next_checkpoint(now, rides)
    }

    /// Remove the last mark.
    pub fn undo(&mut self, id: SessionId) -> Result<Option<Mark>, RideError> {
        Ok(self.session_mut(id)?.undo())
    }

    /// Stop the clock.
    pub fn stop(&mut self, id: SessionId, rides: &[Ride]) -> Result<Vec<RideEvent>, RideError> {
        let now = self.clock.now_ms();
        Ok(self.session_mut(id)?.stop(now, rides))
    }

    /// Current elapsed time.
    pub fn elapsed_ms(&self, id: SessionId) -> Result<f64, RideError> {
        Ok(self.session_ref(id)?.current_elapsed_ms(self.clock.now_ms()))
    }

    /// Render state for the current clock reading.
    pub fn tick(
        &self,
        id: SessionId,
        rides: &[Ride],
        track_width_px: f64,
    ) -> Result<RideFrame, RideError> {
        Ok(self
            .session_ref(id)?
            .tick(self.clock.now_ms(), rides, track_width_px))
    }

    /// Finish the session and hand back the ride to persist.
    ///
    /// The session is consumed; its handle becomes stale.
    pub fn save(
        &mut self,
        id: SessionId,
        rides: &[Ride],
        runner_name: Option<&str>,
        note: Option<&str>,
    ) -> Result<(Ride, Vec<RideEvent>), RideError> {
        let now = self.clock.now_ms();
        let (ride, events) = self
            .session_mut(id)?
            .to_persistable_ride(now, rides, runner_name, note);
        self.session = None;

        tracing::info!("Ride {} ready to save ({:.0} ms)", ride.id, ride.total_ms);
        Ok((ride, events))
    }

    /// Drop the session without saving.
    pub fn discard(&mut self, id: SessionId) -> Result<(), RideError> {
        self.session_ref(id)?;
        self.session = None;
        tracing::info!("Discarded ride session");
        Ok(())
    }

    /// The active session, if any.
    pub fn session(&self) -> Option<&RideSession> {
        self.session.as_ref()
    }

    /// Handle of the active session, if any.
    pub fn active_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|s| SessionId(s.id()))
    }

    fn session_ref(&self, id: SessionId) -> Result<&RideSession, RideError> {
        match &self.session {
            None => Err(RideError::NoActiveSession),
            Some(session) if session.id() != id.0 => Err(RideError::StaleSession(id.0)),
            Some(session) => Ok(session),
        }
    }

    fn session_mut(&mut self, id: SessionId) -> Result<&mut RideSession, RideError> {
        match &mut self.session {
            None => Err(RideError::NoActiveSession),
            Some(session) if session.id() != id.0 => Err(RideError::StaleSession(id.0)),
            Some(session) => Ok(session),
        }
    }
}
