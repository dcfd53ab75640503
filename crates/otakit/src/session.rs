use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::EngineError;

/// Phase of the one in-flight update session.
///
/// OTA sessions move `Idle -> Downloading -> Extracting -> Replacing ->
/// Idle`; force sessions move `Idle -> Downloading -> AwaitingInstall ->
/// Idle`. Failures return to `Idle` with the error delivered through the
/// notification channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdatePhase {
    #[default]
    Idle,
    Downloading,
    Extracting,
    Replacing,
    AwaitingInstall,
}

#[derive(Debug, Default)]
struct SessionState {
    phase:    UpdatePhase,
    progress: f32,
}

/// Tracks the single in-flight download/apply operation of an updater.
///
/// The phase is the sole mutual-exclusion mechanism: acquisition is
/// fail-fast, not queued. Cloning shares the same underlying state so
/// progress reported from a download callback lands in the same session.
#[derive(Clone, Default)]
pub(crate) struct Session {
    state: Arc<Mutex<SessionState>>,
}

impl Session {
    pub fn new() -> Self { Self::default() }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn phase(&self) -> UpdatePhase { self.lock().phase }

    pub fn progress(&self) -> f32 { self.lock().progress }

    /// Begin a session, entering `Downloading`. Fails fast with
    /// [`EngineError::AlreadyInProgress`] if one is already running; the
    /// in-flight session is left untouched.
    pub fn begin(&self) -> Result<SessionGuard, EngineError> {
        let mut state = self.lock();
        if state.phase != UpdatePhase::Idle {
            return Err(EngineError::AlreadyInProgress);
        }
        state.phase = UpdatePhase::Downloading;
        state.progress = 0.0;
        drop(state);

        Ok(SessionGuard {
            session: self.clone(),
        })
    }

    /// Advance progress, clamped to [0, 1] and never backwards within a
    /// session. Returns the effective value.
    pub fn advance_progress(&self, fraction: f32) -> f32 {
        let mut state = self.lock();
        state.progress = state.progress.max(fraction.clamp(0.0, 1.0));
        state.progress
    }

    fn set_phase(&self, phase: UpdatePhase) { self.lock().phase = phase; }

    fn reset(&self) {
        let mut state = self.lock();
        state.phase = UpdatePhase::Idle;
        state.progress = 0.0;
    }
}

/// Holds the session active; returns it to `Idle` when dropped, on success
/// and failure alike.
pub(crate) struct SessionGuard {
    session: Session,
}

impl SessionGuard {
    pub fn set_phase(&self, phase: UpdatePhase) { self.session.set_phase(phase); }
}

impl Drop for SessionGuard {
    fn drop(&mut self) { self.session.reset(); }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_begin_fails_fast() {
        let session = Session::new();
        let _guard = session.begin().unwrap();

        assert!(matches!(session.begin(), Err(EngineError::AlreadyInProgress)));
        // The in-flight session is untouched by the rejected call.
        assert_eq!(session.phase(), UpdatePhase::Downloading);
    }

    #[test]
    fn test_guard_resets_on_drop() {
        let session = Session::new();
        {
            let guard = session.begin().unwrap();
            guard.set_phase(UpdatePhase::Extracting);
            session.advance_progress(0.8);
        }
        assert_eq!(session.phase(), UpdatePhase::Idle);
        assert_eq!(session.progress(), 0.0);
        assert!(session.begin().is_ok());
    }

    #[test]
    fn test_progress_is_monotonic_and_clamped() {
        let session = Session::new();
        let _guard = session.begin().unwrap();

        assert_eq!(session.advance_progress(0.5), 0.5);
        assert_eq!(session.advance_progress(0.3), 0.5);
        assert_eq!(session.advance_progress(0.7), 0.7);
        assert_eq!(session.advance_progress(7.0), 1.0);
        assert_eq!(session.advance_progress(-1.0), 1.0);
    }
}
