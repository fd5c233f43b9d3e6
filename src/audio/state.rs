//! Recorder state machine and its shared, pollable handle.
//!
//! [`SessionState`] drives the capture session.  The UI layer reads it via
//! [`SharedState`] to enable/disable its controls.
//!
//! [`SharedState`] is a type alias for `Arc<Mutex<SessionState>>` — cheap to
//! clone and safe to share between the control thread and the capture worker.

use std::sync::{Arc, Mutex};

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// States of a recording session.
///
/// The state machine transitions are:
///
/// ```text
/// Idle ──start──▶ Recording ──stop──▶ Stopped ──save──▶ Idle
///                           ──device fault──▶ Stopped
/// Stopped ──start──▶ Recording   (previous buffer discarded)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No capture has run yet, or the last recording was saved.
    Idle,

    /// The device is open and the worker is appending chunks to the buffer.
    Recording,

    /// Capture has finished; the buffer is complete and may be saved.
    Stopped,
}

impl SessionState {
    /// Returns `true` while the capture worker is running.
    pub fn is_recording(&self) -> bool {
        matches!(self, SessionState::Recording)
    }

    /// A short human-readable label suitable for a status line.
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Idle => "Idle",
            SessionState::Recording => "Recording",
            SessionState::Stopped => "Stopped",
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Idle
    }
}

// ---------------------------------------------------------------------------
// SharedState
// ---------------------------------------------------------------------------

/// Thread-safe handle to the current [`SessionState`].
///
/// The session mutates it on transitions; the UI polls it.  Lock only for
/// the read or write itself — never across a blocking call.
pub type SharedState = Arc<Mutex<SessionState>>;

/// Construct a new [`SharedState`] starting at [`SessionState::Idle`].
pub fn new_shared_state() -> SharedState {
    Arc::new(Mutex::new(SessionState::Idle))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- is_recording ---

    #[test]
    fn only_recording_is_recording() {
        assert!(!SessionState::Idle.is_recording());
        assert!(SessionState::Recording.is_recording());
        assert!(!SessionState::Stopped.is_recording());
    }

    // ---- label ---

    #[test]
    fn labels_match_states() {
        assert_eq!(SessionState::Idle.label(), "Idle");
        assert_eq!(SessionState::Recording.label(), "Recording");
        assert_eq!(SessionState::Stopped.label(), "Stopped");
    }

    // ---- Default / SharedState ---

    #[test]
    fn default_state_is_idle() {
        assert_eq!(SessionState::default(), SessionState::Idle);
    }

    #[test]
    fn shared_state_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedState>();
    }

    #[test]
    fn shared_state_clones_observe_writes() {
        let state = new_shared_state();
        let state2 = Arc::clone(&state);

        *state.lock().unwrap() = SessionState::Recording;
        assert_eq!(*state2.lock().unwrap(), SessionState::Recording);
    }
}
