use std::sync::{Arc, Mutex};

use crate::error::Result;
use crate::session::{SessionOutcome, SessionStart};

/// Persistence collaborator notified on session transitions.
///
/// Calls happen after the local transition has been applied; an `Err` is
/// reported as a warning and never rolls the session back. `record_session_end`
/// may arrive for a session whose start was never stored, so implementations
/// must upsert.
pub trait SessionStore: Send {
    fn record_session_start(&mut self, start: &SessionStart) -> Result<()>;

    fn record_session_end(&mut self, outcome: &SessionOutcome) -> Result<()>;
}

#[derive(Debug, Default)]
struct Recorded {
    starts: Vec<SessionStart>,
    ends: Vec<SessionOutcome>,
}

/// In-memory store. Clones share the same records, so a caller can keep
/// one clone to inspect what a session host stored.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Recorded>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starts(&self) -> Vec<SessionStart> {
        self.lock().starts.clone()
    }

    pub fn ends(&self) -> Vec<SessionOutcome> {
        self.lock().ends.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Recorded> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SessionStore for MemoryStore {
    fn record_session_start(&mut self, start: &SessionStart) -> Result<()> {
        self.lock().starts.push(start.clone());
        Ok(())
    }

    fn record_session_end(&mut self, outcome: &SessionOutcome) -> Result<()> {
        self.lock().ends.push(outcome.clone());
        Ok(())
    }
}
