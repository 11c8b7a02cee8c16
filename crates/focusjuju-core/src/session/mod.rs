//! Focus sessions: configuration, the pure state machine and the async
//! host that drives it.

mod config;
mod countdown;
mod encouragement;
mod host;
mod lifecycle;
mod ticker;

pub use config::{SessionConfig, SessionKind, DEFAULT_TASK_LABEL};
pub use countdown::{Countdown, TickOutcome};
pub use encouragement::EncouragementScheduler;
pub use host::{SessionHandle, SessionHost};
pub use lifecycle::{
    EndStatus, FocusSession, Moment, SessionCommand, SessionOutcome, SessionPhase, SessionRef,
    SessionStart, Transition,
};
pub use ticker::{next_tick, TickLease, TickRegistry, TickSource, Ticker};
