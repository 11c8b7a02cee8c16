//! # FocusJuju Core Library
//!
//! Core logic for FocusJuju, a body-doubling focus timer with a chat-style
//! companion. The CLI binary is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Session**: a pure, monotonic-clock state machine ([`FocusSession`])
//!   and an async host ([`SessionHost`]) that owns its tick sources
//! - **Companion**: pluggable message sources for encouragement, chat
//!   replies, task breakdowns and personal advice
//! - **Storage**: SQLite persistence and TOML configuration
//!
//! ## Key Components
//!
//! - [`FocusSession`]: session lifecycle
//! - [`SessionHost`] / [`SessionHandle`]: async driver and its control handle
//! - [`MessageSource`]: trait for companion text sources
//! - [`Database`]: sessions, moods, micro-goals and tasks
//! - [`Config`]: application configuration management

pub mod advice;
pub mod companion;
pub mod error;
pub mod events;
pub mod goals;
pub mod mood;
pub mod presentation;
pub mod session;
pub mod stats;
pub mod storage;
pub mod tasks;

pub use advice::{Advice, AdviceContext, RecommendedSession};
pub use companion::{LlmMessageSource, MessageSource, MessageStyle, MessageTable};
pub use error::{ConfigError, CoreError, DatabaseError, HostError, MessageError, ValidationError};
pub use events::{ChatMessage, Event, MessageKind, Sender, WarningSource};
pub use goals::{MicroGoal, Priority, StoredGoal};
pub use mood::MoodEntry;
pub use presentation::{AvatarMood, SessionView};
pub use session::{
    EndStatus, FocusSession, SessionCommand, SessionConfig, SessionHandle, SessionHost,
    SessionKind, SessionOutcome, SessionPhase, SessionRef, SessionStart, TickRegistry,
    TickSource, Transition,
};
pub use stats::FocusStats;
pub use storage::{Config, Database, MemoryStore, SessionStore};
pub use tasks::{Task, TaskDraft, TaskEdit};
