//! Focus session state machine.
//!
//! ```text
//! Setup -> Running <-> Paused
//!          Running -> Completed            (countdown expired)
//!          Running | Paused -> EndedEarly  (user ended)
//! ```
//!
//! `FocusSession` is pure: it never schedules anything and never talks to
//! collaborators. Every command takes the current [`Moment`] and returns a
//! [`Transition`] describing what happened; the session host turns those
//! into tick-source changes, persistence calls and events.

use std::fmt;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::config::{SessionConfig, SessionKind};
use super::countdown::{Countdown, TickOutcome};
use super::encouragement::EncouragementScheduler;
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Setup,
    Running,
    Paused,
    Completed,
    EndedEarly,
}

impl SessionPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionPhase::Completed | SessionPhase::EndedEarly)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionPhase::Setup => "setup",
            SessionPhase::Running => "running",
            SessionPhase::Paused => "paused",
            SessionPhase::Completed => "completed",
            SessionPhase::EndedEarly => "ended_early",
        };
        f.write_str(s)
    }
}

/// Identifier under which a session is persisted.
///
/// Minted locally when the session is created, so a persistence "end" call
/// never depends on the "start" call having succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionRef(Uuid);

impl SessionRef {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionRef {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for SessionRef {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A point in time as seen by the session: a monotonic instant for
/// measuring elapsed time and a wall-clock timestamp for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moment {
    pub instant: Instant,
    pub wall: DateTime<Utc>,
}

impl Moment {
    pub fn new(instant: Instant, wall: DateTime<Utc>) -> Self {
        Self { instant, wall }
    }

    pub fn now() -> Self {
        Self::new(Instant::now(), Utc::now())
    }
}

/// User-issued command, reported back when rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionCommand {
    Start,
    Pause,
    Resume,
    End,
}

/// How a session finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndStatus {
    Completed,
    EndedEarly,
}

impl EndStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EndStatus::Completed => "completed",
            EndStatus::EndedEarly => "ended-early",
        }
    }
}

impl std::str::FromStr for EndStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(EndStatus::Completed),
            "ended-early" => Ok(EndStatus::EndedEarly),
            other => Err(ValidationError::UnknownVariant {
                kind: "end status",
                value: other.to_string(),
            }),
        }
    }
}

/// Payload of the persistence "session begun" notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStart {
    pub session: SessionRef,
    pub config: SessionConfig,
    pub started_at: DateTime<Utc>,
}

/// Payload of the persistence "session ended" notification.
///
/// Carries the session's planned shape too, so a store that never saw the
/// start can still write a complete record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub session: SessionRef,
    pub kind: SessionKind,
    pub task_label: String,
    pub duration_secs: u64,
    pub status: EndStatus,
    pub elapsed_secs: u64,
    pub remaining_secs: u64,
    pub ended_at: DateTime<Utc>,
}

/// Result of applying a command or tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Started(SessionStart),
    Paused { remaining_secs: u64 },
    Resumed { remaining_secs: u64 },
    Completed(SessionOutcome),
    EndedEarly(SessionOutcome),
    /// Command not valid in the current phase; nothing changed.
    Rejected {
        command: SessionCommand,
        phase: SessionPhase,
    },
}

impl Transition {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Transition::Rejected { .. })
    }
}

/// One focus session, from setup to a terminal phase.
#[derive(Debug, Clone)]
pub struct FocusSession {
    session: SessionRef,
    config: SessionConfig,
    phase: SessionPhase,
    countdown: Countdown,
    encouragement: EncouragementScheduler,
    started: Option<Moment>,
    elapsed_secs: Option<u64>,
}

impl FocusSession {
    pub fn new(config: SessionConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self {
            session: SessionRef::new(),
            countdown: Countdown::new(config.duration_secs),
            encouragement: EncouragementScheduler::new(config.encouragement_interval_secs),
            config,
            phase: SessionPhase::Setup,
            started: None,
            elapsed_secs: None,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn session_ref(&self) -> &SessionRef {
        &self.session
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u64 {
        self.countdown.remaining_secs()
    }

    pub fn remaining_ms(&self) -> u64 {
        self.countdown.remaining_ms()
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started.map(|m| m.wall)
    }

    /// Elapsed seconds reported when the session ended, `None` before.
    pub fn elapsed_secs(&self) -> Option<u64> {
        self.elapsed_secs
    }

    pub fn countdown_running(&self) -> bool {
        self.countdown.is_running()
    }

    pub fn encouragement_active(&self) -> bool {
        self.encouragement.is_active()
    }

    pub fn encouragements_fired(&self) -> u32 {
        self.encouragement.fired()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Replace the config. Only allowed in `Setup`; returns `Ok(false)` in
    /// any other phase.
    pub fn reconfigure(&mut self, config: SessionConfig) -> Result<bool, ValidationError> {
        if self.phase != SessionPhase::Setup {
            debug!(phase = %self.phase, "reconfigure ignored outside setup");
            return Ok(false);
        }
        config.validate()?;
        self.countdown = Countdown::new(config.duration_secs);
        self.encouragement = EncouragementScheduler::new(config.encouragement_interval_secs);
        self.config = config;
        Ok(true)
    }

    pub fn start(&mut self, at: Moment) -> Transition {
        match self.phase {
            SessionPhase::Setup => {
                self.phase = SessionPhase::Running;
                self.started = Some(at);
                self.countdown.start(at.instant);
                self.encouragement.start(at.instant);
                Transition::Started(SessionStart {
                    session: self.session.clone(),
                    config: self.config.clone(),
                    started_at: at.wall,
                })
            }
            SessionPhase::Paused => self.resume(at),
            _ => self.reject(SessionCommand::Start),
        }
    }

    pub fn pause(&mut self, at: Moment) -> Transition {
        if self.phase != SessionPhase::Running {
            return self.reject(SessionCommand::Pause);
        }
        // Time may have run out since the last tick.
        if let Some(done) = self.tick(at) {
            return done;
        }
        self.countdown.pause(at.instant);
        self.encouragement.stop();
        self.phase = SessionPhase::Paused;
        Transition::Paused {
            remaining_secs: self.remaining_secs(),
        }
    }

    pub fn resume(&mut self, at: Moment) -> Transition {
        if self.phase != SessionPhase::Paused {
            return self.reject(SessionCommand::Resume);
        }
        self.countdown.start(at.instant);
        self.encouragement.start(at.instant);
        self.phase = SessionPhase::Running;
        Transition::Resumed {
            remaining_secs: self.remaining_secs(),
        }
    }

    /// End the session at the user's request.
    pub fn end(&mut self, at: Moment) -> Transition {
        if !matches!(self.phase, SessionPhase::Running | SessionPhase::Paused) {
            return self.reject(SessionCommand::End);
        }
        if let Some(done) = self.tick(at) {
            return done;
        }
        self.countdown.stop(at.instant);
        self.encouragement.stop();
        self.phase = SessionPhase::EndedEarly;
        let elapsed_secs = self
            .started
            .map(|s| {
                let elapsed = at.instant.saturating_duration_since(s.instant);
                elapsed.as_secs_f64().round() as u64
            })
            .unwrap_or(0);
        self.elapsed_secs = Some(elapsed_secs);
        Transition::EndedEarly(self.outcome(EndStatus::EndedEarly, elapsed_secs, at))
    }

    /// Advance the countdown. Returns `Some(Transition::Completed)` exactly
    /// once, when the remaining time reaches zero.
    pub fn tick(&mut self, at: Moment) -> Option<Transition> {
        if self.phase != SessionPhase::Running {
            return None;
        }
        match self.countdown.tick(at.instant) {
            TickOutcome::Expired => {
                self.encouragement.stop();
                self.phase = SessionPhase::Completed;
                let elapsed_secs = self.config.duration_secs;
                self.elapsed_secs = Some(elapsed_secs);
                Some(Transition::Completed(self.outcome(
                    EndStatus::Completed,
                    elapsed_secs,
                    at,
                )))
            }
            TickOutcome::Advanced { .. } | TickOutcome::Idle => None,
        }
    }

    /// Whether an encouragement is due. Only ever true while running.
    pub fn poll_encouragement(&mut self, at: Moment) -> bool {
        self.phase == SessionPhase::Running && self.encouragement.poll(at.instant)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn outcome(&self, status: EndStatus, elapsed_secs: u64, at: Moment) -> SessionOutcome {
        SessionOutcome {
            session: self.session.clone(),
            kind: self.config.kind,
            task_label: self.config.display_label().to_string(),
            duration_secs: self.config.duration_secs,
            status,
            elapsed_secs,
            remaining_secs: self.remaining_secs(),
            ended_at: at.wall,
        }
    }

    fn reject(&self, command: SessionCommand) -> Transition {
        debug!(?command, phase = %self.phase, "transition rejected");
        Transition::Rejected {
            command,
            phase: self.phase,
        }
    }
}
