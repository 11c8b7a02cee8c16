//! Async session host.
//!
//! One tokio task per session owns the [`FocusSession`] and every tick
//! source it needs. Commands, countdown ticks, encouragement ticks and
//! finished message fetches are serialised through a single `select!`
//! loop, so the state machine is only ever touched from one place.
//!
//! Tick sources live in `Option<Ticker>` slots. Arming a slot first empties
//! it, so a restart can never leave two sources of the same kind. Tearing
//! the host down (via [`SessionHandle::shutdown`] or by dropping the
//! handle) drops every slot and aborts in-flight fetches.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tracing::{debug, info, warn};

use super::lifecycle::{FocusSession, Moment, SessionCommand, SessionPhase, Transition};
use super::ticker::{next_tick, TickRegistry, TickSource, Ticker};
use crate::companion::{MessageFuture, MessageSource, MessageStyle, MessageTable};
use crate::error::{HostError, MessageError};
use crate::events::{ChatMessage, Event, MessageKind, WarningSource};
use crate::presentation::{AvatarMood, AvatarState, SessionView};
use crate::storage::SessionStore;

const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

enum Request {
    Command(SessionCommand, oneshot::Sender<Transition>),
    Say(String),
    Shutdown(oneshot::Sender<()>),
}

#[derive(Debug, Clone, Copy)]
enum FetchPurpose {
    /// `epoch` is the run window the request was made in.
    Encouragement { epoch: u64 },
    Reply,
}

struct Fetched {
    purpose: FetchPurpose,
    result: Result<String, MessageError>,
}

/// Builder for a session host task.
pub struct SessionHost {
    session: FocusSession,
    store: Box<dyn SessionStore>,
    messages: Arc<dyn MessageSource>,
    fallback: Arc<MessageTable>,
    registry: TickRegistry,
}

impl SessionHost {
    pub fn new(
        session: FocusSession,
        store: Box<dyn SessionStore>,
        messages: Arc<dyn MessageSource>,
    ) -> Self {
        Self {
            session,
            store,
            messages,
            fallback: Arc::new(MessageTable::builtin()),
            registry: TickRegistry::new(),
        }
    }

    /// Count this host's tick sources in `registry`.
    pub fn with_registry(mut self, registry: TickRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Table used for welcome/status lines and when the message source fails.
    pub fn with_fallback(mut self, table: Arc<MessageTable>) -> Self {
        self.fallback = table;
        self
    }

    /// Spawn the host on the current tokio runtime.
    ///
    /// Returns the control handle and the session's event stream.
    pub fn spawn(self) -> (SessionHandle, mpsc::UnboundedReceiver<Event>) {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let avatar = AvatarState::default();
        let (view_tx, view_rx) =
            watch::channel(view_of(&self.session, &avatar, None, None, moment()));

        let host = HostLoop {
            session: self.session,
            store: self.store,
            messages: self.messages,
            fallback: self.fallback,
            registry: self.registry.clone(),
            countdown: None,
            encouragement: None,
            fetches: JoinSet::new(),
            events: event_tx,
            view: view_tx,
            avatar,
            last_message: None,
            warning: None,
            epoch: 0,
        };

        let task = tokio::spawn(host.run(request_rx));
        let handle = SessionHandle {
            requests: request_tx,
            view: view_rx,
            registry: self.registry,
            task: Some(task),
        };
        (handle, event_rx)
    }
}

fn view_of(
    session: &FocusSession,
    avatar: &AvatarState,
    last_message: Option<String>,
    warning: Option<String>,
    at: Moment,
) -> SessionView {
    let phase = session.phase();
    let config = session.config();
    SessionView {
        phase,
        remaining_secs: session.remaining_secs(),
        duration_secs: config.duration_secs,
        task_label: config.display_label().to_string(),
        last_message,
        mood: avatar.current(phase, at.instant),
        warning,
        sound_enabled: config.sound_enabled,
    }
}

fn moment() -> Moment {
    Moment::new(tokio::time::Instant::now().into_std(), Utc::now())
}

struct HostLoop {
    session: FocusSession,
    store: Box<dyn SessionStore>,
    messages: Arc<dyn MessageSource>,
    fallback: Arc<MessageTable>,
    registry: TickRegistry,
    countdown: Option<Ticker>,
    encouragement: Option<Ticker>,
    fetches: JoinSet<Fetched>,
    events: mpsc::UnboundedSender<Event>,
    view: watch::Sender<SessionView>,
    avatar: AvatarState,
    last_message: Option<String>,
    warning: Option<String>,
    /// Bumped on every start/pause/resume so encouragements requested in an
    /// earlier run window are discarded.
    epoch: u64,
}

impl HostLoop {
    async fn run(mut self, mut requests: mpsc::UnboundedReceiver<Request>) {
        debug!(session = %self.session.session_ref(), "session host running");
        loop {
            tokio::select! {
                biased;
                _ = next_tick(&mut self.countdown) => self.on_countdown_tick(),
                _ = next_tick(&mut self.encouragement) => self.on_encouragement_tick(),
                Some(joined) = self.fetches.join_next(), if !self.fetches.is_empty() => {
                    self.on_fetched(joined);
                }
                request = requests.recv() => match request {
                    Some(Request::Command(command, reply)) => {
                        let transition = self.on_command(command);
                        let _ = reply.send(transition);
                    }
                    Some(Request::Say(text)) => self.on_say(text),
                    Some(Request::Shutdown(ack)) => {
                        self.teardown().await;
                        let _ = ack.send(());
                        return;
                    }
                    None => {
                        self.teardown().await;
                        return;
                    }
                },
            }
        }
    }

    // ── Inputs ───────────────────────────────────────────────────────

    fn on_command(&mut self, command: SessionCommand) -> Transition {
        let at = moment();
        let transition = match command {
            SessionCommand::Start => self.session.start(at),
            SessionCommand::Pause => self.session.pause(at),
            SessionCommand::Resume => self.session.resume(at),
            SessionCommand::End => self.session.end(at),
        };
        self.apply(&transition, at);
        transition
    }

    fn on_countdown_tick(&mut self) {
        let at = moment();
        match self.session.tick(at) {
            Some(transition) => self.apply(&transition, at),
            None => self.publish(at),
        }
    }

    fn on_encouragement_tick(&mut self) {
        let at = moment();
        if self.session.poll_encouragement(at) {
            let request = self.messages.encouragement(self.style());
            self.spawn_fetch(FetchPurpose::Encouragement { epoch: self.epoch }, request);
        }
    }

    fn on_say(&mut self, text: String) {
        let text = text.trim().to_string();
        if text.is_empty() {
            return;
        }
        let request = self.messages.reply(self.style(), &text);
        self.post(ChatMessage::user(text));
        self.avatar.hold(AvatarMood::Thinking);
        self.spawn_fetch(FetchPurpose::Reply, request);
        self.publish(moment());
    }

    fn on_fetched(&mut self, joined: Result<Fetched, JoinError>) {
        let fetched = match joined {
            Ok(fetched) => fetched,
            Err(e) if e.is_cancelled() => return,
            Err(e) => {
                self.report(WarningSource::MessageSource, format!("message task failed: {e}"));
                return;
            }
        };
        let at = moment();
        let style = self.style();
        match fetched.purpose {
            FetchPurpose::Encouragement { epoch } => {
                if epoch != self.epoch || self.session.phase() != SessionPhase::Running {
                    debug!(epoch, current = self.epoch, "dropping stale encouragement");
                    return;
                }
                let text = fetched.result.unwrap_or_else(|e| {
                    self.report(
                        WarningSource::MessageSource,
                        format!("encouragement unavailable: {e}"),
                    );
                    self.fallback.pick_encouragement(style)
                });
                self.post(ChatMessage::companion(MessageKind::Encouragement, text));
                self.avatar.flash(AvatarMood::Encouraging, at.instant);
            }
            FetchPurpose::Reply => {
                let text = fetched.result.unwrap_or_else(|e| {
                    self.report(WarningSource::MessageSource, format!("reply unavailable: {e}"));
                    self.fallback.fallback_reply(style)
                });
                self.post(ChatMessage::companion(MessageKind::Reply, text));
                self.avatar.release();
            }
        }
        self.publish(at);
    }

    // ── Transitions ──────────────────────────────────────────────────

    fn apply(&mut self, transition: &Transition, at: Moment) {
        let status = self.fallback.status().clone();
        match transition {
            Transition::Started(start) => {
                info!(
                    session = %start.session,
                    kind = %start.config.kind,
                    duration_secs = start.config.duration_secs,
                    "session started"
                );
                self.arm();
                self.emit(Event::SessionStarted {
                    session: start.session.clone(),
                    kind: start.config.kind,
                    task_label: start.config.display_label().to_string(),
                    duration_secs: start.config.duration_secs,
                    at: start.started_at,
                });
                if let Err(e) = self.store.record_session_start(start) {
                    self.report(
                        WarningSource::Persistence,
                        format!("could not record session start: {e}"),
                    );
                }
                let welcome = self.fallback.welcome(self.style());
                self.post(ChatMessage::companion(MessageKind::Welcome, welcome));
                self.avatar.flash(AvatarMood::Encouraging, at.instant);
            }
            Transition::Paused { remaining_secs } => {
                info!(remaining_secs, "session paused");
                self.disarm();
                self.emit(Event::SessionPaused {
                    remaining_secs: *remaining_secs,
                    at: at.wall,
                });
                self.post(ChatMessage::companion(MessageKind::Status, status.paused));
                self.avatar.release();
            }
            Transition::Resumed { remaining_secs } => {
                info!(remaining_secs, "session resumed");
                self.arm();
                self.emit(Event::SessionResumed {
                    remaining_secs: *remaining_secs,
                    at: at.wall,
                });
                self.post(ChatMessage::companion(MessageKind::Status, status.resumed));
            }
            Transition::Completed(outcome) => {
                info!(session = %outcome.session, elapsed_secs = outcome.elapsed_secs, "session completed");
                self.disarm();
                self.emit(Event::SessionCompleted {
                    session: outcome.session.clone(),
                    elapsed_secs: outcome.elapsed_secs,
                    at: outcome.ended_at,
                });
                if let Err(e) = self.store.record_session_end(outcome) {
                    self.report(
                        WarningSource::Persistence,
                        format!("could not record session end: {e}"),
                    );
                }
                self.post(ChatMessage::companion(MessageKind::Status, status.completed));
            }
            Transition::EndedEarly(outcome) => {
                info!(session = %outcome.session, elapsed_secs = outcome.elapsed_secs, "session ended early");
                self.disarm();
                self.emit(Event::SessionEndedEarly {
                    session: outcome.session.clone(),
                    elapsed_secs: outcome.elapsed_secs,
                    remaining_secs: outcome.remaining_secs,
                    at: outcome.ended_at,
                });
                if let Err(e) = self.store.record_session_end(outcome) {
                    self.report(
                        WarningSource::Persistence,
                        format!("could not record session end: {e}"),
                    );
                }
                self.post(ChatMessage::companion(MessageKind::Status, status.ended_early));
            }
            Transition::Rejected { command, phase } => {
                debug!(?command, %phase, "command ignored");
                return;
            }
        }
        self.publish(at);
    }

    /// Lease fresh tick sources, releasing any previous ones first.
    fn arm(&mut self) {
        self.disarm();
        self.epoch += 1;
        let interval = Duration::from_secs(self.session.config().encouragement_interval_secs);
        // After a pause mid-second, the first tick lands on the next whole second remaining.
        let first = match self.session.remaining_ms() % 1000 {
            0 => COUNTDOWN_PERIOD,
            partial => Duration::from_millis(partial),
        };
        self.countdown = Some(Ticker::after(
            first,
            COUNTDOWN_PERIOD,
            self.registry.lease(TickSource::Countdown),
        ));
        self.encouragement = Some(Ticker::every(
            interval,
            self.registry.lease(TickSource::Encouragement),
        ));
    }

    fn disarm(&mut self) {
        let countdown = self.countdown.take();
        let encouragement = self.encouragement.take();
        if countdown.is_some() || encouragement.is_some() {
            self.epoch += 1;
        }
    }

    async fn teardown(&mut self) {
        let phase = self.session.phase();
        if matches!(phase, SessionPhase::Running | SessionPhase::Paused) {
            info!(session = %self.session.session_ref(), %phase, "session discarded");
        }
        self.disarm();
        self.fetches.shutdown().await;
    }

    // ── Outputs ──────────────────────────────────────────────────────

    fn spawn_fetch(&mut self, purpose: FetchPurpose, request: MessageFuture<String>) {
        let lease = self.registry.lease(TickSource::MessageFetch);
        self.fetches.spawn(async move {
            let _lease = lease;
            Fetched {
                purpose,
                result: request.await,
            }
        });
    }

    fn style(&self) -> MessageStyle {
        self.session.config().message_style
    }

    fn emit(&self, event: Event) {
        // No receiver just means nobody is watching.
        let _ = self.events.send(event);
    }

    fn post(&mut self, message: ChatMessage) {
        self.last_message = Some(message.text.clone());
        self.emit(Event::Message(message));
    }

    fn report(&mut self, source: WarningSource, message: String) {
        warn!(?source, %message, "collaborator failure");
        self.warning = Some(message.clone());
        self.emit(Event::warning(source, message));
    }

    fn publish(&self, at: Moment) {
        let view = view_of(
            &self.session,
            &self.avatar,
            self.last_message.clone(),
            self.warning.clone(),
            at,
        );
        self.view.send_if_modified(|current| {
            if *current == view {
                return false;
            }
            *current = view;
            true
        });
    }
}

/// Control handle for a running session host.
///
/// Dropping the handle aborts the host task, which releases every tick
/// source; prefer [`SessionHandle::shutdown`] to wait for that to finish.
pub struct SessionHandle {
    requests: mpsc::UnboundedSender<Request>,
    view: watch::Receiver<SessionView>,
    registry: TickRegistry,
    task: Option<JoinHandle<()>>,
}

impl SessionHandle {
    pub async fn start(&self) -> Result<Transition, HostError> {
        self.command(SessionCommand::Start).await
    }

    pub async fn pause(&self) -> Result<Transition, HostError> {
        self.command(SessionCommand::Pause).await
    }

    pub async fn resume(&self) -> Result<Transition, HostError> {
        self.command(SessionCommand::Resume).await
    }

    pub async fn end(&self) -> Result<Transition, HostError> {
        self.command(SessionCommand::End).await
    }

    /// Send a command and wait for the transition it produced.
    pub async fn command(&self, command: SessionCommand) -> Result<Transition, HostError> {
        let (tx, rx) = oneshot::channel();
        self.requests
            .send(Request::Command(command, tx))
            .map_err(|_| HostError::Closed)?;
        rx.await.map_err(|_| HostError::Closed)
    }

    /// Send a chat message to the companion. The reply arrives as an event.
    pub fn say(&self, text: impl Into<String>) -> Result<(), HostError> {
        self.requests
            .send(Request::Say(text.into()))
            .map_err(|_| HostError::Closed)
    }

    /// Latest published view.
    pub fn view(&self) -> SessionView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.view.clone()
    }

    pub fn registry(&self) -> &TickRegistry {
        &self.registry
    }

    /// Tear the host down and wait until every tick source is released.
    pub async fn shutdown(mut self) -> Result<(), HostError> {
        let (tx, rx) = oneshot::channel();
        if self.requests.send(Request::Shutdown(tx)).is_ok() {
            let _ = rx.await;
        }
        if let Some(task) = self.task.take() {
            task.await.map_err(|_| HostError::Closed)?;
        }
        Ok(())
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
