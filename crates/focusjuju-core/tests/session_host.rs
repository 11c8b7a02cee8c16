use std::sync::Arc;
use std::time::Duration;

use focusjuju_core::advice::{Advice, AdviceContext};
use focusjuju_core::companion::MessageFuture;
use focusjuju_core::error::Result as CoreResult;
use focusjuju_core::{
    CoreError, DatabaseError, EndStatus, Event, FocusSession, MemoryStore, MessageError,
    MessageKind, MessageSource, MessageStyle, MessageTable, MicroGoal, SessionCommand,
    SessionConfig, SessionHandle, SessionHost, SessionOutcome, SessionPhase, SessionStart,
    SessionStore, TickRegistry, TickSource, Transition, WarningSource,
};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::sleep;

fn table() -> Arc<MessageTable> {
    Arc::new(MessageTable::seeded(11))
}

fn spawn_with(
    duration_secs: u64,
    interval_secs: u64,
    store: Box<dyn SessionStore>,
    messages: Arc<dyn MessageSource>,
) -> (SessionHandle, UnboundedReceiver<Event>) {
    let config = SessionConfig::new(duration_secs, interval_secs)
        .unwrap()
        .with_task_label("Write report");
    let session = FocusSession::new(config).unwrap();
    SessionHost::new(session, store, messages)
        .with_registry(TickRegistry::new())
        .with_fallback(table())
        .spawn()
}

fn spawn(duration_secs: u64, interval_secs: u64, store: MemoryStore) -> (SessionHandle, UnboundedReceiver<Event>) {
    spawn_with(duration_secs, interval_secs, Box::new(store), table())
}

/// Collect events up to and including the first terminal one.
async fn until_terminal(events: &mut UnboundedReceiver<Event>) -> Vec<Event> {
    let mut seen = Vec::new();
    while let Some(event) = events.recv().await {
        let done = event.is_terminal();
        seen.push(event);
        if done {
            break;
        }
    }
    seen
}

fn drain(events: &mut UnboundedReceiver<Event>) -> Vec<Event> {
    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    seen
}

fn count_messages(events: &[Event], kind: MessageKind) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, Event::Message(m) if m.kind == kind))
        .count()
}

#[tokio::test(start_paused = true)]
async fn session_runs_to_completion() {
    let store = MemoryStore::new();
    let (handle, mut events) = spawn(5, 2, store.clone());

    let started = handle.start().await.unwrap();
    assert!(matches!(started, Transition::Started(_)));
    assert_eq!(handle.registry().active(TickSource::Countdown), 1);
    assert_eq!(handle.registry().active(TickSource::Encouragement), 1);

    let seen = until_terminal(&mut events).await;
    assert!(matches!(seen.first(), Some(Event::SessionStarted { duration_secs: 5, .. })));
    assert!(matches!(
        seen.last(),
        Some(Event::SessionCompleted { elapsed_secs: 5, .. })
    ));
    assert_eq!(count_messages(&seen, MessageKind::Welcome), 1);
    assert_eq!(count_messages(&seen, MessageKind::Encouragement), 2);

    let view = handle.view();
    assert_eq!(view.phase, SessionPhase::Completed);
    assert_eq!(view.remaining_secs, 0);
    assert_eq!(view.task_label, "Write report");
    assert_eq!(handle.registry().active(TickSource::Countdown), 0);
    assert_eq!(handle.registry().active(TickSource::Encouragement), 0);

    assert_eq!(store.starts().len(), 1);
    let ends = store.ends();
    assert_eq!(ends.len(), 1);
    assert_eq!(ends[0].status, EndStatus::Completed);
    assert_eq!(ends[0].elapsed_secs, 5);
    assert_eq!(ends[0].session, store.starts()[0].session);
}

#[tokio::test(start_paused = true)]
async fn view_counts_down_each_second() {
    let (handle, _events) = spawn(10, 5, MemoryStore::new());
    let mut view = handle.subscribe();
    assert_eq!(view.borrow().remaining_secs, 10);
    assert_eq!(view.borrow().phase, SessionPhase::Setup);

    handle.start().await.unwrap();
    sleep(Duration::from_millis(3500)).await;
    assert_eq!(handle.view().remaining_secs, 7);

    view.mark_unchanged();
    view.changed().await.unwrap();
    assert_eq!(view.borrow().remaining_secs, 6);
}

#[tokio::test(start_paused = true)]
async fn pause_freezes_countdown_and_releases_tickers() {
    let store = MemoryStore::new();
    let (handle, mut events) = spawn(5, 2, store.clone());

    handle.start().await.unwrap();
    sleep(Duration::from_millis(2500)).await;

    let paused = handle.pause().await.unwrap();
    assert_eq!(paused, Transition::Paused { remaining_secs: 3 });
    assert_eq!(handle.registry().total_active(), 0);

    sleep(Duration::from_secs(60)).await;
    let view = handle.view();
    assert_eq!(view.phase, SessionPhase::Paused);
    assert_eq!(view.remaining_secs, 3);

    let before_resume = drain(&mut events);
    assert_eq!(count_messages(&before_resume, MessageKind::Encouragement), 1);

    let resumed = handle.resume().await.unwrap();
    assert_eq!(resumed, Transition::Resumed { remaining_secs: 3 });
    assert_eq!(handle.registry().active(TickSource::Countdown), 1);
    assert_eq!(handle.registry().active(TickSource::Encouragement), 1);

    let rest = until_terminal(&mut events).await;
    assert!(matches!(
        rest.last(),
        Some(Event::SessionCompleted { elapsed_secs: 5, .. })
    ));
    // The cadence restarts on resume.
    assert_eq!(count_messages(&rest, MessageKind::Encouragement), 1);
    assert_eq!(store.ends()[0].status, EndStatus::Completed);
}

#[tokio::test(start_paused = true)]
async fn resume_after_mid_second_pause_completes_on_time() {
    let store = MemoryStore::new();
    let (handle, mut events) = spawn(5, 5, store.clone());

    handle.start().await.unwrap();
    sleep(Duration::from_millis(2500)).await;
    handle.pause().await.unwrap();
    sleep(Duration::from_secs(10)).await;

    handle.resume().await.unwrap();
    sleep(Duration::from_millis(600)).await;
    assert_eq!(handle.view().remaining_secs, 2);

    sleep(Duration::from_millis(1800)).await;
    assert_eq!(handle.view().phase, SessionPhase::Running);
    assert_eq!(handle.view().remaining_secs, 1);

    sleep(Duration::from_millis(200)).await;
    assert_eq!(handle.view().phase, SessionPhase::Completed);
    let seen = until_terminal(&mut events).await;
    assert!(matches!(
        seen.last(),
        Some(Event::SessionCompleted { elapsed_secs: 5, .. })
    ));
    assert_eq!(store.ends()[0].status, EndStatus::Completed);
}

#[tokio::test(start_paused = true)]
async fn start_while_paused_resumes() {
    let (handle, _events) = spawn(30, 10, MemoryStore::new());
    handle.start().await.unwrap();
    sleep(Duration::from_secs(4)).await;
    handle.pause().await.unwrap();

    let again = handle.start().await.unwrap();
    assert_eq!(again, Transition::Resumed { remaining_secs: 26 });
    assert_eq!(handle.registry().active(TickSource::Countdown), 1);
}

#[tokio::test(start_paused = true)]
async fn ending_early_reports_elapsed_and_remaining() {
    let store = MemoryStore::new();
    let (handle, mut events) = spawn(10, 5, store.clone());

    handle.start().await.unwrap();
    sleep(Duration::from_millis(2200)).await;

    let ended = handle.end().await.unwrap();
    let Transition::EndedEarly(outcome) = ended else {
        panic!("expected EndedEarly, got {ended:?}");
    };
    assert_eq!(outcome.elapsed_secs, 2);
    assert_eq!(outcome.remaining_secs, 8);
    assert_eq!(handle.registry().total_active(), 0);

    let seen = until_terminal(&mut events).await;
    assert!(matches!(
        seen.last(),
        Some(Event::SessionEndedEarly { elapsed_secs: 2, remaining_secs: 8, .. })
    ));
    assert_eq!(store.ends()[0].status, EndStatus::EndedEarly);
    assert_eq!(handle.view().phase, SessionPhase::EndedEarly);
}

#[tokio::test(start_paused = true)]
async fn invalid_commands_are_rejected_without_side_effects() {
    let store = MemoryStore::new();
    let (handle, _events) = spawn(10, 5, store.clone());

    assert_eq!(
        handle.pause().await.unwrap(),
        Transition::Rejected {
            command: SessionCommand::Pause,
            phase: SessionPhase::Setup
        }
    );
    assert!(handle.end().await.unwrap().is_rejected());

    handle.start().await.unwrap();
    assert!(handle.start().await.unwrap().is_rejected());
    assert!(handle.resume().await.unwrap().is_rejected());
    assert_eq!(handle.registry().active(TickSource::Countdown), 1);
    assert_eq!(handle.registry().active(TickSource::Encouragement), 1);

    handle.end().await.unwrap();
    assert!(handle.start().await.unwrap().is_rejected());
    assert!(handle.end().await.unwrap().is_rejected());
    assert_eq!(store.starts().len(), 1);
    assert_eq!(store.ends().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn chat_gets_a_reply_even_after_the_session() {
    let (handle, mut events) = spawn(3, 1, MemoryStore::new());
    handle.start().await.unwrap();
    until_terminal(&mut events).await;
    drain(&mut events);

    handle.say("  that went well  ").unwrap();
    handle.say("   ").unwrap();
    sleep(Duration::from_millis(10)).await;

    let seen = drain(&mut events);
    assert_eq!(seen.len(), 2);
    assert!(matches!(&seen[0], Event::Message(m) if m.kind == MessageKind::Chat && m.text == "that went well"));
    let expected = table().fallback_reply(MessageStyle::Friendly);
    assert!(matches!(&seen[1], Event::Message(m) if m.kind == MessageKind::Reply && m.text == expected));
    assert_eq!(handle.view().last_message.as_deref(), Some(expected.as_str()));
}

struct FailingSource;

impl MessageSource for FailingSource {
    fn encouragement(&self, _style: MessageStyle) -> MessageFuture<String> {
        Box::pin(async { Err(MessageError::Malformed("offline".into())) })
    }

    fn reply(&self, _style: MessageStyle, _user_message: &str) -> MessageFuture<String> {
        Box::pin(async { Err(MessageError::Malformed("offline".into())) })
    }

    fn micro_goals(&self, _task: &str, _energy: u8) -> MessageFuture<Vec<MicroGoal>> {
        Box::pin(async { Err(MessageError::Malformed("offline".into())) })
    }

    fn advice(&self, _context: &AdviceContext) -> MessageFuture<Advice> {
        Box::pin(async { Err(MessageError::Malformed("offline".into())) })
    }
}

#[tokio::test(start_paused = true)]
async fn failing_message_source_falls_back_to_table() {
    let (handle, mut events) = spawn_with(4, 2, Box::new(MemoryStore::new()), Arc::new(FailingSource));
    handle.start().await.unwrap();

    let seen = until_terminal(&mut events).await;
    let warnings = seen
        .iter()
        .filter(|e| matches!(e, Event::Warning { source: WarningSource::MessageSource, .. }))
        .count();
    assert_eq!(warnings, 1);
    let encouragements: Vec<&str> = seen
        .iter()
        .filter_map(|e| match e {
            Event::Message(m) if m.kind == MessageKind::Encouragement => Some(m.text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(encouragements.len(), 1);
    assert!(table()
        .encouragements(MessageStyle::Friendly)
        .iter()
        .any(|line| line == encouragements[0]));
    assert!(handle.view().warning.is_some());
}

struct BrokenStore;

impl SessionStore for BrokenStore {
    fn record_session_start(&mut self, _start: &SessionStart) -> CoreResult<()> {
        Err(CoreError::Database(DatabaseError::Locked))
    }

    fn record_session_end(&mut self, _outcome: &SessionOutcome) -> CoreResult<()> {
        Err(CoreError::Database(DatabaseError::Locked))
    }
}

#[tokio::test(start_paused = true)]
async fn persistence_failures_do_not_stop_the_session() {
    let (handle, mut events) = spawn_with(3, 1, Box::new(BrokenStore), table());
    assert!(matches!(handle.start().await.unwrap(), Transition::Started(_)));
    assert_eq!(handle.view().phase, SessionPhase::Running);

    let mut seen = until_terminal(&mut events).await;
    sleep(Duration::from_millis(10)).await;
    seen.extend(drain(&mut events));

    let warnings = seen
        .iter()
        .filter(|e| matches!(e, Event::Warning { source: WarningSource::Persistence, .. }))
        .count();
    assert_eq!(warnings, 2);
    assert_eq!(handle.view().phase, SessionPhase::Completed);
}

#[tokio::test(start_paused = true)]
async fn shutdown_releases_every_tick_source() {
    let registry = TickRegistry::new();
    let store = MemoryStore::new();
    let session = FocusSession::new(SessionConfig::new(60, 10).unwrap()).unwrap();
    let (handle, mut events) = SessionHost::new(session, Box::new(store.clone()), table())
        .with_registry(registry.clone())
        .spawn();

    handle.start().await.unwrap();
    sleep(Duration::from_secs(3)).await;
    assert_eq!(registry.total_active(), 2);

    handle.shutdown().await.unwrap();
    assert_eq!(registry.total_active(), 0);
    // Discarded mid-flight: no end record.
    assert!(store.ends().is_empty());

    drain(&mut events);
    assert!(events.recv().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn dropping_the_handle_tears_the_host_down() {
    let registry = TickRegistry::new();
    let session = FocusSession::new(SessionConfig::new(60, 10).unwrap()).unwrap();
    let (handle, mut events) = SessionHost::new(session, Box::new(MemoryStore::new()), table())
        .with_registry(registry.clone())
        .spawn();

    handle.start().await.unwrap();
    drop(handle);

    while events.recv().await.is_some() {}
    assert_eq!(registry.total_active(), 0);
}

#[tokio::test(start_paused = true)]
async fn a_fresh_host_starts_from_full_duration() {
    let registry = TickRegistry::new();
    let store = MemoryStore::new();
    for _ in 0..3 {
        let session = FocusSession::new(SessionConfig::new(20, 5).unwrap()).unwrap();
        let (handle, _events) = SessionHost::new(session, Box::new(store.clone()), table())
            .with_registry(registry.clone())
            .spawn();
        handle.start().await.unwrap();
        sleep(Duration::from_secs(2)).await;
        assert_eq!(handle.view().remaining_secs, 18);
        assert_eq!(registry.active(TickSource::Countdown), 1);
        handle.shutdown().await.unwrap();
    }
    assert_eq!(registry.total_active(), 0);
    let starts = store.starts();
    assert_eq!(starts.len(), 3);
    assert_ne!(starts[0].session, starts[1].session);
}
