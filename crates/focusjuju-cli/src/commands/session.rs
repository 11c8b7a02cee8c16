use std::io::Write;

use clap::Subcommand;
use focusjuju_core::presentation::format_clock;
use focusjuju_core::{
    Config, Database, Event, FocusSession, MessageStyle, Sender, SessionConfig, SessionHandle,
    SessionHost, SessionKind, Transition,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;

use super::{message_source, runtime, CliResult};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Run a focus session in the foreground.
    ///
    /// While running, type `p` to pause, `r` to resume and `e` to end early.
    /// Anything else is sent to the companion. Ctrl-C ends the session.
    Run {
        /// Session length in minutes (defaults to the kind's preset, then config)
        #[arg(long)]
        minutes: Option<u64>,
        /// Minutes between encouragements
        #[arg(long)]
        interval_minutes: Option<u64>,
        /// What you are working on
        #[arg(long)]
        task: Option<String>,
        /// pomodoro, body-double or deep-work
        #[arg(long)]
        kind: Option<SessionKind>,
        /// friendly, serious, funny or motivational
        #[arg(long)]
        style: Option<MessageStyle>,
        /// Do not ring the terminal bell on completion
        #[arg(long)]
        no_sound: bool,
        /// Print events as JSON lines
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: SessionAction) -> CliResult {
    match action {
        SessionAction::Run {
            minutes,
            interval_minutes,
            task,
            kind,
            style,
            no_sound,
            json,
        } => {
            let config = Config::load()?;
            let kind = kind.unwrap_or(config.session.kind);
            let duration_min = minutes
                .or_else(|| kind.preset_minutes())
                .unwrap_or(config.session.duration_min);
            // An implicit cadence never outlasts the session.
            let interval_min = interval_minutes
                .unwrap_or_else(|| config.session.encouragement_interval_min.min(duration_min));

            let mut session_config =
                SessionConfig::new(duration_min.saturating_mul(60), interval_min.saturating_mul(60))?
                    .with_kind(kind)
                    .with_message_style(style.unwrap_or(config.companion.message_style))
                    .with_sound(config.session.sound_enabled && !no_sound);
            if let Some(task) = task {
                session_config = session_config.with_task_label(task);
            }

            // Stdin reads block a worker thread; don't wait for them on exit.
            let rt = runtime()?;
            let result = rt.block_on(run_session(&config, session_config, json));
            rt.shutdown_background();
            result
        }
    }
}

async fn run_session(config: &Config, session_config: SessionConfig, json: bool) -> CliResult {
    let db = Database::open()?;
    let session = FocusSession::new(session_config)?;
    let (handle, mut events) = SessionHost::new(session, Box::new(db), message_source(config)).spawn();
    let mut view = handle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    handle.start().await?;

    loop {
        tokio::select! {
            event = events.recv() => match on_event(event, &mut events, json)? {
                Flow::Continue => {}
                Flow::Completed => {
                    if handle.view().sound_enabled {
                        eprint!("\x07");
                    }
                    break;
                }
                Flow::Stop => break,
            },
            changed = view.changed(), if !json => {
                if changed.is_err() {
                    break;
                }
                let current = view.borrow_and_update().clone();
                eprint!("\r{} {:<10}", current.clock(), current.phase.to_string());
                std::io::stderr().flush()?;
            }
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) => handle_input(&handle, line.trim()).await?,
                None => stdin_open = false,
            },
            _ = tokio::signal::ctrl_c() => {
                handle.end().await?;
            }
        }
    }

    handle.shutdown().await?;
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Completed,
    Stop,
}

/// Print one event from the host. `None` means the host is gone.
fn on_event(
    event: Option<Event>,
    events: &mut UnboundedReceiver<Event>,
    json: bool,
) -> Result<Flow, Box<dyn std::error::Error>> {
    let Some(event) = event else {
        return Ok(Flow::Stop);
    };
    print_event(&event, json)?;
    if !event.is_terminal() {
        return Ok(Flow::Continue);
    }
    // The closing status line is already queued.
    while let Ok(queued) = events.try_recv() {
        print_event(&queued, json)?;
    }
    Ok(match event {
        Event::SessionCompleted { .. } => Flow::Completed,
        _ => Flow::Stop,
    })
}

async fn handle_input(handle: &SessionHandle, input: &str) -> CliResult {
    let transition = match input {
        "" => return Ok(()),
        "p" => handle.pause().await?,
        "r" => handle.resume().await?,
        "e" => handle.end().await?,
        text => {
            handle.say(text)?;
            return Ok(());
        }
    };
    if let Transition::Rejected { command, phase } = transition {
        eprintln!("\ncannot {command:?} while {phase}");
    }
    Ok(())
}

fn print_event(event: &Event, json: bool) -> CliResult {
    if json {
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }
    match event {
        Event::SessionStarted {
            kind,
            task_label,
            duration_secs,
            ..
        } => println!("\nstarted {kind} session \"{task_label}\" ({})", format_clock(*duration_secs)),
        Event::SessionPaused { remaining_secs, .. } => {
            println!("\npaused with {} left", format_clock(*remaining_secs))
        }
        Event::SessionResumed { remaining_secs, .. } => {
            println!("\nresumed with {} left", format_clock(*remaining_secs))
        }
        Event::SessionCompleted { elapsed_secs, .. } => {
            println!("\ncompleted after {}", format_clock(*elapsed_secs))
        }
        Event::SessionEndedEarly {
            elapsed_secs,
            remaining_secs,
            ..
        } => println!(
            "\nended early after {} ({} left)",
            format_clock(*elapsed_secs),
            format_clock(*remaining_secs)
        ),
        // The user's own lines are already on screen.
        Event::Message(message) if message.sender == Sender::User => {}
        Event::Message(message) => println!("\nFocusJuju: {}", message.text),
        Event::Warning { message, .. } => eprintln!("\nwarning: {message}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use focusjuju_core::{ChatMessage, MessageKind, SessionRef};
    use tokio::sync::mpsc::unbounded_channel;

    #[test]
    fn closed_event_stream_stops_the_loop() {
        let (tx, mut rx) = unbounded_channel::<Event>();
        drop(tx);
        assert_eq!(on_event(None, &mut rx, true).unwrap(), Flow::Stop);
    }

    #[test]
    fn completion_drains_queued_lines() {
        let (tx, mut rx) = unbounded_channel();
        tx.send(Event::Message(ChatMessage::companion(MessageKind::Status, "done")))
            .unwrap();
        let completed = Event::SessionCompleted {
            session: SessionRef::new(),
            elapsed_secs: 60,
            at: Utc::now(),
        };
        assert_eq!(on_event(Some(completed), &mut rx, true).unwrap(), Flow::Completed);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn ordinary_events_keep_the_loop_going() {
        let (_tx, mut rx) = unbounded_channel();
        let paused = Event::SessionPaused {
            remaining_secs: 30,
            at: Utc::now(),
        };
        assert_eq!(on_event(Some(paused), &mut rx, true).unwrap(), Flow::Continue);
    }
}
