use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use devteam_core::api::{ConsoleApi, HttpConsoleApi};
use devteam_core::constants::MAX_MENTION_SUGGESTIONS;
use devteam_core::streaming::{FeedMessage, LiveFeedConnector};
use devteam_core::{EventKind, HistoryScope, RunSession};
use serde_json::json;
use tracing::{debug, warn};

use super::config::ResolvedConfig;
use super::render::{render_chat_entry, render_stats, render_status_line};

/// Commands the console binary executes against the backend
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Print the transcript, then optionally follow the live feed
    Tail {
        run_id: Option<u64>,
        follow: bool,
        highlight: bool,
    },
    Send {
        run_id: Option<u64>,
        message: String,
    },
    Intro {
        run_id: Option<u64>,
    },
    Upload {
        run_id: Option<u64>,
        path: PathBuf,
    },
    Stats {
        run_id: Option<u64>,
    },
    Mentions {
        prefix: String,
    },
}

pub async fn run_command(command: CliCommand, config: &ResolvedConfig, pretty: bool) -> Result<()> {
    let api = HttpConsoleApi::new(config.base_url.clone());
    debug!("Using backend at {}", api.base_url());

    match command {
        CliCommand::Tail {
            run_id,
            follow,
            highlight,
        } => tail(&api, config, run_id, follow, highlight).await,
        CliCommand::Send { run_id, message } => {
            let mut session = open_session(&api, config, HistoryScope::Chat, run_id).await;
            session.set_input(message);
            if !session.send_message(&api).await? {
                bail!("Message is empty");
            }
            let pending: Vec<&String> = session.pending().agents().iter().collect();
            print_json(&json!({"run_id": session.run_id(), "pending": pending}), pretty)
        }
        CliCommand::Intro { run_id } => {
            let mut session = open_session(&api, config, HistoryScope::Chat, run_id).await;
            session.introduce_team(&api).await?;
            print_json(&json!({"run_id": session.run_id(), "status": "ok"}), pretty)
        }
        CliCommand::Upload { run_id, path } => {
            let mut session = open_session(&api, config, HistoryScope::Chat, run_id).await;
            session.attach(&path);
            session
                .upload_attachment(&api)
                .await
                .with_context(|| format!("Failed to upload {}", path.display()))?;
            print_json(
                &json!({"run_id": session.run_id(), "uploaded": path.display().to_string()}),
                pretty,
            )
        }
        CliCommand::Stats { run_id } => {
            let mut session = open_session(&api, config, HistoryScope::Events, run_id).await;
            session
                .sync_history(&api)
                .await
                .context("Failed to fetch run events")?;
            let run_id = session.run_id();
            print_json(&render_stats(run_id, session.projection()), pretty)
        }
        CliCommand::Mentions { prefix } => {
            let mut session = RunSession::new(config.session_config(HistoryScope::Chat));
            session
                .load_roster(&api)
                .await
                .context("Failed to load agent roster")?;
            let query = prefix.trim_start_matches('@');
            for tag in session
                .vocabulary()
                .candidates(query, MAX_MENTION_SUGGESTIONS)
            {
                println!("{}", tag);
            }
            Ok(())
        }
    }
}

/// Session bound to the requested run, or to the backend's latest one.
async fn open_session<A: ConsoleApi>(
    api: &A,
    config: &ResolvedConfig,
    scope: HistoryScope,
    run_id: Option<u64>,
) -> RunSession {
    let mut session = RunSession::new(config.session_config(scope));
    match run_id {
        Some(run_id) => session.select_run(run_id),
        None => {
            if let Err(e) = session.resolve_latest_run(api).await {
                warn!("Could not resolve latest run: {}", e);
            }
        }
    }
    session
}

async fn tail(
    api: &HttpConsoleApi,
    config: &ResolvedConfig,
    run_id: Option<u64>,
    follow: bool,
    highlight: bool,
) -> Result<()> {
    let mut session = open_session(api, config, HistoryScope::Chat, run_id).await;
    if let Err(e) = session.load_roster(api).await {
        debug!("Agent roster unavailable: {}", e);
    }
    if let Err(e) = session.sync_history(api).await {
        // Availability over completeness: keep going with the live feed
        warn!("History unavailable: {}", e);
    }

    for entry in &session.projection().chat_transcript {
        println!("{}", render_chat_entry(entry, highlight));
    }
    if !follow {
        return Ok(());
    }

    let endpoint = config
        .feed
        .clone()
        .context("No event feed configured (use --feed or DEVTEAM_FEED)")?;
    let mut feed = LiveFeedConnector::new(endpoint)
        .with_reconnect_delay(config.reconnect_delay)
        .subscribe();

    loop {
        tokio::select! {
            message = feed.next() => {
                let Some(message) = message else { break };
                for line in feed_lines(&mut session, message, highlight) {
                    println!("{}", line);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                debug!("Interrupted, closing feed");
                break;
            }
        }
    }
    Ok(())
}

/// Apply one feed message and return what should be printed for it.
pub fn feed_lines(session: &mut RunSession, message: FeedMessage, highlight: bool) -> Vec<String> {
    match message {
        FeedMessage::Status(status) => {
            let was_connected = session.is_connected();
            session.set_feed_status(status);
            if was_connected == session.is_connected() {
                return Vec::new();
            }
            vec![render_status_line(session)]
        }
        FeedMessage::Event(event) => {
            let kind = event.event_kind();
            if !session.ingest_live(event) {
                return Vec::new();
            }
            match kind {
                EventKind::ChatMessage => session
                    .projection()
                    .chat_transcript
                    .last()
                    .map(|entry| vec![render_chat_entry(entry, highlight)])
                    .unwrap_or_default(),
                EventKind::ToolRequested | EventKind::ThinkingStarted => session
                    .projection()
                    .activity_log
                    .last()
                    .map(|line| vec![format!("  {}", line)])
                    .unwrap_or_default(),
                EventKind::TeamBreak | EventKind::TeamAttention | EventKind::TeamResume => {
                    vec![render_status_line(session)]
                }
                _ => Vec::new(),
            }
        }
    }
}

fn print_json(value: &serde_json::Value, pretty: bool) -> Result<()> {
    let output = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use devteam_core::streaming::FeedStatus;
    use devteam_core::{RawEvent, SessionConfig};
    use serde_json::json;

    fn event(kind: &str, payload: serde_json::Value) -> FeedMessage {
        FeedMessage::Event(RawEvent::new(kind, payload))
    }

    #[test]
    fn test_feed_lines_for_chat_and_activity() {
        let mut session = RunSession::new(SessionConfig::default());

        let lines = feed_lines(
            &mut session,
            event(
                "chat.message",
                json!({"agent": "Dev1", "role": "developer", "content": "hi", "message_id": "1"}),
            ),
            false,
        );
        assert_eq!(lines, vec!["Dev1 (developer): hi"]);

        // Duplicate prints nothing
        let lines = feed_lines(
            &mut session,
            event(
                "chat.message",
                json!({"agent": "Dev1", "role": "developer", "content": "hi", "message_id": "1"}),
            ),
            false,
        );
        assert!(lines.is_empty());

        let lines = feed_lines(
            &mut session,
            event(
                "tool.requested",
                json!({"actor": "Dev1", "tool": "git", "arguments": ["status"]}),
            ),
            false,
        );
        assert_eq!(lines, vec!["  [Dev1] git status"]);

        let lines = feed_lines(&mut session, event("tool.completed", json!({})), false);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_feed_lines_for_status_changes() {
        let mut session = RunSession::new(SessionConfig::default());

        assert!(feed_lines(
            &mut session,
            FeedMessage::Status(FeedStatus::Connecting),
            false
        )
        .is_empty());
        assert_eq!(
            feed_lines(&mut session, FeedMessage::Status(FeedStatus::Connected), false),
            vec!["[online | no run]"]
        );
        assert_eq!(
            feed_lines(&mut session, event("team.break", json!({})), false),
            vec!["[online | no run | on break]"]
        );
        assert_eq!(
            feed_lines(
                &mut session,
                FeedMessage::Status(FeedStatus::Disconnected),
                false
            ),
            vec!["[offline | no run | on break]"]
        );
    }
}
