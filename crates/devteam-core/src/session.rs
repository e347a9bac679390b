//! Run-scoped console session.
//!
//! Owns the event log, the history reconciler, the projection cache, the
//! pending-reply set and the composer for one active run. Every mutation goes
//! through the methods here; hosts feed it live messages and drive the backend
//! operations with any [`ConsoleApi`].

use std::path::Path;

use tracing::{debug, info, warn};

use crate::api::{ConsoleApi, SendRequest};
use crate::composer::{Composer, ComposerKey, MentionVocabulary};
use crate::config::{HistoryScope, SessionConfig};
use crate::error::ConsoleError;
use crate::models::RawEvent;
use crate::projection::{PendingReplies, ProjectionEngine, ProjectionState};
use crate::store::{EventLogStore, HistoryReconciler, HistoryResponse};
use crate::streaming::{FeedMessage, FeedStatus};

pub struct RunSession {
    config: SessionConfig,
    store: EventLogStore,
    reconciler: HistoryReconciler,
    engine: ProjectionEngine,
    pending: PendingReplies,
    run_id: Option<u64>,
    /// Bumped on every run change; history is synced once per generation
    generation: u64,
    synced_generation: Option<u64>,
    connected: bool,
    last_error: Option<String>,
    vocabulary: MentionVocabulary,
    composer: Composer,
}

impl RunSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            store: EventLogStore::new(config.capacity),
            reconciler: HistoryReconciler::new(config.history_scope),
            engine: ProjectionEngine::new(config.activity_window),
            pending: PendingReplies::new(),
            run_id: None,
            generation: 0,
            synced_generation: None,
            connected: false,
            last_error: None,
            vocabulary: MentionVocabulary::default(),
            composer: Composer::new(),
            config,
        }
    }

    pub fn for_scope(scope: HistoryScope) -> Self {
        Self::new(SessionConfig::for_scope(scope))
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // ===== Ingestion =====

    /// Append one live event. Returns whether the store accepted it.
    pub fn ingest_live(&mut self, event: RawEvent) -> bool {
        let observed = event.clone();
        if !self.store.append(event) {
            debug!("Dropping duplicate event {:?}", observed.message_id());
            return false;
        }
        self.pending.observe(&observed, &self.config.human_role);
        true
    }

    /// Apply one message from a feed subscription.
    pub fn apply_feed_message(&mut self, message: FeedMessage) -> bool {
        match message {
            FeedMessage::Status(status) => {
                self.set_feed_status(status);
                false
            }
            FeedMessage::Event(event) => self.ingest_live(event),
        }
    }

    pub fn set_feed_status(&mut self, status: FeedStatus) {
        self.connected = status == FeedStatus::Connected;
    }

    /// User "clear" action: empties the log and the seen-id set.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    // ===== Run selection =====

    pub fn run_id(&self) -> Option<u64> {
        self.run_id
    }

    /// Operator picked a run. A different run replaces the store wholesale.
    pub fn select_run(&mut self, run_id: u64) {
        if run_id == 0 || self.run_id == Some(run_id) {
            return;
        }
        info!("Switching to run {}", run_id);
        self.run_id = Some(run_id);
        self.store.reset(self.config.capacity);
        self.engine.invalidate();
        self.pending.clear();
        self.generation += 1;
    }

    /// Take a run id echoed by the backend, but only if none is selected yet.
    /// Live events already received are kept. Returns whether it was adopted.
    pub fn adopt_run(&mut self, run_id: u64) -> bool {
        if run_id == 0 || self.run_id.is_some() {
            return false;
        }
        debug!("Adopting run {}", run_id);
        self.run_id = Some(run_id);
        self.generation += 1;
        true
    }

    pub fn needs_history_sync(&self) -> bool {
        self.synced_generation != Some(self.generation)
    }

    /// Run selection generation; a history fetch issued now belongs to it.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Pull history for the current run and merge it ahead of live events.
    ///
    /// Failure leaves the store untouched; the error is recorded and returned.
    pub async fn sync_history<A: ConsoleApi>(&mut self, api: &A) -> Result<usize, ConsoleError> {
        let generation = self.generation;
        let result = api.history(self.run_id, self.reconciler.scope()).await;
        self.apply_history(generation, result)
    }

    /// Apply the outcome of a history fetch issued at `generation`.
    ///
    /// Hosts that fetch off the session can hand the result back here; a
    /// response for an earlier run selection is discarded without touching
    /// the store or the error slot.
    pub fn apply_history(
        &mut self,
        generation: u64,
        result: Result<HistoryResponse, ConsoleError>,
    ) -> Result<usize, ConsoleError> {
        if generation != self.generation {
            debug!("Discarding history for a previous run selection");
            return Ok(0);
        }
        self.synced_generation = Some(generation);

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!("History fetch failed: {}", e);
                return Err(self.record(e));
            }
        };

        if let Some(run_id) = response.run_id {
            if self.adopt_run(run_id) {
                // The response already belongs to the adopted run.
                self.synced_generation = Some(self.generation);
            }
        }

        let merged = self.reconciler.reconcile(&mut self.store, response);
        for event in &merged {
            self.pending.observe(event, &self.config.human_role);
        }
        debug!("Merged {} history items", merged.len());
        Ok(merged.len())
    }

    /// Adopt the newest run known to the backend when none is selected.
    pub async fn resolve_latest_run<A: ConsoleApi>(
        &mut self,
        api: &A,
    ) -> Result<Option<u64>, ConsoleError> {
        if self.run_id.is_some() {
            return Ok(self.run_id);
        }
        self.last_error = None;
        let runs = api.list_runs().await.map_err(|e| self.record(e))?;
        if let Some(latest) = runs.iter().map(|run| run.id).max() {
            self.adopt_run(latest);
        }
        Ok(self.run_id)
    }

    // ===== User operations =====

    /// Send the composer text. Blank input is a no-op returning `Ok(false)`.
    pub async fn send_message<A: ConsoleApi>(&mut self, api: &A) -> Result<bool, ConsoleError> {
        self.last_error = None;
        if self.composer.is_blank() {
            return Ok(false);
        }

        let request = SendRequest {
            message: self.composer.text().to_string(),
            run_id: self.run_id,
        };
        let response = match api.send(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Send failed: {}", e);
                return Err(self.record(e));
            }
        };

        if let Some(run_id) = response.run_id {
            self.adopt_run(run_id);
        }
        if let Some(targets) = response.targets {
            self.pending.replace(targets);
        }
        self.composer.clear();
        Ok(true)
    }

    pub async fn introduce_team<A: ConsoleApi>(&mut self, api: &A) -> Result<(), ConsoleError> {
        self.last_error = None;
        let response = api
            .introduce_team(self.run_id)
            .await
            .map_err(|e| self.record(e))?;
        if let Some(run_id) = response.run_id {
            self.adopt_run(run_id);
        }
        Ok(())
    }

    /// Upload the composer's attachment to the selected run.
    pub async fn upload_attachment<A: ConsoleApi>(&mut self, api: &A) -> Result<(), ConsoleError> {
        self.last_error = None;
        let Some(run_id) = self.run_id else {
            return Err(self.record(ConsoleError::NoRunSelected));
        };
        let Some(path) = self.composer.attachment().map(Path::to_path_buf) else {
            return Err(self.record(ConsoleError::NoAttachment));
        };

        api.upload_attachment(run_id, &path)
            .await
            .map_err(|e| self.record(e))?;
        self.composer.clear_attachment();
        Ok(())
    }

    /// Reload the agent roster and rebuild the mention vocabulary.
    pub async fn load_roster<A: ConsoleApi>(&mut self, api: &A) -> Result<usize, ConsoleError> {
        let roster = api.agents_roster().await.map_err(|e| self.record(e))?;
        self.vocabulary.rebuild(&roster);
        Ok(self.vocabulary.len())
    }

    fn record(&mut self, error: ConsoleError) -> ConsoleError {
        self.last_error = Some(error.to_string());
        error
    }

    // ===== Composer =====

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn vocabulary(&self) -> &MentionVocabulary {
        &self.vocabulary
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.composer.set_text(text, &self.vocabulary);
    }

    pub fn type_str(&mut self, s: &str) {
        self.composer.insert_str(s, &self.vocabulary);
    }

    pub fn backspace(&mut self) {
        self.composer.backspace(&self.vocabulary);
    }

    pub fn move_caret(&mut self, caret: usize) {
        self.composer.move_caret(caret, &self.vocabulary);
    }

    /// Returns true if the key was consumed by the autocomplete menu.
    pub fn composer_key(&mut self, key: ComposerKey) -> bool {
        self.composer.handle_key(key)
    }

    pub fn attach(&mut self, path: impl AsRef<Path>) {
        self.composer.attach(path);
    }

    // ===== Views =====

    pub fn projection(&mut self) -> &ProjectionState {
        self.engine.project(&self.store)
    }

    pub fn store(&self) -> &EventLogStore {
        &self.store
    }

    pub fn pending(&self) -> &PendingReplies {
        &self.pending
    }

    pub fn is_typing(&self) -> bool {
        self.pending.is_typing()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{IntroResponse, SendResponse, UploadAck};
    use crate::constants::NO_RUN_FOR_UPLOAD;
    use crate::models::{RosterAgent, RunSummary};
    use crate::projection::PauseMode;
    use crate::store::HistoryMessage;
    use serde_json::json;
    use std::sync::Mutex;

    /// Scripted backend: `None` responses fail with a 500.
    #[derive(Default)]
    struct FakeApi {
        runs: Vec<RunSummary>,
        history: Option<HistoryResponse>,
        send_response: Option<SendResponse>,
        intro_response: Option<IntroResponse>,
        roster: Vec<RosterAgent>,
        calls: Mutex<Vec<String>>,
        sent: Mutex<Vec<SendRequest>>,
    }

    fn failure() -> ConsoleError {
        ConsoleError::Server {
            status: 500,
            body: "boom".into(),
        }
    }

    impl FakeApi {
        fn log(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ConsoleApi for FakeApi {
        async fn list_runs(&self) -> Result<Vec<RunSummary>, ConsoleError> {
            self.log("runs".into());
            Ok(self.runs.clone())
        }

        async fn history(
            &self,
            run_id: Option<u64>,
            scope: HistoryScope,
        ) -> Result<HistoryResponse, ConsoleError> {
            self.log(format!("history {:?} {:?}", run_id, scope));
            self.history.clone().ok_or_else(failure)
        }

        async fn send(&self, request: SendRequest) -> Result<SendResponse, ConsoleError> {
            self.log("send".into());
            self.sent.lock().unwrap().push(request);
            self.send_response.clone().ok_or_else(failure)
        }

        async fn introduce_team(&self, run_id: Option<u64>) -> Result<IntroResponse, ConsoleError> {
            self.log(format!("intro {:?}", run_id));
            self.intro_response.clone().ok_or_else(failure)
        }

        async fn upload_attachment(
            &self,
            run_id: u64,
            path: &Path,
        ) -> Result<UploadAck, ConsoleError> {
            self.log(format!("upload {} {}", run_id, path.display()));
            Ok(UploadAck::default())
        }

        async fn agents_roster(&self) -> Result<Vec<RosterAgent>, ConsoleError> {
            self.log("agents".into());
            Ok(self.roster.clone())
        }
    }

    fn chat(agent: &str, role: &str, content: &str, id: &str) -> RawEvent {
        RawEvent::new(
            "chat.message",
            json!({"agent": agent, "role": role, "content": content, "message_id": id}),
        )
    }

    fn history_message(agent: &str, content: &str, id: &str) -> HistoryMessage {
        HistoryMessage {
            role: Some("developer".into()),
            agent: Some(agent.into()),
            content: Some(content.into()),
            timestamp: None,
            message_id: Some(json!(id)),
        }
    }

    fn transcript(session: &mut RunSession) -> Vec<String> {
        session
            .projection()
            .chat_transcript
            .iter()
            .map(|entry| entry.content.clone())
            .collect()
    }

    #[tokio::test]
    async fn test_send_adopts_run_and_sets_pending() {
        let api = FakeApi {
            send_response: Some(SendResponse {
                run_id: Some(42),
                targets: Some(vec!["Dev1".into()]),
                status: Some("ok".into()),
            }),
            ..Default::default()
        };
        let mut session = RunSession::new(SessionConfig::default());
        session.set_input("hello");

        assert!(session.send_message(&api).await.unwrap());

        assert_eq!(session.run_id(), Some(42));
        assert!(session.pending().contains("Dev1"));
        assert_eq!(session.pending().len(), 1);
        assert!(session.is_typing());
        assert_eq!(session.composer().text(), "");
        assert!(session.needs_history_sync());

        let sent = api.sent.lock().unwrap().clone();
        assert_eq!(
            sent,
            vec![SendRequest {
                message: "hello".into(),
                run_id: None
            }]
        );
    }

    #[tokio::test]
    async fn test_send_blank_is_noop() {
        let api = FakeApi::default();
        let mut session = RunSession::new(SessionConfig::default());
        session.set_input("   \n");

        assert!(!session.send_message(&api).await.unwrap());
        assert!(api.calls().is_empty());
        assert_eq!(session.composer().text(), "   \n");
    }

    #[tokio::test]
    async fn test_blank_send_clears_previous_error() {
        let api = FakeApi::default();
        let mut session = RunSession::new(SessionConfig::default());
        session.adopt_run(3);
        session.set_input("status?");
        assert!(session.send_message(&api).await.is_err());
        assert!(session.last_error().is_some());

        session.set_input("  ");
        assert!(!session.send_message(&api).await.unwrap());
        assert!(session.last_error().is_none());
        assert_eq!(api.calls(), vec!["send"]);
    }

    #[tokio::test]
    async fn test_send_failure_keeps_pending_and_input() {
        let api = FakeApi::default();
        let mut session = RunSession::new(SessionConfig::default());
        session.adopt_run(3);
        session.pending.replace(["QA1"]);
        session.set_input("status?");

        assert!(session.send_message(&api).await.is_err());
        assert_eq!(session.last_error(), Some("Server error (500): boom"));
        assert!(session.pending().contains("QA1"));
        assert_eq!(session.composer().text(), "status?");
        assert_eq!(session.run_id(), Some(3));
    }

    #[tokio::test]
    async fn test_send_overwrites_pending_and_keeps_established_run() {
        let api = FakeApi {
            send_response: Some(SendResponse {
                run_id: Some(99),
                targets: Some(vec!["Dev1".into(), "QA1".into()]),
                status: None,
            }),
            ..Default::default()
        };
        let mut session = RunSession::new(SessionConfig::default());
        session.select_run(7);
        session.pending.replace(["Architect"]);
        session.set_input("@team go");

        session.send_message(&api).await.unwrap();
        assert_eq!(session.run_id(), Some(7));
        assert!(!session.pending().contains("Architect"));
        assert_eq!(session.pending().len(), 2);

        // Replies drain the set one agent at a time
        session.ingest_live(chat("Dev1", "developer", "on it", "r1"));
        assert!(session.is_typing());
        assert!(session.pending().contains("QA1"));
        session.ingest_live(chat("QA1", "qa", "testing", "r2"));
        assert!(!session.is_typing());
    }

    #[tokio::test]
    async fn test_history_merges_ahead_of_live_events() {
        let api = FakeApi {
            history: Some(HistoryResponse {
                run_id: Some(5),
                messages: vec![
                    history_message("Dev1", "h1", "h1"),
                    history_message("Dev1", "h2", "h2"),
                    history_message("Dev1", "l1", "l1"),
                ],
                events: vec![],
            }),
            ..Default::default()
        };
        let mut session = RunSession::new(SessionConfig::default());
        session.select_run(5);
        session.ingest_live(chat("Dev1", "developer", "l1", "l1"));
        session.ingest_live(chat("Dev1", "developer", "l2", "l2"));

        assert!(session.needs_history_sync());
        let merged = session.sync_history(&api).await.unwrap();

        assert_eq!(merged, 2);
        assert!(!session.needs_history_sync());
        assert_eq!(transcript(&mut session), vec!["h1", "h2", "l1", "l2"]);
        assert_eq!(api.calls(), vec!["history Some(5) Chat"]);
    }

    #[tokio::test]
    async fn test_live_duplicate_of_synced_history_dropped() {
        let api = FakeApi {
            history: Some(HistoryResponse {
                messages: vec![history_message("Dev1", "from history", "h1")],
                ..Default::default()
            }),
            ..Default::default()
        };
        let mut session = RunSession::new(SessionConfig::default());
        session.select_run(5);

        assert_eq!(session.sync_history(&api).await.unwrap(), 1);
        assert!(!session.ingest_live(chat("Dev1", "developer", "from history", "h1")));
        assert_eq!(transcript(&mut session), vec!["from history"]);
    }

    #[test]
    fn test_history_for_previous_run_discarded() {
        let mut session = RunSession::new(SessionConfig::default());
        session.select_run(5);
        let generation = session.generation();

        session.select_run(8);
        session.ingest_live(chat("Dev2", "developer", "run 8", "r8"));
        let late = HistoryResponse {
            run_id: Some(5),
            messages: vec![history_message("Dev1", "run 5", "r5")],
            ..Default::default()
        };

        assert_eq!(session.apply_history(generation, Ok(late)).unwrap(), 0);
        assert_eq!(session.run_id(), Some(8));
        assert_eq!(transcript(&mut session), vec!["run 8"]);
        assert!(session.needs_history_sync());

        // A stale failure is not surfaced either
        assert_eq!(session.apply_history(generation, Err(failure())).unwrap(), 0);
        assert!(session.last_error().is_none());

        let current = HistoryResponse {
            messages: vec![history_message("Dev2", "earlier in run 8", "e8")],
            ..Default::default()
        };
        assert_eq!(session.apply_history(session.generation(), Ok(current)).unwrap(), 1);
        assert!(!session.needs_history_sync());
        assert_eq!(transcript(&mut session), vec!["earlier in run 8", "run 8"]);
    }

    #[tokio::test]
    async fn test_history_failure_leaves_store_untouched() {
        let api = FakeApi::default();
        let mut session = RunSession::new(SessionConfig::default());
        session.select_run(2);
        session.ingest_live(chat("Dev1", "developer", "live", "a"));
        let version = session.store().version();

        assert!(session.sync_history(&api).await.is_err());
        assert_eq!(session.store().version(), version);
        assert_eq!(transcript(&mut session), vec!["live"]);
        assert!(session.last_error().is_some());
        // One attempt per generation, even on failure
        assert!(!session.needs_history_sync());
    }

    #[tokio::test]
    async fn test_history_adopts_backend_run_when_unset() {
        let api = FakeApi {
            history: Some(HistoryResponse {
                run_id: Some(11),
                ..Default::default()
            }),
            ..Default::default()
        };
        let mut session = RunSession::new(SessionConfig::default());

        session.sync_history(&api).await.unwrap();
        assert_eq!(session.run_id(), Some(11));
        assert!(!session.needs_history_sync());
    }

    #[tokio::test]
    async fn test_merged_history_drains_pending() {
        let api = FakeApi {
            history: Some(HistoryResponse {
                messages: vec![history_message("Dev1", "done", "x1")],
                ..Default::default()
            }),
            ..Default::default()
        };
        let mut session = RunSession::new(SessionConfig::default());
        session.adopt_run(1);
        session.pending.replace(["Dev1"]);

        session.sync_history(&api).await.unwrap();
        assert!(!session.is_typing());
    }

    #[test]
    fn test_select_run_replaces_store_and_adopt_keeps_it() {
        let mut session = RunSession::new(SessionConfig::default());
        session.ingest_live(chat("Dev1", "developer", "early", "e1"));

        assert!(session.adopt_run(4));
        assert_eq!(session.store().len(), 1);
        assert!(!session.adopt_run(8));
        assert_eq!(session.run_id(), Some(4));

        session.pending.replace(["Dev1"]);
        session.select_run(4);
        assert_eq!(session.store().len(), 1);

        session.select_run(6);
        assert_eq!(session.run_id(), Some(6));
        assert!(session.store().is_empty());
        assert!(!session.is_typing());
        assert!(transcript(&mut session).is_empty());
        // Seen ids were reset with the store
        assert!(session.ingest_live(chat("Dev1", "developer", "early", "e1")));
    }

    #[test]
    fn test_duplicate_live_event_dropped() {
        let mut session = RunSession::new(SessionConfig::default());
        assert!(session.ingest_live(chat("Dev1", "developer", "hi", "m1")));
        assert!(!session.ingest_live(chat("Dev1", "developer", "hi", "m1")));
        assert_eq!(session.store().len(), 1);
    }

    #[test]
    fn test_human_message_does_not_drain_pending() {
        let mut session = RunSession::new(SessionConfig::default());
        session.pending.replace(["Stakeholder"]);
        session.ingest_live(chat("Stakeholder", "Stakeholder", "hello", "s1"));
        assert!(session.is_typing());
    }

    #[test]
    fn test_feed_messages_drive_connectivity_and_projection() {
        let mut session = RunSession::new(SessionConfig::default());
        assert!(!session.is_connected());

        session.apply_feed_message(FeedMessage::Status(FeedStatus::Connecting));
        assert!(!session.is_connected());
        session.apply_feed_message(FeedMessage::Status(FeedStatus::Connected));
        assert!(session.is_connected());

        assert!(session.apply_feed_message(FeedMessage::Event(RawEvent::new(
            "team.break",
            json!({})
        ))));
        assert_eq!(session.projection().pause_mode, PauseMode::Break);

        session.apply_feed_message(FeedMessage::Status(FeedStatus::Disconnected));
        assert!(!session.is_connected());
        // Projection survives going offline
        assert_eq!(session.projection().pause_mode, PauseMode::Break);
    }

    #[test]
    fn test_projection_memoized_between_mutations() {
        let mut session = RunSession::new(SessionConfig::default());
        session.ingest_live(chat("Dev1", "developer", "one", "1"));
        session.projection();
        session.projection();
        assert_eq!(session.engine.recomputations(), 1);

        session.ingest_live(chat("Dev1", "developer", "two", "2"));
        assert_eq!(session.projection().chat_transcript.len(), 2);
        assert_eq!(session.engine.recomputations(), 2);
    }

    #[tokio::test]
    async fn test_upload_without_run_makes_no_call() {
        let api = FakeApi::default();
        let mut session = RunSession::new(SessionConfig::default());
        session.attach("/tmp/brief.pdf");

        let err = session.upload_attachment(&api).await.unwrap_err();
        assert!(matches!(err, ConsoleError::NoRunSelected));
        assert_eq!(session.last_error(), Some(NO_RUN_FOR_UPLOAD));
        assert!(api.calls().is_empty());
        assert!(session.composer().attachment().is_some());
    }

    #[tokio::test]
    async fn test_upload_clears_attachment_on_success() {
        let api = FakeApi::default();
        let mut session = RunSession::new(SessionConfig::default());
        session.adopt_run(9);

        let err = session.upload_attachment(&api).await.unwrap_err();
        assert!(matches!(err, ConsoleError::NoAttachment));

        session.attach("/tmp/notes.txt");
        session.upload_attachment(&api).await.unwrap();
        assert!(session.composer().attachment().is_none());
        assert!(session.last_error().is_none());
        assert_eq!(api.calls(), vec!["upload 9 /tmp/notes.txt"]);
    }

    #[tokio::test]
    async fn test_resolve_latest_run_picks_highest_id() {
        let api = FakeApi {
            runs: vec![RunSummary { id: 3 }, RunSummary { id: 12 }, RunSummary { id: 7 }],
            ..Default::default()
        };
        let mut session = RunSession::new(SessionConfig::default());
        assert_eq!(session.resolve_latest_run(&api).await.unwrap(), Some(12));

        // Established runs are never overwritten
        let mut session = RunSession::new(SessionConfig::default());
        session.select_run(2);
        assert_eq!(session.resolve_latest_run(&api).await.unwrap(), Some(2));
        assert_eq!(api.calls(), vec!["runs"]);
    }

    #[tokio::test]
    async fn test_introduce_team_adopts_echoed_run() {
        let api = FakeApi {
            intro_response: Some(IntroResponse {
                run_id: Some(21),
                status: Some("ok".into()),
            }),
            ..Default::default()
        };
        let mut session = RunSession::new(SessionConfig::default());
        session.introduce_team(&api).await.unwrap();
        assert_eq!(session.run_id(), Some(21));
        assert_eq!(api.calls(), vec!["intro None"]);
    }

    #[tokio::test]
    async fn test_roster_feeds_mention_autocomplete() {
        let api = FakeApi {
            roster: vec![
                RosterAgent::new(Some("Dev1"), "Senior Developer"),
                RosterAgent::new(None, "QA Engineer"),
            ],
            ..Default::default()
        };
        let mut session = RunSession::new(SessionConfig::default());
        session.load_roster(&api).await.unwrap();

        session.set_input("ping @d");
        assert_eq!(session.composer().autocomplete().candidates(), ["@Dev1"]);
        assert!(session.composer_key(ComposerKey::Confirm));
        assert_eq!(session.composer().text(), "ping @Dev1 ");

        session.type_str("and @qa");
        assert_eq!(session.composer().autocomplete().candidates(), ["@QAEngineer"]);
        session.composer_key(ComposerKey::Cancel);
        assert!(!session.composer().autocomplete().is_open());
        assert_eq!(session.composer().text(), "ping @Dev1 and @qa");
    }

    #[test]
    fn test_events_scope_uses_larger_capacity() {
        let session = RunSession::for_scope(HistoryScope::Events);
        assert_eq!(session.store().capacity(), 400);
        assert_eq!(session.config().history_scope, HistoryScope::Events);
    }
}
