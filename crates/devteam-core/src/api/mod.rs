//! Request/response surface of the orchestration backend.
//!
//! The session only talks to the backend through [`ConsoleApi`], so tests can
//! swap in an in-memory implementation.

pub mod http;

use std::future::Future;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::HistoryScope;
use crate::error::ConsoleError;
use crate::models::{RosterAgent, RunSummary};
use crate::store::HistoryResponse;

pub use http::HttpConsoleApi;

/// Body of `POST /chat/send`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResponse {
    #[serde(default, alias = "runId")]
    pub run_id: Option<u64>,
    /// Agents the backend routed the message to
    #[serde(default)]
    pub targets: Option<Vec<String>>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Body of `POST /chat/intro`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntroRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntroResponse {
    #[serde(default, alias = "runId")]
    pub run_id: Option<u64>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadAck {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

/// Operations the console issues against the backend.
pub trait ConsoleApi {
    /// `GET /runs`
    fn list_runs(&self) -> impl Future<Output = Result<Vec<RunSummary>, ConsoleError>> + Send;

    /// Chronological history for a run; `None` lets the backend pick its latest.
    fn history(
        &self,
        run_id: Option<u64>,
        scope: HistoryScope,
    ) -> impl Future<Output = Result<HistoryResponse, ConsoleError>> + Send;

    fn send(
        &self,
        request: SendRequest,
    ) -> impl Future<Output = Result<SendResponse, ConsoleError>> + Send;

    fn introduce_team(
        &self,
        run_id: Option<u64>,
    ) -> impl Future<Output = Result<IntroResponse, ConsoleError>> + Send;

    fn upload_attachment(
        &self,
        run_id: u64,
        path: &Path,
    ) -> impl Future<Output = Result<UploadAck, ConsoleError>> + Send;

    /// `GET /agents`
    fn agents_roster(&self) -> impl Future<Output = Result<Vec<RosterAgent>, ConsoleError>> + Send;
}
