use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{ConsoleApi, IntroRequest, IntroResponse, SendRequest, SendResponse, UploadAck};
use crate::config::HistoryScope;
use crate::error::ConsoleError;
use crate::models::{RosterAgent, RunSummary};
use crate::store::HistoryResponse;

/// Backend client over plain HTTP/JSON
#[derive(Debug, Clone)]
pub struct HttpConsoleApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpConsoleApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Non-2xx statuses become [`ConsoleError::Server`] with the body text.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ConsoleError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ConsoleError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}

impl ConsoleApi for HttpConsoleApi {
    async fn list_runs(&self) -> Result<Vec<RunSummary>, ConsoleError> {
        let response = self.client.get(self.url("/runs")).send().await?;
        Self::decode(response).await
    }

    async fn history(
        &self,
        run_id: Option<u64>,
        scope: HistoryScope,
    ) -> Result<HistoryResponse, ConsoleError> {
        let mut request = self.client.get(self.url(scope.path()));
        if let Some(run_id) = run_id {
            request = request.query(&[("run_id", run_id)]);
        }
        debug!("Fetching {} history for run {:?}", scope.path(), run_id);
        let response = request.send().await?;
        Self::decode(response).await
    }

    async fn send(&self, request: SendRequest) -> Result<SendResponse, ConsoleError> {
        let response = self
            .client
            .post(self.url("/chat/send"))
            .json(&request)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn introduce_team(&self, run_id: Option<u64>) -> Result<IntroResponse, ConsoleError> {
        let response = self
            .client
            .post(self.url("/chat/intro"))
            .json(&IntroRequest { run_id })
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn upload_attachment(&self, run_id: u64, path: &Path) -> Result<UploadAck, ConsoleError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());
        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name));

        let response = self
            .client
            .post(self.url("/chat/upload"))
            .query(&[("run_id", run_id)])
            .multipart(form)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn agents_roster(&self) -> Result<Vec<RosterAgent>, ConsoleError> {
        let response = self.client.get(self.url("/agents")).send().await?;
        Self::decode(response).await
    }
}
