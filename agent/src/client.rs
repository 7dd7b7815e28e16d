//! HTTP client for a remote agent, used by `compose-agent remote`.

use std::time::Duration;

use anyhow::{Context, Result};
use compose_agent_common::{
    ComposeDownOptions, ComposeStatusOptions, ComposeUpOptions, ErrorResponse, ExecutionResponse,
    HealthResponse, StatusFormat,
};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;

pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);
pub const COMPOSE_TIMEOUT: Duration = Duration::from_secs(300);
pub const STATUS_TIMEOUT: Duration = Duration::from_secs(30);

/// Body returned by a compose route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeReply {
    /// The agent attempted the command (success, failure, or timeout).
    Executed(ExecutionResponse),
    /// The agent refused the request before running anything.
    Rejected(ErrorResponse),
}

/// A compose reply together with its HTTP status and raw JSON.
#[derive(Debug, Clone)]
pub struct RemoteOutcome {
    pub status: u16,
    pub reply: ComposeReply,
    pub raw: serde_json::Value,
}

impl RemoteOutcome {
    /// True only when the agent ran the command and it succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(&self.reply, ComposeReply::Executed(resp) if resp.success)
    }
}

/// Client for one agent base URL and token.
pub struct AgentClient {
    base: String,
    token: String,
    http: reqwest::Client,
}

impl AgentClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("compose-agent/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            base: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            http,
        })
    }

    fn request(&self, method: Method, path: &str, timeout: Duration) -> RequestBuilder {
        self.http
            .request(method, format!("{}{path}", self.base))
            .bearer_auth(&self.token)
            .timeout(timeout)
    }

    /// # Errors
    ///
    /// Returns an error if the agent is unreachable or unhealthy.
    pub async fn health(&self) -> Result<HealthResponse> {
        let resp = self
            .http
            .get(format!("{}/health", self.base))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .with_context(|| format!("cannot reach agent at {}", self.base))?
            .error_for_status()
            .context("agent health check failed")?;
        resp.json().await.context("invalid health response")
    }

    /// # Errors
    ///
    /// Returns an error on transport failure or an unrecognised body.
    pub async fn up(&self, opts: &ComposeUpOptions) -> Result<RemoteOutcome> {
        let req = self
            .request(Method::POST, "/docker/compose/up", COMPOSE_TIMEOUT)
            .json(opts);
        self.send(req).await
    }

    /// # Errors
    ///
    /// Returns an error on transport failure or an unrecognised body.
    pub async fn down(&self, opts: &ComposeDownOptions) -> Result<RemoteOutcome> {
        let req = self
            .request(Method::POST, "/docker/compose/down", COMPOSE_TIMEOUT)
            .json(opts);
        self.send(req).await
    }

    /// # Errors
    ///
    /// Returns an error on transport failure or an unrecognised body.
    pub async fn status(&self, opts: &ComposeStatusOptions) -> Result<RemoteOutcome> {
        let path = match opts.format {
            StatusFormat::Table => "/docker/compose/status",
            StatusFormat::Json => "/docker/compose/status?format=json",
        };
        self.send(self.request(Method::GET, path, STATUS_TIMEOUT))
            .await
    }

    async fn send(&self, req: RequestBuilder) -> Result<RemoteOutcome> {
        let resp = req
            .send()
            .await
            .with_context(|| format!("request to {} failed", self.base))?;
        let status = resp.status().as_u16();
        let raw: serde_json::Value = resp
            .json()
            .await
            .with_context(|| format!("agent returned a non-JSON body (HTTP {status})"))?;
        let reply = parse_reply(&raw)
            .with_context(|| format!("unrecognised agent response (HTTP {status})"))?;
        Ok(RemoteOutcome { status, reply, raw })
    }
}

/// Classify a compose route body.
///
/// # Errors
///
/// Returns an error if the body is neither an execution nor an error response.
pub fn parse_reply(raw: &serde_json::Value) -> Result<ComposeReply> {
    if let Some(resp) = from_value::<ExecutionResponse>(raw) {
        return Ok(ComposeReply::Executed(resp));
    }
    if let Some(resp) = from_value::<ErrorResponse>(raw) {
        return Ok(ComposeReply::Rejected(resp));
    }
    anyhow::bail!("body matches no known response shape: {raw}")
}

fn from_value<T: DeserializeOwned>(raw: &serde_json::Value) -> Option<T> {
    serde_json::from_value(raw.clone()).ok()
}
