use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::config::ConnectionSettings;
use crate::error::PanelError;
use crate::frame::DataFrame;
use crate::query::{GremlinQuery, QueryRequest};
use crate::template::{DashboardResolver, TemplateResolver};
use crate::translate::translate;
use crate::transport::{HttpTransport, Transport, TransportFailure, TransportResponse};

const TOPOLOGY_PATH: &str = "/api/topology";
const HEALTH_PATH: &str = "/api";
const DEFAULT_ERROR_MESSAGE: &str = "Cannot connect to API";

/// The datasource core: translates panel queries, posts them to the topology
/// API, and wraps each response in a data frame.
///
/// Transport and template resolution are injected so hosts and tests can
/// supply their own.
pub struct DataSource {
    settings: ConnectionSettings,
    transport: Arc<dyn Transport>,
    resolver: Arc<dyn TemplateResolver>,
}

impl DataSource {
    pub fn new(
        settings: ConnectionSettings,
        transport: Arc<dyn Transport>,
        resolver: Arc<dyn TemplateResolver>,
    ) -> Self {
        Self {
            settings,
            transport,
            resolver,
        }
    }

    /// Datasource wired with the production reqwest transport and the
    /// default dashboard resolver.
    pub fn with_http(settings: ConnectionSettings) -> Self {
        Self::new(
            settings,
            Arc::new(HttpTransport::new()),
            Arc::new(DashboardResolver),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.settings.url
    }

    /// Host entry point: run every panel query in one batch concurrently.
    ///
    /// Yields exactly one result per target, in submission order. Hidden
    /// targets contribute an empty frame without touching the transport; a
    /// failed panel occupies its own slot and leaves the others alone.
    pub async fn query(&self, request: &QueryRequest) -> Vec<Result<DataFrame, PanelError>> {
        join_all(
            request
                .targets
                .iter()
                .map(|target| self.run_panel(target, request)),
        )
        .await
    }

    async fn run_panel(
        &self,
        target: &GremlinQuery,
        request: &QueryRequest,
    ) -> Result<DataFrame, PanelError> {
        if target.hide {
            return Ok(DataFrame::empty(&target.ref_id));
        }
        let query = translate(&target.query_text, &request.range, |text| {
            self.resolver.replace(text, &request.scoped_vars)
        });
        debug!(ref_id = %target.ref_id, query = %query, "issuing gremlin query");
        match self.execute(&query).await {
            Ok(values) => Ok(DataFrame::of_values(&target.ref_id, values)),
            Err(failure) => Err(PanelError {
                ref_id: target.ref_id.clone(),
                failure,
            }),
        }
    }

    /// POST one translated query to the topology endpoint and hand back the
    /// response body verbatim as the values payload. No shape validation: an
    /// array contributes its elements, null contributes nothing, anything
    /// else is carried as a single opaque value.
    pub async fn execute(&self, query: &str) -> Result<Vec<Value>, TransportFailure> {
        let url = format!("{}{}", self.settings.url, TOPOLOGY_PATH);
        let body = json!({ "GremlinQuery": query });
        let response = self.transport.post(&url, &body).await?;
        Ok(into_values(response.body))
    }

    /// GET against the backend, with optional raw query parameters.
    pub async fn get(
        &self,
        path: &str,
        params: Option<&str>,
    ) -> Result<TransportResponse, TransportFailure> {
        let url = match params {
            Some(params) if !params.is_empty() => {
                format!("{}{}?{}", self.settings.url, path, params)
            }
            _ => format!("{}{}", self.settings.url, path),
        };
        self.transport.get(&url).await
    }

    /// Connectivity self-test against the backend health path.
    ///
    /// Never propagates an error: every failure shape is folded into a
    /// status/message pair for the connection-test UI.
    pub async fn probe(&self) -> ProbeResult {
        match self.get(HEALTH_PATH, None).await {
            Ok(response) if response.status == 200 => ProbeResult::success(),
            Ok(response) => {
                let message = if response.status_text.is_empty() {
                    DEFAULT_ERROR_MESSAGE.to_string()
                } else {
                    response.status_text
                };
                ProbeResult::error(message)
            }
            Err(failure) => ProbeResult::error(failure.user_message(DEFAULT_ERROR_MESSAGE)),
        }
    }
}

fn into_values(body: Value) -> Vec<Value> {
    match body {
        Value::Array(values) => values,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

/// Outcome of the connectivity probe, shaped for the connection-test UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    pub status: ProbeStatus,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Success,
    Error,
}

impl ProbeResult {
    pub fn success() -> Self {
        Self {
            status: ProbeStatus::Success,
            message: "Success".to_string(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ProbeStatus::Error,
            message: message.into(),
        }
    }
}
