use std::collections::HashMap;

use serde::Deserialize;

/// Sample traversal used when the host submits a panel without query text.
pub const DEFAULT_QUERY: &str = "g.V().limit(10)";

/// Raw bound value signalling an intentionally unbounded range.
const NOW: &str = "now";

/// Dashboard template variables scoped to the current panel batch.
pub type ScopedVars = HashMap<String, String>;

/// One panel's query, as submitted by the dashboard host.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GremlinQuery {
    /// Opaque correlation id; echoed back on the matching frame.
    pub ref_id: String,
    #[serde(default = "default_query_text")]
    pub query_text: String,
    /// Hidden panels are skipped and yield an empty frame.
    #[serde(default)]
    pub hide: bool,
}

fn default_query_text() -> String {
    DEFAULT_QUERY.to_string()
}

impl GremlinQuery {
    pub fn new(ref_id: impl Into<String>, query_text: impl Into<String>) -> Self {
        Self {
            ref_id: ref_id.into(),
            query_text: query_text.into(),
            hide: false,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.hide = true;
        self
    }
}

/// The dashboard's selected time range, supplied fresh per execution.
///
/// `from` and `to` are epoch seconds; the raw bounds keep whatever the user
/// typed into the picker (`"now-6h"`, `"now"`, an absolute timestamp).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    pub from: i64,
    pub to: i64,
    pub raw_from: String,
    pub raw_to: String,
}

impl TimeRange {
    pub fn bounded(from: i64, to: i64) -> Self {
        Self {
            from,
            to,
            raw_from: from.to_string(),
            raw_to: to.to_string(),
        }
    }

    pub fn unbounded() -> Self {
        Self {
            from: 0,
            to: 0,
            raw_from: NOW.to_string(),
            raw_to: NOW.to_string(),
        }
    }

    /// Both raw bounds carry the `now` sentinel: the dashboard asked for the
    /// whole graph with no time constraint.
    pub fn is_unbounded(&self) -> bool {
        self.raw_from == NOW && self.raw_to == NOW
    }
}

/// One batch of panel queries sharing a range and scoped variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub range: TimeRange,
    #[serde(default)]
    pub scoped_vars: ScopedVars,
    pub targets: Vec<GremlinQuery>,
}
