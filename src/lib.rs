//! Datasource core for issuing Gremlin queries against a topology API.
//!
//! A dashboard host hands in a batch of panel queries together with the
//! selected time range and scoped template variables. Each query template has
//! the range injected as a bounded-time traversal step, goes through variable
//! substitution, and is posted to the backend; the raw response comes back
//! wrapped in one [`frame::DataFrame`] per panel.
//!
//! The HTTP client and the template resolver are explicit dependencies
//! ([`transport::Transport`], [`template::TemplateResolver`]), so the same
//! core runs under a real host, the bundled CLI, or a test harness.

pub mod config;
pub mod datasource;
pub mod error;
pub mod frame;
pub mod query;
pub mod template;
pub mod translate;
pub mod transport;

pub use config::ConnectionSettings;
pub use datasource::{DataSource, ProbeResult, ProbeStatus};
pub use error::PanelError;
pub use frame::{DataFrame, Field};
pub use query::{DEFAULT_QUERY, GremlinQuery, QueryRequest, ScopedVars, TimeRange};
pub use template::{DashboardResolver, TemplateResolver};
pub use translate::{TimeStep, translate};
pub use transport::{HttpTransport, Transport, TransportFailure, TransportResponse};
