use regex::Regex;

use crate::query::TimeRange;

/// Time constraint derived from the dashboard range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeStep {
    /// Window ending at `to`, reaching `duration` seconds back.
    Bounded { to: i64, duration: i64 },
    /// Both raw bounds were the `now` sentinel; the query runs unconstrained.
    Unbounded,
}

impl TimeStep {
    pub fn from_range(range: &TimeRange) -> Self {
        if range.is_unbounded() {
            TimeStep::Unbounded
        } else {
            TimeStep::Bounded {
                to: range.to,
                duration: range.to - range.from,
            }
        }
    }
}

/// Produce the final query string for one panel: inject the time window,
/// then let the resolver fill in dashboard variables.
///
/// No syntax validation happens here; malformed Gremlin is forwarded as-is
/// and surfaces at execution time.
pub fn translate<F>(query_text: &str, range: &TimeRange, substitute: F) -> String
where
    F: Fn(&str) -> String,
{
    let injected = match TimeStep::from_range(range) {
        TimeStep::Unbounded => query_text.to_string(),
        TimeStep::Bounded { to, duration } => inject_time_step(query_text, to, duration),
    };
    substitute(&injected)
}

/// Rewrite a leading traversal-source prefix (a single-letter root token and
/// a dot, any case) into a bounded-time step. A template without the prefix
/// passes through untouched; that is a silent no-op, not an error.
fn inject_time_step(query_text: &str, to: i64, duration: i64) -> String {
    let prefix = Regex::new(r"(?i)^([a-z])\.").unwrap();
    match prefix.captures(query_text) {
        Some(caps) => {
            let root = caps.get(1).unwrap().as_str();
            let rest = &query_text[caps.get(0).unwrap().end()..];
            format!("{}.timeRange({},{}).{}", root, to, duration, rest)
        }
        None => query_text.to_string(),
    }
}
