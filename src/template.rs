use regex::{Captures, Regex};

use crate::query::ScopedVars;

/// Dashboard variable resolution, passed into the datasource as an explicit
/// dependency rather than fetched from a process-wide service.
pub trait TemplateResolver: Send + Sync {
    /// Replace named placeholders in `text` with values scoped to the
    /// current batch. What happens to an unknown placeholder is the
    /// resolver's call, not the translator's.
    fn replace(&self, text: &str, vars: &ScopedVars) -> String;
}

/// Default resolver: rewrites `$name` and `${name}` from the scoped map and
/// leaves unknown placeholders untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct DashboardResolver;

impl TemplateResolver for DashboardResolver {
    fn replace(&self, text: &str, vars: &ScopedVars) -> String {
        let placeholder = Regex::new(r"\$(?:\{(\w+)\}|(\w+))").unwrap();
        placeholder
            .replace_all(text, |caps: &Captures| {
                let name = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .map(|m| m.as_str())
                    .unwrap_or_default();
                match vars.get(name) {
                    Some(value) => value.clone(),
                    None => caps.get(0).unwrap().as_str().to_string(),
                }
            })
            .into_owned()
    }
}
