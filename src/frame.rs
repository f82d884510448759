use serde::Serialize;
use serde_json::Value;

/// One output frame per panel query, shaped for the dashboard host.
///
/// The backend response is opaque to this crate, so every frame carries a
/// single `Data` field whose values pass through whatever the topology API
/// returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFrame {
    pub ref_id: String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    pub values: Vec<Value>,
}

impl DataFrame {
    /// Frame for a skipped panel: present for correlation, carrying nothing.
    pub fn empty(ref_id: impl Into<String>) -> Self {
        Self::of_values(ref_id, Vec::new())
    }

    pub fn of_values(ref_id: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            ref_id: ref_id.into(),
            fields: vec![Field {
                name: "Data".to_string(),
                values,
            }],
        }
    }

    /// The opaque values of the `Data` field.
    pub fn values(&self) -> &[Value] {
        self.fields
            .first()
            .map(|field| field.values.as_slice())
            .unwrap_or_default()
    }
}
