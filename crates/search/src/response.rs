use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `GET /`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterInfo {
    #[serde(default)]
    pub cluster_name: Option<String>,
    pub version: ClusterVersion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterVersion {
    /// Dot separated, e.g. `7.17.9`.
    pub number: String,
}

impl ClusterVersion {
    /// Leading segment of `number`, if numeric.
    pub fn major(&self) -> Option<u64> {
        self.number.split('.').next()?.trim().parse().ok()
    }
}

/// Body of `POST /{index}/_search`. Only the parts the check reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub hits: HitsEnvelope,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitsEnvelope {
    pub total: TotalHits,
    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// `hits.total` is an object on 7.x and a bare number when the cluster is
/// asked for `rest_total_hits_as_int` (or on 6.x).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TotalHits {
    Tracked {
        value: f64,
        #[serde(default)]
        relation: Option<String>,
    },
    Count(f64),
}

impl TotalHits {
    /// Wire value truncated toward zero. Negative or NaN become 0.
    pub fn value(&self) -> u64 {
        let raw = match self {
            TotalHits::Tracked { value, .. } => *value,
            TotalHits::Count(value) => *value,
        };
        raw as u64
    }
}

/// One ranked document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    #[serde(rename = "_index", default)]
    pub index: Option<String>,
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    /// The indexed document. Open-ended by nature.
    #[serde(rename = "_source", default)]
    pub source: Map<String, Value>,
}

impl Hit {
    /// All `_source` keys in sorted order, each followed by a newline.
    pub fn key_listing(&self) -> String {
        let mut keys: Vec<&String> = self.source.keys().collect();
        keys.sort();
        keys.into_iter().fold(String::new(), |mut acc, key| {
            acc.push_str(key);
            acc.push('\n');
            acc
        })
    }
}

/// Human readable JSON type name for diagnostics.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Non-2xx error document: `{"error": {"type": ..., "reason": ...}, "status": ...}`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorDetail {
    #[serde(rename = "type")]
    pub error_type: String,
    #[serde(default)]
    pub reason: String,
}
