//! Pull the hit count and the displayed message out of a search response.

use serde_json::Value;
use tracing::{debug, warn};

use esquery_core::ValidatedConfig;

use crate::error::SearchError;
use crate::response::{value_kind, Hit, SearchResponse};

/// What the check needs from a [`SearchResponse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub total_hits: u64,
    /// `None` when the cluster returned no hits at all.
    pub message: Option<String>,
}

/// Read `hits.total` and the message of the hit at rank `result_window`.
///
/// The inspected hit is the *last* one of the requested window, not the
/// top-ranked one. When a key is missing from its `_source`, the error lists
/// every key that is present so the operator can pick the right one.
pub fn extract(
    response: &SearchResponse,
    config: &ValidatedConfig,
) -> Result<Extraction, SearchError> {
    let cfg = config.config();
    let total_hits = response.hits.total.value();
    let hits = &response.hits.hits;

    if hits.is_empty() {
        debug!(total_hits, "No hits returned, nothing to extract");
        return Ok(Extraction {
            total_hits,
            message: None,
        });
    }

    let position = cfg.result_window.get();
    let hit = hits.get(position - 1).ok_or_else(|| {
        warn!(position, returned = hits.len(), "Requested hit is outside the returned window");
        SearchError::HitNotReturned {
            position,
            returned: hits.len(),
        }
    })?;

    debug!(
        id = hit.id.as_deref().unwrap_or("-"),
        index = hit.index.as_deref().unwrap_or("-"),
        position,
        "Inspecting hit"
    );

    let message = lookup(hit, &cfg.message_key)?;

    if let Some(exclusion) = config.exclusion() {
        lookup(hit, &exclusion.key)?;
    }

    let message = match message {
        Value::String(text) => text.clone(),
        other => {
            return Err(SearchError::FieldType {
                key: cfg.message_key.clone(),
                found: value_kind(other),
            })
        }
    };

    Ok(Extraction {
        total_hits,
        message: Some(message),
    })
}

fn lookup<'a>(hit: &'a Hit, key: &str) -> Result<&'a Value, SearchError> {
    hit.source.get(key).ok_or_else(|| SearchError::KeyNotFound {
        key: key.to_string(),
        available: hit.key_listing(),
    })
}
