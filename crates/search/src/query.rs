//! Request body construction.
//!
//! The whole filter travels as one `query_string` expression:
//!
//! ```json
//! {"query": {"query_string": {"query": "status:active NOT (region:us region:eu )"}}}
//! ```

use serde::{Deserialize, Serialize};

use esquery_core::{Exclusion, ValidatedConfig};

/// JSON body of the `_search` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryPayload {
    pub query: QueryClause,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryClause {
    pub query_string: QueryString,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryString {
    pub query: String,
}

impl QueryPayload {
    pub fn query_string(text: impl Into<String>) -> Self {
        Self {
            query: QueryClause {
                query_string: QueryString { query: text.into() },
            },
        }
    }

    /// The free-text expression sent to the cluster.
    pub fn text(&self) -> &str {
        &self.query.query_string.query
    }
}

/// `NOT (key:v1 key:v2 )`. Values are inserted verbatim.
pub fn exclusion_clause(exclusion: &Exclusion) -> String {
    let mut clause = String::from("NOT (");
    for value in &exclusion.values {
        clause.push_str(&exclusion.key);
        clause.push(':');
        clause.push_str(value);
        clause.push(' ');
    }
    clause.push(')');
    clause
}

/// Wrap the configured query, appending the exclusion group when active.
pub fn build_query(config: &ValidatedConfig) -> QueryPayload {
    let base = &config.config().query;
    match config.exclusion() {
        Some(exclusion) => {
            QueryPayload::query_string(format!("{} {}", base, exclusion_clause(exclusion)))
        }
        None => QueryPayload::query_string(base.clone()),
    }
}
