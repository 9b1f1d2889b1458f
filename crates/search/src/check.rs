//! One check run: version check, search, extraction, verdict, output line.

use tracing::{debug, info};

use esquery_core::{evaluate, format_summary, PluginOutput, ValidatedConfig};

use crate::error::SearchError;
use crate::extract::extract;
use crate::query::build_query;
use crate::response::ClusterInfo;
use crate::transport::SearchTransport;

/// Major version of the cluster API this client speaks.
pub const CLIENT_MAJOR_VERSION: u64 = 7;

/// Fail unless the server's leading version segment equals `expected_major`.
pub fn check_version(info: &ClusterInfo, expected_major: u64) -> Result<(), SearchError> {
    match info.version.major() {
        Some(major) if major == expected_major => Ok(()),
        _ => Err(SearchError::VersionMismatch {
            server: info.version.number.clone(),
            expected: expected_major,
        }),
    }
}

/// Run the whole pipeline against `transport`. Every error is terminal.
pub async fn run_check<T>(
    transport: &T,
    config: &ValidatedConfig,
) -> Result<PluginOutput, SearchError>
where
    T: SearchTransport + ?Sized,
{
    let cfg = config.config();

    let cluster = transport.info().await?;
    check_version(&cluster, CLIENT_MAJOR_VERSION)?;
    debug!(
        version = %cluster.version.number,
        cluster = cluster.cluster_name.as_deref().unwrap_or("-"),
        "Cluster version accepted"
    );

    let payload = build_query(config);
    let response = transport
        .search(&cfg.index, &payload, cfg.result_window.get())
        .await?;

    let extraction = extract(&response, config)?;
    let evaluation = evaluate(extraction.total_hits, cfg.warning, cfg.critical);

    info!(
        total_hits = extraction.total_hits,
        verdict = ?evaluation.verdict,
        "Check evaluated"
    );

    let text = match evaluation.fixed_summary {
        Some(summary) => summary.to_string(),
        None => format_summary(
            extraction.total_hits,
            &cfg.message_key,
            extraction.message.as_deref().unwrap_or_default(),
            cfg.message_chars,
        ),
    };

    Ok(PluginOutput::new(evaluation.verdict, text))
}
