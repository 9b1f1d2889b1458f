//! Hit-count thresholds and the status line shown to the monitoring system.

use serde::{Deserialize, Serialize};

use crate::status::Status;

/// Summary used instead of the formatted status line when nothing matched.
pub const ZERO_HITS_MESSAGE: &str = "The query return 0 hits";

/// Tri-state outcome of a check, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Ok,
    Warning,
    Critical,
}

impl From<Verdict> for Status {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Ok => Status::Ok,
            Verdict::Warning => Status::Warning,
            Verdict::Critical => Status::Critical,
        }
    }
}

/// Result of [`evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub verdict: Verdict,
    /// Fixed summary that replaces [`format_summary`] output.
    pub fixed_summary: Option<&'static str>,
}

/// Map a hit count onto a verdict. Critical wins over warning; the zero-hit
/// case is only reached when both thresholds are above zero.
pub fn evaluate(total_hits: u64, warning: u64, critical: u64) -> Evaluation {
    let (verdict, fixed_summary) = if total_hits >= critical {
        (Verdict::Critical, None)
    } else if total_hits >= warning {
        (Verdict::Warning, None)
    } else if total_hits == 0 {
        (Verdict::Ok, Some(ZERO_HITS_MESSAGE))
    } else {
        (Verdict::Ok, None)
    };

    Evaluation {
        verdict,
        fixed_summary,
    }
}

/// `Total hits: N`, plus `key: message` on a second line unless
/// `truncation` is 0. Messages longer than `truncation` characters are cut
/// to exactly that many characters.
pub fn format_summary(
    total_hits: u64,
    message_key: &str,
    message: &str,
    truncation: usize,
) -> String {
    let mut output = format!("Total hits: {}", total_hits);

    if truncation != 0 {
        let shown = match message.char_indices().nth(truncation) {
            Some((cut, _)) => &message[..cut],
            None => message,
        };
        output.push('\n');
        output.push_str(message_key);
        output.push_str(": ");
        output.push_str(shown);
    }

    output
}
