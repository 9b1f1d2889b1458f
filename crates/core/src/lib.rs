pub mod config;
pub mod error;
pub mod status;
pub mod verdict;

pub use config::{CheckConfig, ConnectionConfig, Exclusion, ValidatedConfig};
pub use error::*;
pub use status::{PluginOutput, Status};
pub use verdict::{evaluate, format_summary, Evaluation, Verdict, ZERO_HITS_MESSAGE};
