use thiserror::Error;

/// Reasons a [`CheckConfig`](crate::config::CheckConfig) is rejected before
/// any request is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("password must be configured")]
    MissingPassword,

    #[error("user must be configured")]
    MissingUser,

    #[error("query has to be configured")]
    MissingQuery,

    #[error("query must not contain '{0}'")]
    ForbiddenCharacter(char),

    #[error("exclude values must be configured with --excludekey")]
    MissingExcludeValues,

    #[error("exclude key must be configured with --excludevalues")]
    MissingExcludeKey,
}
