use std::env;
use std::num::{NonZeroU64, NonZeroUsize};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ConfigError;

/// Character reserved by the retired `key=value` filter syntax.
pub const FORBIDDEN_QUERY_CHAR: char = '=';

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 9200;
pub const DEFAULT_TIMEOUT_SECONDS: NonZeroU64 = match NonZeroU64::new(10) {
    Some(seconds) => seconds,
    None => panic!("default timeout must be non-zero"),
};
pub const DEFAULT_INDEX: &str = "_all";
pub const DEFAULT_MESSAGE_KEY: &str = "message";
pub const DEFAULT_MESSAGE_CHARS: usize = 255;
pub const DEFAULT_WARNING: u64 = 5;
pub const DEFAULT_CRITICAL: u64 = 10;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_u16(profile: &str, key: &str, default: u16) -> u16 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Zero and unparsable values fall back to `default`.
fn profiled_env_nonzero_u64(profile: &str, key: &str, default: NonZeroU64) -> NonZeroU64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_bool(profile: &str, key: &str, default: bool) -> bool {
    match profiled_env_opt(profile, key) {
        Some(v) => matches!(v.as_str(), "true" | "1"),
        None => default,
    }
}

// ── Connection ────────────────────────────────────────────────

/// Where and how to reach the search cluster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub use_tls: bool,
    pub timeout_seconds: NonZeroU64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            username: None,
            password: None,
            use_tls: false,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl ConnectionConfig {
    /// Build from environment variables (call `load_dotenv()` first).
    /// Profile is read from `ESQUERY_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("ESQUERY_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            host: profiled_env_or(p, "ES_HOST", DEFAULT_HOST),
            port: profiled_env_u16(p, "ES_PORT", DEFAULT_PORT),
            username: profiled_env_opt(p, "ES_USERNAME"),
            password: profiled_env_opt(p, "ES_PASSWORD"),
            use_tls: profiled_env_bool(p, "ES_USE_TLS", false),
            timeout_seconds: profiled_env_nonzero_u64(
                p,
                "ES_TIMEOUT_SECONDS",
                DEFAULT_TIMEOUT_SECONDS,
            ),
        }
    }

    pub fn base_url(&self) -> String {
        let scheme = if self.use_tls { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }

    /// Username and password pair, only when both are present.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => {
                Some((user, pass))
            }
            _ => None,
        }
    }

    /// Redacted summary for debug logs.
    pub fn log_summary(&self) {
        debug!(
            url = %self.base_url(),
            user = self.username.as_deref().unwrap_or("(none)"),
            password = if self.password.is_some() { "<redacted>" } else { "(none)" },
            timeout_seconds = self.timeout_seconds.get(),
            "Connection config"
        );
    }
}

// ── Check parameters ──────────────────────────────────────────

/// User supplied parameters of one check run, not yet validated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckConfig {
    pub connection: ConnectionConfig,
    pub index: String,
    pub query: String,
    pub message_key: String,
    /// Maximum characters of the message to display (0 = hide the message).
    pub message_chars: usize,
    /// Exclusion mode flag. Recomputed from `exclude_key`/`exclude_values`
    /// during validation.
    pub exclude: bool,
    pub exclude_key: Option<String>,
    pub exclude_values: Vec<String>,
    pub warning: u64,
    pub critical: u64,
    /// 1-based rank of the hit whose message is shown. Also the number of
    /// hits requested from the cluster.
    pub result_window: NonZeroUsize,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            connection: ConnectionConfig::default(),
            index: DEFAULT_INDEX.to_string(),
            query: String::new(),
            message_key: DEFAULT_MESSAGE_KEY.to_string(),
            message_chars: DEFAULT_MESSAGE_CHARS,
            exclude: false,
            exclude_key: None,
            exclude_values: Vec::new(),
            warning: DEFAULT_WARNING,
            critical: DEFAULT_CRITICAL,
            result_window: NonZeroUsize::MIN,
        }
    }
}

/// Field/value list removed from the result set with a `NOT (...)` group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Exclusion {
    pub key: String,
    pub values: Vec<String>,
}

impl CheckConfig {
    /// Check the parameters in order, first failure wins.
    ///
    /// Consumes the config: only a [`ValidatedConfig`] can be executed.
    pub fn validate(mut self) -> Result<ValidatedConfig, ConfigError> {
        let user = self.connection.username.as_deref().unwrap_or_default();
        let password = self.connection.password.as_deref().unwrap_or_default();
        if !user.is_empty() && password.is_empty() {
            return Err(ConfigError::MissingPassword);
        }
        if !password.is_empty() && user.is_empty() {
            return Err(ConfigError::MissingUser);
        }

        if self.query.is_empty() {
            return Err(ConfigError::MissingQuery);
        }
        if self.query.contains(FORBIDDEN_QUERY_CHAR) {
            return Err(ConfigError::ForbiddenCharacter(FORBIDDEN_QUERY_CHAR));
        }

        self.exclude_key = self.exclude_key.take().filter(|k| !k.is_empty());
        self.exclude_values.retain(|v| !v.is_empty());

        let exclusion = match (&self.exclude_key, self.exclude_values.is_empty()) {
            (Some(key), false) => Some(Exclusion {
                key: key.clone(),
                values: self.exclude_values.clone(),
            }),
            (Some(_), true) => return Err(ConfigError::MissingExcludeValues),
            (None, false) => return Err(ConfigError::MissingExcludeKey),
            (None, true) => None,
        };
        self.exclude = exclusion.is_some();

        if self.critical < self.warning {
            warn!(
                warning = self.warning,
                critical = self.critical,
                "Critical threshold is below the warning threshold"
            );
        }

        Ok(ValidatedConfig {
            inner: self,
            exclusion,
        })
    }
}

/// A [`CheckConfig`] that passed [`CheckConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedConfig {
    inner: CheckConfig,
    exclusion: Option<Exclusion>,
}

impl ValidatedConfig {
    pub fn config(&self) -> &CheckConfig {
        &self.inner
    }

    pub fn connection(&self) -> &ConnectionConfig {
        &self.inner.connection
    }

    /// `Some` exactly when exclusion mode is active.
    pub fn exclusion(&self) -> Option<&Exclusion> {
        self.exclusion.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Env-based tests must run serially to avoid interfering with each other.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_es_env() {
        for k in [
            "ESQUERY_PROFILE",
            "ES_HOST",
            "ES_PORT",
            "ES_USERNAME",
            "ES_PASSWORD",
            "ES_USE_TLS",
            "ES_TIMEOUT_SECONDS",
            "STAGE_ES_HOST",
            "STAGE_ES_PORT",
        ] {
            env::remove_var(k);
        }
    }

    fn config(query: &str) -> CheckConfig {
        CheckConfig {
            query: query.to_string(),
            ..CheckConfig::default()
        }
    }

    #[test]
    fn test_default_config_is_rejected_without_query() {
        assert_eq!(
            CheckConfig::default().validate().unwrap_err(),
            ConfigError::MissingQuery
        );
    }

    #[test]
    fn test_minimal_config_validates() {
        let validated = config("machine.ram: 16106127360").validate().unwrap();
        assert_eq!(validated.config().index, "_all");
        assert_eq!(validated.config().message_key, "message");
        assert!(validated.exclusion().is_none());
        assert!(!validated.config().exclude);
    }

    #[test]
    fn test_user_without_password() {
        let mut cfg = config("status:active");
        cfg.connection.username = Some("elastic".into());
        assert_eq!(cfg.validate().unwrap_err(), ConfigError::MissingPassword);
    }

    #[test]
    fn test_password_without_user() {
        let mut cfg = config("status:active");
        cfg.connection.password = Some("changeme".into());
        assert_eq!(cfg.validate().unwrap_err(), ConfigError::MissingUser);
    }

    #[test]
    fn test_empty_username_counts_as_absent() {
        let mut cfg = config("status:active");
        cfg.connection.username = Some(String::new());
        cfg.connection.password = Some("changeme".into());
        assert_eq!(cfg.validate().unwrap_err(), ConfigError::MissingUser);
    }

    #[test]
    fn test_credential_pair_validates() {
        let mut cfg = config("status:active");
        cfg.connection.username = Some("elastic".into());
        cfg.connection.password = Some("changeme".into());
        let validated = cfg.validate().unwrap();
        assert_eq!(
            validated.connection().credentials(),
            Some(("elastic", "changeme"))
        );
    }

    #[test]
    fn test_credentials_checked_before_query() {
        let mut cfg = config("");
        cfg.connection.username = Some("elastic".into());
        assert_eq!(cfg.validate().unwrap_err(), ConfigError::MissingPassword);
    }

    #[test]
    fn test_equals_sign_rejected() {
        for query in ["event.dataset=sample", "=", "a:b AND c=d"] {
            assert_eq!(
                config(query).validate().unwrap_err(),
                ConfigError::ForbiddenCharacter('=')
            );
        }
    }

    #[test]
    fn test_equals_sign_rejected_with_exclusion_set() {
        let mut cfg = config("a=b");
        cfg.exclude_key = Some("region".into());
        cfg.exclude_values = vec!["us".into()];
        assert_eq!(
            cfg.validate().unwrap_err(),
            ConfigError::ForbiddenCharacter('=')
        );
    }

    #[test]
    fn test_exclude_key_without_values() {
        let mut cfg = config("status:active");
        cfg.exclude_key = Some("region".into());
        assert_eq!(cfg.validate().unwrap_err(), ConfigError::MissingExcludeValues);
    }

    #[test]
    fn test_exclude_values_without_key() {
        let mut cfg = config("status:active");
        cfg.exclude_values = vec!["us".into()];
        assert_eq!(cfg.validate().unwrap_err(), ConfigError::MissingExcludeKey);
    }

    #[test]
    fn test_blank_exclude_values_are_dropped() {
        let mut cfg = config("status:active");
        cfg.exclude_key = Some("region".into());
        cfg.exclude_values = vec![String::new(), String::new()];
        assert_eq!(cfg.validate().unwrap_err(), ConfigError::MissingExcludeValues);
    }

    #[test]
    fn test_exclusion_pair_activates_exclusion_mode() {
        let mut cfg = config("status:active");
        cfg.exclude_key = Some("region".into());
        cfg.exclude_values = vec!["us".into(), String::new(), "eu".into()];
        let validated = cfg.validate().unwrap();
        let exclusion = validated.exclusion().unwrap();
        assert_eq!(exclusion.key, "region");
        assert_eq!(exclusion.values, vec!["us", "eu"]);
        assert!(validated.config().exclude);
    }

    #[test]
    fn test_exclude_flag_alone_does_not_enable_exclusion() {
        let mut cfg = config("status:active");
        cfg.exclude = true;
        let validated = cfg.validate().unwrap();
        assert!(validated.exclusion().is_none());
        assert!(!validated.config().exclude);
    }

    #[test]
    fn test_inverted_thresholds_still_validate() {
        let mut cfg = config("status:active");
        cfg.warning = 20;
        cfg.critical = 10;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_base_url() {
        let mut conn = ConnectionConfig::default();
        assert_eq!(conn.base_url(), "http://127.0.0.1:9200");
        conn.use_tls = true;
        conn.host = "es.example.org".into();
        conn.port = 443;
        assert_eq!(conn.base_url(), "https://es.example.org:443");
    }

    #[test]
    fn test_connection_from_env_defaults() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_es_env();

        let conn = ConnectionConfig::from_env();
        assert_eq!(conn, ConnectionConfig::default());
    }

    #[test]
    fn test_connection_from_env_profile() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_es_env();

        env::set_var("ES_HOST", "base.local");
        env::set_var("ES_PORT", "9201");
        env::set_var("ES_USE_TLS", "true");
        env::set_var("ESQUERY_PROFILE", "stage");
        env::set_var("STAGE_ES_HOST", "stage.local");

        let conn = ConnectionConfig::from_env();
        assert_eq!(conn.host, "stage.local");
        assert_eq!(conn.port, 9201);
        assert!(conn.use_tls);
        assert_eq!(conn.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);

        clear_es_env();
    }

    #[test]
    fn test_connection_from_env_rejects_zero_timeout() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_es_env();

        env::set_var("ES_TIMEOUT_SECONDS", "0");
        assert_eq!(ConnectionConfig::from_env().timeout_seconds, DEFAULT_TIMEOUT_SECONDS);

        env::set_var("ES_TIMEOUT_SECONDS", "30");
        assert_eq!(ConnectionConfig::from_env().timeout_seconds.get(), 30);

        clear_es_env();
    }

    #[test]
    fn test_connection_from_env_ignores_unparsable_port() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_es_env();

        env::set_var("ES_PORT", "not-a-port");
        assert_eq!(ConnectionConfig::from_env().port, DEFAULT_PORT);

        clear_es_env();
    }
}
