use std::num::{NonZeroU64, NonZeroUsize};

use clap::Parser;

use esquery_core::config::{
    DEFAULT_CRITICAL, DEFAULT_INDEX, DEFAULT_MESSAGE_CHARS, DEFAULT_MESSAGE_KEY, DEFAULT_WARNING,
};
use esquery_core::{CheckConfig, ConnectionConfig};

const ABOUT: &str = "Check the total hits/results of an Elasticsearch query";

const LONG_ABOUT: &str = "\
Check the total hits/results of an Elasticsearch query over the API of Elasticsearch.

The plugin returns the total hits of documents matching a query string and
compares them against the warning and critical thresholds. For the query syntax see:
https://www.elastic.co/guide/en/elasticsearch/reference/current/query-dsl-query-string-query.html

Connection settings can also come from the environment (or a .env file):
ES_HOST, ES_PORT, ES_USERNAME, ES_PASSWORD, ES_USE_TLS, ES_TIMEOUT_SECONDS.
Set ESQUERY_PROFILE=NAME to prefer NAME_ES_HOST etc.";

/// Command line of the check plugin. Connection flags left unset fall back to
/// the environment.
#[derive(Parser, Debug)]
#[command(name = "check_elasticsearch_query", version, about = ABOUT, long_about = LONG_ABOUT)]
pub struct CliArgs {
    /// Host name, IP Address of the Elasticsearch host [default: 127.0.0.1]
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port number of the Elasticsearch host [default: 9200]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Username of the Elasticsearch host
    #[arg(short = 'U', long)]
    pub user: Option<String>,

    /// Password of the user
    #[arg(short = 'P', long)]
    pub password: Option<String>,

    /// Connect over https
    #[arg(long)]
    pub tls: bool,

    /// Timeout in seconds for each request to the cluster [default: 10]
    #[arg(short, long)]
    pub timeout: Option<NonZeroU64>,

    /// Elasticsearch query, e.g. 'event.dataset:sample_web_logs and @timestamp:[2020-09-05T20:44:46.291Z TO *]'
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// The index which will be used
    #[arg(short, long, default_value = DEFAULT_INDEX)]
    pub index: String,

    /// Number of characters to display in latest message. To disable set value to 0
    #[arg(long, default_value_t = DEFAULT_MESSAGE_CHARS)]
    pub msgchars: usize,

    /// Key of the message to display, e.g. message
    #[arg(long, default_value = DEFAULT_MESSAGE_KEY)]
    pub msgkey: String,

    /// Exclusion mode, derived from --excludekey/--excludevalues
    #[arg(long, hide = true)]
    pub exclude: bool,

    /// Key of the field the exclude values apply to
    #[arg(long)]
    pub excludekey: Option<String>,

    /// Comma separated values of --excludekey to exclude from the result
    #[arg(long, value_delimiter = ',')]
    pub excludevalues: Vec<String>,

    /// Critical threshold for total hits
    #[arg(short, long, default_value_t = DEFAULT_CRITICAL)]
    pub critical: u64,

    /// Warning threshold for total hits
    #[arg(short, long, default_value_t = DEFAULT_WARNING)]
    pub warning: u64,

    /// Returns the top x matching documents and shows the message of the last one
    #[arg(long = "paginateSearchResult", hide = true, default_value = "1")]
    pub paginate_search_result: NonZeroUsize,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    /// Flags override the environment-derived connection field by field.
    pub fn connection(&self, mut env: ConnectionConfig) -> ConnectionConfig {
        if let Some(host) = &self.host {
            env.host = host.clone();
        }
        if let Some(port) = self.port {
            env.port = port;
        }
        if let Some(user) = &self.user {
            env.username = Some(user.clone());
        }
        if let Some(password) = &self.password {
            env.password = Some(password.clone());
        }
        if self.tls {
            env.use_tls = true;
        }
        if let Some(timeout) = self.timeout {
            env.timeout_seconds = timeout;
        }
        env
    }

    pub fn into_check_config(self, connection: ConnectionConfig) -> CheckConfig {
        CheckConfig {
            connection,
            index: self.index,
            query: self.query,
            message_key: self.msgkey,
            message_chars: self.msgchars,
            exclude: self.exclude,
            exclude_key: self.excludekey,
            exclude_values: self.excludevalues,
            warning: self.warning,
            critical: self.critical,
            result_window: self.paginate_search_result,
        }
    }
}
