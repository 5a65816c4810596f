use std::path::PathBuf;
use std::str::FromStr;
use std::time;

use envconfig::Envconfig;
use url::Url;

#[derive(Envconfig, Clone)]
pub struct Config {
    #[envconfig(from = "BIND_HOST", default = "::")]
    pub host: String,

    #[envconfig(from = "BIND_PORT", default = "3300")]
    pub port: u16,

    /// Incoming webhook URL that notifications are posted to.
    #[envconfig(from = "SLACK_WEBHOOK_URL")]
    pub slack_webhook_url: Url,

    #[envconfig(default = "10000")]
    pub request_timeout_ms: EnvMsDuration,

    #[envconfig(default = "25000000")]
    pub max_body_size: usize,

    /// Directory to save `thumb` attachments to. They are dropped when unset.
    pub thumbnail_dir: Option<PathBuf>,

    #[envconfig(default = "false")]
    pub print_notifier: bool,

    #[envconfig(default = "true")]
    pub export_prometheus: bool,
}

impl Config {
    /// Produce a host:port address for binding a TcpListener.
    pub fn bind(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EnvMsDuration(pub time::Duration);

#[derive(Debug, PartialEq, Eq)]
pub struct ParseEnvMsDurationError;

impl FromStr for EnvMsDuration {
    type Err = ParseEnvMsDurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ms = s.parse::<u64>().map_err(|_| ParseEnvMsDurationError)?;

        Ok(EnvMsDuration(time::Duration::from_millis(ms)))
    }
}
