use crate::cache::DEFAULT_TTL;
use crate::twitter::auth::Credentials;
use crate::twitter::client::{DEFAULT_REQUEST_TIMEOUT, DEFAULT_TIMELINE_COUNT, TWITTER_API_BASE};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_PUBLIC_DIR: &str = "./public";

const CONSUMER_KEY_VARS: [&str; 2] = ["TWITTER_CONSUMER_KEY", "twitter_consumer_key"];
const CONSUMER_SECRET_VARS: [&str; 2] = ["TWITTER_CONSUMER_SECRET", "twitter_consumer_secret"];

/// Optional settings file. Secrets never live here, only in the environment.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub public_dir: Option<PathBuf>,
    pub api_base: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub cache_ttl_secs: Option<u64>,
    pub timeline_count: Option<u32>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Loads `path` when given (it must exist), else the default location if
    /// a file is there, else an empty config.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tweetrss").join("config.toml"))
}

/// Values given on the command line; they win over everything else.
#[derive(Debug, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub public_dir: Option<PathBuf>,
}

#[derive(Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub public_dir: PathBuf,
    pub api_base: String,
    pub request_timeout: Duration,
    pub cache_ttl: Duration,
    pub timeline_count: u32,
    pub credentials: Credentials,
}

impl Config {
    /// Merges file settings, the environment (read through `env`) and CLI
    /// overrides. Fails when either Twitter secret is missing.
    pub fn resolve(
        file: FileConfig,
        overrides: Overrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let credentials = Credentials {
            consumer_key: required(&env, &CONSUMER_KEY_VARS)?,
            consumer_secret: required(&env, &CONSUMER_SECRET_VARS)?,
        };

        let env_port = match env("PORT") {
            Some(port) => Some(
                port.parse::<u16>()
                    .with_context(|| format!("invalid PORT {:?}", port))?,
            ),
            None => None,
        };

        Ok(Config {
            host: overrides
                .host
                .or(file.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: overrides.port.or(env_port).or(file.port).unwrap_or(DEFAULT_PORT),
            public_dir: overrides
                .public_dir
                .or(file.public_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PUBLIC_DIR)),
            api_base: file.api_base.unwrap_or_else(|| TWITTER_API_BASE.to_string()),
            request_timeout: file
                .request_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            cache_ttl: file
                .cache_ttl_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TTL),
            timeline_count: file.timeline_count.unwrap_or(DEFAULT_TIMELINE_COUNT),
            credentials,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn required(env: &impl Fn(&str) -> Option<String>, names: &[&str]) -> Result<String> {
    for &name in names {
        if let Some(value) = env(name).filter(|v| !v.is_empty()) {
            return Ok(value);
        }
    }
    bail!("missing required environment variable {}", names[0])
}
