use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Server settings.
///
/// The port always comes from the command line. Everything else has a
/// default that can be replaced by a YAML file named in `COURIER_CONFIG` and
/// then by individual `COURIER_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default)]
    pub port: u16,
    /// Directory GET and PUT paths are resolved against.
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Largest body a PUT may declare; unbounded when unset.
    #[serde(default)]
    pub max_body_size: Option<usize>,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

impl Config {
    pub fn new(port: u16) -> Self {
        Self {
            host: default_host(),
            port,
            root: default_root(),
            max_body_size: None,
        }
    }

    /// Builds the configuration for `port` from the environment.
    pub fn load(port: u16) -> anyhow::Result<Self> {
        let mut cfg = match std::env::var_os("COURIER_CONFIG") {
            Some(path) => Self::from_yaml_file(Path::new(&path))?,
            None => Self::new(port),
        };
        cfg.port = port;

        if let Ok(host) = std::env::var("COURIER_HOST") {
            cfg.host = host;
        }

        if let Some(root) = std::env::var_os("COURIER_ROOT") {
            cfg.root = PathBuf::from(root);
        }

        if let Ok(limit) = std::env::var("COURIER_MAX_BODY_SIZE") {
            let limit = limit
                .parse()
                .with_context(|| format!("COURIER_MAX_BODY_SIZE is not a byte count: {limit}"))?;
            cfg.max_body_size = Some(limit);
        }

        Ok(cfg)
    }

    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(yaml).context("invalid configuration")
    }

    pub fn from_yaml_file(path: &Path) -> anyhow::Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&yaml)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
