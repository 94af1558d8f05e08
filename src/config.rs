// src/config.rs

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};

pub const DEFAULT_DATASET: &str = "SCMS_Delivery_History_Dataset.csv";
pub const DEFAULT_PORT: u16 = 8000;

/// Runtime settings, read from the environment:
///
/// - `SCMS_DATASET`: dataset file (CSV, or JSON when it ends in `.json`)
/// - `SCMS_BIND`: listen address
/// - `PORT`: listen port
/// - `SCMS_EAGER_LOAD`: load the dataset before serving (`true`/`false`)
///
/// Also deserializable from a settings document; absent keys take defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dataset_path: PathBuf,
    pub bind: IpAddr,
    pub port: u16,
    pub eager_load: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET),
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            eager_load: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key → value lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(path) = lookup("SCMS_DATASET").filter(|p| !p.trim().is_empty()) {
            cfg.dataset_path = PathBuf::from(path);
        }
        if let Some(bind) = lookup("SCMS_BIND") {
            cfg.bind = bind
                .trim()
                .parse()
                .with_context(|| format!("SCMS_BIND `{}` is not an IP address", bind))?;
        }
        if let Some(port) = lookup("PORT") {
            cfg.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT `{}` is not a valid port", port))?;
        }
        if let Some(flag) = lookup("SCMS_EAGER_LOAD") {
            cfg.eager_load = parse_flag(&flag)
                .with_context(|| format!("SCMS_EAGER_LOAD `{}` is not a boolean", flag))?;
        }

        Ok(cfg)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(anyhow::anyhow!("unrecognised flag value `{}`", other)),
    }
}
