use serde::Deserialize;
use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub root: Root,
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub limits: Limits,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Root { pub base_dir: PathBuf }

#[derive(Debug, Deserialize, Clone)]
pub struct Server {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_open_browser")]
    pub open_browser: bool,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            open_browser: default_open_browser(),
        }
    }
}

fn default_bind_addr() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8765 }
fn default_open_browser() -> bool { true }

#[derive(Debug, Deserialize, Clone)]
pub struct Limits {
    #[serde(default = "default_max_request_kb")]
    pub max_request_kb: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self { max_request_kb: default_max_request_kb() }
    }
}

fn default_max_request_kb() -> usize { 1024 }

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)?;
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            Ok(serde_json::from_str(&raw)?)
        } else {
            Ok(toml::from_str(&raw)?)
        }
    }

    /// The confinement model, not network access control, is the security
    /// boundary, so anything but a loopback bind address is refused. A
    /// missing base_dir is deliberately not an error here; startup only
    /// warns about it.
    pub fn validate(&self) -> anyhow::Result<()> {
        let addr: IpAddr = self.server.bind_addr.parse().map_err(|_| {
            anyhow::anyhow!("bind_addr is not a valid IP address: {}", self.server.bind_addr)
        })?;
        if !addr.is_loopback() {
            anyhow::bail!("bind_addr must be a loopback address, got {}", self.server.bind_addr);
        }
        if self.limits.max_request_kb == 0 { anyhow::bail!("max_request_kb must be > 0"); }
        Ok(())
    }
}
