mod api;
mod config;
mod confine;
mod errors;
mod fsops;
mod logging;
mod server;

use crate::config::Config;
use crate::confine::BaseRoot;
use anyhow::Context;
use std::path::PathBuf;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    let mut config_path = PathBuf::from("filewright.toml");
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                if i >= args.len() { eprintln!("--config requires a path"); std::process::exit(2); }
                config_path = PathBuf::from(&args[i]);
            }
            _ => {}
        }
        i += 1;
    }

    let cfg = Config::load(&config_path).context("loading config")?;
    cfg.validate().context("validating config")?;

    let base = BaseRoot::resolve(&cfg.root.base_dir).context("resolving base directory")?;
    if !base.as_path().is_dir() {
        warn!(base_dir = %base.as_path().display(), "base directory does not exist yet");
    }

    let addr = format!("{}:{}", cfg.server.bind_addr, cfg.server.port);
    info!(addr = %addr, base_dir = %base.as_path().display(), "filewright ready");
    println!(
        "filewright ready addr={} base_dir={}",
        addr,
        base.as_path().display()
    );

    server::serve(cfg, base).await
}
