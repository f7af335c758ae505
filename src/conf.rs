use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Collect fping loss and rtt statistics into postgres.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Path of the config file, `.toml` or yaml
    #[clap(short, long, default_value = "config.yaml")]
    pub config: PathBuf,

    /// Log at debug level
    #[clap(short, long)]
    pub verbose: bool,
}

#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Conf {
    pub db: String,
    pub fping_path: String,
    pub targets: Vec<String>,
}

impl Conf {
    pub fn from_str_with_format(content: &str, format: Format) -> Result<Self> {
        let conf = match format {
            Format::Toml => toml::from_str::<Conf>(content)?,
            // serde_yaml refuses an empty document, treat it as all keys missing
            Format::Yaml if content.trim().is_empty() => Conf::default(),
            Format::Yaml => serde_yaml::from_str::<Conf>(content)?,
        };

        Ok(conf)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Yaml,
}

impl Format {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Format::Toml,
            _ => Format::Yaml,
        }
    }
}

pub async fn read_conf(path: &Path) -> Result<Conf> {
    use tokio::fs;

    info!("read conf from {}", path.display());
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("read conf {}", path.display()))?;
    let conf = Conf::from_str_with_format(&content, Format::from_path(path))
        .with_context(|| format!("parse conf {}", path.display()))?;

    if conf.targets.is_empty() {
        warn!("No targets in conf, fping will have nothing to probe");
    }

    Ok(conf)
}
