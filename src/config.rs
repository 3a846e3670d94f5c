use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use crate::charts::scatter::ScatterSpec;
use crate::table::DEFAULT_PAGE_SIZE;

/// Command-line arguments. Anything given here overrides the config file.
#[derive(Parser, Debug, Default)]
#[command(name = "clinic-dash", version, about = "Serve the diabetes dataset dashboard")]
pub struct Cli {
    /// Clinical dataset (.csv, .json or .parquet), label column last
    #[arg(long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Exported classifier artifact (JSON)
    #[arg(long, value_name = "FILE")]
    pub model: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<SocketAddr>,

    /// URL prefix the dashboard is mounted under
    #[arg(long, value_name = "PATH")]
    pub prefix: Option<String>,

    /// Rows per page in the dataset browser
    #[arg(long, value_name = "ROWS")]
    pub page_size: Option<usize>,

    /// TOML config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

/// Resolved settings for one process lifetime.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    pub data_path: PathBuf,
    pub model_path: PathBuf,
    pub bind: SocketAddr,
    pub prefix: String,
    pub page_size: usize,
    pub scatter: ScatterSpec,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/diabetes_clean.csv"),
            model_path: PathBuf::from("data/rf_model.json"),
            bind: SocketAddr::from(([127, 0, 0, 1], 5000)),
            prefix: "/dashapp/".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            scatter: ScatterSpec::default(),
        }
    }
}

impl DashConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Defaults, then the config file if one was named, then CLI flags.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.merge_with_cli(cli);
        Ok(config)
    }

    pub fn merge_with_cli(&mut self, cli: &Cli) {
        if let Some(data) = &cli.data {
            self.data_path = data.clone();
        }
        if let Some(model) = &cli.model {
            self.model_path = model.clone();
        }
        if let Some(bind) = cli.bind {
            self.bind = bind;
        }
        if let Some(prefix) = &cli.prefix {
            self.prefix = prefix.clone();
        }
        if let Some(page_size) = cli.page_size {
            self.page_size = page_size;
        }
    }

    /// The mount prefix as `/segment/.../` with no trailing slash, or an empty
    /// string when mounted at the root.
    pub fn mount_path(&self) -> String {
        let trimmed = self.prefix.trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        }
    }
}
