use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use uploader_core::{DeliveryMode, PayloadProfile};

use super::config::{AppConfig, DEFAULT_CONFIG_FILENAME};
use super::logging::LogDestination;

#[derive(Debug, Parser)]
#[command(
    name = "uploader",
    version,
    about = "Uploads files for server-side processing and saves the returned result"
)]
pub struct Cli {
    /// Files to upload, sent in the given order.
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// RON configuration file.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Processing endpoint receiving the multipart upload.
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Kind of result the server returns on success.
    #[arg(long, value_enum)]
    pub payload: Option<PayloadArg>,

    /// Save the result at once, or offer a link to activate first.
    #[arg(long, value_enum)]
    pub delivery: Option<DeliveryArg>,

    /// Directory the result is saved into.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogArg::File)]
    pub log: LogArg,

    /// Print the effective configuration as RON and exit.
    #[arg(long)]
    pub print_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PayloadArg {
    Archive,
    Spreadsheet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeliveryArg {
    Auto,
    Link,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogArg {
    Terminal,
    File,
    Both,
}

impl From<LogArg> for LogDestination {
    fn from(arg: LogArg) -> Self {
        match arg {
            LogArg::Terminal => LogDestination::Terminal,
            LogArg::File => LogDestination::File,
            LogArg::Both => LogDestination::Both,
        }
    }
}

impl Cli {
    pub fn config_path(&self) -> &Path {
        self.config
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILENAME))
    }

    /// Flags given on the command line win over the config file.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(payload) = self.payload {
            config.payload = match payload {
                PayloadArg::Archive => PayloadProfile::archive(),
                PayloadArg::Spreadsheet => PayloadProfile::spreadsheet(),
            };
        }
        if let Some(delivery) = self.delivery {
            config.delivery = match delivery {
                DeliveryArg::Auto => DeliveryMode::AutoDownload,
                DeliveryArg::Link => DeliveryMode::Link,
            };
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
    }
}
