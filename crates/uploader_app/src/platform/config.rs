use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use uploader_core::binder::{ElementKind, ElementLookup, Labels};
use uploader_core::{DeliveryMode, OrchestratorConfig, PayloadProfile};
use uploader_engine::{SubmitSettings, DEFAULT_ENDPOINT};
use uploader_logging::{uploader_info, uploader_warn};

pub const DEFAULT_CONFIG_FILENAME: &str = "uploader.ron";

const DEFAULT_RELEASE_DELAY_MS: u64 = 1_000;

/// Kind of an element declared in the page layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageElementKind {
    FileInput,
    Button,
    Form,
    Container,
}

impl From<PageElementKind> for ElementKind {
    fn from(kind: PageElementKind) -> Self {
        match kind {
            PageElementKind::FileInput => ElementKind::FileInput,
            PageElementKind::Button => ElementKind::Button,
            PageElementKind::Form => ElementKind::Form,
            PageElementKind::Container => ElementKind::Container,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageElement {
    pub id: String,
    pub kind: PageElementKind,
    #[serde(default)]
    pub text: String,
}

impl PageElement {
    pub fn new(id: &str, kind: PageElementKind, text: &str) -> Self {
        Self {
            id: id.to_string(),
            kind,
            text: text.to_string(),
        }
    }
}

/// Everything the binary reads from `uploader.ron`. Fields left out of the
/// file keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub endpoint: String,
    pub payload: PayloadProfile,
    pub delivery: DeliveryMode,
    /// Directory downloads are written to.
    pub output_dir: PathBuf,
    /// Time between starting a download and releasing its object.
    pub release_delay_ms: u64,
    pub connect_timeout_secs: Option<u64>,
    pub lookup: ElementLookup,
    pub labels: Labels,
    /// Elements the terminal page starts with.
    pub page: Vec<PageElement>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            payload: PayloadProfile::default(),
            delivery: DeliveryMode::default(),
            output_dir: PathBuf::from("downloads"),
            release_delay_ms: DEFAULT_RELEASE_DELAY_MS,
            connect_timeout_secs: None,
            lookup: ElementLookup::default(),
            labels: Labels::default(),
            page: default_page(),
        }
    }
}

fn default_page() -> Vec<PageElement> {
    vec![
        PageElement::new("csvFiles", PageElementKind::FileInput, ""),
        PageElement::new("processBtn", PageElementKind::Button, "Start processing"),
    ]
}

impl AppConfig {
    pub fn orchestrator(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            payload: self.payload.clone(),
            delivery: self.delivery,
        }
    }

    pub fn submit_settings(&self) -> SubmitSettings {
        SubmitSettings {
            endpoint: self.endpoint.clone(),
            payload: self.payload.clone(),
            connect_timeout: self.connect_timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn release_delay(&self) -> Duration {
        Duration::from_millis(self.release_delay_ms)
    }
}

/// Loads the config at `path`. A missing file yields the defaults; a file
/// that exists but does not parse is an error.
pub fn load(path: &Path) -> Result<AppConfig> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            uploader_warn!("No config file at {:?}; using defaults", path);
            return Ok(AppConfig::default());
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file {}", path.display()))
        }
    };

    let config: AppConfig = ron::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    uploader_info!("Loaded config from {:?}", path);
    Ok(config)
}

pub fn to_ron(config: &AppConfig) -> Result<String> {
    let pretty = ron::ser::PrettyConfig::new();
    ron::ser::to_string_pretty(config, pretty).context("failed to serialize config")
}
