use serde::{Deserialize, Serialize};

use super::page::Content;
use crate::view_model::{AppViewModel, FailureKind, StatusView};

/// Display strings. `{name}`, `{count}`, `{label}` and `{filename}` are
/// substituted where noted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub no_file: String,
    /// `{name}`
    pub one_file: String,
    /// `{count}`
    pub many_files: String,
    pub selection_required: String,
    pub busy: String,
    pub trigger_busy: String,
    /// Used when the trigger button has no text of its own.
    pub trigger_idle: String,
    pub server_error: String,
    pub transport_error: String,
    pub delivery_error: String,
    /// `{label}`
    pub unexpected: String,
    /// `{label}`
    pub download_link: String,
    /// `{filename}`
    pub download_started: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            no_file: "No file selected.".to_string(),
            one_file: "1 file selected: {name}".to_string(),
            many_files: "{count} files selected.".to_string(),
            selection_required: "Please select one or more files.".to_string(),
            busy: "Processing...".to_string(),
            trigger_busy: "Processing...".to_string(),
            trigger_idle: "Start processing".to_string(),
            server_error: "Server error: ".to_string(),
            transport_error: "An error occurred: ".to_string(),
            delivery_error: "Could not deliver the download: ".to_string(),
            unexpected: "Unexpected response (not a {label}):".to_string(),
            download_link: "Download the results ({label})".to_string(),
            download_started: "Download started: {filename}".to_string(),
        }
    }
}

pub fn selection_text(labels: &Labels, count: usize, first_name: Option<&str>) -> String {
    match (count, first_name) {
        (0, _) => labels.no_file.clone(),
        (1, Some(name)) => labels.one_file.replace("{name}", name),
        (n, _) => labels.many_files.replace("{count}", &n.to_string()),
    }
}

pub fn status_content(labels: &Labels, view: &AppViewModel) -> Vec<Content> {
    match &view.status {
        StatusView::Empty => Vec::new(),
        StatusView::SelectionRequired => vec![Content::Text(labels.selection_required.clone())],
        StatusView::Busy | StatusView::Preparing { .. } => vec![Content::Text(labels.busy.clone())],
        StatusView::DownloadReady {
            filename,
            auto_triggered: true,
            ..
        } => vec![Content::Text(
            labels.download_started.replace("{filename}", filename),
        )],
        StatusView::DownloadReady {
            filename,
            object_url,
            auto_triggered: false,
        } => vec![Content::Link {
            href: object_url.clone(),
            download_name: filename.clone(),
            text: labels.download_link.replace("{label}", &view.payload_label),
        }],
        StatusView::Failed { kind, message } => {
            let prefix = match kind {
                FailureKind::Server => &labels.server_error,
                FailureKind::Transport => &labels.transport_error,
                FailureKind::Delivery => &labels.delivery_error,
            };
            vec![Content::Text(format!("{prefix}{message}"))]
        }
        StatusView::Unexpected { raw_text } => vec![
            Content::Text(labels.unexpected.replace("{label}", &view.payload_label)),
            Content::Preformatted(raw_text.clone()),
        ],
    }
}
