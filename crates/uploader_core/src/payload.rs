use serde::{Deserialize, Serialize};

pub const ZIP_CONTENT_TYPE: &str = "application/zip";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Expected success payload of a deployment: the content type that counts as
/// a downloadable result and the name used when the server suggests none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadProfile {
    pub content_type: String,
    pub default_filename: String,
    /// Short human name of the artifact, used in link labels ("ZIP").
    pub label: String,
}

impl PayloadProfile {
    pub fn archive() -> Self {
        Self {
            content_type: ZIP_CONTENT_TYPE.to_string(),
            default_filename: "resultats.zip".to_string(),
            label: "ZIP".to_string(),
        }
    }

    pub fn spreadsheet() -> Self {
        Self {
            content_type: XLSX_CONTENT_TYPE.to_string(),
            default_filename: "resultat.xlsx".to_string(),
            label: "XLSX".to_string(),
        }
    }

    pub fn custom(content_type: impl Into<String>, default_filename: impl Into<String>) -> Self {
        let default_filename = default_filename.into();
        let label = default_filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_uppercase())
            .unwrap_or_else(|| "file".to_string());
        Self {
            content_type: content_type.into(),
            default_filename,
            label,
        }
    }

    /// True when `content_type` names this profile's media type. Parameters
    /// such as `charset` are ignored and the comparison is case-insensitive.
    pub fn matches(&self, content_type: &str) -> bool {
        media_type_essence(content_type).eq_ignore_ascii_case(media_type_essence(&self.content_type))
    }
}

impl Default for PayloadProfile {
    fn default() -> Self {
        Self::archive()
    }
}

fn media_type_essence(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
}

/// How a successful download is handed to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeliveryMode {
    /// Start the download as soon as the payload arrives.
    #[default]
    AutoDownload,
    /// Render a link and wait for the user to activate it.
    Link,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    pub payload: PayloadProfile,
    pub delivery: DeliveryMode,
}
