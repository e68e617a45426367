use std::error::Error as _;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use uploader_core::{
    classify, transport_error, FileSelection, HttpReply, PayloadProfile, ResponseOutcome,
    SubmissionId,
};
use uploader_logging::{uploader_debug, uploader_info};

use crate::EngineError;

/// Multipart field shared by every uploaded file.
pub const FILES_FIELD: &str = "files";

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/upload";

#[derive(Debug, Clone)]
pub struct SubmitSettings {
    pub endpoint: String,
    pub payload: PayloadProfile,
    /// Bounds connection setup only. A server that accepts the connection and
    /// never answers keeps the request pending; there is no request timeout.
    pub connect_timeout: Option<Duration>,
}

impl Default for SubmitSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            payload: PayloadProfile::default(),
            connect_timeout: None,
        }
    }
}

#[async_trait::async_trait]
pub trait Submitter: Send + Sync {
    /// Sends one request for `selection` and classifies whatever comes back.
    async fn submit(
        &self,
        submission_id: SubmissionId,
        selection: &FileSelection,
    ) -> ResponseOutcome;
}

#[derive(Debug, Clone)]
pub struct ReqwestSubmitter {
    settings: SubmitSettings,
    endpoint: reqwest::Url,
    client: reqwest::Client,
}

impl ReqwestSubmitter {
    pub fn new(settings: SubmitSettings) -> Result<Self, EngineError> {
        let endpoint = reqwest::Url::parse(&settings.endpoint).map_err(|err| {
            EngineError::InvalidEndpoint {
                endpoint: settings.endpoint.clone(),
                message: err.to_string(),
            }
        })?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| EngineError::Client(err.to_string()))?;

        Ok(Self {
            settings,
            endpoint,
            client,
        })
    }

    pub fn settings(&self) -> &SubmitSettings {
        &self.settings
    }

    /// Fresh multipart body: one `files` part per selected file, in order.
    fn build_form(selection: &FileSelection) -> Form {
        selection.files().iter().fold(Form::new(), |form, file| {
            form.part(
                FILES_FIELD,
                Part::bytes(file.content.clone()).file_name(file.name.clone()),
            )
        })
    }

    async fn send(&self, selection: &FileSelection) -> Result<HttpReply, reqwest::Error> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(Self::build_form(selection))
            .send()
            .await?;

        let status = response.status();
        let content_type = header_value(response.headers(), CONTENT_TYPE);
        let content_disposition = header_value(response.headers(), CONTENT_DISPOSITION);
        let body = response.bytes().await?;

        Ok(HttpReply {
            status: status.as_u16(),
            status_line: status_line(status),
            content_type,
            content_disposition,
            body: body.to_vec(),
        })
    }
}

#[async_trait::async_trait]
impl Submitter for ReqwestSubmitter {
    async fn submit(
        &self,
        submission_id: SubmissionId,
        selection: &FileSelection,
    ) -> ResponseOutcome {
        uploader_info!(
            "POST {} with {} file(s) for submission {}",
            self.endpoint,
            selection.len(),
            submission_id
        );
        match self.send(selection).await {
            Ok(reply) => {
                uploader_debug!(
                    "Submission {} answered {} ({:?}, {} bytes)",
                    submission_id,
                    reply.status_line,
                    reply.content_type,
                    reply.body.len()
                );
                classify(reply, &self.settings.payload)
            }
            Err(err) => transport_error(describe_error(&err)),
        }
    }
}

fn header_value(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

/// The error with its source chain; reqwest's own message is often just
/// "error sending request".
fn describe_error(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
