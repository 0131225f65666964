use hyper::ext::ReasonPhrase;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};

use crate::config::Settings;
use crate::error::UploadError;
use crate::state::data::{ImageRef, UploadOutcome};

use super::prepare::{self, AspectRatio};

/// Multipart field the endpoint reads the photo from
pub const FILE_FIELD: &str = "file";
pub const FILE_NAME: &str = "photo.jpg";
pub const FILE_MIME: &str = "image/jpeg";

/// Sends one photo per call to the configured endpoint.
///
/// No timeout and no retries: a call ends when the server answers or the
/// connection fails.
#[derive(Debug, Clone)]
pub struct Uploader {
    client: Client,
    endpoint: String,
    crop: Option<AspectRatio>,
}

impl Uploader {
    pub fn new(settings: &Settings) -> Self {
        Self::with_client(
            Client::new(),
            settings.upload_endpoint.clone(),
            settings.crop_aspect,
        )
    }

    pub fn with_client(client: Client, endpoint: String, crop: Option<AspectRatio>) -> Self {
        Self {
            client,
            endpoint,
            crop,
        }
    }

    /// Upload `image` and report how it went. Never fails: every error
    /// becomes `UploadOutcome::Failed` carrying its message.
    pub async fn upload(&self, image: ImageRef) -> UploadOutcome {
        log::info!("📤 Uploading {} to {}", image, self.endpoint);

        match self.try_upload(&image).await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("Upload of {} failed: {}", image, e);
                UploadOutcome::Failed(e.to_string())
            }
        }
    }

    async fn try_upload(&self, image: &ImageRef) -> Result<UploadOutcome, UploadError> {
        let payload = prepare::jpeg_payload(image.path().to_path_buf(), self.crop).await?;

        let part = Part::bytes(payload)
            .file_name(FILE_NAME)
            .mime_str(FILE_MIME)?;
        let form = Form::new().part(FILE_FIELD, part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        log::debug!("Upload response status: {}", status);

        let wire_reason = response
            .extensions()
            .get::<ReasonPhrase>()
            .map(|phrase| phrase.as_bytes().to_vec());
        let reason = reason_phrase(status, wire_reason.as_deref());
        let body = response.bytes().await?;
        Ok(outcome_from_parts(status, &reason, &body))
    }
}

/// Interpret a finished HTTP exchange.
///
/// 2xx bodies must be JSON; anything else reports the reason phrase.
pub fn outcome_from_parts(status: StatusCode, reason: &str, body: &[u8]) -> UploadOutcome {
    if !status.is_success() {
        return UploadOutcome::Failed(reason.to_string());
    }

    match serde_json::from_slice(body) {
        Ok(value) => UploadOutcome::Success(value),
        Err(e) => UploadOutcome::Failed(format!("Invalid JSON response: {}", e)),
    }
}

/// Text describing a response status.
///
/// The phrase the server sent wins (hyper only records it for HTTP/1.1 when
/// it differs from the standard one). Otherwise the standard phrase, e.g.
/// "Internal Server Error", and for unknown codes the number.
pub fn reason_phrase(status: StatusCode, wire: Option<&[u8]>) -> String {
    if let Some(phrase) = wire {
        let phrase = String::from_utf8_lossy(phrase).trim().to_string();
        if !phrase.is_empty() {
            return phrase;
        }
    }

    status
        .canonical_reason()
        .map(str::to_owned)
        .unwrap_or_else(|| status.as_str().to_owned())
}
