use super::data::{ImageRef, Notice, Selection, Source, UploadOutcome};

/// The session owns everything the window displays: the current image
/// and the outcome of the last upload.
///
/// It performs no I/O. Device and network calls happen elsewhere and
/// their results are fed back in; every method returns the notice to show.
#[derive(Debug, Default)]
pub struct Session {
    image: Option<ImageRef>,
    status: String,
    uploading: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// The image that the next upload will send
    pub fn image(&self) -> Option<&ImageRef> {
        self.image.as_ref()
    }

    /// Outcome text of the most recent upload (empty after a new selection)
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    /// Record the result of a picker or camera call
    pub fn apply_selection(&mut self, source: Source, selection: Selection) -> Notice {
        match selection {
            Selection::Selected(image) => {
                let title = match source {
                    Source::Library => "Image selected",
                    Source::Camera => "Image taken",
                };
                let notice = Notice::with_body(title, image.to_string());
                log::info!("🖼️  Image set: {}", image);
                self.image = Some(image);
                self.status.clear();
                notice
            }
            Selection::Cancelled => {
                log::debug!("{:?} selection cancelled", source);
                Notice::new(match source {
                    Source::Library => "Image selection cancelled",
                    Source::Camera => "Image capture cancelled",
                })
            }
        }
    }

    /// A picker or camera call failed without producing a selection.
    /// State is left untouched.
    pub fn selection_failed(&self, source: Source, message: impl Into<String>) -> Notice {
        let message = message.into();
        log::warn!("⚠️  {:?} failed: {}", source, message);
        let title = match source {
            Source::Library => "Image selection failed",
            Source::Camera => "Image capture failed",
        };
        Notice::with_body(title, message)
    }

    /// Start an upload of the current image.
    ///
    /// Returns the image to send, or the notice to show when no upload may
    /// start. Without an `ImageRef` the caller has nothing to send, so a
    /// rejected call can never reach the network.
    pub fn begin_upload(&mut self) -> Result<ImageRef, Notice> {
        if self.uploading {
            return Err(Notice::new("Upload in progress"));
        }

        match &self.image {
            Some(image) => {
                self.uploading = true;
                Ok(image.clone())
            }
            None => Err(Notice::with_body(
                "No image selected",
                "Please select an image to upload",
            )),
        }
    }

    /// Record the outcome of the upload started by `begin_upload`
    pub fn finish_upload(&mut self, outcome: UploadOutcome) -> Notice {
        self.uploading = false;

        match outcome {
            UploadOutcome::Success(body) => {
                let body = body.to_string();
                self.status = format!("Upload Success: {}", body);
                log::info!("✅ {}", self.status);
                Notice::with_body("Upload Success", body)
            }
            UploadOutcome::Failed(reason) => {
                self.status = format!("Upload Failed: {}", reason);
                log::warn!("❌ {}", self.status);
                Notice::with_body("Upload Failed", reason)
            }
        }
    }
}
