//! Shared data structures for the application state
//!
//! These types flow between the device/upload layers and the UI layer.

use std::fmt;
use std::path::{Path, PathBuf};

/// Handle to a locally available image (picked or captured)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef(PathBuf);

impl ImageRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Where a selection came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Image library (file dialog)
    Library,
    Camera,
}

/// Result of a picker or camera call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Selected(ImageRef),
    Cancelled,
}

/// Result of one upload attempt
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// 2xx response; the JSON body as returned by the endpoint
    Success(serde_json::Value),
    /// Reason phrase of a non-2xx response, or the error message
    Failed(String),
}

/// A transient notification shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub body: Option<String>,
}

impl Notice {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: None,
        }
    }

    pub fn with_body(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: Some(body.into()),
        }
    }
}
