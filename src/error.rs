//! Error types for device access, uploads and configuration
//!
//! Errors stay typed until they reach the session, which turns them
//! into notice and status text.

use std::process::ExitStatus;
use thiserror::Error;

/// Failures while preparing or sending an upload
#[derive(Debug, Error)]
pub enum UploadError {
    /// Transport-level failure (connection refused, DNS, TLS, body read)
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    /// The selected image could not be read from disk
    #[error("Failed to read image: {0}")]
    Io(#[from] std::io::Error),
    /// The selected image could not be decoded or re-encoded as JPEG
    #[error("Failed to prepare image: {0}")]
    Image(#[from] image::ImageError),
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Failures of the picker or camera that are not a user cancellation
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("No capture command configured")]
    NoCaptureCommand,
    #[error("Unbalanced quotes in capture command: {0}")]
    UnbalancedQuotes(String),
    #[error("Failed to run capture command: {0}")]
    Io(#[from] std::io::Error),
    #[error("Capture command exited with {0}")]
    CaptureFailed(ExitStatus),
    #[error("Captured file is not a readable image: {0}")]
    Image(#[from] image::ImageError),
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Invalid configuration values
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid aspect ratio {0:?}, expected W:H")]
    InvalidAspect(String),
}
