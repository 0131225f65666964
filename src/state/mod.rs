/// State management module
///
/// This module handles all application state:
/// - Shared data structures (data.rs)
/// - The selected image, status line and upload bookkeeping (session.rs)

pub mod data;
pub mod session;
