use rfd::AsyncFileDialog;
use std::path::{Path, PathBuf};

use crate::state::data::{ImageRef, Selection};

/// Extensions offered by the picker (lowercase)
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "webp", "bmp", "gif", "tif", "tiff",
];

/// Show the native file dialog and return the picked image.
/// Closing the dialog counts as a cancellation.
pub async fn pick_image(start_dir: Option<PathBuf>) -> Selection {
    let mut dialog = AsyncFileDialog::new()
        .set_title("Pick an image from gallery")
        .add_filter("Images", IMAGE_EXTENSIONS);

    if let Some(dir) = start_dir {
        dialog = dialog.set_directory(dir);
    }

    match dialog.pick_file().await {
        Some(handle) => {
            let path = handle.path().to_path_buf();
            if !is_supported_image(&path) {
                // Some platforms let "All files" through the filter
                log::warn!("⚠️  {} does not look like an image", path.display());
            }
            Selection::Selected(ImageRef::new(path))
        }
        None => Selection::Cancelled,
    }
}

/// Where the dialog opens: the user's Pictures folder if there is one
pub fn default_start_dir() -> Option<PathBuf> {
    dirs::picture_dir().or_else(dirs::home_dir)
}

/// Check if a path has one of the picker's image extensions
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension() {
        Some(extension) => {
            let ext = extension.to_string_lossy().to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}
