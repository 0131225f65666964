/// Upload module
///
/// - Turning the selected image into the JPEG payload (prepare.rs)
/// - The multipart POST and response interpretation (client.rs)

pub mod prepare;
pub mod client;

pub use client::Uploader;
