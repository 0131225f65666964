/// Device collaborators that produce an image reference
///
/// - Native image-library dialog (picker.rs)
/// - External capture command standing in for the camera (camera.rs)

pub mod picker;
pub mod camera;

pub use camera::CommandCamera;
