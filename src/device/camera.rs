//! Camera capture through an external command
//!
//! Desktop systems have no single camera API, so capture is delegated to a
//! configurable tool (fswebcam, ffmpeg, a portal helper). The tool gets
//! a path to write the photo to; whether it wrote one decides between a
//! selection and a cancellation.

use chrono::Local;
use image::ImageReader;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::error::DeviceError;
use crate::state::data::{ImageRef, Selection};

/// Placeholder in the capture command replaced by the output path
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

#[derive(Debug, Clone)]
pub struct CommandCamera {
    command: String,
    capture_dir: PathBuf,
}

impl CommandCamera {
    pub fn new(command: impl Into<String>, capture_dir: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            capture_dir: capture_dir.into(),
        }
    }

    /// Run the capture tool and return the photo it took.
    ///
    /// A tool that exits cleanly without writing a file was dismissed by the
    /// user and yields `Selection::Cancelled`.
    pub async fn capture(&self) -> Result<Selection, DeviceError> {
        let output = self.next_output_path();
        let argv = expand_command(&self.command, &output)?;
        let (program, args) = argv.split_first().ok_or(DeviceError::NoCaptureCommand)?;

        tokio::fs::create_dir_all(&self.capture_dir).await?;

        log::info!("📷 Running capture command: {}", argv.join(" "));
        let status = Command::new(program).args(args).status().await?;

        if !status.success() {
            return Err(DeviceError::CaptureFailed(status));
        }

        let written = match tokio::fs::metadata(&output).await {
            Ok(meta) => meta.len() > 0,
            Err(_) => false,
        };
        if !written {
            log::debug!("Capture tool wrote nothing to {}", output.display());
            // Leave no empty placeholder behind
            let _ = tokio::fs::remove_file(&output).await;
            return Ok(Selection::Cancelled);
        }

        if let Err(e) = verify_image(output.clone()).await {
            let _ = tokio::fs::remove_file(&output).await;
            return Err(e);
        }
        Ok(Selection::Selected(ImageRef::new(output)))
    }

    /// capture-YYYYMMDD-HHMMSS-mmm.jpg in the capture directory
    fn next_output_path(&self) -> PathBuf {
        let stamp = Local::now().format("%Y%m%d-%H%M%S-%3f");
        self.capture_dir.join(format!("capture-{}.jpg", stamp))
    }
}

/// Split the command into arguments and substitute the output path.
///
/// Arguments are separated by whitespace. Single quotes keep everything up
/// to the closing quote literally; double quotes group words and honour
/// backslash escapes, as does a backslash outside quotes. No other shell
/// syntax (variables, globs, pipes) is interpreted.
fn expand_command(command: &str, output: &Path) -> Result<Vec<String>, DeviceError> {
    let output = output.to_string_lossy();
    Ok(split_arguments(command)?
        .into_iter()
        .map(|token| token.replace(OUTPUT_PLACEHOLDER, &output))
        .collect())
}

fn split_arguments(command: &str) -> Result<Vec<String>, DeviceError> {
    let mut args = Vec::new();
    let mut current = String::new();
    // A token exists once anything (even an empty quote pair) was seen
    let mut in_token = false;
    let mut chars = command.chars();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_token {
                    args.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            '\'' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(ch) => current.push(ch),
                        None => return Err(DeviceError::UnbalancedQuotes(command.to_string())),
                    }
                }
            }
            '"' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(ch) => current.push(ch),
                            None => {
                                return Err(DeviceError::UnbalancedQuotes(command.to_string()))
                            }
                        },
                        Some(ch) => current.push(ch),
                        None => return Err(DeviceError::UnbalancedQuotes(command.to_string())),
                    }
                }
            }
            '\\' => {
                in_token = true;
                if let Some(ch) = chars.next() {
                    current.push(ch);
                }
            }
            c => {
                in_token = true;
                current.push(c);
            }
        }
    }

    if in_token {
        args.push(current);
    }
    Ok(args)
}

/// Make sure the captured file decodes before handing it out.
/// Capture tools do not always honour the .jpg name, so sniff the content.
async fn verify_image(path: PathBuf) -> Result<(), DeviceError> {
    let (width, height) = tokio::task::spawn_blocking(move || -> Result<_, DeviceError> {
        let dimensions = ImageReader::open(&path)?
            .with_guessed_format()?
            .into_dimensions()?;
        Ok(dimensions)
    })
    .await??;
    log::debug!("Captured {}x{} image", width, height);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_command() {
        let argv = expand_command(
            "ffmpeg -f v4l2 -i /dev/video0 -frames:v 1 {output}",
            Path::new("/tmp/c.jpg"),
        )
        .unwrap();
        assert_eq!(argv.first().map(String::as_str), Some("ffmpeg"));
        assert_eq!(argv.last().map(String::as_str), Some("/tmp/c.jpg"));
    }

    #[test]
    fn test_expand_placeholder_inside_token() {
        let argv = expand_command("snap --save={output}", Path::new("/tmp/c.jpg")).unwrap();
        assert_eq!(argv, vec!["snap".to_string(), "--save=/tmp/c.jpg".to_string()]);
    }

    #[test]
    fn test_quoted_arguments_stay_whole() {
        let argv = expand_command(
            r#"capture-tool --title "Desk cam" --dir '/home/me/My Photos' {output}"#,
            Path::new("/tmp/c.jpg"),
        )
        .unwrap();
        assert_eq!(
            argv,
            vec!["capture-tool", "--title", "Desk cam", "--dir", "/home/me/My Photos", "/tmp/c.jpg"]
        );
    }

    #[test]
    fn test_escapes_and_empty_quotes() {
        let argv = split_arguments(r#"tool a\ b "say \"hi\"" '' x"#).unwrap();
        assert_eq!(argv, vec!["tool", "a b", r#"say "hi""#, "", "x"]);
    }

    #[test]
    fn test_output_placeholder_inside_quotes() {
        let argv = expand_command(r#"sh -c "cp /tmp/src.jpg {output}""#, Path::new("/tmp/c.jpg"))
            .unwrap();
        assert_eq!(argv, vec!["sh", "-c", "cp /tmp/src.jpg /tmp/c.jpg"]);
    }

    #[test]
    fn test_unbalanced_quotes() {
        let result = expand_command(r#"tool "unterminated {output}"#, Path::new("/tmp/c.jpg"));
        assert!(matches!(result, Err(DeviceError::UnbalancedQuotes(_))));
    }

    #[tokio::test]
    async fn test_empty_command() {
        let dir = tempfile::tempdir().unwrap();
        let camera = CommandCamera::new("   ", dir.path());
        let result = camera.capture().await;
        assert!(matches!(result, Err(DeviceError::NoCaptureCommand)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_capture_copies_photo() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source.png");
        image::RgbImage::from_pixel(8, 6, image::Rgb([0, 255, 0]))
            .save(&source)
            .unwrap();

        let captures = dir.path().join("captures");
        let camera = CommandCamera::new(format!("cp {} {{output}}", source.display()), &captures);

        match camera.capture().await.unwrap() {
            Selection::Selected(image) => {
                assert!(image.path().starts_with(&captures));
                assert!(image.path().exists());
            }
            Selection::Cancelled => panic!("expected a photo"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_dismissed_tool_is_cancellation() {
        let dir = tempfile::tempdir().unwrap();
        let camera = CommandCamera::new("true", dir.path());

        assert_eq!(camera.capture().await.unwrap(), Selection::Cancelled);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_tool_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let camera = CommandCamera::new("false", dir.path());

        let result = camera.capture().await;
        assert!(matches!(result, Err(DeviceError::CaptureFailed(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_garbage_output_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let junk = dir.path().join("junk.txt");
        std::fs::write(&junk, b"not a photo").unwrap();

        let camera = CommandCamera::new(format!("cp {} {{output}}", junk.display()), dir.path());

        let result = camera.capture().await;
        assert!(matches!(result, Err(DeviceError::Image(_))));

        // The unreadable capture is not left behind
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().starts_with("capture-"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_missing_program() {
        let dir = tempfile::tempdir().unwrap();
        let camera = CommandCamera::new("definitely-not-a-capture-tool {output}", dir.path());

        let result = camera.capture().await;
        assert!(matches!(result, Err(DeviceError::Io(_))));
    }
}
