//! Runtime settings read from the environment (and `.env` if present)

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::upload::prepare::AspectRatio;

/// Endpoint the photo is posted to unless `UPLOAD_ENDPOINT` overrides it
pub const DEFAULT_ENDPOINT: &str = "https://9imktv4xuc.execute-api.us-east-2.amazonaws.com/test";

/// `{output}` is replaced with the path the capture tool must write to
pub const DEFAULT_CAPTURE_COMMAND: &str = "fswebcam --no-banner -r 1280x960 {output}";

const DEFAULT_NOTICE_SECONDS: u64 = 4;

#[derive(Clone, Debug)]
pub struct Settings {
    pub upload_endpoint: String,
    pub capture_command: String,
    pub capture_dir: PathBuf,
    /// None uploads the image uncropped
    pub crop_aspect: Option<AspectRatio>,
    pub notice_duration: Duration,
}

impl Settings {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    /// Missing or invalid values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let upload_endpoint = get("UPLOAD_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.into());
        let capture_command =
            get("CAPTURE_COMMAND").unwrap_or_else(|| DEFAULT_CAPTURE_COMMAND.into());
        let capture_dir = get("CAPTURE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_capture_dir);

        let crop_aspect = match get("CROP_ASPECT") {
            Some(value) if value.eq_ignore_ascii_case("none") => None,
            Some(value) => match value.parse::<AspectRatio>() {
                Ok(aspect) => Some(aspect),
                Err(e) => {
                    log::warn!("⚠️  {}, using {}", e, AspectRatio::default());
                    Some(AspectRatio::default())
                }
            },
            None => Some(AspectRatio::default()),
        };

        let notice_seconds = get("NOTICE_SECONDS")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_NOTICE_SECONDS);

        Self {
            upload_endpoint,
            capture_command,
            capture_dir,
            crop_aspect,
            notice_duration: Duration::from_secs(notice_seconds),
        }
    }
}

/// ~/.cache/photo-uploader/captures on Linux
fn default_capture_dir() -> PathBuf {
    let mut path = dirs::cache_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(env::temp_dir);

    path.push("photo-uploader");
    path.push("captures");
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Settings {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings_from(&[]);
        assert_eq!(settings.upload_endpoint, DEFAULT_ENDPOINT);
        assert_eq!(settings.capture_command, DEFAULT_CAPTURE_COMMAND);
        assert_eq!(settings.crop_aspect, Some(AspectRatio::new(4, 3)));
        assert_eq!(settings.notice_duration, Duration::from_secs(4));
        assert!(settings.capture_dir.ends_with("photo-uploader/captures"));
    }

    #[test]
    fn test_overrides() {
        let settings = settings_from(&[
            ("UPLOAD_ENDPOINT", "http://localhost:9000/upload"),
            ("CAPTURE_DIR", "/tmp/shots"),
            ("CROP_ASPECT", "16:9"),
            ("NOTICE_SECONDS", "10"),
        ]);
        assert_eq!(settings.upload_endpoint, "http://localhost:9000/upload");
        assert_eq!(settings.capture_dir, PathBuf::from("/tmp/shots"));
        assert_eq!(settings.crop_aspect, Some(AspectRatio::new(16, 9)));
        assert_eq!(settings.notice_duration, Duration::from_secs(10));
    }

    #[test]
    fn test_crop_can_be_disabled() {
        let settings = settings_from(&[("CROP_ASPECT", "None")]);
        assert_eq!(settings.crop_aspect, None);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let settings = settings_from(&[
            ("CROP_ASPECT", "wide"),
            ("NOTICE_SECONDS", "soon"),
            ("UPLOAD_ENDPOINT", "   "),
        ]);
        assert_eq!(settings.crop_aspect, Some(AspectRatio::default()));
        assert_eq!(settings.notice_duration, Duration::from_secs(4));
        assert_eq!(settings.upload_endpoint, DEFAULT_ENDPOINT);
    }
}
