//! Default image probe: fetches bytes over HTTP or from disk and reads the
//! image header for its dimensions.

use std::io::Cursor;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, trace};
use url::Url;

use crate::domain::entities::ImageSize;
use crate::domain::errors::ProbeError;
use crate::domain::ports::ImageProbePort;

const DEFAULT_USER_AGENT: &str = concat!("metadims/", env!("CARGO_PKG_VERSION"));

/// Configuration for the default image probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// User agent sent with image requests.
    pub user_agent: String,
    /// Largest image body that will be read, in bytes.
    pub max_bytes: u64,
    /// Public URL of the site whose images live under `content_root`.
    pub site_url: Option<String>,
    /// Local directory serving `site_url`.
    pub content_root: Option<PathBuf>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_bytes: 20 * 1024 * 1024,
            site_url: None,
            content_root: None,
        }
    }
}

/// Where the bytes of an image come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageLocation {
    /// Fetched over HTTP(S).
    Remote(String),
    /// Read from the local filesystem.
    Local(PathBuf),
}

impl ImageLocation {
    /// Classifies `url` according to `config`.
    ///
    /// # Errors
    /// Returns `ProbeError::InvalidUrl` for anything that is neither an
    /// HTTP(S) URL, a protocol-relative URL nor a `file:` URL, and for
    /// site-local paths escaping `content_root`.
    pub fn from_url(url: &str, config: &ProbeConfig) -> Result<Self, ProbeError> {
        let raw = url.trim();
        let parsed = match raw.strip_prefix("//") {
            Some(rest) => Url::parse(&format!("http://{rest}")),
            None => Url::parse(raw),
        }
        .map_err(|_| ProbeError::invalid_url(raw))?;

        match parsed.scheme() {
            "file" => parsed
                .to_file_path()
                .map(Self::Local)
                .map_err(|()| ProbeError::invalid_url(raw)),
            "http" | "https" => {
                if let (Some(site_url), Some(root)) = (&config.site_url, &config.content_root)
                    && let Ok(site) = Url::parse(site_url)
                    && let Some(segments) = site_relative_segments(&parsed, &site)
                {
                    return local_path(root, &segments)
                        .map(Self::Local)
                        .ok_or_else(|| ProbeError::invalid_url(raw));
                }
                Ok(Self::Remote(parsed.into()))
            }
            _ => Err(ProbeError::invalid_url(raw)),
        }
    }
}

/// Probes images over HTTP(S) or from local storage.
pub struct UrlImageProbe {
    client: reqwest::Client,
    config: ProbeConfig,
}

impl std::fmt::Debug for UrlImageProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlImageProbe")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl UrlImageProbe {
    /// Creates a probe with the given configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: ProbeConfig) -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProbeError::network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Creates a probe with default configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, ProbeError> {
        Self::new(ProbeConfig::default())
    }

    async fn download(&self, url: &str) -> Result<Bytes, ProbeError> {
        debug!(url = %url, "Downloading image for probing");
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(ProbeError::HttpStatus {
                status: response.status().as_u16(),
            });
        }

        if let Some(len) = response.content_length() {
            self.check_size(len)?;
        }

        let bytes = response.bytes().await?;
        self.check_size(bytes.len() as u64)?;
        Ok(bytes)
    }

    async fn read_local(&self, path: &Path) -> Result<Bytes, ProbeError> {
        trace!(path = %path.display(), "Reading local image for probing");
        let meta = fs::metadata(path).await?;
        self.check_size(meta.len())?;
        Ok(Bytes::from(fs::read(path).await?))
    }

    fn check_size(&self, bytes: u64) -> Result<(), ProbeError> {
        if bytes > self.config.max_bytes {
            return Err(ProbeError::TooLarge {
                bytes,
                limit: self.config.max_bytes,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ImageProbePort for UrlImageProbe {
    async fn probe(&self, url: &str) -> Result<ImageSize, ProbeError> {
        let bytes = match ImageLocation::from_url(url, &self.config)? {
            ImageLocation::Remote(remote) => self.download(&remote).await?,
            ImageLocation::Local(path) => self.read_local(&path).await?,
        };

        tokio::task::spawn_blocking(move || read_size(&bytes))
            .await
            .map_err(|e| ProbeError::decode(format!("probe task panicked: {e}")))?
    }
}

/// Reads dimensions and format from the header of an encoded image.
///
/// # Errors
/// Returns error if the format is not recognized or the header is invalid.
pub fn read_size(bytes: &[u8]) -> Result<ImageSize, ProbeError> {
    let reader = image::ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    let format = reader
        .format()
        .ok_or_else(|| ProbeError::unsupported("unrecognized image data"))?;
    let (width, height) = reader.into_dimensions()?;
    Ok(ImageSize::new(width, height, format_name(format)))
}

fn format_name(format: image::ImageFormat) -> &'static str {
    format.extensions_str().first().copied().unwrap_or("unknown")
}

/// Path segments of `url` below `site`, or `None` when `url` is not part
/// of the site.
fn site_relative_segments<'a>(url: &'a Url, site: &Url) -> Option<Vec<&'a str>> {
    if url.origin() != site.origin() {
        return None;
    }

    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
    for expected in site.path_segments()?.filter(|s| !s.is_empty()) {
        if segments.next()? != expected {
            return None;
        }
    }
    Some(segments.collect())
}

/// Joins percent-decoded segments onto `root`. Each decoded segment must be
/// a single plain path component.
fn local_path(root: &Path, segments: &[&str]) -> Option<PathBuf> {
    let mut path = root.to_path_buf();
    for segment in segments {
        let decoded = percent_decode_str(segment).decode_utf8().ok()?;
        let mut components = Path::new(&*decoded).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None) => path.push(part),
            _ => return None,
        }
    }
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use test_case::test_case;
    use tokio_test::{assert_err, assert_ok};

    fn site_config(root: &Path) -> ProbeConfig {
        ProbeConfig {
            site_url: Some("https://mysite.com/".to_string()),
            content_root: Some(root.to_path_buf()),
            ..ProbeConfig::default()
        }
    }

    #[test_case("http://a.com/x.png", ImageLocation::Remote("http://a.com/x.png".into()) ; "http")]
    #[test_case("HTTPS://a.com/x.png", ImageLocation::Remote("https://a.com/x.png".into()) ; "upper_scheme")]
    #[test_case("//a.com/x.png", ImageLocation::Remote("http://a.com/x.png".into()) ; "protocol_relative")]
    #[test_case("file:///tmp/x.png", ImageLocation::Local("/tmp/x.png".into()) ; "file")]
    #[test_case("file://localhost/tmp/x.png", ImageLocation::Local("/tmp/x.png".into()) ; "file_localhost")]
    #[test_case("file:///tmp/my%20logo.png?v=2", ImageLocation::Local("/tmp/my logo.png".into()) ; "file_percent_encoded")]
    fn test_location_without_site(url: &str, expected: ImageLocation) {
        let location = ImageLocation::from_url(url, &ProbeConfig::default());
        assert_eq!(location.unwrap(), expected);
    }

    #[test_case("noUrl" ; "placeholder")]
    #[test_case("ftp://a.com/x.png" ; "ftp")]
    #[test_case("/content/images/x.png" ; "relative")]
    #[test_case("file://fileserver/share/x.png" ; "file_remote_host")]
    fn test_location_rejects(url: &str) {
        let location = ImageLocation::from_url(url, &ProbeConfig::default());
        assert!(matches!(location, Err(ProbeError::InvalidUrl { .. })));
    }

    #[test]
    fn test_site_urls_map_to_content_root() {
        let config = site_config(Path::new("/srv/site"));

        let local = ImageLocation::from_url("https://mysite.com/content/images/a.png?v=1", &config);
        assert_eq!(
            local.unwrap(),
            ImageLocation::Local("/srv/site/content/images/a.png".into())
        );

        let encoded = ImageLocation::from_url("https://MYSITE.com/content/my%20logo.png", &config);
        assert_eq!(
            encoded.unwrap(),
            ImageLocation::Local("/srv/site/content/my logo.png".into())
        );

        let other = ImageLocation::from_url("https://mysite.com.evil/a.png", &config);
        assert_eq!(
            other.unwrap(),
            ImageLocation::Remote("https://mysite.com.evil/a.png".into())
        );

        let other_scheme = ImageLocation::from_url("http://mysite.com/a.png", &config);
        assert_eq!(
            other_scheme.unwrap(),
            ImageLocation::Remote("http://mysite.com/a.png".into())
        );
    }

    #[test]
    fn test_site_urls_stay_inside_content_root() {
        let config = site_config(Path::new("/srv/site"));

        let dotted = ImageLocation::from_url("https://mysite.com/../etc/passwd", &config);
        assert_eq!(
            dotted.unwrap(),
            ImageLocation::Local("/srv/site/etc/passwd".into())
        );

        let encoded_slash =
            ImageLocation::from_url("https://mysite.com/content/..%2F..%2Fetc%2Fpasswd", &config);
        assert_err!(encoded_slash);
    }

    #[test]
    fn test_site_url_with_path_prefix() {
        let config = ProbeConfig {
            site_url: Some("https://mysite.com/blog/".to_string()),
            content_root: Some(PathBuf::from("/srv/blog")),
            ..ProbeConfig::default()
        };

        let inside = ImageLocation::from_url("https://mysite.com/blog/images/a.png", &config);
        assert_eq!(
            inside.unwrap(),
            ImageLocation::Local("/srv/blog/images/a.png".into())
        );

        let outside = ImageLocation::from_url("https://mysite.com/blogger/a.png", &config);
        assert_eq!(
            outside.unwrap(),
            ImageLocation::Remote("https://mysite.com/blogger/a.png".into())
        );
    }

    #[tokio::test]
    async fn test_probe_local_png() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let dir = temp.path().join("content").join("images");
        std::fs::create_dir_all(&dir)?;
        image::RgbImage::new(80, 48).save(dir.join("cover.png"))?;

        let probe = UrlImageProbe::new(site_config(temp.path()))?;
        let size = probe
            .probe("https://mysite.com/content/images/cover.png")
            .await?;

        assert_eq!(size, ImageSize::new(80, 48, "png"));
        Ok(())
    }

    #[tokio::test]
    async fn test_probe_file_url_ico() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let path = temp.path().join("favicon.ico");
        image::RgbaImage::new(32, 32).save(&path)?;

        let probe = UrlImageProbe::with_defaults()?;
        let size = probe.probe(&format!("file://{}", path.display())).await?;

        assert_eq!((size.width, size.height), (32, 32));
        assert_eq!(size.format, "ico");
        Ok(())
    }

    #[tokio::test]
    async fn test_probe_percent_encoded_file_url() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let path = temp.path().join("my logo.png");
        image::RgbImage::new(40, 20).save(&path)?;

        let url = Url::from_file_path(&path).map_err(|()| "temp path is not absolute")?;
        assert!(url.as_str().ends_with("my%20logo.png"));

        let probe = UrlImageProbe::with_defaults()?;
        let size = probe.probe(url.as_str()).await?;

        assert_eq!(size, ImageSize::new(40, 20, "png"));
        Ok(())
    }

    #[tokio::test]
    async fn test_probe_rejects_garbage_and_missing() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let path = temp.path().join("notes.png");
        std::fs::write(&path, b"definitely not an image")?;

        let probe = UrlImageProbe::with_defaults()?;
        let garbage = probe.probe(&format!("file://{}", path.display())).await;
        assert!(matches!(garbage, Err(ProbeError::UnsupportedFormat { .. })));

        let missing = probe
            .probe(&format!("file://{}", temp.path().join("gone.png").display()))
            .await;
        assert!(matches!(missing, Err(ProbeError::Io { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_probe_enforces_size_limit() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let path = temp.path().join("big.png");
        image::RgbImage::new(64, 64).save(&path)?;

        let probe = UrlImageProbe::new(ProbeConfig {
            max_bytes: 16,
            ..ProbeConfig::default()
        })?;
        let result = probe.probe(&format!("file://{}", path.display())).await;
        assert!(matches!(result, Err(ProbeError::TooLarge { limit: 16, .. })));
        Ok(())
    }

    #[test]
    fn test_read_size_from_memory() {
        let mut buf = Cursor::new(Vec::new());
        image::DynamicImage::new_rgb8(7, 3)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();

        let size = assert_ok!(read_size(buf.get_ref()));
        assert_eq!(size, ImageSize::new(7, 3, "png"));
    }
}
