use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::playlist::{parse_playlist, Playlist};
use crate::{DecodeError, FailureKind};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
    pub allowed_content_types: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(15),
            max_bytes: 2 * 1024 * 1024,
            allowed_content_types: vec![
                "application/vnd.apple.mpegurl".to_string(),
                "application/x-mpegurl".to_string(),
                "audio/mpegurl".to_string(),
                "audio/x-mpegurl".to_string(),
                "application/octet-stream".to_string(),
                "text/plain".to_string(),
            ],
        }
    }
}

/// A playback capability: decides whether it can play an address and loads
/// its playlist.
#[async_trait::async_trait]
pub trait Decoder: Send + Sync {
    fn name(&self) -> &'static str;

    fn can_play(&self, address: &str) -> bool;

    async fn load(&self, address: &str) -> Result<Playlist, DecodeError>;

    /// Resolves a playlist-relative reference against the playlist address.
    fn resolve(&self, base: &str, reference: &str) -> Result<String, DecodeError>;
}

/// Decoders in preference order; the first one that can play an address wins.
#[derive(Clone, Default)]
pub struct DecoderSet {
    decoders: Vec<Arc<dyn Decoder>>,
}

impl DecoderSet {
    pub fn new(decoders: Vec<Arc<dyn Decoder>>) -> Self {
        Self { decoders }
    }

    /// Network HLS first, then local files.
    pub fn standard(settings: FetchSettings) -> Self {
        let max_bytes = settings.max_bytes;
        Self::new(vec![
            Arc::new(HttpDecoder::new(settings)),
            Arc::new(FileDecoder::new(max_bytes)),
        ])
    }

    pub fn select(&self, address: &str) -> Option<Arc<dyn Decoder>> {
        self.decoders
            .iter()
            .find(|decoder| decoder.can_play(address))
            .cloned()
    }
}

#[derive(Debug, Clone)]
pub struct HttpDecoder {
    settings: FetchSettings,
    client: Option<reqwest::Client>,
}

impl HttpDecoder {
    pub fn new(settings: FetchSettings) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .ok();
        Self { settings, client }
    }

    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        let ct = content_type.split(';').next().unwrap_or(content_type).trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ct))
    }

    fn too_large(&self, actual: u64) -> DecodeError {
        DecodeError::new(
            FailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual: Some(actual),
            },
            "playlist too large",
        )
    }
}

#[async_trait::async_trait]
impl Decoder for HttpDecoder {
    fn name(&self) -> &'static str {
        "http"
    }

    fn can_play(&self, address: &str) -> bool {
        self.client.is_some()
            && Url::parse(address)
                .map(|url| matches!(url.scheme(), "http" | "https"))
                .unwrap_or(false)
    }

    async fn load(&self, address: &str) -> Result<Playlist, DecodeError> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| DecodeError::new(FailureKind::Network, "http client unavailable"))?;
        let url = Url::parse(address)
            .map_err(|err| DecodeError::new(FailureKind::InvalidAddress, err.to_string()))?;

        let response = client.get(url).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DecodeError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(self.too_large(content_len));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        if let Some(ct) = content_type.as_deref() {
            if !self.is_content_type_allowed(ct) {
                return Err(DecodeError::new(
                    FailureKind::UnsupportedContentType {
                        content_type: ct.to_string(),
                    },
                    "unsupported content type",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(self.too_large(next_len));
            }
            bytes.extend_from_slice(&chunk);
        }

        let text = String::from_utf8(bytes)
            .map_err(|err| DecodeError::new(FailureKind::Playlist, err.to_string()))?;
        parse_playlist(&text).map_err(|err| DecodeError::new(FailureKind::Playlist, err.to_string()))
    }

    fn resolve(&self, base: &str, reference: &str) -> Result<String, DecodeError> {
        Url::parse(base)
            .and_then(|base| base.join(reference))
            .map(String::from)
            .map_err(|err| DecodeError::new(FailureKind::InvalidAddress, err.to_string()))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> DecodeError {
    if err.is_timeout() {
        return DecodeError::new(FailureKind::Timeout, err.to_string());
    }
    DecodeError::new(FailureKind::Network, err.to_string())
}

/// Plays playlists from the local filesystem: plain paths or `file://` URLs.
#[derive(Debug, Clone)]
pub struct FileDecoder {
    max_bytes: u64,
}

impl FileDecoder {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    fn local_path(address: &str) -> Option<PathBuf> {
        if address.starts_with("file:") {
            return Url::parse(address).ok()?.to_file_path().ok();
        }
        if address.contains("://") {
            return None;
        }
        Some(PathBuf::from(address))
    }
}

#[async_trait::async_trait]
impl Decoder for FileDecoder {
    fn name(&self) -> &'static str {
        "file"
    }

    fn can_play(&self, address: &str) -> bool {
        Self::local_path(address).is_some()
    }

    async fn load(&self, address: &str) -> Result<Playlist, DecodeError> {
        let path = Self::local_path(address)
            .ok_or_else(|| DecodeError::new(FailureKind::InvalidAddress, address))?;

        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|err| DecodeError::new(FailureKind::Io, err.to_string()))?;
        if metadata.len() > self.max_bytes {
            return Err(DecodeError::new(
                FailureKind::TooLarge {
                    max_bytes: self.max_bytes,
                    actual: Some(metadata.len()),
                },
                "playlist too large",
            ));
        }

        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|err| DecodeError::new(FailureKind::Io, err.to_string()))?;
        parse_playlist(&text).map_err(|err| DecodeError::new(FailureKind::Playlist, err.to_string()))
    }

    fn resolve(&self, base: &str, reference: &str) -> Result<String, DecodeError> {
        if reference.contains("://") {
            return Ok(reference.to_string());
        }
        if base.starts_with("file:") {
            return Url::parse(base)
                .and_then(|base| base.join(reference))
                .map(String::from)
                .map_err(|err| DecodeError::new(FailureKind::InvalidAddress, err.to_string()));
        }
        let parent = Path::new(base).parent().unwrap_or_else(|| Path::new(""));
        Ok(parent.join(reference).to_string_lossy().into_owned())
    }
}
