//! HTTP client for the pi sync endpoint: file upload and status probe.
//!
//! Uses the curl crate (libcurl). One `Easy` handle lives as long as the
//! client, so libcurl's connection cache is reused across requests; dropping
//! the client closes the transport. Transfers are blocking; call from
//! `spawn_blocking` if used from async code.

mod error;

pub use error::{ErrorKind, UploadError};

use anyhow::{Context, Result};
use curl::easy::{Easy, Form, List};
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

/// Multipart field name the endpoint expects the file bytes under.
const FILE_FIELD: &str = "file";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(3600);
const STATUS_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for one configured sync endpoint.
///
/// Endpoint URL and API key are immutable once constructed; pointing at a
/// different endpoint means building a new client (and a new queue around it).
pub struct PiClient {
    /// Base URL, normalized to end with exactly one '/'.
    base_url: String,
    /// Sent as `X-Api-Key` on every request when configured.
    api_key: Option<String>,
    /// Long-lived transfer handle; locked per request.
    easy: Mutex<Easy>,
}

impl PiClient {
    /// Create a client for the given base url, e.g. "http://pi:8000".
    /// An empty api key means no auth header.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        if base_url.is_empty() {
            anyhow::bail!("endpoint URL is required");
        }
        let base_url = format!("{}/", base_url.trim_end_matches('/'));
        Url::parse(&base_url).with_context(|| format!("invalid endpoint URL: {base_url}"))?;
        let api_key = if api_key.is_empty() {
            None
        } else {
            Some(api_key.to_string())
        };
        Ok(Self {
            base_url,
            api_key,
            easy: Mutex::new(Easy::new()),
        })
    }

    /// Upload a file, optionally tagged with a category ("music", "audiobook", ...).
    ///
    /// The file is read up front; a missing or unreadable path fails with an
    /// input error and no request is sent. On 2xx the raw response body is
    /// returned. Categories are expected to be URL-path-safe tokens and are
    /// not escaped.
    pub fn upload(&self, path: &Path, category: Option<&str>) -> Result<String, UploadError> {
        if path.as_os_str().is_empty() {
            return Err(UploadError::EmptyPath);
        }
        let bytes =
            fs::read(path).map_err(|_| UploadError::FileNotFound(path.to_path_buf()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.bin".to_string());

        let mut form = Form::new();
        form.part(FILE_FIELD)
            .buffer(&file_name, bytes)
            .content_type("application/octet-stream")
            .add()?;

        let url = self.upload_url(category);
        tracing::debug!(path = %path.display(), url = %url, "uploading file");

        let mut body: Vec<u8> = Vec::new();
        let mut easy = self.easy.lock().unwrap();
        easy.reset();
        easy.url(&url)?;
        easy.httppost(form)?;
        easy.connect_timeout(CONNECT_TIMEOUT)?;
        easy.timeout(UPLOAD_TIMEOUT)?;
        self.apply_api_key(&mut easy)?;
        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        let body = String::from_utf8_lossy(&body).into_owned();
        if !(200..300).contains(&code) {
            return Err(UploadError::Rejected { status: code, body });
        }
        Ok(body)
    }

    /// Retrieve the endpoint status string. Fails on any non-2xx response.
    pub fn status(&self) -> Result<String, UploadError> {
        let url = format!("{}status", self.base_url);
        let mut body: Vec<u8> = Vec::new();
        let mut easy = self.easy.lock().unwrap();
        easy.reset();
        easy.url(&url)?;
        easy.get(true)?;
        easy.connect_timeout(CONNECT_TIMEOUT)?;
        easy.timeout(STATUS_TIMEOUT)?;
        self.apply_api_key(&mut easy)?;
        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        let body = String::from_utf8_lossy(&body).into_owned();
        if !(200..300).contains(&code) {
            return Err(UploadError::Rejected { status: code, body });
        }
        Ok(body)
    }

    /// Request URL for an upload: `{base}upload` or `{base}upload/<category>`.
    fn upload_url(&self, category: Option<&str>) -> String {
        match category {
            Some(c) => format!("{}upload/{}", self.base_url, c),
            None => format!("{}upload", self.base_url),
        }
    }

    fn apply_api_key(&self, easy: &mut Easy) -> Result<(), curl::Error> {
        if let Some(key) = &self.api_key {
            let mut list = List::new();
            list.append(&format!("X-Api-Key: {key}"))?;
            easy.http_headers(list)?;
        }
        Ok(())
    }
}
