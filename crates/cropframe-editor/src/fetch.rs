//! Image acquisition.
//!
//! Sources are either locally-generated references (`blob:`, `data:`,
//! `file:`) or remote URLs. Remote fetches can append a cache-busting empty
//! query so intermediaries revalidate instead of replaying a cached
//! response that lacks CORS headers; whether to do so is an explicit
//! [`FetchPolicy`] rather than a hard-coded hack.

use std::time::Duration;

use cropframe_core::BitmapError;
use thiserror::Error;

/// Request timeout for image fetches.
const TIMEOUT: Duration = Duration::from_secs(30);

/// How the session acquires remote images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FetchPolicy {
    /// Append a cache-busting query to non-local sources before fetching.
    pub bypass_cache: bool,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        // Stock behavior: every remote source is fetched cache-busted.
        Self { bypass_cache: true }
    }
}

/// Errors raised while acquiring and decoding the source image.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    #[error("Failed to create HTTP client: {0}")]
    Client(String),

    /// The request failed below the HTTP layer.
    #[error("Request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("HTTP error: {0}")]
    Status(u16),

    /// The response body could not be read.
    #[error("Failed to read response body: {0}")]
    Body(String),

    /// The fetched bytes did not decode into a bitmap.
    #[error(transparent)]
    Decode(#[from] BitmapError),
}

/// Returns true for locally-generated temporary references that must be
/// fetched verbatim, never cache-busted.
pub fn is_local_ref(src: &str) -> bool {
    src.starts_with("blob:") || src.starts_with("data:") || src.starts_with("file:")
}

/// Resolve the URL actually requested for a source under the given policy.
pub fn request_url(src: &str, policy: FetchPolicy) -> String {
    if policy.bypass_cache && !is_local_ref(src) {
        format!("{src}?")
    } else {
        src.to_string()
    }
}

/// Fetch the source image as raw bytes.
///
/// The response is read as binary so the caller can decode it into a
/// bitmap; no content-type sniffing happens here.
pub fn fetch_image_bytes(src: &str, policy: FetchPolicy) -> Result<Vec<u8>, FetchError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(TIMEOUT)
        .build()
        .map_err(|e| FetchError::Client(e.to_string()))?;

    let response = client
        .get(request_url(src, policy))
        .send()
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    if !response.status().is_success() {
        return Err(FetchError::Status(response.status().as_u16()));
    }

    response
        .bytes()
        .map(|b| b.to_vec())
        .map_err(|e| FetchError::Body(e.to_string()))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
