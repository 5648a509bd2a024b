//! HTTP response length verification.
//!
//! A response body can end early without the client noticing (a proxy drops
//! the connection, a server crashes mid-write). These helpers compare the
//! bytes actually received with the advertised `Content-Length`.

use reqwest::header::{HeaderMap, CONTENT_LENGTH};

use crate::error::{KickshawsError, Result};

/// Checks a received body length against the `Content-Length` header.
///
/// Returns `None` when the header is missing or not a number, otherwise
/// whether the advertised and actual lengths agree.
///
/// # Example
///
/// ```
/// use kickshaws::http::verify_content_length;
/// use reqwest::header::{HeaderMap, HeaderValue, CONTENT_LENGTH};
///
/// let mut headers = HeaderMap::new();
/// assert_eq!(verify_content_length(&headers, 5), None);
///
/// headers.insert(CONTENT_LENGTH, HeaderValue::from_static("5"));
/// assert_eq!(verify_content_length(&headers, 5), Some(true));
/// assert_eq!(verify_content_length(&headers, 3), Some(false));
/// ```
#[must_use]
pub fn verify_content_length(headers: &HeaderMap, actual_len: u64) -> Option<bool> {
    expected_length(headers).map(|expected| expected == actual_len)
}

/// Reads the response body, failing if it disagrees with `Content-Length`.
///
/// Responses without a `Content-Length` header are returned as read.
pub async fn read_verified_body(response: reqwest::Response) -> Result<Vec<u8>> {
    let expected = expected_length(response.headers());
    let url = response.url().clone();
    let body = response.bytes().await?;
    let actual = body.len() as u64;

    match expected {
        Some(expected) if expected != actual => {
            tracing::warn!(
                "Incomplete read from {}: expected {} bytes, got {}",
                url,
                expected,
                actual
            );
            Err(KickshawsError::IncompleteBody { expected, actual })
        }
        _ => Ok(body.to_vec()),
    }
}

fn expected_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}
