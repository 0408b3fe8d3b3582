use crate::config::API_KEY_PARAM;
use crate::error::{Result, UptakeGuardError};

const REDACTED: &str = "REDACTED";

/// Check if a string is a valid remote URL (http:// or https://).
#[must_use]
pub fn is_remote_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Return `url` with the API key appended as a query parameter, unless the
/// URL already carries one.
///
/// # Errors
/// Returns a configuration error if the URL is not a valid http(s) URL, or
/// if it has no `api_key` parameter and no key was supplied.
pub fn authenticated_url(url: &str, api_key: Option<&str>) -> Result<String> {
    if !is_remote_url(url) {
        return Err(UptakeGuardError::Config(format!(
            "Invalid query URL (must start with http:// or https://): {}",
            redact_url(url)
        )));
    }
    let mut parsed = reqwest::Url::parse(url).map_err(|e| {
        UptakeGuardError::Config(format!("Invalid query URL {}: {e}", redact_url(url)))
    })?;

    if parsed.query_pairs().any(|(key, _)| key == API_KEY_PARAM) {
        return Ok(url.to_string());
    }

    let Some(key) = api_key.filter(|k| !k.is_empty()) else {
        return Err(UptakeGuardError::Config(format!(
            "No API key configured for {url}. Set REDASH_API_KEY, fetch.api_key, \
             or include {API_KEY_PARAM}= in the URL"
        )));
    };
    parsed.query_pairs_mut().append_pair(API_KEY_PARAM, key);
    Ok(parsed.into())
}

/// Replace the value of the `api_key` parameter so the URL is safe to log.
#[must_use]
pub fn redact_url(url: &str) -> String {
    let marker = format!("{API_KEY_PARAM}=");
    let Some(start) = url.find(&marker) else {
        return url.to_string();
    };
    let value_start = start + marker.len();
    let value_end = url[value_start..]
        .find(['&', '#'])
        .map_or(url.len(), |offset| value_start + offset);
    format!("{}{REDACTED}{}", &url[..value_start], &url[value_end..])
}

#[cfg(test)]
#[path = "url_tests.rs"]
mod tests;
