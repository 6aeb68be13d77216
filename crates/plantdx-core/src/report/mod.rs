//! QR code and PDF report rendering.
//!
//! Both renderers produce in-memory byte buffers; writing them anywhere is
//! left to the caller.

mod pdf;
mod qr;

pub use pdf::{layout_report, render_report, ReportLayout, TextLine};
pub use qr::{render_qr, render_qr_with, QrOptions};

use url::Url;

use crate::error::{Error, Result};

/// Checks that a product URL is an absolute http(s) URL with a host.
///
/// # Errors
///
/// Returns `Error::InvalidUrl` describing the first problem found.
pub fn validate_url(url: &str) -> Result<Url> {
    let invalid = |reason: &str| Error::InvalidUrl {
        url: url.to_string(),
        reason: reason.to_string(),
    };

    if url.trim().is_empty() {
        return Err(invalid("URL is empty"));
    }
    let parsed = Url::parse(url).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(invalid("URL has no host"));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url_accepts_product_links() {
        assert!(validate_url("https://www.amazon.in/dp/B07KQJP5WV").is_ok());
        assert!(validate_url("http://example.com/npk-fertilizer").is_ok());
    }

    #[test]
    fn test_validate_url_rejects_empty() {
        let err = validate_url("   ");
        assert!(matches!(err, Err(Error::InvalidUrl { ref reason, .. }) if reason == "URL is empty"));
    }

    #[test]
    fn test_validate_url_rejects_relative_and_other_schemes() {
        assert!(validate_url("/dp/B07KQJP5WV").is_err());
        assert!(validate_url("ftp://example.com/file").is_err());
        assert!(validate_url("mailto:someone@example.com").is_err());
    }
}
