use std::time::Duration;

/// Origin used when none is configured
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Path of the legacy photo upload endpoint, relative to the API origin
pub const LEGACY_ENDPOINT_PATH: &str = "/ocr-translate";

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: String,
    /// Full URL of the legacy multipart endpoint, if it lives elsewhere
    pub legacy_endpoint: Option<String>,
    /// No timeout is applied when unset
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            legacy_endpoint: None,
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Base origin without a trailing slash, falling back to the default when blank
    pub fn base_url(&self) -> &str {
        let trimmed = self.api_base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            DEFAULT_API_BASE_URL
        } else {
            trimmed
        }
    }

    pub fn infer_url(&self) -> String {
        format!("{}/infer", self.base_url())
    }

    pub fn health_url(&self) -> String {
        format!("{}/", self.base_url())
    }

    pub fn legacy_url(&self) -> String {
        match &self.legacy_endpoint {
            Some(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ => format!("{}{}", self.base_url(), LEGACY_ENDPOINT_PATH),
        }
    }

    pub(crate) fn http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_base_url_falls_back() {
        let config = ClientConfig::with_base_url("  ");
        assert_eq!(config.infer_url(), "http://localhost:8000/infer");
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = ClientConfig::with_base_url("https://ocr.example.com/");
        assert_eq!(config.infer_url(), "https://ocr.example.com/infer");
        assert_eq!(config.health_url(), "https://ocr.example.com/");
        assert_eq!(config.legacy_url(), "https://ocr.example.com/ocr-translate");
    }

    #[test]
    fn test_legacy_endpoint_override() {
        let config = ClientConfig {
            legacy_endpoint: Some("https://tunnel.example.dev/ocr-translate".to_string()),
            ..ClientConfig::default()
        };
        assert_eq!(config.legacy_url(), "https://tunnel.example.dev/ocr-translate");
        assert_eq!(config.infer_url(), "http://localhost:8000/infer");
    }
}
