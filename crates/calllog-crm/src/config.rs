//! Connection settings for the CRM.

use crate::error::CrmError;
use std::time::Duration;

/// Environment variable holding the access key
pub const ACCESS_KEY_ENV: &str = "LEADSQUARED_ACCESS_KEY";
/// Environment variable holding the secret key
pub const SECRET_KEY_ENV: &str = "LEADSQUARED_SECRET_KEY";
/// Environment variable holding the API host
pub const HOST_ENV: &str = "LEADSQUARED_HOST";

/// Pause before every outbound call
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(200);

/// LeadSquared connection settings
#[derive(Debug, Clone)]
pub struct CrmConfig {
    /// API host, e.g. `https://api-in21.leadsquared.com`
    pub host: String,
    /// Access key
    pub access_key: String,
    /// Secret key
    pub secret_key: String,
    /// Fixed pause before each request
    pub request_delay: Duration,
    /// Request timeout; reqwest's default when `None`
    pub timeout: Option<Duration>,
}

impl CrmConfig {
    /// Create settings with the default request delay
    pub fn new(
        host: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into().trim_end_matches('/').to_string(),
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            request_delay: DEFAULT_REQUEST_DELAY,
            timeout: None,
        }
    }

    /// Set the pause before each request
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Check that every credential is present
    pub fn validate(&self) -> Result<(), CrmError> {
        let missing: Vec<&str> = [
            (ACCESS_KEY_ENV, &self.access_key),
            (SECRET_KEY_ENV, &self.secret_key),
            (HOST_ENV, &self.host),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CrmError::MissingCredentials(missing.join(", ")))
        }
    }
}
