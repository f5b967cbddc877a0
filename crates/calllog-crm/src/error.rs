//! Error types for the CRM client.

use thiserror::Error;

/// CRM operation errors
///
/// Display strings end up verbatim in the outcome log, so they are written
/// for the person reading the sync log.
#[derive(Debug, Error)]
pub enum CrmError {
    /// Access key, secret key or host not configured
    #[error("LeadSquared credentials are not fully configured (missing {0})")]
    MissingCredentials(String),

    /// Lookup returned no lead for the phone number
    #[error("No lead found with phone number: {0}")]
    LeadNotFound(String),

    /// Lookup returned a lead without an identifier
    #[error("Lead found, but ProspectID was missing in the response")]
    MissingLeadId,

    /// Connection error (network, DNS, timeout)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Non-success HTTP status
    #[error("Received HTTP {status}: {body}")]
    HttpStatus {
        /// Status code
        status: u16,
        /// Response body, as text
        body: String,
    },

    /// The CRM answered but did not report success
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// The response body could not be understood
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for CrmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            CrmError::Connection(e.to_string())
        } else if e.is_decode() {
            CrmError::InvalidResponse(e.to_string())
        } else if let Some(status) = e.status() {
            CrmError::HttpStatus {
                status: status.as_u16(),
                body: e.to_string(),
            }
        } else {
            CrmError::Connection(e.to_string())
        }
    }
}

impl From<serde_json::Error> for CrmError {
    fn from(e: serde_json::Error) -> Self {
        CrmError::InvalidResponse(format!("JSON parsing error: {}", e))
    }
}
