//! LeadSquared client implementation.

use crate::config::CrmConfig;
use crate::error::CrmError;
use calllog_domain::{ActivityPayload, AttributePair, CrmClient, LeadId};
use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::thread;
use tracing::{debug, warn};

const LOOKUP_PATH: &str = "/v2/LeadManagement.svc/RetrieveLeadByPhoneNumber";
const UPDATE_PATH: &str = "/v2/LeadManagement.svc/Lead.Update";
const ACTIVITY_PATH: &str = "/v2/ProspectActivity.svc/Create";

/// Format of `ActivityDateTime` (UTC)
const ACTIVITY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Body of a write response
#[derive(Debug, Deserialize)]
struct WriteResponse {
    #[serde(rename = "Status")]
    status: Option<String>,
    #[serde(rename = "ExceptionMessage")]
    exception_message: Option<String>,
    #[serde(rename = "Message")]
    message: Option<Value>,
}

/// Activity as sent on the wire
#[derive(Debug, Serialize)]
struct ActivityRequest<'a> {
    #[serde(rename = "RelatedProspectId")]
    related_prospect_id: &'a str,
    #[serde(rename = "ActivityDateTime")]
    activity_date_time: String,
    #[serde(flatten)]
    activity: &'a ActivityPayload,
}

/// Blocking LeadSquared client
pub struct LeadSquaredClient {
    config: CrmConfig,
    http: Client,
}

impl LeadSquaredClient {
    /// Create a new client
    ///
    /// # Errors
    /// Returns `MissingCredentials` before any request if a credential is blank
    pub fn new(config: CrmConfig) -> Result<Self, CrmError> {
        config.validate()?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self { config, http })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.host, path)
    }

    fn credentials(&self) -> [(&'static str, &str); 2] {
        [
            ("accessKey", self.config.access_key.as_str()),
            ("secretKey", self.config.secret_key.as_str()),
        ]
    }

    /// Rate limit: a fixed pause before every call
    fn pause(&self) {
        if !self.config.request_delay.is_zero() {
            thread::sleep(self.config.request_delay);
        }
    }

    /// POST a JSON body and apply the `Status == "Success"` rule
    fn post_write<B: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: &B,
    ) -> Result<WriteResponse, CrmError> {
        self.pause();

        let response = self
            .http
            .post(self.url(path))
            .query(&self.credentials())
            .query(query)
            .json(body)
            .send()?;

        let response = check_status(response)?;
        let text = response.text()?;
        let parsed: WriteResponse = serde_json::from_str(&text)?;

        if parsed.status.as_deref() == Some("Success") {
            Ok(parsed)
        } else {
            let reason = parsed
                .exception_message
                .clone()
                .unwrap_or_else(|| "Unknown error".to_string());
            warn!("CRM rejected write to {}: {}", path, reason);
            Err(CrmError::Rejected(reason))
        }
    }
}

fn check_status(response: Response) -> Result<Response, CrmError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let body = response
            .text()
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(CrmError::HttpStatus {
            status: status.as_u16(),
            body,
        })
    }
}

/// Identifier returned by the activity endpoint, if any
fn created_id(message: Option<&Value>) -> Option<&str> {
    message?.get("Id")?.as_str()
}

impl CrmClient for LeadSquaredClient {
    type Error = CrmError;

    fn lookup_by_phone(&self, phone: &str) -> Result<LeadId, CrmError> {
        self.pause();

        let response = self
            .http
            .get(self.url(LOOKUP_PATH))
            .query(&self.credentials())
            .query(&[("phone", phone)])
            .send()?;

        let response = check_status(response)?;
        let text = response.text()?;
        let leads: Vec<Value> = serde_json::from_str(&text)?;

        let first = leads
            .first()
            .ok_or_else(|| CrmError::LeadNotFound(phone.to_string()))?;

        let id = first
            .get("ProspectID")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or(CrmError::MissingLeadId)?;

        debug!("Found lead {} for phone {}", id, phone);
        Ok(LeadId::new(id))
    }

    fn update_lead(&self, lead: &LeadId, attributes: &[AttributePair]) -> Result<String, CrmError> {
        self.post_write(UPDATE_PATH, &[("leadId", lead.as_str())], attributes)?;
        Ok(format!("Successfully updated lead {}.", lead))
    }

    fn create_activity(
        &self,
        lead: &LeadId,
        activity: &ActivityPayload,
    ) -> Result<String, CrmError> {
        let request = ActivityRequest {
            related_prospect_id: lead.as_str(),
            activity_date_time: chrono::Utc::now().format(ACTIVITY_TIME_FORMAT).to_string(),
            activity,
        };

        let response = self.post_write(ACTIVITY_PATH, &[], &request)?;
        Ok(match created_id(response.message.as_ref()) {
            Some(id) => format!("Successfully posted activity {} to lead {}.", id, lead),
            None => format!("Successfully posted activity to lead {}.", lead),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calllog_domain::ActivityField;
    use serde_json::json;

    #[test]
    fn test_activity_request_shape() {
        let activity = ActivityPayload {
            event_code: 227,
            fields: vec![ActivityField {
                schema_name: "mx_Custom_1".to_string(),
                value: json!("Positive"),
                fields: None,
            }],
        };
        let request = ActivityRequest {
            related_prospect_id: "lead-1",
            activity_date_time: "2024-01-02 03:04:05".to_string(),
            activity: &activity,
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "RelatedProspectId": "lead-1",
                "ActivityDateTime": "2024-01-02 03:04:05",
                "ActivityEvent": 227,
                "Fields": [{"SchemaName": "mx_Custom_1", "Value": "Positive"}]
            })
        );
    }

    #[test]
    fn test_created_id() {
        let message = json!({"Id": "abc-123"});
        assert_eq!(created_id(Some(&message)), Some("abc-123"));
        assert_eq!(created_id(None), None);
        assert_eq!(created_id(Some(&json!("text"))), None);
    }

    #[test]
    fn test_missing_credentials_fail_before_any_request() {
        let result = LeadSquaredClient::new(CrmConfig::new("", "a", "s"));
        assert!(matches!(result, Err(CrmError::MissingCredentials(_))));
    }
}
