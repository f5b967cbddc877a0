//! CRM dispatch: turning a rendered document into a write, and sending it

use calllog_domain::{ActivityPayload, AttributePair, CrmClient};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Which CRM write a row ends in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DispatchMode {
    /// Overwrite lead attributes with an `{Attribute, Value}` list
    #[serde(rename = "update")]
    UpdateLead,

    /// Post an activity of the given event type against the lead
    #[serde(rename = "activity")]
    PostActivity {
        /// Activity event code configured in the CRM
        event_code: i64,
    },
}

impl Default for DispatchMode {
    fn default() -> Self {
        DispatchMode::PostActivity { event_code: 227 }
    }
}

/// A rendered payload, ready for the CRM client
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Lead attribute update
    Update(Vec<AttributePair>),

    /// Activity creation
    Activity(ActivityPayload),
}

impl DispatchMode {
    /// Convert a rendered template document into this mode's payload
    ///
    /// # Errors
    /// Returns error when the document does not have the shape the mode expects
    pub fn build_payload(&self, document: Value) -> Result<Payload, serde_json::Error> {
        match self {
            DispatchMode::UpdateLead => {
                AttributePair::list_from_document(document).map(Payload::Update)
            }
            DispatchMode::PostActivity { event_code } => {
                ActivityPayload::from_document(*event_code, document).map(Payload::Activity)
            }
        }
    }
}

/// Resolve the lead by phone, then perform the write
///
/// Stops at the first failure; a failed lookup means no write is attempted.
pub fn dispatch<C: CrmClient>(crm: &C, phone: &str, payload: &Payload) -> Result<String, C::Error> {
    let lead_id = crm.lookup_by_phone(phone)?;
    debug!("Resolved phone {} to lead {}", phone, lead_id);

    match payload {
        Payload::Update(attributes) => crm.update_lead(&lead_id, attributes),
        Payload::Activity(activity) => crm.create_activity(&lead_id, activity),
    }
}
