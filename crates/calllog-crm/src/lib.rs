//! Calllog CRM client
//!
//! Blocking client for the LeadSquared REST API, implementing
//! [`CrmClient`](calllog_domain::CrmClient): find a lead by phone number, then
//! update its attributes or post an activity against it.
//!
//! Every request is preceded by a fixed pause (200 ms by default) to stay
//! under the API's rate limit. Failed calls are not retried.
//!
//! # Example
//!
//! ```no_run
//! use calllog_crm::{CrmConfig, LeadSquaredClient};
//! use calllog_domain::{AttributePair, CrmClient};
//!
//! # fn main() -> Result<(), calllog_crm::CrmError> {
//! let config = CrmConfig::new("https://api-in21.leadsquared.com", "access-key", "secret-key");
//! let client = LeadSquaredClient::new(config)?;
//!
//! let lead = client.lookup_by_phone("9876543210")?;
//! let message = client.update_lead(&lead, &[AttributePair::new("ProspectStage", "In Pipeline")])?;
//! println!("{}", message);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod client;
mod config;
mod error;

pub use client::LeadSquaredClient;
pub use config::{CrmConfig, ACCESS_KEY_ENV, DEFAULT_REQUEST_DELAY, HOST_ENV, SECRET_KEY_ENV};
pub use error::CrmError;
