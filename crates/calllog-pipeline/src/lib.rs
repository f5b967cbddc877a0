//! Calllog Pipeline
//!
//! Template engine and record pipeline for syncing call transcripts to a CRM.
//!
//! # Overview
//!
//! Each CSV row goes through the same steps, in order:
//! - **Extraction**: the transcript is sent to a [`FieldExtractor`] (skipped when blank)
//! - **Coercion**: integer and float fields are reduced to their digits
//! - **Rendering**: row values are substituted into the JSON [`Template`]
//! - **Dispatch**: the lead is looked up by phone and updated, or an activity is posted
//!
//! Every row produces exactly one [`OutcomeLogEntry`]; failures are recorded
//! and the batch moves on. Only setup problems (an invalid template, a bad
//! schema, blank column names) are reported as [`PipelineError`].
//!
//! # Template
//!
//! ```
//! use calllog_pipeline::Template;
//! use std::collections::HashMap;
//!
//! let template =
//!     Template::parse(r#"[{"SchemaName": "mx_Custom_1", "Value": "{{sentiment}}"}]"#).unwrap();
//! let values = HashMap::from([("sentiment".to_string(), "Positive".to_string())]);
//!
//! let document = template.render(0, &values).unwrap();
//! assert_eq!(document[0]["Value"], "Positive");
//! ```
//!
//! # Dispatch modes
//!
//! | Mode | Template renders to | CRM call |
//! |------|---------------------|----------|
//! | `update` | `[{"Attribute", "Value"}]` | `Lead.Update` |
//! | `activity` | `[{"SchemaName", "Value", "Fields"?}]` | `ProspectActivity.svc/Create` |
//!
//! [`FieldExtractor`]: calllog_domain::FieldExtractor
//! [`OutcomeLogEntry`]: calllog_domain::OutcomeLogEntry

#![warn(missing_docs)]

mod config;
mod dispatch;
mod error;
mod pipeline;
mod report;
pub mod template;

pub use config::PipelineConfig;
pub use dispatch::{dispatch, DispatchMode, Payload};
pub use error::PipelineError;
pub use pipeline::Pipeline;
pub use report::BatchReport;
pub use template::{substitute, Template, TemplateError};
