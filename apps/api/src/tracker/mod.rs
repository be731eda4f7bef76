//! Job application tracker backed by a JSON file.

pub mod handlers;
pub mod store;

use serde::{Deserialize, Serialize};

pub use store::{ApplicationStore, JsonFileStore};

fn default_status() -> String {
    "Applied".to_string()
}

/// One tracked application. `status` is free text; the frontend uses
/// Applied, Interviewing, Offer and Rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationEntry {
    /// Assigned by the store on insert; any client-supplied value is replaced.
    #[serde(default)]
    pub id: Option<String>,
    pub company_name: String,
    pub job_title: String,
    #[serde(default = "default_status")]
    pub status: String,
    pub date_applied: String,
    #[serde(default)]
    pub job_description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}
