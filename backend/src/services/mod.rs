//! Business logic services
//!
//! Services validate input, coordinate the store and identity gateways, and
//! own every document write. Timestamps are stamped here so all stored
//! records satisfy `created_at <= updated_at`.

use anyhow::Result;
use chrono::Utc;
use gym_manager_shared::{dates, Document};
use serde::Serialize;
use serde_json::Value;

pub mod gyms;
pub mod members;
pub mod provisioning;

pub use gyms::GymService;
pub use members::MemberService;
pub use provisioning::{ProvisionedUser, ProvisioningService};

/// Collection names in the document store.
pub mod collections {
    pub const GYMS: &str = "gym";
    pub const GYM_PLANS: &str = "gym_plans";
    pub const USERS: &str = "users";
}

/// Serialize an entity into a storable document.
pub(crate) fn to_document<T: Serialize>(entity: &T) -> Result<Document> {
    match serde_json::to_value(entity)? {
        Value::Object(map) => Ok(map),
        other => anyhow::bail!("entity serialized to non-object value: {other}"),
    }
}

/// The current instant in the canonical stored form.
pub(crate) fn now_stored() -> String {
    dates::to_stored(&Utc::now())
}

/// Stamp creation and update times on a new document.
pub(crate) fn stamp_new(doc: &mut Document) {
    let now = now_stored();
    doc.insert("created_at".to_string(), Value::String(now.clone()));
    doc.insert("updated_at".to_string(), Value::String(now));
}
