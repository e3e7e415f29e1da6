//! API response types and document formatters
//!
//! Success envelopes all carry `status: true` plus a human message; the two
//! member formatters implement the listing and detail output contracts over
//! raw stored documents (stored user documents may predate the strict
//! schema, so formatting tolerates legacy flat fields and missing values).

use crate::dates;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stored document: the unit the persistence gateway reads and writes.
pub type Document = Map<String, Value>;

/// Response for `POST /add-gym`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GymCreatedResponse {
    pub status: bool,
    pub message: String,
    pub gym_id: String,
}

/// Response for `POST /add-gym-plans`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GymPlanCreatedResponse {
    pub status: bool,
    pub message: String,
    pub gym_plans_id: String,
}

/// Response for `POST /add-user`. The generated password is returned here
/// exactly once and never again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreatedResponse {
    pub status: bool,
    pub message: String,
    pub user_id: String,
    pub generated_password: String,
}

/// Response for single-record member lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberResponse {
    pub status: bool,
    pub message: String,
    pub user: MemberSummary,
}

/// Response for the member detail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDetailResponse {
    pub status: bool,
    pub message: String,
    pub user: MemberDetail,
}

/// Response for paginated member listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberListResponse {
    pub status: bool,
    pub message: String,
    pub members: Vec<MemberSummary>,
    pub last_doc_id: Option<String>,
    pub has_more: bool,
}

fn str_field(doc: &Document, key: &str) -> Option<String> {
    doc.get(key).and_then(Value::as_str).map(str::to_string)
}

fn bool_field(doc: &Document, key: &str) -> Option<bool> {
    doc.get(key).and_then(Value::as_bool)
}

fn value_field(doc: &Document, key: &str) -> Option<Value> {
    doc.get(key).cloned().filter(|v| !v.is_null())
}

/// Reduced member shape used by the listing endpoint.
///
/// All date fields render as `YYYY-MM-DD` or null; `email` and `phone` read
/// the flat legacy fields (the detail formatter is the one that prefers the
/// nested contact object).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberSummary {
    pub uid: String,
    pub name: Option<String>,
    pub created_at: Option<String>,
    pub is_active: Option<bool>,
    pub fees_due_date: Option<String>,
    pub is_fees_paid: Option<bool>,
    pub date_of_birth: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub active_plan: Option<Value>,
}

impl MemberSummary {
    pub fn from_doc(id: &str, doc: &Document) -> Self {
        Self {
            uid: id.to_string(),
            name: str_field(doc, "name"),
            created_at: dates::format_day(doc.get("created_at")),
            is_active: bool_field(doc, "is_active"),
            fees_due_date: dates::format_day(doc.get("fees_due_date")),
            is_fees_paid: bool_field(doc, "is_fees_paid"),
            date_of_birth: dates::format_day(doc.get("date_of_birth")),
            email: str_field(doc, "email"),
            phone: str_field(doc, "phone"),
            active_plan: value_field(doc, "active_plan"),
        }
    }
}

/// Full denormalized member profile used by the detail endpoint.
///
/// Contact fields prefer the nested `contact_details` object and fall back
/// to the flat legacy fields; embedded objects default to null and list
/// fields to `[]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDetail {
    pub uid: String,
    pub name: Option<String>,
    pub role: Option<String>,
    pub gender: Option<String>,
    pub is_active: Option<bool>,
    pub is_present_today: Option<bool>,
    pub is_fees_paid: Option<bool>,
    pub subscription_status: Option<bool>,

    pub active_gym: Value,
    pub active_gym_plan: Value,
    pub active_subscription_plan: Value,
    pub subscription_plan: Option<Value>,
    pub active_plan: Option<Value>,

    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub date_of_birth: Option<String>,
    pub fees_due_date: Option<String>,
    pub check_in_time_today: Option<String>,
    pub check_out_time_today: Option<String>,

    pub email: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,

    pub profile_picture: Option<String>,
    pub address: Value,
    pub measurements: Value,

    pub announcements: Vec<Value>,
    pub feedbacks: Vec<Value>,
    pub gym_logo: Value,

    pub user_id: Option<String>,
}

impl MemberDetail {
    pub fn from_doc(id: &str, doc: &Document) -> Self {
        let contact = doc.get("contact_details").and_then(Value::as_object);
        let contact_str = |key: &str| -> Option<String> {
            contact
                .and_then(|c| c.get(key))
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        Self {
            uid: id.to_string(),
            name: str_field(doc, "name"),
            role: str_field(doc, "role"),
            gender: str_field(doc, "gender"),
            is_active: bool_field(doc, "is_active"),
            is_present_today: bool_field(doc, "is_present_today"),
            is_fees_paid: bool_field(doc, "is_fees_paid"),
            subscription_status: bool_field(doc, "subscription_status"),

            active_gym: doc.get("active_gym").cloned().unwrap_or(Value::Null),
            active_gym_plan: doc.get("active_gym_plan").cloned().unwrap_or(Value::Null),
            active_subscription_plan: doc
                .get("active_subscription_plan")
                .cloned()
                .unwrap_or(Value::Null),
            subscription_plan: value_field(doc, "subscription_plan"),
            active_plan: value_field(doc, "active_plan"),

            created_at: dates::format_day(doc.get("created_at")),
            updated_at: dates::format_day(doc.get("updated_at")),
            date_of_birth: dates::format_day(doc.get("date_of_birth")),
            fees_due_date: dates::format_day(doc.get("fees_due_date")),
            check_in_time_today: dates::format_day(doc.get("check_in_time_today")),
            check_out_time_today: dates::format_day(doc.get("check_out_time_today")),

            email: contact_str("email").or_else(|| str_field(doc, "email")),
            phone: contact_str("phone").or_else(|| str_field(doc, "phone")),
            whatsapp: contact_str("whatsapp"),

            profile_picture: str_field(doc, "profile_picture"),
            address: doc.get("address").cloned().unwrap_or(Value::Null),
            measurements: doc.get("measurements").cloned().unwrap_or(Value::Null),

            announcements: doc
                .get("announcements")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
            feedbacks: doc
                .get("feedbacks")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
            gym_logo: doc
                .get("active_gym")
                .and_then(|g| g.get("gym_logo"))
                .cloned()
                .unwrap_or(Value::Null),

            user_id: str_field(doc, "user_id"),
        }
    }
}
