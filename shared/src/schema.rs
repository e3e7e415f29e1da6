//! Strict schema parsing
//!
//! Declarative field tables plus the `parse_strict` driver behind every
//! write endpoint. A parse runs three passes over the raw JSON payload:
//!
//! 1. an unknown-field walk against the entity's field table, recursing
//!    through nested value objects and arrays of objects, pushing one
//!    issue per unrecognized field with its dotted path;
//! 2. serde deserialization through `serde_path_to_error`, so type and
//!    shape failures surface with the offending dotted path;
//! 3. the model's constraint checks (required strings, numeric bounds,
//!    email/phone formats), which collect every violation.
//!
//! Nothing is stripped silently: a payload either normalizes into its model
//! with declared defaults applied, or fails with the full issue list.

use crate::errors::{ValidationIssue, ValidationIssues};
use crate::models::{GymInput, GymPlanInput, UserInput};
use crate::validation::field_path;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A declared field: its wire name, and the schema its value must satisfy
/// when it is a nested object or an array of objects.
pub struct FieldSpec {
    pub name: &'static str,
    pub nested: Nested,
}

pub enum Nested {
    /// Scalar, enum, or free-form value; contents are not walked.
    None,
    /// A nested value object checked against the given schema.
    Object(&'static Schema),
    /// An array whose elements are checked against the given schema.
    List(&'static Schema),
}

/// A named field table for one entity or value object.
pub struct Schema {
    pub label: &'static str,
    pub fields: &'static [FieldSpec],
}

const fn field(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        nested: Nested::None,
    }
}

const fn object(name: &'static str, schema: &'static Schema) -> FieldSpec {
    FieldSpec {
        name,
        nested: Nested::Object(schema),
    }
}

const fn list(name: &'static str, schema: &'static Schema) -> FieldSpec {
    FieldSpec {
        name,
        nested: Nested::List(schema),
    }
}

pub static ADDRESS: Schema = Schema {
    label: "address",
    fields: &[
        field("line1"),
        field("line2"),
        field("city"),
        field("state"),
        field("postal_code"),
        field("country"),
    ],
};

pub static CONTACT_DETAILS: Schema = Schema {
    label: "contact_details",
    fields: &[field("email"), field("phone"), field("whatsapp")],
};

pub static MEASUREMENTS: Schema = Schema {
    label: "measurements",
    fields: &[
        field("height"),
        field("weight"),
        field("waist"),
        field("chest"),
        field("shoulders"),
        field("legs"),
        field("forearm"),
        field("biceps"),
    ],
};

pub static ANNOUNCEMENT: Schema = Schema {
    label: "announcement",
    fields: &[field("title"), field("body"), field("type")],
};

pub static DEVICE_INFO: Schema = Schema {
    label: "device_info",
    fields: &[
        field("id"),
        field("user_id"),
        field("platform"),
        field("token"),
        field("app_version"),
    ],
};

pub static SUBSCRIPTION_PLAN: Schema = Schema {
    label: "subscription plan",
    fields: &[
        field("plan_charges"),
        field("plan_description"),
        field("plan_name"),
        field("is_active"),
    ],
};

pub static ACTIVE_GYM: Schema = Schema {
    label: "active_gym",
    fields: &[field("gym_id"), field("gym_name"), field("gym_logo")],
};

pub static GYM_PLAN: Schema = Schema {
    label: "gym plan document",
    fields: &[
        field("gym_id"),
        field("gym_name"),
        field("plan_name"),
        field("is_active"),
        field("plan_charges"),
        field("plan_description"),
        field("plan_duration"),
    ],
};

pub static GYM: Schema = Schema {
    label: "gym document",
    fields: &[
        field("gym_name"),
        object("address", &ADDRESS),
        field("gym_plans"),
        field("member_list"),
        field("owner"),
        object("contact_details", &CONTACT_DETAILS),
        field("gym_logo"),
        field("is_active"),
        field("feedbacks"),
        field("gym_dob"),
        field("subscription_status"),
        field("subscription_plan"),
        field("announcements"),
        field("total_revenue"),
        field("revenue_this_month"),
    ],
};

pub static USER: Schema = Schema {
    label: "user document",
    fields: &[
        field("name"),
        field("role"),
        field("gender"),
        object("contact_details", &CONTACT_DETAILS),
        object("address", &ADDRESS),
        object("measurements", &MEASUREMENTS),
        field("date_of_birth"),
        field("is_active"),
        field("is_present_today"),
        field("is_fees_paid"),
        field("subscription_status"),
        field("profile_picture"),
        field("check_in_time_today"),
        field("check_out_time_today"),
        object("active_gym", &ACTIVE_GYM),
        object("active_gym_plan", &GYM_PLAN),
        object("active_subscription_plan", &SUBSCRIPTION_PLAN),
        list("announcements", &ANNOUNCEMENT),
        object("device_info", &DEVICE_INFO),
    ],
};

/// A top-level entity that can be strictly parsed from a raw payload.
pub trait StrictModel: DeserializeOwned {
    fn schema() -> &'static Schema;
    fn check(&self, issues: &mut Vec<ValidationIssue>);
}

impl StrictModel for GymInput {
    fn schema() -> &'static Schema {
        &GYM
    }
    fn check(&self, issues: &mut Vec<ValidationIssue>) {
        GymInput::collect_issues(self, issues);
    }
}

impl StrictModel for GymPlanInput {
    fn schema() -> &'static Schema {
        &GYM_PLAN
    }
    fn check(&self, issues: &mut Vec<ValidationIssue>) {
        GymPlanInput::collect_issues(self, issues);
    }
}

impl StrictModel for UserInput {
    fn schema() -> &'static Schema {
        &USER
    }
    fn check(&self, issues: &mut Vec<ValidationIssue>) {
        UserInput::collect_issues(self, issues);
    }
}

/// Walk a payload against a field table, pushing one issue per field that is
/// not in the declared shape. Non-object values are left to the serde pass.
fn check_unknown(
    value: &Value,
    schema: &'static Schema,
    prefix: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    let Some(map) = value.as_object() else {
        return;
    };
    for (key, child) in map {
        match schema.fields.iter().find(|f| f.name == key.as_str()) {
            None => issues.push(ValidationIssue::new(
                field_path(prefix, key),
                format!("Unknown field in {}", schema.label),
            )),
            Some(spec) => match spec.nested {
                Nested::None => {}
                Nested::Object(inner) => {
                    check_unknown(child, inner, &field_path(prefix, key), issues);
                }
                Nested::List(inner) => {
                    if let Some(items) = child.as_array() {
                        for (index, item) in items.iter().enumerate() {
                            let item_path = format!("{}.{index}", field_path(prefix, key));
                            check_unknown(item, inner, &item_path, issues);
                        }
                    }
                }
            },
        }
    }
}

/// Strictly parse and normalize a raw payload into an entity model.
pub fn parse_strict<T: StrictModel>(raw: &Value) -> Result<T, ValidationIssues> {
    if !raw.is_object() {
        return Err(ValidationIssues::single("", "Expected a JSON object"));
    }

    let mut issues = Vec::new();
    check_unknown(raw, T::schema(), "", &mut issues);
    if !issues.is_empty() {
        return Err(ValidationIssues::new(issues));
    }

    let entity: T = match serde_path_to_error::deserialize(raw) {
        Ok(entity) => entity,
        Err(err) => {
            let path = err.path().to_string();
            let path = if path == "." { String::new() } else { path };
            return Err(ValidationIssues::single(path, err.into_inner().to_string()));
        }
    };

    entity.check(&mut issues);
    if issues.is_empty() {
        Ok(entity)
    } else {
        Err(ValidationIssues::new(issues))
    }
}
