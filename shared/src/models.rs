//! Entity models for the Gym Manager API
//!
//! Each input model pairs serde deserialization (trimming, defaults, flexible
//! date coercion) with a `check` pass that collects constraint violations as
//! dotted-path issues. Unknown-field rejection lives in [`crate::schema`];
//! together they implement the strict parse contract of the write endpoints.

use crate::errors::ValidationIssue;
use crate::validation::{
    check_at_least, check_email, check_max_len, check_non_negative, check_phone, field_path,
    require_non_empty,
};
use crate::dates;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

fn default_true() -> bool {
    true
}

/// Trim a required string during deserialization.
fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|s| s.trim().to_string())
}

/// Trim an optional string during deserialization.
fn trimmed_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|opt| opt.map(|s| s.trim().to_string()))
}

/// User roles. Only `Owner` and `Member` trigger gym mutation at
/// provisioning time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Member,
    Admin,
    Staff,
    Owner,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "Member",
            Role::Admin => "Admin",
            Role::Staff => "Staff",
            Role::Owner => "Owner",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnnouncementType {
    Reminder,
    Notification,
    Announcement,
    General,
}

/// Postal address value object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, deserialize_with = "trimmed_opt", skip_serializing_if = "Option::is_none")]
    pub line1: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt", skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt", skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt", skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Address {
    pub(crate) fn check(&self, prefix: &str, issues: &mut Vec<ValidationIssue>) {
        if let Some(line1) = &self.line1 {
            require_non_empty(
                issues,
                field_path(prefix, "line1"),
                line1,
                "address.line1 cannot be empty",
            );
            check_max_len(issues, field_path(prefix, "line1"), line1, 200);
        }
        if let Some(line2) = &self.line2 {
            check_max_len(issues, field_path(prefix, "line2"), line2, 200);
        }
        if let Some(city) = &self.city {
            check_max_len(issues, field_path(prefix, "city"), city, 120);
        }
        if let Some(state) = &self.state {
            check_max_len(issues, field_path(prefix, "state"), state, 120);
        }
        if let Some(postal_code) = &self.postal_code {
            check_max_len(issues, field_path(prefix, "postal_code"), postal_code, 20);
        }
        if let Some(country) = &self.country {
            check_max_len(issues, field_path(prefix, "country"), country, 120);
        }
    }
}

/// Contact channels value object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactDetails {
    #[serde(default, deserialize_with = "trimmed_opt", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt", skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
}

impl ContactDetails {
    pub(crate) fn check(&self, prefix: &str, issues: &mut Vec<ValidationIssue>) {
        if let Some(email) = &self.email {
            check_email(issues, field_path(prefix, "email"), email);
        }
        if let Some(phone) = &self.phone {
            check_phone(
                issues,
                field_path(prefix, "phone"),
                phone,
                "Phone must be a valid phone",
            );
        }
        if let Some(whatsapp) = &self.whatsapp {
            check_phone(
                issues,
                field_path(prefix, "whatsapp"),
                whatsapp,
                "Whatsapp no must be a valid phone",
            );
        }
    }
}

/// Body measurements value object. All fields default to 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub waist: f64,
    #[serde(default)]
    pub chest: f64,
    #[serde(default)]
    pub shoulders: f64,
    #[serde(default)]
    pub legs: f64,
    #[serde(default)]
    pub forearm: f64,
    #[serde(default)]
    pub biceps: f64,
}

impl Measurements {
    pub(crate) fn check(&self, prefix: &str, issues: &mut Vec<ValidationIssue>) {
        let fields = [
            ("height", self.height),
            ("weight", self.weight),
            ("waist", self.waist),
            ("chest", self.chest),
            ("shoulders", self.shoulders),
            ("legs", self.legs),
            ("forearm", self.forearm),
            ("biceps", self.biceps),
        ];
        for (name, value) in fields {
            check_non_negative(issues, field_path(prefix, name), value);
        }
    }
}

/// An announcement delivered to users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    #[serde(default, deserialize_with = "trimmed")]
    pub title: String,
    #[serde(default, deserialize_with = "trimmed")]
    pub body: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<AnnouncementType>,
}

impl Announcement {
    pub(crate) fn check(&self, prefix: &str, issues: &mut Vec<ValidationIssue>) {
        require_non_empty(
            issues,
            field_path(prefix, "title"),
            &self.title,
            "title is required",
        );
        require_non_empty(
            issues,
            field_path(prefix, "body"),
            &self.body,
            "body is required",
        );
    }
}

/// Push-notification device registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    #[serde(default, deserialize_with = "trimmed")]
    pub id: String,
    #[serde(default, deserialize_with = "trimmed")]
    pub user_id: String,
    #[serde(default, deserialize_with = "trimmed")]
    pub platform: String,
    #[serde(default, deserialize_with = "trimmed")]
    pub token: String,
    #[serde(default, deserialize_with = "trimmed")]
    pub app_version: String,
}

impl DeviceInfo {
    pub(crate) fn check(&self, prefix: &str, issues: &mut Vec<ValidationIssue>) {
        let fields = [
            ("id", &self.id),
            ("user_id", &self.user_id),
            ("platform", &self.platform),
            ("token", &self.token),
            ("app_version", &self.app_version),
        ];
        for (name, value) in fields {
            require_non_empty(
                issues,
                field_path(prefix, name),
                value,
                &format!("{name} is required"),
            );
        }
    }
}

/// A user's active subscription plan (denormalized embed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPlan {
    #[serde(default)]
    pub plan_charges: f64,
    #[serde(default, deserialize_with = "trimmed")]
    pub plan_description: String,
    #[serde(default, deserialize_with = "trimmed")]
    pub plan_name: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl SubscriptionPlan {
    pub(crate) fn check(&self, prefix: &str, issues: &mut Vec<ValidationIssue>) {
        check_at_least(
            issues,
            field_path(prefix, "plan_charges"),
            self.plan_charges,
            1.0,
            "plan_charges is required",
        );
        require_non_empty(
            issues,
            field_path(prefix, "plan_description"),
            &self.plan_description,
            "description is required",
        );
        require_non_empty(
            issues,
            field_path(prefix, "plan_name"),
            &self.plan_name,
            "plan_name is required",
        );
    }
}

/// A user's active gym (denormalized embed). Only `gym_name` is required;
/// the provisioning workflow resolves it to a stored gym document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveGym {
    #[serde(default, deserialize_with = "trimmed_opt", skip_serializing_if = "Option::is_none")]
    pub gym_id: Option<String>,
    #[serde(default, deserialize_with = "trimmed")]
    pub gym_name: String,
    #[serde(default, deserialize_with = "trimmed_opt", skip_serializing_if = "Option::is_none")]
    pub gym_logo: Option<String>,
}

impl ActiveGym {
    pub(crate) fn check(&self, prefix: &str, issues: &mut Vec<ValidationIssue>) {
        require_non_empty(
            issues,
            field_path(prefix, "gym_name"),
            &self.gym_name,
            "gym_name is required",
        );
    }
}

/// Gym creation payload / stored gym shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GymInput {
    #[serde(default, deserialize_with = "trimmed")]
    pub gym_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default)]
    pub gym_plans: Vec<Value>,
    #[serde(default)]
    pub member_list: Vec<Value>,
    #[serde(default, deserialize_with = "trimmed")]
    pub owner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_details: Option<ContactDetails>,
    #[serde(default, deserialize_with = "trimmed")]
    pub gym_logo: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub feedbacks: Vec<Value>,
    #[serde(default, with = "dates::flexible", skip_serializing_if = "Option::is_none")]
    pub gym_dob: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub subscription_status: bool,
    #[serde(default, deserialize_with = "trimmed_opt", skip_serializing_if = "Option::is_none")]
    pub subscription_plan: Option<String>,
    #[serde(default)]
    pub announcements: Vec<Value>,
    #[serde(default)]
    pub total_revenue: f64,
    #[serde(default)]
    pub revenue_this_month: f64,
}

impl GymInput {
    pub(crate) fn collect_issues(&self, issues: &mut Vec<ValidationIssue>) {
        require_non_empty(
            issues,
            "gym_name".into(),
            &self.gym_name,
            "gym_name is required",
        );
        require_non_empty(issues, "owner".into(), &self.owner, "owner is required");
        if let Some(address) = &self.address {
            address.check("address", issues);
        }
        if let Some(contact) = &self.contact_details {
            contact.check("contact_details", issues);
        }
        check_non_negative(issues, "total_revenue".into(), self.total_revenue);
        check_non_negative(issues, "revenue_this_month".into(), self.revenue_this_month);
    }
}

/// Gym plan creation payload / stored plan shape. Doubles as the
/// `active_gym_plan` embed on user documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GymPlanInput {
    #[serde(default, deserialize_with = "trimmed")]
    pub gym_id: String,
    #[serde(default, deserialize_with = "trimmed")]
    pub gym_name: String,
    #[serde(default, deserialize_with = "trimmed")]
    pub plan_name: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub plan_charges: f64,
    #[serde(default, deserialize_with = "trimmed")]
    pub plan_description: String,
    #[serde(default)]
    pub plan_duration: f64,
}

impl GymPlanInput {
    pub(crate) fn check_at(&self, prefix: &str, issues: &mut Vec<ValidationIssue>) {
        require_non_empty(
            issues,
            field_path(prefix, "gym_id"),
            &self.gym_id,
            "gym_id is required",
        );
        require_non_empty(
            issues,
            field_path(prefix, "gym_name"),
            &self.gym_name,
            "gym_name is required",
        );
        require_non_empty(
            issues,
            field_path(prefix, "plan_name"),
            &self.plan_name,
            "plan_name is required",
        );
        check_non_negative(issues, field_path(prefix, "plan_charges"), self.plan_charges);
        check_non_negative(
            issues,
            field_path(prefix, "plan_duration"),
            self.plan_duration,
        );
    }

    pub(crate) fn collect_issues(&self, issues: &mut Vec<ValidationIssue>) {
        self.check_at("", issues);
    }
}

/// User creation payload / stored user shape (minus workflow-written
/// fields: `user_id` and timestamps).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInput {
    #[serde(default, deserialize_with = "trimmed")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_details: Option<ContactDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurements: Option<Measurements>,
    #[serde(default, with = "dates::flexible", skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default = "default_true")]
    pub is_present_today: bool,
    #[serde(default = "default_true")]
    pub is_fees_paid: bool,
    #[serde(default = "default_true")]
    pub subscription_status: bool,
    #[serde(default, deserialize_with = "trimmed")]
    pub profile_picture: String,
    #[serde(default, with = "dates::flexible", skip_serializing_if = "Option::is_none")]
    pub check_in_time_today: Option<DateTime<Utc>>,
    #[serde(default, with = "dates::flexible", skip_serializing_if = "Option::is_none")]
    pub check_out_time_today: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_gym: Option<ActiveGym>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_gym_plan: Option<GymPlanInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_subscription_plan: Option<SubscriptionPlan>,
    #[serde(default)]
    pub announcements: Vec<Announcement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_info: Option<DeviceInfo>,
}

impl UserInput {
    pub(crate) fn collect_issues(&self, issues: &mut Vec<ValidationIssue>) {
        require_non_empty(issues, "name".into(), &self.name, "name is required");
        if let Some(contact) = &self.contact_details {
            contact.check("contact_details", issues);
        }
        if let Some(address) = &self.address {
            address.check("address", issues);
        }
        if let Some(measurements) = &self.measurements {
            measurements.check("measurements", issues);
        }
        if let Some(active_gym) = &self.active_gym {
            active_gym.check("active_gym", issues);
        }
        if let Some(plan) = &self.active_gym_plan {
            plan.check_at("active_gym_plan", issues);
        }
        if let Some(subscription) = &self.active_subscription_plan {
            subscription.check("active_subscription_plan", issues);
        }
        for (index, announcement) in self.announcements.iter().enumerate() {
            announcement.check(&format!("announcements.{index}"), issues);
        }
        if let Some(device) = &self.device_info {
            device.check("device_info", issues);
        }
    }

    /// The trimmed contact email, if any; provisioning requires it.
    pub fn email(&self) -> Option<&str> {
        self.contact_details
            .as_ref()
            .and_then(|c| c.email.as_deref())
            .filter(|e| !e.is_empty())
    }

    /// The trimmed active-gym name, if any.
    pub fn active_gym_name(&self) -> Option<&str> {
        self.active_gym
            .as_ref()
            .map(|g| g.gym_name.as_str())
            .filter(|n| !n.is_empty())
    }
}
