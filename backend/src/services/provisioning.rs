//! User provisioning workflow
//!
//! Creating a user spans two external systems: the identity provider (the
//! login-capable principal) and the document store (the profile and, for
//! Owner/Member roles, a mutation of the named gym). The steps run strictly
//! in order; once the principal exists, any later failure triggers a
//! best-effort compensating deletion so no login-capable account is left
//! without a profile. Compensation failures are logged, never surfaced;
//! the caller always sees the original error.

use super::{collections, stamp_new, to_document, GymService};
use crate::error::ApiError;
use crate::identity::IdentityProvider;
use crate::store::DocumentStore;
use gym_manager_shared::models::{Role, UserInput};
use gym_manager_shared::parse_strict;
use rand::Rng;
use serde_json::{json, Value};
use tracing::{info, warn};

const PASSWORD_LENGTH: usize = 12;
const PASSWORD_CHARSET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*";

/// Result of a successful provisioning run. The plaintext password is
/// returned exactly once, here.
#[derive(Debug, Clone)]
pub struct ProvisionedUser {
    pub user_id: String,
    pub generated_password: String,
}

pub struct ProvisioningService;

impl ProvisioningService {
    /// Run the full provisioning workflow for a raw user payload.
    pub async fn create_user(
        store: &dyn DocumentStore,
        identity: &dyn IdentityProvider,
        payload: &Value,
    ) -> Result<ProvisionedUser, ApiError> {
        // Steps 1-2: validation and the email precondition happen before
        // any side effect.
        let user: UserInput = parse_strict(payload)?;
        let email = user
            .email()
            .ok_or_else(|| ApiError::BadRequest("contact_details.email is required".to_string()))?
            .to_string();

        // Step 3: create the principal. Failure here needs no compensation.
        let generated_password = generate_password(PASSWORD_LENGTH);
        let uid = identity.create_principal(&email, &generated_password).await?;

        // Steps 4-5: gym mutation and profile persist; from here on, any
        // failure deletes the principal before returning.
        if let Some(role) = user.role.filter(|r| matches!(r, Role::Owner | Role::Member)) {
            if let Err(err) = Self::assign_role(store, &uid, &user, role).await {
                Self::compensate(identity, &uid).await;
                return Err(err);
            }
        }

        let mut doc = match to_document(&user) {
            Ok(doc) => doc,
            Err(err) => {
                Self::compensate(identity, &uid).await;
                return Err(ApiError::internal("add user", err));
            }
        };
        doc.insert("user_id".to_string(), Value::String(uid.clone()));
        stamp_new(&mut doc);

        if let Err(err) = store.set(collections::USERS, &uid, doc).await {
            Self::compensate(identity, &uid).await;
            return Err(ApiError::internal("add user", err));
        }

        info!(user_id = %uid, "user provisioned");
        Ok(ProvisionedUser {
            user_id: uid,
            generated_password,
        })
    }

    /// Mutate the named gym for an Owner or Member role: overwrite
    /// `owner_id`, or append the principal to `member_list` if absent.
    pub(crate) async fn assign_role(
        store: &dyn DocumentStore,
        uid: &str,
        user: &UserInput,
        role: Role,
    ) -> Result<(), ApiError> {
        let gym_name = user.active_gym_name().ok_or_else(|| {
            ApiError::BadRequest(format!(
                "active_gym.gym_name is required when role is '{role}'"
            ))
        })?;

        let (gym_id, gym_doc) = GymService::find_by_name(store, gym_name)
            .await
            .map_err(|e| ApiError::internal("assign user role", e))?
            .ok_or_else(|| {
                ApiError::NotFound(format!(
                    "No gym found with gym_name='{gym_name}' to assign {role}"
                ))
            })?;

        match role {
            Role::Owner => {
                let fields = json_doc(json!({
                    "owner_id": uid,
                    "updated_at": super::now_stored(),
                }));
                store
                    .update(collections::GYMS, &gym_id, fields)
                    .await
                    .map_err(|e| ApiError::internal("assign user role", e))?;
            }
            Role::Member => {
                let mut members: Vec<Value> = gym_doc
                    .get("member_list")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();
                // Idempotent union: only write when the principal is new.
                if !members.iter().any(|m| m.as_str() == Some(uid)) {
                    members.push(Value::String(uid.to_string()));
                    let fields = json_doc(json!({
                        "member_list": members,
                        "updated_at": super::now_stored(),
                    }));
                    store
                        .update(collections::GYMS, &gym_id, fields)
                        .await
                        .map_err(|e| ApiError::internal("assign user role", e))?;
                }
            }
            Role::Admin | Role::Staff => {}
        }
        Ok(())
    }

    /// Best-effort principal cleanup after a partial failure.
    async fn compensate(identity: &dyn IdentityProvider, uid: &str) {
        match identity.delete_principal(uid).await {
            Ok(()) => info!(user_id = %uid, "cleaned up identity principal after provisioning failure"),
            Err(err) => warn!(
                user_id = %uid,
                error = %err,
                "failed to clean up identity principal after provisioning failure"
            ),
        }
    }
}

fn json_doc(value: Value) -> gym_manager_shared::Document {
    match value {
        Value::Object(map) => map,
        _ => unreachable!("json_doc called with non-object literal"),
    }
}

/// Generate a random password from a mixed-case/digit/symbol alphabet.
pub(crate) fn generate_password(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..PASSWORD_CHARSET.len());
            PASSWORD_CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::MemoryIdentity;
    use crate::store::MemoryStore;
    use anyhow::Result;
    use async_trait::async_trait;
    use gym_manager_shared::Document;
    use proptest::prelude::*;
    use serde_json::json;

    async fn seed_gym(store: &MemoryStore, name: &str) -> String {
        GymService::add_gym(store, &json!({ "gym_name": name, "owner": "seed" }))
            .await
            .unwrap()
    }

    fn member_payload(email: &str, gym: &str) -> Value {
        json!({
            "name": "Asha",
            "role": "Member",
            "contact_details": { "email": email },
            "active_gym": { "gym_name": gym },
        })
    }

    #[tokio::test]
    async fn provisions_member_and_links_gym() {
        let store = MemoryStore::new();
        let identity = MemoryIdentity::new();
        let gym_id = seed_gym(&store, "Iron Temple").await;

        let result = ProvisioningService::create_user(
            &store,
            &identity,
            &member_payload("asha@example.com", "Iron Temple"),
        )
        .await
        .unwrap();

        assert_eq!(result.generated_password.len(), PASSWORD_LENGTH);

        let user = store
            .get(collections::USERS, &result.user_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user["user_id"], json!(result.user_id));
        assert_eq!(user["name"], json!("Asha"));
        assert!(user["created_at"].as_str().unwrap() <= user["updated_at"].as_str().unwrap());

        let gym = store.get(collections::GYMS, &gym_id).await.unwrap().unwrap();
        assert_eq!(gym["member_list"], json!([result.user_id]));
    }

    #[tokio::test]
    async fn owner_role_overwrites_owner_id() {
        let store = MemoryStore::new();
        let identity = MemoryIdentity::new();
        let gym_id = seed_gym(&store, "Iron Temple").await;

        let first = ProvisioningService::create_user(
            &store,
            &identity,
            &json!({
                "name": "Owner One",
                "role": "Owner",
                "contact_details": { "email": "one@example.com" },
                "active_gym": { "gym_name": "Iron Temple" },
            }),
        )
        .await
        .unwrap();

        let second = ProvisioningService::create_user(
            &store,
            &identity,
            &json!({
                "name": "Owner Two",
                "role": "Owner",
                "contact_details": { "email": "two@example.com" },
                "active_gym": { "gym_name": "Iron Temple" },
            }),
        )
        .await
        .unwrap();

        // Last writer wins.
        let gym = store.get(collections::GYMS, &gym_id).await.unwrap().unwrap();
        assert_ne!(first.user_id, second.user_id);
        assert_eq!(gym["owner_id"], json!(second.user_id));
    }

    #[tokio::test]
    async fn member_union_is_idempotent() {
        let store = MemoryStore::new();
        let gym_id = seed_gym(&store, "Iron Temple").await;

        let user: UserInput =
            parse_strict(&member_payload("asha@example.com", "Iron Temple")).unwrap();
        ProvisioningService::assign_role(&store, "uid-1", &user, Role::Member)
            .await
            .unwrap();
        ProvisioningService::assign_role(&store, "uid-1", &user, Role::Member)
            .await
            .unwrap();

        let gym = store.get(collections::GYMS, &gym_id).await.unwrap().unwrap();
        assert_eq!(gym["member_list"], json!(["uid-1"]));
    }

    #[tokio::test]
    async fn validation_failure_has_no_side_effects() {
        let store = MemoryStore::new();
        let identity = MemoryIdentity::new();

        let err = ProvisioningService::create_user(
            &store,
            &identity,
            &json!({ "name": "Asha", "shoe_size": 42 }),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
        assert!(identity.is_empty());
        assert!(store.is_empty(collections::USERS));
    }

    #[tokio::test]
    async fn missing_email_is_bad_request_with_no_side_effects() {
        let store = MemoryStore::new();
        let identity = MemoryIdentity::new();

        let err = ProvisioningService::create_user(&store, &identity, &json!({ "name": "Asha" }))
            .await
            .unwrap_err();

        match err {
            ApiError::BadRequest(msg) => assert_eq!(msg, "contact_details.email is required"),
            other => panic!("expected BadRequest, got {other:?}"),
        }
        assert!(identity.is_empty());
        assert!(store.is_empty(collections::USERS));
    }

    #[tokio::test]
    async fn unknown_gym_is_not_found_and_compensates() {
        let store = MemoryStore::new();
        let identity = MemoryIdentity::new();
        seed_gym(&store, "Iron Temple").await;

        let err = ProvisioningService::create_user(
            &store,
            &identity,
            &member_payload("asha@example.com", "Nowhere Gym"),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::NotFound(_)));
        // The principal was deleted: the same email provisions cleanly now.
        assert!(!identity.has_email("asha@example.com"));
        ProvisioningService::create_user(
            &store,
            &identity,
            &member_payload("asha@example.com", "Iron Temple"),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn missing_gym_name_for_role_is_bad_request_and_compensates() {
        let store = MemoryStore::new();
        let identity = MemoryIdentity::new();

        let err = ProvisioningService::create_user(
            &store,
            &identity,
            &json!({
                "name": "Asha",
                "role": "Owner",
                "contact_details": { "email": "asha@example.com" },
            }),
        )
        .await
        .unwrap_err();

        match err {
            ApiError::BadRequest(msg) => {
                assert_eq!(msg, "active_gym.gym_name is required when role is 'Owner'")
            }
            other => panic!("expected BadRequest, got {other:?}"),
        }
        assert!(identity.is_empty());
    }

    #[tokio::test]
    async fn duplicate_email_is_authentication_error() {
        let store = MemoryStore::new();
        let identity = MemoryIdentity::new();

        ProvisioningService::create_user(
            &store,
            &identity,
            &json!({ "name": "Asha", "contact_details": { "email": "asha@example.com" } }),
        )
        .await
        .unwrap();

        let err = ProvisioningService::create_user(
            &store,
            &identity,
            &json!({ "name": "Asha Again", "contact_details": { "email": "asha@example.com" } }),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::Authentication(_)));
        // The original principal is untouched.
        assert!(identity.has_email("asha@example.com"));
        assert_eq!(identity.len(), 1);
    }

    /// Store whose writes fail; reads delegate to an inner memory store.
    struct BrokenWrites(MemoryStore);

    #[async_trait]
    impl DocumentStore for BrokenWrites {
        async fn add(&self, collection: &str, doc: Document) -> Result<String> {
            self.0.add(collection, doc).await
        }
        async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
            self.0.get(collection, id).await
        }
        async fn set(&self, _collection: &str, _id: &str, _doc: Document) -> Result<()> {
            anyhow::bail!("store unavailable")
        }
        async fn update(&self, collection: &str, id: &str, fields: Document) -> Result<()> {
            self.0.update(collection, id, fields).await
        }
        async fn query_eq(
            &self,
            collection: &str,
            field_path: &str,
            value: &Value,
            limit: usize,
            start_after: Option<&str>,
        ) -> Result<Vec<(String, Document)>> {
            self.0
                .query_eq(collection, field_path, value, limit, start_after)
                .await
        }
    }

    #[tokio::test]
    async fn persist_failure_surfaces_internal_and_compensates() {
        let store = BrokenWrites(MemoryStore::new());
        let identity = MemoryIdentity::new();
        seed_gym(&store.0, "Iron Temple").await;

        let err = ProvisioningService::create_user(
            &store,
            &identity,
            &member_payload("asha@example.com", "Iron Temple"),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::Internal { .. }));
        assert!(identity.is_empty());
    }

    proptest! {
        #[test]
        fn prop_password_has_requested_length(len in 1usize..64) {
            prop_assert_eq!(generate_password(len).len(), len);
        }

        #[test]
        fn prop_password_stays_in_alphabet(len in 1usize..64) {
            let password = generate_password(len);
            prop_assert!(password
                .bytes()
                .all(|b| PASSWORD_CHARSET.contains(&b)));
        }
    }

    #[test]
    fn passwords_differ_across_invocations() {
        let a = generate_password(PASSWORD_LENGTH);
        let b = generate_password(PASSWORD_LENGTH);
        assert_ne!(a, b);
    }
}
