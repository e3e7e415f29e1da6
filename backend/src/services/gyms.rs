//! Gym and gym-plan services
//!
//! Validate-then-persist for the two admin write endpoints, plus the
//! by-name gym resolution used by the provisioning workflow.

use super::{collections, stamp_new, to_document};
use crate::error::ApiError;
use crate::store::DocumentStore;
use anyhow::Result;
use gym_manager_shared::models::{GymInput, GymPlanInput};
use gym_manager_shared::{parse_strict, Document};
use serde_json::{json, Value};

pub struct GymService;

impl GymService {
    /// Validate and persist a new gym; returns the generated document id.
    pub async fn add_gym(store: &dyn DocumentStore, payload: &Value) -> Result<String, ApiError> {
        let gym: GymInput = parse_strict(payload)?;
        let mut doc = to_document(&gym).map_err(|e| ApiError::internal("add gym", e))?;
        stamp_new(&mut doc);
        store
            .add(collections::GYMS, doc)
            .await
            .map_err(|e| ApiError::internal("add gym", e))
    }

    /// Validate and persist a new gym plan; returns the generated document id.
    pub async fn add_gym_plan(
        store: &dyn DocumentStore,
        payload: &Value,
    ) -> Result<String, ApiError> {
        let plan: GymPlanInput = parse_strict(payload)?;
        let mut doc = to_document(&plan).map_err(|e| ApiError::internal("add gym plans", e))?;
        stamp_new(&mut doc);
        store
            .add(collections::GYM_PLANS, doc)
            .await
            .map_err(|e| ApiError::internal("add gym plans", e))
    }

    /// Resolve a gym by exact (trimmed) name. Empty names resolve to `None`
    /// without a query; more than one match is truncated to the first.
    pub async fn find_by_name(
        store: &dyn DocumentStore,
        name: &str,
    ) -> Result<Option<(String, Document)>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        let mut matches = store
            .query_eq(collections::GYMS, "gym_name", &json!(name), 1, None)
            .await?;
        Ok(if matches.is_empty() {
            None
        } else {
            Some(matches.remove(0))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn add_gym_persists_with_timestamps() {
        let store = MemoryStore::new();
        let id = GymService::add_gym(
            &store,
            &json!({ "gym_name": "Iron Temple", "owner": "u1" }),
        )
        .await
        .unwrap();

        let doc = store.get(collections::GYMS, &id).await.unwrap().unwrap();
        assert_eq!(doc["gym_name"], json!("Iron Temple"));
        assert_eq!(doc["is_active"], json!(true));
        assert_eq!(doc["member_list"], json!([]));
        let created = doc["created_at"].as_str().unwrap();
        let updated = doc["updated_at"].as_str().unwrap();
        assert!(created <= updated);
    }

    #[tokio::test]
    async fn add_gym_rejects_invalid_payload_without_persisting() {
        let store = MemoryStore::new();
        let err = GymService::add_gym(&store, &json!({ "gym_name": "g" }))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(store.is_empty(collections::GYMS));
    }

    #[tokio::test]
    async fn add_gym_plan_applies_defaults() {
        let store = MemoryStore::new();
        let id = GymService::add_gym_plan(
            &store,
            &json!({ "gym_id": "g1", "gym_name": "Iron Temple", "plan_name": "monthly" }),
        )
        .await
        .unwrap();

        let doc = store
            .get(collections::GYM_PLANS, &id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc["plan_charges"], json!(0.0));
        assert_eq!(doc["plan_description"], json!(""));
        assert_eq!(doc["is_active"], json!(true));
    }

    #[tokio::test]
    async fn find_by_name_trims_and_matches_exactly() {
        let store = MemoryStore::new();
        GymService::add_gym(&store, &json!({ "gym_name": "Iron Temple", "owner": "u1" }))
            .await
            .unwrap();

        let found = GymService::find_by_name(&store, "  Iron Temple  ")
            .await
            .unwrap();
        assert!(found.is_some());

        // Case-sensitive, exact match only.
        assert!(GymService::find_by_name(&store, "iron temple")
            .await
            .unwrap()
            .is_none());
        assert!(GymService::find_by_name(&store, "Iron")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn find_by_name_empty_is_none_without_query() {
        let store = MemoryStore::new();
        assert!(GymService::find_by_name(&store, "   ")
            .await
            .unwrap()
            .is_none());
        assert!(GymService::find_by_name(&store, "").await.unwrap().is_none());
    }
}
