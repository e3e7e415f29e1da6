//! Firestore REST implementation of the document-store gateway
//!
//! Speaks the Firestore v1 document API: `createDocument` for inserts,
//! `patch` (with an update mask for merge-sets), and `:runQuery` with a
//! structured query ordered by `__name__` for equality queries and cursor
//! pagination. Stored values go through a small codec between plain JSON
//! and Firestore's typed value objects.

use super::DocumentStore;
use crate::gcp::TokenProvider;
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use gym_manager_shared::Document;
use reqwest::StatusCode;
use serde_json::{json, Map, Value};

pub struct FirestoreStore {
    http: reqwest::Client,
    base_url: String,
    project_id: String,
    tokens: TokenProvider,
}

impl FirestoreStore {
    pub fn new(base_url: &str, project_id: &str, tokens: TokenProvider) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            tokens,
        }
    }

    /// Resource parent shared by all document paths.
    fn parent(&self) -> String {
        format!(
            "projects/{}/databases/(default)/documents",
            self.project_id
        )
    }

    fn doc_name(&self, collection: &str, id: &str) -> String {
        format!("{}/{collection}/{id}", self.parent())
    }

    async fn authorize(&self, request: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder> {
        Ok(match self.tokens.token().await? {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn add(&self, collection: &str, doc: Document) -> Result<String> {
        let url = format!("{}/v1/{}/{collection}", self.base_url, self.parent());
        let request = self
            .http
            .post(&url)
            .json(&json!({ "fields": encode_fields(&doc) }));
        let response = self.authorize(request).await?.send().await?;
        if !response.status().is_success() {
            bail!(
                "firestore create in {collection} failed: {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            );
        }
        let body: Value = response.json().await.context("malformed create response")?;
        let name = body["name"]
            .as_str()
            .ok_or_else(|| anyhow!("create response missing document name"))?;
        let id = name
            .rsplit('/')
            .next()
            .ok_or_else(|| anyhow!("unparseable document name {name}"))?;
        Ok(id.to_string())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let url = format!("{}/v1/{}", self.base_url, self.doc_name(collection, id));
        let request = self.http.get(&url);
        let response = self.authorize(request).await?.send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            bail!(
                "firestore get {collection}/{id} failed: {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            );
        }
        let body: Value = response.json().await.context("malformed document")?;
        Ok(Some(decode_fields(&body)))
    }

    async fn set(&self, collection: &str, id: &str, doc: Document) -> Result<()> {
        let url = format!("{}/v1/{}", self.base_url, self.doc_name(collection, id));
        let request = self
            .http
            .patch(&url)
            .json(&json!({ "fields": encode_fields(&doc) }));
        let response = self.authorize(request).await?.send().await?;
        if !response.status().is_success() {
            bail!(
                "firestore set {collection}/{id} failed: {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            );
        }
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: Document) -> Result<()> {
        let url = format!("{}/v1/{}", self.base_url, self.doc_name(collection, id));
        // The update mask limits the patch to the named fields; everything
        // else on the document is left untouched.
        let mask: Vec<(&str, String)> = fields
            .keys()
            .map(|key| ("updateMask.fieldPaths", key.clone()))
            .collect();
        let request = self
            .http
            .patch(&url)
            .query(&mask)
            .json(&json!({ "fields": encode_fields(&fields) }));
        let response = self.authorize(request).await?.send().await?;
        if !response.status().is_success() {
            bail!(
                "firestore update {collection}/{id} failed: {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            );
        }
        Ok(())
    }

    async fn query_eq(
        &self,
        collection: &str,
        field_path: &str,
        value: &Value,
        limit: usize,
        start_after: Option<&str>,
    ) -> Result<Vec<(String, Document)>> {
        let mut structured = json!({
            "from": [{ "collectionId": collection }],
            "where": {
                "fieldFilter": {
                    "field": { "fieldPath": field_path },
                    "op": "EQUAL",
                    "value": encode_value(value),
                }
            },
            "orderBy": [{ "field": { "fieldPath": "__name__" }, "direction": "ASCENDING" }],
            "limit": limit,
        });
        if let Some(cursor) = start_after {
            // A cursor on __name__ is the prior document's full resource
            // name; before=false continues strictly after it.
            structured["startAt"] = json!({
                "values": [{ "referenceValue": self.doc_name(collection, cursor) }],
                "before": false,
            });
        }

        let url = format!("{}/v1/{}:runQuery", self.base_url, self.parent());
        let request = self
            .http
            .post(&url)
            .json(&json!({ "structuredQuery": structured }));
        let response = self.authorize(request).await?.send().await?;
        if !response.status().is_success() {
            bail!(
                "firestore query on {collection} failed: {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            );
        }

        let entries: Vec<Value> = response.json().await.context("malformed query response")?;
        let mut results = Vec::new();
        for entry in &entries {
            let Some(document) = entry.get("document") else {
                // Progress/readTime entries carry no document.
                continue;
            };
            let name = document["name"]
                .as_str()
                .ok_or_else(|| anyhow!("query result missing document name"))?;
            let id = name
                .rsplit('/')
                .next()
                .ok_or_else(|| anyhow!("unparseable document name {name}"))?;
            results.push((id.to_string(), decode_fields(document)));
        }
        Ok(results)
    }
}

/// Encode a plain JSON value as a Firestore typed value.
fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                json!({ "integerValue": i.to_string() })
            } else {
                json!({ "doubleValue": n.as_f64() })
            }
        }
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() }
        }),
        Value::Object(map) => {
            let fields: Map<String, Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), encode_value(v)))
                .collect();
            json!({ "mapValue": { "fields": fields } })
        }
    }
}

fn encode_fields(doc: &Document) -> Map<String, Value> {
    doc.iter()
        .map(|(k, v)| (k.clone(), encode_value(v)))
        .collect()
}

/// Decode a Firestore typed value back to plain JSON. Timestamps and
/// references decode to their string forms.
fn decode_value(value: &Value) -> Value {
    let Some(map) = value.as_object() else {
        return Value::Null;
    };
    if let Some((kind, inner)) = map.iter().next() {
        match kind.as_str() {
            "nullValue" => Value::Null,
            "booleanValue" => inner.clone(),
            "integerValue" => inner
                .as_str()
                .and_then(|s| s.parse::<i64>().ok())
                .map(Value::from)
                .unwrap_or(Value::Null),
            "doubleValue" => inner.clone(),
            "stringValue" | "timestampValue" | "referenceValue" => inner.clone(),
            "arrayValue" => {
                let items = inner
                    .get("values")
                    .and_then(Value::as_array)
                    .map(|values| values.iter().map(decode_value).collect())
                    .unwrap_or_default();
                Value::Array(items)
            }
            "mapValue" => {
                let fields = inner
                    .get("fields")
                    .and_then(Value::as_object)
                    .map(|fields| {
                        fields
                            .iter()
                            .map(|(k, v)| (k.clone(), decode_value(v)))
                            .collect()
                    })
                    .unwrap_or_default();
                Value::Object(fields)
            }
            _ => Value::Null,
        }
    } else {
        Value::Null
    }
}

fn decode_fields(document: &Value) -> Document {
    document
        .get("fields")
        .and_then(Value::as_object)
        .map(|fields| {
            fields
                .iter()
                .map(|(k, v)| (k.clone(), decode_value(v)))
                .collect()
        })
        .unwrap_or_default()
}
