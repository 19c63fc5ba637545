//! Cloud Firestore REST client
//!
//! Talks to the Firestore v1 REST API. Notes live in a single collection;
//! each document carries `message`, `name`, `location`, `category`, `likes`,
//! `featured` and a server-assigned `timestamp`.
//!
//! Writes go through `documents:commit` so the server can stamp the
//! creation time and apply the atomic like increment. Pages come from
//! `documents:runQuery`.

use super::{DocumentStore, NoteQuery, StoreError, StoreResult};
use crate::note::{categorize, Category, NewNote, Note};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;

/// Configuration for the Firestore client
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    /// REST endpoint root (e.g., "https://firestore.googleapis.com/v1")
    pub base_url: String,
    /// Google Cloud project id
    pub project_id: String,
    /// Database id, "(default)" unless the project uses named databases
    pub database: String,
    /// Web API key, sent as the `key` query parameter
    pub api_key: Option<String>,
    /// Collection holding the notes
    pub collection: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        Self {
            base_url: "https://firestore.googleapis.com/v1".to_string(),
            project_id: String::new(),
            database: "(default)".to_string(),
            api_key: None,
            collection: "thankyous".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

/// Document store backed by a Firestore collection
pub struct FirestoreStore {
    client: Client,
    config: FirestoreConfig,
}

impl FirestoreStore {
    /// Create a new client.
    ///
    /// Fails with [`StoreError::Unconfigured`] when no project id is set.
    pub fn new(config: FirestoreConfig) -> StoreResult<Self> {
        if config.project_id.trim().is_empty() {
            return Err(StoreError::Unconfigured);
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &FirestoreConfig {
        &self.config
    }

    /// Resource path of the documents root, as used inside request bodies
    fn documents_root(&self) -> String {
        format!(
            "projects/{}/databases/{}/documents",
            self.config.project_id, self.config.database
        )
    }

    /// Full resource name of a note document
    fn document_name(&self, id: &str) -> String {
        format!("{}/{}/{}", self.documents_root(), self.config.collection, id)
    }

    /// URL of a documents-level RPC such as `commit` or `runQuery`
    fn rpc_url(&self, method: &str) -> String {
        format!(
            "{}/projects/{}/databases/{}/documents:{}",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(&self.config.project_id),
            self.config.database,
            method
        )
    }

    /// POST a JSON body to an RPC and return the successful response
    async fn post(&self, method: &str, body: &Value) -> StoreResult<Response> {
        let mut request = self.client.post(self.rpc_url(method)).json(body);
        if let Some(key) = &self.config.api_key {
            request = request.query(&[("key", key)]);
        }

        let response = request.send().await?;
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            Err(map_error_response(status, &text))
        }
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    fn name(&self) -> &str {
        "firestore"
    }

    async fn create_note(&self, note: NewNote) -> StoreResult<Note> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let body = create_body(&self.document_name(&id), &note);

        tracing::debug!(collection = %self.config.collection, id = %id, "Creating note");
        let response: CommitResponse = self.post("commit", &body).await?.json().await?;

        let created_at = response
            .server_timestamp()
            .unwrap_or_else(Utc::now);
        Ok(note.into_note(id, created_at))
    }

    async fn query_notes(&self, query: &NoteQuery) -> StoreResult<Vec<Note>> {
        let body = query_body(&self.config.collection, &self.documents_root(), query);

        let items: Vec<RunQueryItem> = self.post("runQuery", &body).await?.json().await?;

        items
            .into_iter()
            .filter_map(|item| item.document)
            .map(|doc| decode_document(&doc))
            .collect()
    }

    async fn increment_likes(&self, id: &str) -> StoreResult<()> {
        let body = increment_body(&self.document_name(id));
        self.post("commit", &body).await?;
        Ok(())
    }
}

// ============================================
// Request bodies
// ============================================

fn string_value(s: &str) -> Value {
    json!({ "stringValue": s })
}

fn timestamp_value(ts: DateTime<Utc>) -> Value {
    json!({ "timestampValue": ts.to_rfc3339_opts(SecondsFormat::Micros, true) })
}

/// Commit body creating a note with a server-stamped `timestamp`
fn create_body(document_name: &str, note: &NewNote) -> Value {
    let location = match &note.location {
        Some(location) => string_value(location),
        None => json!({ "nullValue": null }),
    };

    json!({
        "writes": [{
            "update": {
                "name": document_name,
                "fields": {
                    "message": string_value(&note.message),
                    "name": string_value(&note.name),
                    "location": location,
                    "category": string_value(note.category.label()),
                    "likes": { "integerValue": "0" },
                    "featured": { "booleanValue": false },
                },
            },
            "updateTransforms": [{
                "fieldPath": "timestamp",
                "setToServerValue": "REQUEST_TIME",
            }],
            "currentDocument": { "exists": false },
        }]
    })
}

/// Commit body adding one to `likes` on an existing document
fn increment_body(document_name: &str) -> Value {
    json!({
        "writes": [{
            "transform": {
                "document": document_name,
                "fieldTransforms": [{
                    "fieldPath": "likes",
                    "increment": { "integerValue": "1" },
                }],
            },
            "currentDocument": { "exists": true },
        }]
    })
}

/// runQuery body for one page, newest first
fn query_body(collection: &str, documents_root: &str, query: &NoteQuery) -> Value {
    let mut structured = Map::new();
    structured.insert("from".into(), json!([{ "collectionId": collection }]));

    if let Some(category) = query.category {
        structured.insert(
            "where".into(),
            json!({
                "fieldFilter": {
                    "field": { "fieldPath": "category" },
                    "op": "EQUAL",
                    "value": string_value(category.label()),
                }
            }),
        );
    }

    // __name__ breaks timestamp ties so the cursor is unambiguous
    structured.insert(
        "orderBy".into(),
        json!([
            { "field": { "fieldPath": "timestamp" }, "direction": "DESCENDING" },
            { "field": { "fieldPath": "__name__" }, "direction": "DESCENDING" },
        ]),
    );

    if let Some(cursor) = &query.start_after {
        let reference = format!("{}/{}/{}", documents_root, collection, cursor.id);
        structured.insert(
            "startAt".into(),
            json!({
                "values": [timestamp_value(cursor.created_at), { "referenceValue": reference }],
                "before": false,
            }),
        );
    }

    structured.insert("limit".into(), json!(query.limit));

    json!({ "structuredQuery": structured })
}

// ============================================
// Response decoding
// ============================================

#[derive(Debug, Deserialize)]
struct RunQueryItem {
    #[serde(default)]
    document: Option<Document>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    name: String,
    #[serde(default)]
    fields: HashMap<String, Value>,
    #[serde(default)]
    create_time: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitResponse {
    #[serde(default)]
    write_results: Vec<WriteResult>,
    #[serde(default)]
    commit_time: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WriteResult {
    #[serde(default)]
    transform_results: Vec<Value>,
}

impl CommitResponse {
    /// The `REQUEST_TIME` transform result, or the commit time
    fn server_timestamp(&self) -> Option<DateTime<Utc>> {
        self.write_results
            .iter()
            .flat_map(|r| r.transform_results.iter())
            .find_map(|v| v.get("timestampValue").and_then(Value::as_str))
            .or(self.commit_time.as_deref())
            .and_then(parse_timestamp)
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn field_str<'a>(fields: &'a HashMap<String, Value>, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .and_then(|v| v.get("stringValue"))
        .and_then(Value::as_str)
}

/// Convert a Firestore document into a note
fn decode_document(doc: &Document) -> StoreResult<Note> {
    let id = doc
        .name
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| StoreError::Decode(format!("Invalid document name: {}", doc.name)))?
        .to_string();

    let message = field_str(&doc.fields, "message").unwrap_or_default().to_string();

    let category = match field_str(&doc.fields, "category") {
        Some(label) => label.parse::<Category>().unwrap_or_else(|_| {
            tracing::warn!(id = %id, category = label, "Unknown category, recategorizing");
            categorize(&message)
        }),
        None => categorize(&message),
    };

    // integerValue is a decimal string in the REST encoding
    let likes = doc
        .fields
        .get("likes")
        .and_then(|v| v.get("integerValue"))
        .and_then(|v| match v {
            Value::String(s) => s.parse::<u64>().ok(),
            other => other.as_u64(),
        })
        .unwrap_or(0);

    let featured = doc
        .fields
        .get("featured")
        .and_then(|v| v.get("booleanValue"))
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let created_at = doc
        .fields
        .get("timestamp")
        .and_then(|v| v.get("timestampValue"))
        .and_then(Value::as_str)
        .or(doc.create_time.as_deref())
        .and_then(parse_timestamp)
        .ok_or_else(|| StoreError::Decode(format!("Document {} has no timestamp", id)))?;

    Ok(Note {
        id,
        message,
        name: field_str(&doc.fields, "name")
            .filter(|n| !n.is_empty())
            .unwrap_or(crate::note::ANONYMOUS)
            .to_string(),
        location: field_str(&doc.fields, "location")
            .filter(|l| !l.is_empty())
            .map(str::to_string),
        category,
        likes,
        featured,
        created_at,
    })
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorStatus,
}

#[derive(Debug, Deserialize)]
struct ErrorStatus {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// Map an error response to a [`StoreError`].
///
/// runQuery reports errors as a one-element array, other RPCs as an object.
fn map_error_response(http_status: u16, body: &str) -> StoreError {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok().or_else(|| {
        serde_json::from_str::<Vec<ErrorEnvelope>>(body)
            .ok()
            .and_then(|v| v.into_iter().next())
    });

    let (status, message) = match parsed {
        Some(envelope) => (envelope.error.status, envelope.error.message),
        None => (String::new(), body.to_string()),
    };

    match (status.as_str(), http_status) {
        ("PERMISSION_DENIED", _) | ("UNAUTHENTICATED", _) | (_, 401) | (_, 403) => {
            StoreError::PermissionDenied(message)
        }
        ("NOT_FOUND", _) | (_, 404) => StoreError::NotFound(message),
        ("UNAVAILABLE", _) | (_, 503) => StoreError::Unavailable,
        ("DEADLINE_EXCEEDED", _) | (_, 504) => StoreError::Timeout,
        _ => StoreError::Api {
            status: http_status,
            message,
        },
    }
}
