//! Firestore document store over the REST API
//!
//! Records are kept in one collection, keyed by article id. `set` issues a
//! PATCH with no update mask, which Firestore treats as a full overwrite, so
//! re-ingestion replaces the whole record in one write.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::auth::GcpAuth;
use crate::error::{Error, Result};
use crate::providers::document_store::DocumentStore;
use crate::types::ArticleRecord;

const FIRESTORE_BASE: &str = "https://firestore.googleapis.com/v1";

/// Firestore-backed article record store
pub struct FirestoreStore {
    auth: GcpAuth,
    collection: String,
}

impl FirestoreStore {
    /// Create a store over one collection
    pub fn new(auth: GcpAuth, collection: impl Into<String>) -> Self {
        Self {
            auth,
            collection: collection.into(),
        }
    }

    fn document_url(&self, id: &str) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents/{}/{}",
            FIRESTORE_BASE,
            self.auth.project_id(),
            self.collection,
            id
        )
    }
}

#[derive(Deserialize)]
struct FirestoreDocument {
    #[serde(default)]
    fields: Map<String, Value>,
}

/// Encode a plain JSON value into Firestore's typed value wrapper
fn encode_value(value: &Value) -> Result<Value> {
    let encoded = match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                // Firestore carries integers as strings on the wire
                json!({ "integerValue": i.to_string() })
            } else if let Some(f) = n.as_f64() {
                json!({ "doubleValue": f })
            } else {
                return Err(Error::DocumentStore(format!(
                    "Unencodable number: {}",
                    n
                )));
            }
        }
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Result<Vec<Value>> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values? } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map)? } }),
    };
    Ok(encoded)
}

fn encode_fields(map: &Map<String, Value>) -> Result<Map<String, Value>> {
    let mut fields = Map::new();
    for (key, value) in map {
        fields.insert(key.clone(), encode_value(value)?);
    }
    Ok(fields)
}

/// Decode Firestore's typed value wrapper back into plain JSON
fn decode_value(value: &Value) -> Result<Value> {
    let wrapper = value
        .as_object()
        .ok_or_else(|| Error::DocumentStore("Malformed Firestore value".to_string()))?;

    if let Some(s) = wrapper.get("stringValue").and_then(Value::as_str) {
        return Ok(Value::String(s.to_string()));
    }
    if let Some(b) = wrapper.get("booleanValue").and_then(Value::as_bool) {
        return Ok(Value::Bool(b));
    }
    if let Some(raw) = wrapper.get("integerValue").and_then(Value::as_str) {
        let i: i64 = raw
            .parse()
            .map_err(|_| Error::DocumentStore(format!("Bad integerValue: {}", raw)))?;
        return Ok(Value::from(i));
    }
    if let Some(f) = wrapper.get("doubleValue").and_then(Value::as_f64) {
        return Ok(json!(f));
    }
    if wrapper.contains_key("nullValue") {
        return Ok(Value::Null);
    }
    if let Some(array) = wrapper.get("arrayValue") {
        let items = array
            .get("values")
            .and_then(Value::as_array)
            .map(|values| values.iter().map(decode_value).collect::<Result<Vec<_>>>())
            .transpose()?
            .unwrap_or_default();
        return Ok(Value::Array(items));
    }
    if let Some(map) = wrapper.get("mapValue") {
        let fields = map
            .get("fields")
            .and_then(Value::as_object)
            .map(decode_fields)
            .transpose()?
            .unwrap_or_default();
        return Ok(Value::Object(fields));
    }

    Err(Error::DocumentStore(format!(
        "Unsupported Firestore value kind: {}",
        value
    )))
}

fn decode_fields(fields: &Map<String, Value>) -> Result<Map<String, Value>> {
    let mut map = Map::new();
    for (key, value) in fields {
        map.insert(key.clone(), decode_value(value)?);
    }
    Ok(map)
}

fn record_to_fields(record: &ArticleRecord) -> Result<Map<String, Value>> {
    let value = serde_json::to_value(record)?;
    match value {
        Value::Object(map) => encode_fields(&map),
        _ => Err(Error::DocumentStore(
            "Record did not serialize to an object".to_string(),
        )),
    }
}

fn record_from_fields(fields: &Map<String, Value>) -> Result<ArticleRecord> {
    let map = decode_fields(fields)?;
    let record = serde_json::from_value(Value::Object(map))?;
    Ok(record)
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn get(&self, id: &str) -> Result<Option<ArticleRecord>> {
        let client = self.auth.authorized_client().await?;

        let response = client
            .get(self.document_url(id))
            .send()
            .await
            .map_err(|e| Error::DocumentStore(format!("Firestore get failed: {}", e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::DocumentStore(format!(
                "Firestore get failed ({}): {}",
                status, body
            )));
        }

        let document: FirestoreDocument = response
            .json()
            .await
            .map_err(|e| Error::DocumentStore(format!("Failed to parse Firestore doc: {}", e)))?;

        record_from_fields(&document.fields).map(Some)
    }

    async fn set(&self, id: &str, record: &ArticleRecord) -> Result<()> {
        let client = self.auth.authorized_client().await?;
        let body = json!({ "fields": record_to_fields(record)? });

        let response = client
            .patch(self.document_url(id))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::DocumentStore(format!("Firestore set failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::DocumentStore(format!(
                "Firestore set failed ({}): {}",
                status, body
            )));
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "firestore"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ApiEntity, EntityMention, StructuredExtraction};

    fn sample_record() -> ArticleRecord {
        ArticleRecord {
            reference_summary: "A ferry service resumed.".to_string(),
            gemini_summary: "Ferry crossings restarted after a week of storms.".to_string(),
            textrank_summary: "The ferry resumed on Monday.".to_string(),
            vertex_ai_extraction: StructuredExtraction {
                main_event_or_topic: "Ferry service resumption".to_string(),
                key_locations: vec!["Stornoway".to_string()],
                quantitative_information: vec!["7 days".to_string()],
                ..Default::default()
            },
            nl_api_entities: vec![ApiEntity {
                name: "Stornoway".to_string(),
                entity_type: "LOCATION".to_string(),
                salience: 0.61,
                wikipedia_url: Some("https://en.wikipedia.org/wiki/Stornoway".to_string()),
            }],
            spacy_entities: vec![EntityMention {
                text: "Monday".to_string(),
                label: "DATE".to_string(),
            }],
            gcs_uri: "gs://news-bucket/xsum/train.jsonl".to_string(),
        }
    }

    #[test]
    fn record_round_trips_through_firestore_encoding() {
        let record = sample_record();
        let fields = record_to_fields(&record).unwrap();
        let decoded = record_from_fields(&fields).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn strings_use_string_value() {
        let fields = record_to_fields(&sample_record()).unwrap();
        assert_eq!(
            fields["gemini_summary"]["stringValue"],
            json!("Ferry crossings restarted after a week of storms.")
        );
    }

    #[test]
    fn entity_lists_encode_as_array_of_maps() {
        let fields = record_to_fields(&sample_record()).unwrap();
        let first = &fields["nl_api_entities"]["arrayValue"]["values"][0];
        assert_eq!(
            first["mapValue"]["fields"]["name"]["stringValue"],
            json!("Stornoway")
        );
        assert_eq!(
            first["mapValue"]["fields"]["salience"]["doubleValue"],
            json!(0.61)
        );
    }

    #[test]
    fn integer_values_decode_from_wire_strings() {
        let decoded = decode_value(&json!({ "integerValue": "42" })).unwrap();
        assert_eq!(decoded, json!(42));
    }

    #[test]
    fn unknown_value_kind_is_an_error() {
        let result = decode_value(&json!({ "timestampValue": "2024-01-01T00:00:00Z" }));
        assert!(result.is_err());
    }
}
