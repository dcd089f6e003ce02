//! HTTP client for the remote request queue

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use super::types::QueueItem;

const UNTITLED: &str = "Untitled";

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("queue request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API responded with status {0}")]
    Status(StatusCode),
    #[error("unexpected queue payload shape")]
    UnexpectedShape,
}

/// Client for `GET {base}/queue`
#[derive(Clone)]
pub struct QueueClient {
    http: reqwest::Client,
    base_url: String,
}

impl QueueClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn queue_url(&self) -> String {
        format!("{}/queue", self.base_url)
    }

    pub async fn fetch_queue(&self, access_token: &str) -> Result<Vec<QueueItem>, QueueError> {
        let url = self.queue_url();
        tracing::debug!(url = %url, "Fetching request queue");

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(QueueError::Status(status));
        }

        let payload: Value = response.json().await?;
        parse_queue_payload(&payload)
    }
}

/// Map an API payload into queue items.
///
/// `items` must be an array; each entry is mapped leniently since the API
/// has used several field spellings over time.
pub fn parse_queue_payload(payload: &Value) -> Result<Vec<QueueItem>, QueueError> {
    let entries = payload
        .get("items")
        .and_then(Value::as_array)
        .ok_or(QueueError::UnexpectedShape)?;

    let mut items: Vec<QueueItem> = Vec::with_capacity(entries.len());
    for entry in entries {
        let item = map_entry(entry);
        if items.iter().any(|existing| existing.id == item.id) {
            tracing::warn!(id = %item.id, "Dropping duplicate queue entry");
            continue;
        }
        items.push(item);
    }

    Ok(items)
}

fn map_entry(entry: &Value) -> QueueItem {
    let id = field_string(entry, "id")
        .or_else(|| field_string(entry, "videoId"))
        .or_else(|| field_string(entry, "youtubeId"))
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let video_id = field_string(entry, "videoId")
        .or_else(|| field_string(entry, "youtubeId"))
        .or_else(|| field_string(entry, "id"))
        .unwrap_or_default();

    QueueItem {
        id,
        title: field_string(entry, "title").unwrap_or_else(|| UNTITLED.to_string()),
        video_id,
        requested_by: field_string(entry, "requestedBy").or_else(|| field_string(entry, "user")),
        duration: entry.get("duration").and_then(Value::as_f64),
    }
}

/// Read a field as a string; `null` and missing both count as absent
fn field_string(entry: &Value, key: &str) -> Option<String> {
    match entry.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn maps_entries_with_fallback_fields() {
        let payload = json!({
            "items": [
                {"id": 7, "title": "First", "videoId": "abc", "requestedBy": "viewer1", "duration": 245},
                {"youtubeId": "xyz", "user": "viewer2"},
                {"videoId": "def", "title": null}
            ]
        });

        let items = parse_queue_payload(&payload).unwrap();
        assert_eq!(items.len(), 3);

        assert_eq!(items[0].id, "7");
        assert_eq!(items[0].title, "First");
        assert_eq!(items[0].video_id, "abc");
        assert_eq!(items[0].requested_by.as_deref(), Some("viewer1"));
        assert_eq!(items[0].duration, Some(245.0));

        assert_eq!(items[1].id, "xyz");
        assert_eq!(items[1].video_id, "xyz");
        assert_eq!(items[1].title, "Untitled");
        assert_eq!(items[1].requested_by.as_deref(), Some("viewer2"));
        assert_eq!(items[1].duration, None);

        assert_eq!(items[2].id, "def");
        assert_eq!(items[2].title, "Untitled");
    }

    #[test]
    fn entry_without_any_id_gets_generated_one() {
        let payload = json!({"items": [{"title": "Mystery"}, {"title": "Mystery"}]});
        let items = parse_queue_payload(&payload).unwrap();

        assert_eq!(items.len(), 2);
        assert_ne!(items[0].id, items[1].id);
        assert!(uuid::Uuid::parse_str(&items[0].id).is_ok());
        assert_eq!(items[0].video_id, "");
    }

    #[test]
    fn duplicate_ids_keep_first_entry() {
        let payload = json!({"items": [
            {"id": "a", "title": "One"},
            {"id": "a", "title": "Two"},
            {"id": "b", "title": "Three"}
        ]});
        let items = parse_queue_payload(&payload).unwrap();

        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Three"]);
    }

    #[test]
    fn non_array_items_is_rejected() {
        for payload in [json!({"items": "not-an-array"}), json!({}), json!([1, 2])] {
            assert!(matches!(
                parse_queue_payload(&payload),
                Err(QueueError::UnexpectedShape)
            ));
        }
    }

    #[tokio::test]
    async fn fetch_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/queue"))
            .and(header("Authorization", "Bearer secret-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"id": "a", "title": "Song A", "videoId": "vid-a"}]
            })))
            .mount(&server)
            .await;

        let client = QueueClient::new(format!("{}/", server.uri()));
        let items = client.fetch_queue("secret-token").await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].video_id, "vid-a");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/queue"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = QueueClient::new(server.uri());
        let err = client.fetch_queue("expired").await.unwrap_err();

        assert!(matches!(err, QueueError::Status(s) if s == StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/queue"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": "not-an-array"})))
            .mount(&server)
            .await;

        let client = QueueClient::new(server.uri());
        let err = client.fetch_queue("token").await.unwrap_err();

        assert!(matches!(err, QueueError::UnexpectedShape));
    }
}
