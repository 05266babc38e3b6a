//! Thin client for the hosted row store.
//!
//! The remote backend exposes plain table endpoints under `/rest/v1/`
//! with query-string filters (`user_id=eq.<id>`) and upsert via the
//! `Prefer: resolution=merge-duplicates` header. Reads fetch a user's
//! rows wholesale; writes are single-row. No retries, no batching, no
//! cross-call ordering guarantees.

use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{CoreError, RemoteError};
use crate::journal::DayEntry;
use crate::storage::RemoteConfig;

/// Wire representation of a diary row.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DiaryRow {
    user_id: String,
    date: NaiveDate,
    #[serde(default)]
    work_good: bool,
    #[serde(default)]
    day_good: bool,
    #[serde(default)]
    sleep_good: bool,
    #[serde(default)]
    tasks_done: bool,
    #[serde(default)]
    notes: String,
}

impl DiaryRow {
    fn from_entry(user_id: &str, entry: &DayEntry) -> Self {
        Self {
            user_id: user_id.to_string(),
            date: entry.date,
            work_good: entry.work_good,
            day_good: entry.day_good,
            sleep_good: entry.sleep_good,
            tasks_done: entry.tasks_done,
            notes: entry.notes.clone(),
        }
    }

    fn into_entry(self) -> DayEntry {
        DayEntry {
            date: self.date,
            work_good: self.work_good,
            day_good: self.day_good,
            sleep_good: self.sleep_good,
            tasks_done: self.tasks_done,
            notes: self.notes,
        }
    }
}

/// Wire representation of a meditation session row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteMeditationRow {
    pub user_id: String,
    pub duration_min: u64,
    pub date: NaiveDate,
}

/// Client for the hosted row store.
pub struct RemoteClient {
    base_url: Url,
    api_key: String,
    http_client: Client,
}

impl RemoteClient {
    /// Create a client for `base_url`, authenticating with `api_key`.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, RemoteError> {
        // A trailing slash keeps Url::join from clobbering the last path
        // segment of the base.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized).map_err(|e| RemoteError::InvalidBaseUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            base_url,
            api_key: api_key.to_string(),
            http_client: Client::new(),
        })
    }

    /// Build a client from configuration, failing when the remote store
    /// is disabled or unset.
    pub fn from_config(config: &RemoteConfig) -> Result<Self, RemoteError> {
        if !config.enabled || config.base_url.is_empty() {
            return Err(RemoteError::NotConfigured);
        }
        Self::new(&config.base_url, &config.api_key)
    }

    fn table_url(&self, table: &str) -> Result<Url, RemoteError> {
        self.base_url
            .join(&format!("rest/v1/{table}"))
            .map_err(|e| RemoteError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                message: e.to_string(),
            })
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp.text().await.unwrap_or_default();
        Err(RemoteError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Fetch all diary entries for a user.
    pub async fn fetch_entries(&self, user_id: &str) -> Result<Vec<DayEntry>, CoreError> {
        let resp = self
            .http_client
            .get(self.table_url("diary_entries")?)
            .query(&[
                ("user_id", format!("eq.{user_id}")),
                ("select", "*".to_string()),
            ])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(RemoteError::from)?;

        let rows: Vec<DiaryRow> = Self::check(resp)
            .await?
            .json()
            .await
            .map_err(RemoteError::from)?;
        Ok(rows.into_iter().map(DiaryRow::into_entry).collect())
    }

    /// Upsert one diary entry keyed on (user, date), replacing all fields.
    pub async fn upsert_entry(&self, user_id: &str, entry: &DayEntry) -> Result<(), CoreError> {
        let resp = self
            .http_client
            .post(self.table_url("diary_entries")?)
            .query(&[("on_conflict", "user_id,date")])
            .header("apikey", &self.api_key)
            .header("Prefer", "resolution=merge-duplicates")
            .bearer_auth(&self.api_key)
            .json(&DiaryRow::from_entry(user_id, entry))
            .send()
            .await
            .map_err(RemoteError::from)?;
        Self::check(resp).await?;
        Ok(())
    }

    /// Fetch all meditation session rows for a user.
    pub async fn fetch_meditations(
        &self,
        user_id: &str,
    ) -> Result<Vec<RemoteMeditationRow>, CoreError> {
        let resp = self
            .http_client
            .get(self.table_url("meditation_sessions")?)
            .query(&[
                ("user_id", format!("eq.{user_id}")),
                ("select", "*".to_string()),
            ])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(RemoteError::from)?;
        Ok(Self::check(resp)
            .await?
            .json()
            .await
            .map_err(RemoteError::from)?)
    }

    /// Append one completed meditation session.
    pub async fn insert_meditation(
        &self,
        user_id: &str,
        duration_min: u64,
        date: NaiveDate,
    ) -> Result<(), CoreError> {
        let resp = self
            .http_client
            .post(self.table_url("meditation_sessions")?)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .json(&RemoteMeditationRow {
                user_id: user_id.to_string(),
                duration_min,
                date,
            })
            .send()
            .await
            .map_err(RemoteError::from)?;
        Self::check(resp).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn disabled_config_is_rejected() {
        let config = RemoteConfig::default();
        assert!(matches!(
            RemoteClient::from_config(&config),
            Err(RemoteError::NotConfigured)
        ));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            RemoteClient::new("not a url", "key"),
            Err(RemoteError::InvalidBaseUrl { .. })
        ));
    }

    #[tokio::test]
    async fn fetch_entries_parses_rows() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/diary_entries")
            .match_query(Matcher::UrlEncoded("user_id".into(), "eq.u1".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"user_id":"u1","date":"2026-03-05","work_good":true,
                     "day_good":false,"sleep_good":false,"tasks_done":false,
                     "notes":""}]"#,
            )
            .create_async()
            .await;

        let client = RemoteClient::new(&server.url(), "test-key").unwrap();
        let entries = client.fetch_entries("u1").await.unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].date, date(2026, 3, 5));
        assert!(entries[0].work_good);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_entries_surfaces_api_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/v1/diary_entries")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body("unauthorized")
            .create_async()
            .await;

        let client = RemoteClient::new(&server.url(), "bad-key").unwrap();
        let err = client.fetch_entries("u1").await.unwrap_err();
        match err {
            CoreError::Remote(RemoteError::Api { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "unauthorized");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn upsert_sends_merge_duplicates_preference() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/rest/v1/diary_entries")
            .match_query(Matcher::UrlEncoded(
                "on_conflict".into(),
                "user_id,date".into(),
            ))
            .match_header("Prefer", "resolution=merge-duplicates")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "user_id": "u1",
                "date": "2026-03-05",
                "work_good": true,
            })))
            .with_status(201)
            .create_async()
            .await;

        let client = RemoteClient::new(&server.url(), "test-key").unwrap();
        let entry = DayEntry {
            work_good: true,
            ..DayEntry::empty(date(2026, 3, 5))
        };
        client.upsert_entry("u1", &entry).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn insert_meditation_posts_the_row() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/rest/v1/meditation_sessions")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "user_id": "u1",
                "duration_min": 10,
                "date": "2026-03-05",
            })))
            .with_status(201)
            .create_async()
            .await;

        let client = RemoteClient::new(&server.url(), "test-key").unwrap();
        client
            .insert_meditation("u1", 10, date(2026, 3, 5))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_meditations_parses_rows() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/v1/meditation_sessions")
            .match_query(Matcher::UrlEncoded("user_id".into(), "eq.u1".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"user_id":"u1","duration_min":15,"date":"2026-04-10"}]"#)
            .create_async()
            .await;

        let client = RemoteClient::new(&server.url(), "test-key").unwrap();
        let rows = client.fetch_meditations("u1").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].duration_min, 15);
        assert_eq!(rows[0].date, date(2026, 4, 10));
    }
}
