//! Usage analytics: an append-only `events` table in SQLite.
//!
//! Recording is fire-and-forget from the caller's point of view: a failed
//! insert is logged and swallowed so it can never fail a user request.

pub mod handlers;

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, warn};

use crate::llm_client::Usage;

const RECENT_LIMIT: usize = 20;
const UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    ResumeGenerated,
    ResumeRendered,
    CoverLetterGenerated,
    OutreachGenerated,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::ResumeGenerated => "resume_generated",
            EventType::ResumeRendered => "resume_rendered",
            EventType::CoverLetterGenerated => "cover_letter_generated",
            EventType::OutreachGenerated => "outreach_generated",
        }
    }
}

#[derive(Debug, Clone, FromRow)]
struct EventRow {
    id: i64,
    event_type: String,
    timestamp: String,
    details: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentEvent {
    pub id: i64,
    pub event_type: String,
    pub timestamp: String,
    pub details: Value,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalyticsSummary {
    pub total_resumes: i64,
    pub total_cover_letters: i64,
    pub total_tokens_input: u64,
    pub total_tokens_output: u64,
    pub region_distribution: BTreeMap<String, u64>,
    pub theme_distribution: BTreeMap<String, u64>,
    pub recent_activity: Vec<RecentEvent>,
}

/// Token counts in the shape stored in event details.
pub fn usage_details(usage: Usage) -> serde_json::Map<String, Value> {
    let mut details = serde_json::Map::new();
    details.insert("tokens_input".to_string(), Value::from(usage.input_tokens));
    details.insert("tokens_output".to_string(), Value::from(usage.output_tokens));
    details
}

#[derive(Clone)]
pub struct AnalyticsStore {
    pool: SqlitePool,
}

impl AnalyticsStore {
    /// Wraps the pool and makes sure the `events` table exists.
    pub async fn open(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                event_type TEXT NOT NULL,
                timestamp DATETIME DEFAULT CURRENT_TIMESTAMP,
                details TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Inserts one event. Errors are logged, never returned.
    pub async fn record(&self, event: EventType, details: serde_json::Map<String, Value>) {
        let details = Value::Object(details).to_string();
        let result = sqlx::query("INSERT INTO events (event_type, details) VALUES (?, ?)")
            .bind(event.as_str())
            .bind(&details)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => debug!("Recorded analytics event {}", event.as_str()),
            Err(e) => warn!("Failed to record analytics event {}: {e}", event.as_str()),
        }
    }

    pub async fn summary(&self) -> Result<AnalyticsSummary, sqlx::Error> {
        let rows: Vec<EventRow> = sqlx::query_as(
            "SELECT id, event_type, CAST(timestamp AS TEXT) AS timestamp, details \
             FROM events ORDER BY timestamp DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut summary = AnalyticsSummary::default();

        for row in &rows {
            let details = parse_details(row.details.as_deref());

            summary.total_tokens_input += token_count(&details, "tokens_input");
            summary.total_tokens_output += token_count(&details, "tokens_output");

            match row.event_type.as_str() {
                "resume_generated" => {
                    summary.total_resumes += 1;
                    *summary
                        .region_distribution
                        .entry(label(&details, "target_region"))
                        .or_default() += 1;
                }
                "resume_rendered" => {
                    *summary
                        .theme_distribution
                        .entry(label(&details, "theme"))
                        .or_default() += 1;
                }
                "cover_letter_generated" => summary.total_cover_letters += 1,
                _ => {}
            }
        }

        summary.recent_activity = rows
            .into_iter()
            .take(RECENT_LIMIT)
            .map(|row| RecentEvent {
                details: parse_details(row.details.as_deref()),
                id: row.id,
                event_type: row.event_type,
                timestamp: row.timestamp,
            })
            .collect();

        Ok(summary)
    }
}

fn parse_details(raw: Option<&str>) -> Value {
    raw.and_then(|text| serde_json::from_str(text).ok())
        .unwrap_or(Value::Null)
}

fn token_count(details: &Value, key: &str) -> u64 {
    details.get(key).and_then(Value::as_u64).unwrap_or(0)
}

fn label(details: &Value, key: &str) -> String {
    details
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN)
        .to_string()
}
