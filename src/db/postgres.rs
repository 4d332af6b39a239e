//! PostgreSQL-backed content store

use super::{queries, ContentSession, ContentStore};
use crate::entity::Entity;
use crate::error::{ApiResult, AppError};
use crate::models::{ContentUpdate, NewContent, Record};
use async_trait::async_trait;
use deadpool_postgres::{Client, Pool};
use tokio_postgres::Row;
use tracing::debug;

pub struct PgContentStore {
    pool: Pool,
}

impl PgContentStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn session(&self) -> ApiResult<Box<dyn ContentSession>> {
        let client = self.pool.get().await?;
        debug!("Acquired database connection");
        Ok(Box::new(PgSession { client }))
    }
}

/// Pooled connection; returns to the pool on drop
struct PgSession {
    client: Client,
}

impl Drop for PgSession {
    fn drop(&mut self) {
        debug!("Released database connection");
    }
}

#[async_trait]
impl ContentSession for PgSession {
    async fn list(&self, entity: Entity, limit: Option<i64>) -> ApiResult<Vec<Record>> {
        let rows = self.client.query(queries::list(entity), &[&limit]).await?;
        debug!("Fetched {} rows from {}", rows.len(), entity);
        rows.iter().map(decode_row).collect()
    }

    async fn insert(&self, content: &NewContent) -> ApiResult<Record> {
        let row = match content {
            NewContent::Service(s) => {
                self.client
                    .query_one(
                        queries::INSERT_SERVICE,
                        &[&s.icon, &s.title, &s.description, &s.color],
                    )
                    .await?
            }
            NewContent::Region(r) => {
                self.client
                    .query_one(queries::INSERT_REGION, &[&r.name, &r.passengers, &r.routes])
                    .await?
            }
            NewContent::News(n) => {
                self.client
                    .query_one(
                        queries::INSERT_NEWS,
                        &[&n.date, &n.title, &n.category, &n.content],
                    )
                    .await?
            }
            NewContent::Schedule(s) => {
                self.client
                    .query_one(
                        queries::INSERT_SCHEDULE,
                        &[&s.route, &s.departure, &s.arrival, &s.transport],
                    )
                    .await?
            }
        };

        decode_row(&row)
    }

    async fn update(&self, update: &ContentUpdate) -> ApiResult<Option<Record>> {
        let row = match update {
            ContentUpdate::Service(s) => {
                self.client
                    .query_opt(
                        queries::UPDATE_SERVICE,
                        &[&s.id, &s.icon, &s.title, &s.description, &s.color],
                    )
                    .await?
            }
            ContentUpdate::Region(r) => {
                self.client
                    .query_opt(
                        queries::UPDATE_REGION,
                        &[&r.id, &r.name, &r.passengers, &r.routes],
                    )
                    .await?
            }
            ContentUpdate::News(n) => {
                self.client
                    .query_opt(
                        queries::UPDATE_NEWS,
                        &[&n.id, &n.date, &n.title, &n.category, &n.content],
                    )
                    .await?
            }
            ContentUpdate::Schedule(s) => {
                self.client
                    .query_opt(
                        queries::UPDATE_SCHEDULE,
                        &[&s.id, &s.route, &s.departure, &s.arrival, &s.transport],
                    )
                    .await?
            }
            ContentUpdate::CompanyInfo(c) => {
                self.client
                    .query_opt(queries::UPDATE_COMPANY_INFO, &[&c.key, &c.value])
                    .await?
            }
        };

        row.as_ref().map(decode_row).transpose()
    }

    async fn delete(&self, entity: Entity, id: i32) -> ApiResult<u64> {
        let sql = queries::delete(entity).ok_or(AppError::MethodNotAllowed)?;
        Ok(self.client.execute(sql, &[&id]).await?)
    }
}

/// Columns stamped by the database
const TIMESTAMP_COLUMNS: [&str; 2] = ["created_at", "updated_at"];

/// Unpack the `data` JSONB column into a flat record
fn decode_row(row: &Row) -> ApiResult<Record> {
    let value: serde_json::Value = row.try_get("data")?;
    match value {
        serde_json::Value::Object(mut record) => {
            format_timestamps(&mut record);
            Ok(record)
        }
        other => Err(AppError::Internal(format!(
            "Expected a JSON object row, got {}",
            other
        ))),
    }
}

/// JSONB renders timestamps as `2024-01-01T10:00:00.5`; clients expect
/// `2024-01-01 10:00:00.5`
fn format_timestamps(record: &mut Record) {
    for column in TIMESTAMP_COLUMNS {
        if let Some(serde_json::Value::String(stamp)) = record.get_mut(column) {
            if stamp.len() > 10 && stamp.is_char_boundary(10) && stamp[10..].starts_with('T') {
                stamp.replace_range(10..11, " ");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_timestamps_use_space_separator() {
        let mut record = json!({
            "id": 3,
            "title": "Timetable",
            "created_at": "2026-10-18T19:26:05.093884",
            "updated_at": "2026-10-18T19:26:05"
        })
        .as_object()
        .cloned()
        .unwrap();

        format_timestamps(&mut record);

        assert_eq!(record["created_at"], "2026-10-18 19:26:05.093884");
        assert_eq!(record["updated_at"], "2026-10-18 19:26:05");
        assert_eq!(record["title"], "Timetable");
    }

    #[test]
    fn test_other_columns_and_values_untouched() {
        let mut record = json!({
            "date": "2024-01-01T00:00:00",
            "created_at": null,
            "updated_at": "today"
        })
        .as_object()
        .cloned()
        .unwrap();

        format_timestamps(&mut record);

        assert_eq!(record["date"], "2024-01-01T00:00:00");
        assert_eq!(record["created_at"], serde_json::Value::Null);
        assert_eq!(record["updated_at"], "today");
    }
}
