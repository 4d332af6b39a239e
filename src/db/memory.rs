//! In-memory content store for handler tests
//!
//! Mirrors the ordering and key semantics of the SQL store and counts
//! sessions so tests can check that every call releases its connection.

use super::{ContentSession, ContentStore};
use crate::entity::Entity;
use crate::error::{ApiResult, AppError};
use crate::models::{ContentUpdate, NewContent, Record};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Default)]
struct Tables {
    rows: HashMap<Entity, Vec<Record>>,
    next_id: i64,
    clock: i64,
}

impl Tables {
    /// Strictly increasing timestamps so "newest first" is deterministic
    fn tick(&mut self) -> Value {
        self.clock += 1;
        let at = chrono::DateTime::from_timestamp(1_700_000_000 + self.clock, 0)
            .unwrap_or_default();
        Value::String(at.naive_utc().format("%Y-%m-%d %H:%M:%S").to_string())
    }
}

#[derive(Default)]
pub struct SessionStats {
    acquired: AtomicUsize,
    open: AtomicUsize,
}

impl SessionStats {
    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn open(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    stats: Arc<SessionStats>,
    failing: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every query fails after the session is acquired
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn stats(&self) -> Arc<SessionStats> {
        Arc::clone(&self.stats)
    }

    pub async fn seed_company_info(&self, key: &str, value: &str) {
        let mut tables = self.tables.lock().await;
        let now = tables.tick();
        let mut record = Record::new();
        record.insert("key".into(), Value::from(key));
        record.insert("value".into(), Value::from(value));
        record.insert("created_at".into(), now.clone());
        record.insert("updated_at".into(), now);
        tables
            .rows
            .entry(Entity::CompanyInfo)
            .or_default()
            .push(record);
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn session(&self) -> ApiResult<Box<dyn ContentSession>> {
        self.stats.acquired.fetch_add(1, Ordering::SeqCst);
        self.stats.open.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemorySession {
            store: self.clone(),
        }))
    }
}

struct MemorySession {
    store: MemoryStore,
}

impl Drop for MemorySession {
    fn drop(&mut self) {
        self.store.stats.open.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MemorySession {
    fn check(&self) -> ApiResult<()> {
        if self.store.failing {
            Err(AppError::Internal("simulated store failure".to_string()))
        } else {
            Ok(())
        }
    }
}

fn payload_fields<T: serde::Serialize>(payload: &T) -> ApiResult<Record> {
    match serde_json::to_value(payload) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(AppError::Internal(format!("not an object: {}", other))),
        Err(e) => Err(AppError::Internal(e.to_string())),
    }
}

fn sort_key(record: &Record, column: &str) -> String {
    match record.get(column) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

fn id_of(record: &Record) -> i64 {
    record.get("id").and_then(Value::as_i64).unwrap_or_default()
}

#[async_trait]
impl ContentSession for MemorySession {
    async fn list(&self, entity: Entity, limit: Option<i64>) -> ApiResult<Vec<Record>> {
        self.check()?;
        let tables = self.store.tables.lock().await;
        let mut rows = tables.rows.get(&entity).cloned().unwrap_or_default();

        match entity {
            Entity::News => rows.sort_by(|a, b| {
                sort_key(b, "created_at")
                    .cmp(&sort_key(a, "created_at"))
                    .then(id_of(b).cmp(&id_of(a)))
            }),
            Entity::CompanyInfo => rows.sort_by_key(|r| sort_key(r, "key")),
            _ => rows.sort_by_key(id_of),
        }

        if let Some(limit) = limit {
            rows.truncate(limit.max(0) as usize);
        }
        Ok(rows)
    }

    async fn insert(&self, content: &NewContent) -> ApiResult<Record> {
        self.check()?;
        let mut record = match content {
            NewContent::Service(s) => payload_fields(s)?,
            NewContent::Region(r) => payload_fields(r)?,
            NewContent::News(n) => payload_fields(n)?,
            NewContent::Schedule(s) => payload_fields(s)?,
        };

        let mut tables = self.store.tables.lock().await;
        tables.next_id += 1;
        let id = tables.next_id;
        let now = tables.tick();
        record.insert("id".into(), Value::from(id));
        record.insert("created_at".into(), now.clone());
        record.insert("updated_at".into(), now);

        tables
            .rows
            .entry(content.entity())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn update(&self, update: &ContentUpdate) -> ApiResult<Option<Record>> {
        self.check()?;
        let entity = update.entity();
        let key_column = entity.key_column();
        let changes = match update {
            ContentUpdate::Service(s) => payload_fields(s)?,
            ContentUpdate::Region(r) => payload_fields(r)?,
            ContentUpdate::News(n) => payload_fields(n)?,
            ContentUpdate::Schedule(s) => payload_fields(s)?,
            ContentUpdate::CompanyInfo(c) => payload_fields(c)?,
        };
        let key = changes.get(key_column).cloned().unwrap_or(Value::Null);

        let mut tables = self.store.tables.lock().await;
        let now = tables.tick();
        let Some(row) = tables
            .rows
            .get_mut(&entity)
            .and_then(|rows| rows.iter_mut().find(|r| r.get(key_column) == Some(&key)))
        else {
            return Ok(None);
        };

        for (column, value) in changes {
            if column != key_column && !value.is_null() {
                row.insert(column, value);
            }
        }
        row.insert("updated_at".into(), now);
        Ok(Some(row.clone()))
    }

    async fn delete(&self, entity: Entity, id: i32) -> ApiResult<u64> {
        self.check()?;
        let mut tables = self.store.tables.lock().await;
        let rows = tables.rows.entry(entity).or_default();
        let before = rows.len();
        rows.retain(|r| id_of(r) != i64::from(id));
        Ok((before - rows.len()) as u64)
    }
}
