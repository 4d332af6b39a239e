//! Per-entity request payloads
//!
//! Bodies are decoded into one typed payload per entity and validated
//! before any connection is acquired.

use crate::entity::Entity;
use crate::error::{AppError, ApiResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct NewService {
    #[validate(length(min = 1, message = "icon is required"))]
    pub icon: String,
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    pub description: String,
    #[validate(length(min = 1, message = "color is required"))]
    pub color: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct NewRegion {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub passengers: String,
    #[validate(range(min = 0, message = "routes cannot be negative"))]
    pub routes: i32,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct NewNews {
    #[validate(length(min = 1, message = "date is required"))]
    pub date: String,
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct NewScheduleEntry {
    #[validate(length(min = 1, message = "route is required"))]
    pub route: String,
    #[validate(length(min = 1, message = "departure is required"))]
    pub departure: String,
    #[validate(length(min = 1, message = "arrival is required"))]
    pub arrival: String,
    #[validate(length(min = 1, message = "transport is required"))]
    pub transport: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ServiceUpdate {
    pub id: i32,
    #[validate(length(min = 1, message = "icon cannot be empty"))]
    pub icon: Option<String>,
    #[validate(length(min = 1, message = "title cannot be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "color cannot be empty"))]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct RegionUpdate {
    pub id: i32,
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: Option<String>,
    pub passengers: Option<String>,
    #[validate(range(min = 0, message = "routes cannot be negative"))]
    pub routes: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct NewsUpdate {
    pub id: i32,
    #[validate(length(min = 1, message = "date cannot be empty"))]
    pub date: Option<String>,
    #[validate(length(min = 1, message = "title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "category cannot be empty"))]
    pub category: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ScheduleUpdate {
    pub id: i32,
    #[validate(length(min = 1, message = "route cannot be empty"))]
    pub route: Option<String>,
    #[validate(length(min = 1, message = "departure cannot be empty"))]
    pub departure: Option<String>,
    #[validate(length(min = 1, message = "arrival cannot be empty"))]
    pub arrival: Option<String>,
    #[validate(length(min = 1, message = "transport cannot be empty"))]
    pub transport: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CompanyInfoUpdate {
    #[validate(length(min = 1, message = "key is required"))]
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct DeleteRequest {
    pub id: i32,
}

/// Row to insert, one variant per insertable entity
#[derive(Debug, Clone)]
pub enum NewContent {
    Service(NewService),
    Region(NewRegion),
    News(NewNews),
    Schedule(NewScheduleEntry),
}

/// Partial update addressed by the entity's key column
#[derive(Debug, Clone)]
pub enum ContentUpdate {
    Service(ServiceUpdate),
    Region(RegionUpdate),
    News(NewsUpdate),
    Schedule(ScheduleUpdate),
    CompanyInfo(CompanyInfoUpdate),
}

impl NewContent {
    pub fn parse(entity: Entity, body: &str) -> ApiResult<Self> {
        Ok(match entity {
            Entity::Services => NewContent::Service(parse_body(body)?),
            Entity::Regions => NewContent::Region(parse_body(body)?),
            Entity::News => NewContent::News(parse_body(body)?),
            Entity::Schedule => NewContent::Schedule(parse_body(body)?),
            Entity::CompanyInfo => return Err(AppError::MethodNotAllowed),
        })
    }

    pub fn entity(&self) -> Entity {
        match self {
            NewContent::Service(_) => Entity::Services,
            NewContent::Region(_) => Entity::Regions,
            NewContent::News(_) => Entity::News,
            NewContent::Schedule(_) => Entity::Schedule,
        }
    }
}

impl ContentUpdate {
    pub fn parse(entity: Entity, body: &str) -> ApiResult<Self> {
        Ok(match entity {
            Entity::Services => ContentUpdate::Service(parse_body(body)?),
            Entity::Regions => ContentUpdate::Region(parse_body(body)?),
            Entity::News => ContentUpdate::News(parse_body(body)?),
            Entity::Schedule => ContentUpdate::Schedule(parse_body(body)?),
            Entity::CompanyInfo => ContentUpdate::CompanyInfo(parse_body(body)?),
        })
    }

    pub fn entity(&self) -> Entity {
        match self {
            ContentUpdate::Service(_) => Entity::Services,
            ContentUpdate::Region(_) => Entity::Regions,
            ContentUpdate::News(_) => Entity::News,
            ContentUpdate::Schedule(_) => Entity::Schedule,
            ContentUpdate::CompanyInfo(_) => Entity::CompanyInfo,
        }
    }

    /// Human-readable key for logging
    pub fn key(&self) -> String {
        match self {
            ContentUpdate::Service(u) => u.id.to_string(),
            ContentUpdate::Region(u) => u.id.to_string(),
            ContentUpdate::News(u) => u.id.to_string(),
            ContentUpdate::Schedule(u) => u.id.to_string(),
            ContentUpdate::CompanyInfo(u) => u.key.clone(),
        }
    }
}

impl DeleteRequest {
    pub fn parse(body: &str) -> ApiResult<Self> {
        parse_body(body)
    }
}

/// Decode and validate a JSON body; an absent body reads as `{}`
fn parse_body<T>(body: &str) -> ApiResult<T>
where
    T: DeserializeOwned + Validate,
{
    let body = if body.trim().is_empty() { "{}" } else { body };
    let payload: T = serde_json::from_str(body)?;
    payload.validate()?;
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_news_content_defaults_to_empty() {
        let parsed = assert_ok!(NewContent::parse(
            Entity::News,
            r#"{"date":"2024-01-01","title":"X","category":"update"}"#,
        ));

        match parsed {
            NewContent::News(news) => assert_eq!(news.content, ""),
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_missing_field_names_the_field() {
        let err = assert_err!(NewContent::parse(
            Entity::Services,
            r#"{"icon":"Bus","title":"Buses","color":"blue"}"#,
        ));

        assert!(matches!(err, AppError::MalformedBody(_)));
        assert!(err.to_string().contains("description"));
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let err = assert_err!(NewContent::parse(
            Entity::Regions,
            r#"{"name":"North","passengers":"2.5M","routes":"many"}"#,
        ));
        assert!(matches!(err, AppError::MalformedBody(_)));
    }

    #[test]
    fn test_validation_reports_field_messages() {
        let err = assert_err!(NewContent::parse(
            Entity::Regions,
            r#"{"name":"","passengers":"2.5M","routes":-1}"#,
        ));

        match err {
            AppError::Validation(fields) => {
                assert_eq!(fields["name"], vec!["name is required".to_string()]);
                assert_eq!(fields["routes"], vec!["routes cannot be negative".to_string()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_company_info_cannot_be_created() {
        let err = assert_err!(NewContent::parse(Entity::CompanyInfo, r#"{"key":"a","value":"b"}"#));
        assert!(matches!(err, AppError::MethodNotAllowed));
    }

    #[test]
    fn test_update_requires_key() {
        let err = assert_err!(ContentUpdate::parse(Entity::Schedule, r#"{"route":"A - B"}"#));
        assert!(err.to_string().contains("`id`"));

        let err = assert_err!(ContentUpdate::parse(Entity::CompanyInfo, r#"{"value":"x"}"#));
        assert!(err.to_string().contains("`key`"));
    }

    #[test]
    fn test_partial_update_keeps_absent_fields_unset() {
        let update = assert_ok!(ContentUpdate::parse(
            Entity::Services,
            r#"{"id":3,"title":"Trains"}"#,
        ));

        assert_eq!(update.entity(), Entity::Services);
        assert_eq!(update.key(), "3");
        match update {
            ContentUpdate::Service(s) => {
                assert_eq!(s.title.as_deref(), Some("Trains"));
                assert!(s.icon.is_none());
                assert!(s.color.is_none());
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_delete_request() {
        assert_eq!(assert_ok!(DeleteRequest::parse(r#"{"id":7}"#)).id, 7);
        assert!(matches!(
            assert_err!(DeleteRequest::parse("")),
            AppError::MalformedBody(_)
        ));
        // Out-of-range keys simply match nothing
        assert_eq!(assert_ok!(DeleteRequest::parse(r#"{"id":0}"#)).id, 0);
        assert_eq!(assert_ok!(DeleteRequest::parse(r#"{"id":-5}"#)).id, -5);
    }
}
