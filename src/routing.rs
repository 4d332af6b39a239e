//! Dispatch table
//!
//! Maps (method, entity) onto a typed operation and then, with the body,
//! onto a fully validated command. Unknown combinations stop here with 405.

use crate::entity::Entity;
use crate::error::{AppError, ApiResult};
use crate::models::{ContentUpdate, DeleteRequest, NewContent};
use axum::http::Method;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List(Entity),
    Dashboard,
    Create(Entity),
    Update(Entity),
    Delete(Entity),
}

/// An operation with its decoded payload, ready for the store
#[derive(Debug, Clone)]
pub enum Command {
    List(Entity),
    Dashboard,
    Create(NewContent),
    Update(ContentUpdate),
    Delete { entity: Entity, id: i32 },
}

impl Operation {
    pub fn resolve(method: &Method, entity: Option<Entity>) -> ApiResult<Self> {
        match (method, entity) {
            (&Method::GET, Some(entity)) => Ok(Operation::List(entity)),
            (&Method::GET, None) => Ok(Operation::Dashboard),
            (&Method::POST, Some(entity)) if !entity.is_fixed() => Ok(Operation::Create(entity)),
            (&Method::PUT, Some(entity)) => Ok(Operation::Update(entity)),
            (&Method::DELETE, Some(entity)) if !entity.is_fixed() => Ok(Operation::Delete(entity)),
            _ => Err(AppError::MethodNotAllowed),
        }
    }

    /// Decode the body this operation needs; reads ignore it
    pub fn into_command(self, body: Option<&str>) -> ApiResult<Command> {
        let body = body.unwrap_or("");
        Ok(match self {
            Operation::List(entity) => Command::List(entity),
            Operation::Dashboard => Command::Dashboard,
            Operation::Create(entity) => Command::Create(NewContent::parse(entity, body)?),
            Operation::Update(entity) => Command::Update(ContentUpdate::parse(entity, body)?),
            Operation::Delete(entity) => Command::Delete {
                entity,
                id: DeleteRequest::parse(body)?.id,
            },
        })
    }
}
