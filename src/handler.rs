//! Content handler
//!
//! Processes one request end-to-end: preflight short-circuit, configuration
//! check, dispatch-table lookup, body validation, then a single store
//! session for the actual SQL. The session is released when it goes out of
//! scope, whichever way the call ends.

use crate::db::{ContentSession, ContentStore};
use crate::entity::Entity;
use crate::error::{ApiResult, AppError};
use crate::event::{ContentRequest, ContentResponse};
use crate::models::{Dashboard, DeleteResponse};
use crate::routing::{Command, Operation};
use axum::http::{Method, StatusCode};
use std::sync::Arc;
use tracing::{debug, info, instrument};

#[derive(Clone)]
pub struct ContentHandler {
    store: Option<Arc<dyn ContentStore>>,
}

impl ContentHandler {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store: Some(store) }
    }

    /// Handler without a database; answers preflights and 500 otherwise
    pub fn unconfigured() -> Self {
        Self { store: None }
    }

    pub fn is_configured(&self) -> bool {
        self.store.is_some()
    }

    #[instrument(skip_all, fields(method = %request.http_method, entity = %request.entity()))]
    pub async fn handle(&self, request: ContentRequest) -> ContentResponse {
        if request.http_method == Method::OPTIONS.as_str() {
            debug!("Answering CORS preflight");
            return ContentResponse::preflight();
        }

        match self.dispatch(&request).await {
            Ok(response) => response,
            Err(err) => {
                if err.status().is_client_error() {
                    debug!("Request rejected: {}", err);
                }
                err.into()
            }
        }
    }

    async fn dispatch(&self, request: &ContentRequest) -> ApiResult<ContentResponse> {
        let store = self.store.as_ref().ok_or(AppError::MissingDatabase)?;

        let method = Method::from_bytes(request.http_method.as_bytes())
            .map_err(|_| AppError::MethodNotAllowed)?;
        let entity = Entity::from_selector(request.entity());
        let command = Operation::resolve(&method, entity)?.into_command(request.body.as_deref())?;

        let session = store.session().await?;
        execute(session.as_ref(), command).await
    }
}

async fn execute(session: &dyn ContentSession, command: Command) -> ApiResult<ContentResponse> {
    match command {
        Command::List(entity) => {
            let rows = session.list(entity, None).await?;
            Ok(ContentResponse::json(StatusCode::OK, &rows))
        }
        Command::Dashboard => {
            let dashboard = Dashboard {
                services: session.list(Entity::Services, None).await?,
                regions: session.list(Entity::Regions, None).await?,
                news: session
                    .list(Entity::News, Some(Dashboard::NEWS_LIMIT))
                    .await?,
                schedule: session.list(Entity::Schedule, None).await?,
                company_info: session.list(Entity::CompanyInfo, None).await?,
            };
            Ok(ContentResponse::json(StatusCode::OK, &dashboard))
        }
        Command::Create(content) => {
            let record = session.insert(&content).await?;
            info!(
                "Created {} row (id: {})",
                content.entity(),
                record.get("id").cloned().unwrap_or_default()
            );
            Ok(ContentResponse::json(StatusCode::CREATED, &record))
        }
        Command::Update(update) => {
            let record = session.update(&update).await?;
            match record {
                Some(_) => info!("Updated {} row {}", update.entity(), update.key()),
                None => info!("No {} row matched {}", update.entity(), update.key()),
            }
            Ok(ContentResponse::json(StatusCode::OK, &record))
        }
        Command::Delete { entity, id } => {
            let removed = session.delete(entity, id).await?;
            info!("Deleted {} {} row(s) with id {}", removed, entity, id);
            Ok(ContentResponse::json(StatusCode::OK, &DeleteResponse::default()))
        }
    }
}
