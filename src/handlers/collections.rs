use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::catalog::Collection;
use crate::errors::AppError;

use super::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct CollectionResponse {
    pub id: String,
    pub name: String,
    pub slug: String,
}

impl From<Collection> for CollectionResponse {
    fn from(c: Collection) -> Self {
        CollectionResponse {
            id: c.id,
            name: c.name,
            slug: c.slug,
        }
    }
}

/// GET /api/collections
///
/// Lists the catalog collections. The backend gets the configured read
/// deadline; past it the endpoint answers 504.
#[utoipa::path(
    get,
    path = "/api/collections",
    responses(
        (status = 200, description = "Collections", body = [CollectionResponse]),
        (status = 500, description = "Failed to fetch collections"),
        (status = 504, description = "Request timeout"),
    ),
    tag = "catalog"
)]
pub async fn list_collections(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let items: Vec<CollectionResponse> = state
        .catalog
        .collections()
        .await
        .map_err(|e| AppError::upstream(e, "collections"))?
        .into_iter()
        .map(CollectionResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(items))
}
