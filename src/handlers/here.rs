use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::errors::AppError;

use super::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AutosuggestParams {
    /// Text typed by the customer.
    pub q: Option<String>,
    /// Latitude of the bias center.
    pub lat: Option<f64>,
    /// Longitude of the bias center.
    pub lng: Option<f64>,
}

/// GET /api/here
///
/// Relays an address autocomplete query to HERE, restricted to Vietnam, and
/// returns the upstream JSON untouched.
#[utoipa::path(
    get,
    path = "/api/here",
    params(AutosuggestParams),
    responses(
        (status = 200, description = "Upstream autosuggest payload"),
        (status = 400, description = "Missing query"),
        (status = 500, description = "API key not configured or upstream failure"),
    ),
    tag = "address"
)]
pub async fn autosuggest(
    state: web::Data<AppState>,
    query: web::Query<AutosuggestParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let q = params
        .q
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::BadRequest("Query parameter is required".to_string()))?;

    if !state.here.is_configured() {
        return Err(AppError::NotConfigured(
            "HERE API key is not configured".to_string(),
        ));
    }

    let (lat, lng) = state.here_center;
    let body = state
        .here
        .autosuggest(&q, params.lat.unwrap_or(lat), params.lng.unwrap_or(lng))
        .await
        .map_err(|e| AppError::upstream(e, "from HERE API"))?;

    Ok(HttpResponse::Ok().json(body))
}
