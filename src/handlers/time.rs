use actix_web::HttpResponse;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use utoipa::ToSchema;

pub const TIME_ZONE: &str = "Asia/Bangkok";

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServerTime {
    /// Wall-clock time in `time_zone`, written with a `Z` suffix.
    pub time: String,
    pub time_zone: String,
}

impl ServerTime {
    pub fn at(now: DateTime<Utc>) -> Self {
        let local = now + Duration::hours(7);
        ServerTime {
            time: local.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            time_zone: TIME_ZONE.to_string(),
        }
    }
}

/// GET /api/time
#[utoipa::path(
    get,
    path = "/api/time",
    responses(
        (status = 200, description = "Current server time (UTC+7)", body = ServerTime),
    ),
    tag = "time"
)]
pub async fn server_time() -> HttpResponse {
    HttpResponse::Ok().json(ServerTime::at(Utc::now()))
}
