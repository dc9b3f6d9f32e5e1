pub mod collections;
pub mod here;
pub mod time;

use std::sync::Arc;

use actix_web::web;
use utoipa::OpenApi;

use crate::config::Config;
use crate::infrastructure::catalog::CatalogClient;
use crate::infrastructure::here::HereClient;
use crate::infrastructure::session::SessionClient;
use crate::infrastructure::token_store::MemoryTokenStore;

/// Shared state of the HTTP endpoints.
pub struct AppState {
    pub catalog: CatalogClient,
    pub here: HereClient,
    /// Bias center used when a request does not carry one.
    pub here_center: (f64, f64),
}

impl AppState {
    pub fn new(catalog: CatalogClient, here: HereClient, here_center: (f64, f64)) -> Self {
        Self {
            catalog,
            here,
            here_center,
        }
    }

    /// Catalog reads are anonymous: they carry the channel token only.
    pub fn from_config(config: &Config) -> Self {
        let session = SessionClient::new(&config.shop_api_url, Arc::new(MemoryTokenStore::new()))
            .with_channel_token(config.channel_token.clone());
        Self::new(
            CatalogClient::new(Arc::new(session), config.read_timeout),
            HereClient::new(config.here_api_key.clone(), config.here_radius_m),
            config.here_center,
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(here::autosuggest, collections::list_collections, time::server_time),
    components(schemas(collections::CollectionResponse, time::ServerTime)),
    tags(
        (name = "address", description = "Address autocomplete proxy"),
        (name = "catalog", description = "Catalog reads"),
        (name = "time", description = "Server clock")
    )
)]
pub struct ApiDoc;

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/here", web::get().to(here::autosuggest))
            .route("/collections", web::get().to(collections::list_collections))
            .route("/time", web::get().to(time::server_time)),
    );
}
