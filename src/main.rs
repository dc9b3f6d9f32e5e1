use dotenvy::dotenv;
use storefront::{build_server, AppState, Config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().expect("Invalid configuration");
    if config.here_api_key.is_none() {
        log::warn!("HERE_API_KEY is not set, /api/here will answer 500");
    }

    log::info!("Using shop API at {}", config.shop_api_url);
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(AppState::from_config(&config), &config.host, config.port)?.await
}
