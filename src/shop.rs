//! Wiring of one shopper's session against the shop API.

use std::sync::Arc;

use crate::application::cart_store::CartStore;
use crate::application::checkout::CheckoutOrchestrator;
use crate::config::Config;
use crate::domain::ports::TokenStore;
use crate::infrastructure::catalog::CatalogClient;
use crate::infrastructure::session::SessionClient;
use crate::infrastructure::vendure::VendureGateway;

/// Catalog, cart and checkout sharing one session token.
pub struct Shop {
    pub catalog: CatalogClient,
    pub cart: Arc<CartStore<VendureGateway>>,
    pub checkout: CheckoutOrchestrator<VendureGateway>,
}

impl Shop {
    pub fn connect(config: &Config, tokens: Arc<dyn TokenStore>) -> Self {
        let session = || {
            SessionClient::new(&config.shop_api_url, Arc::clone(&tokens))
                .with_channel_token(config.channel_token.clone())
        };
        let gateway = Arc::new(VendureGateway::new(session()));
        let cart = Arc::new(CartStore::new(Arc::clone(&gateway)));
        let checkout =
            CheckoutOrchestrator::new(gateway, Arc::clone(&cart), config.checkout_settings())
                .with_session(Arc::clone(&tokens));
        Shop {
            catalog: CatalogClient::new(Arc::new(session()), config.read_timeout),
            cart,
            checkout,
        }
    }
}
