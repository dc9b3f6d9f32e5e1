use async_trait::async_trait;

use super::address::AddressComponents;
use super::customer::CustomerInput;
use super::errors::CommerceError;
use super::order::{
    Order, OrderPatch, OrderState, PaymentInput, PaymentMethod, ShippingAddress, ShippingMethod,
};

/// Operations on the session-scoped active order of the commerce backend.
#[async_trait]
pub trait CommerceApi: Send + Sync + 'static {
    async fn active_order(&self) -> Result<Option<Order>, CommerceError>;
    async fn transition_to_state(&self, state: OrderState) -> Result<(), CommerceError>;
    async fn add_item(&self, variant_id: &str, quantity: u32) -> Result<Order, CommerceError>;
    async fn adjust_line(&self, line_id: &str, quantity: u32) -> Result<Order, CommerceError>;
    async fn remove_line(&self, line_id: &str) -> Result<Order, CommerceError>;
    async fn set_customer(&self, input: &CustomerInput) -> Result<(), CommerceError>;
    async fn set_shipping_address(
        &self,
        address: &ShippingAddress,
    ) -> Result<ShippingAddress, CommerceError>;
    async fn eligible_shipping_methods(&self) -> Result<Vec<ShippingMethod>, CommerceError>;
    async fn set_shipping_method(&self, method_id: &str) -> Result<OrderPatch, CommerceError>;
    async fn eligible_payment_methods(&self) -> Result<Vec<PaymentMethod>, CommerceError>;
    async fn add_payment(&self, input: &PaymentInput) -> Result<OrderState, CommerceError>;
    /// Address of the physical store, configured on the sales channel.
    async fn store_address(&self) -> Result<Option<String>, CommerceError>;
}

/// Holder of the rotating session token (the browser cookie).
pub trait TokenStore: Send + Sync + 'static {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str);
    fn clear(&self);
}

/// One geocoder suggestion.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressSuggestion {
    pub id: String,
    pub title: String,
    pub label: String,
    pub components: AddressComponents,
    pub position: (f64, f64),
}

#[async_trait]
pub trait AddressSuggester: Send + Sync + 'static {
    async fn suggest(&self, query: &str) -> Result<Vec<AddressSuggestion>, CommerceError>;
}
