use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::json;

use crate::domain::address::{parse_label, shipping_address, Contact, ParsedAddress, StructuredAddress};
use crate::domain::customer::CustomerInput;
use crate::domain::errors::CommerceError;
use crate::domain::order::{
    Order, OrderPatch, OrderState, PaymentInput, PaymentMethod, ShippingAddress, ShippingMethod,
    Totals,
};
use crate::domain::ports::{CommerceApi, TokenStore};

use super::cart_store::CartStore;
use super::contact::{ContactField, ContactForm};

pub const DEFAULT_EMAIL_DOMAIN: &str = "cahoicoba.com";
pub const DEFAULT_PICKUP_CODE: &str = "nhan-tai-cua-hang";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSettings {
    /// Domain of the email address synthesised from the phone number.
    pub email_domain: String,
    /// Shipping method code reserved for in-store pickup.
    pub pickup_code: String,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            email_domain: DEFAULT_EMAIL_DOMAIN.to_string(),
            pickup_code: DEFAULT_PICKUP_CODE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckoutStage {
    #[default]
    NoAddress,
    AddressSet,
    ShippingMethodsFetched,
    ShippingMethodSelected,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeliveryMethod {
    #[default]
    Delivery,
    Pickup,
}

/// Everything the checkout page renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutView {
    pub stage: CheckoutStage,
    pub delivery_method: DeliveryMethod,
    pub order: Option<Order>,
    pub shipping_address: Option<ShippingAddress>,
    /// Address form fields.
    pub address: ParsedAddress,
    /// Delivery options offered to the customer; never contains pickup.
    pub shipping_methods: Vec<ShippingMethod>,
    pub selected_method: Option<String>,
    /// Eligible payment methods, filled by `fetch_payment_methods`.
    pub payment_methods: Vec<PaymentMethod>,
    pub store_address: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Default)]
struct Inner {
    view: CheckoutView,
    contact: ContactForm,
}

/// Drives the checkout of the active order: customer, address, shipping
/// method and payment, each persisted to the backend as soon as it is known.
///
/// Steps do not roll back the ones before them. A failing step leaves its
/// message in [`CheckoutView::error`] and returns the error.
pub struct CheckoutOrchestrator<A> {
    api: Arc<A>,
    cart: Arc<CartStore<A>>,
    tokens: Option<Arc<dyn TokenStore>>,
    settings: CheckoutSettings,
    inner: Mutex<Inner>,
}

impl<A: CommerceApi> CheckoutOrchestrator<A> {
    pub fn new(api: Arc<A>, cart: Arc<CartStore<A>>, settings: CheckoutSettings) -> Self {
        Self {
            api,
            cart,
            tokens: None,
            settings,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Session token store cleared once the order is placed.
    pub fn with_session(mut self, tokens: Arc<dyn TokenStore>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn view(&self) -> CheckoutView {
        self.lock().view.clone()
    }

    pub fn contact(&self) -> Contact {
        self.lock().contact.contact().clone()
    }

    pub fn error(&self) -> Option<String> {
        self.lock().view.error.clone()
    }

    fn begin(&self, step: &str) {
        log::debug!("Checkout step: {}", step);
        self.lock().view.error = None;
    }

    fn finish<T>(&self, step: &str, result: Result<T, CommerceError>) -> Result<T, CommerceError> {
        result.map_err(|err| {
            log::warn!("Checkout step {} failed: {}", step, err);
            self.lock().view.error = Some(err.to_string());
            err
        })
    }

    /// Loads the active order into the checkout.
    ///
    /// An order already in `ArrangingPayment` was submitted from another tab;
    /// the cart is reloaded and the checkout refuses to continue.
    pub async fn initialize(&self) -> Result<(), CommerceError> {
        self.begin("initialize");
        self.lock().view.loading = true;
        let result = self.load_order().await;
        self.lock().view.loading = false;
        self.finish("initialize", result)
    }

    async fn load_order(&self) -> Result<(), CommerceError> {
        let order = self
            .api
            .active_order()
            .await?
            .ok_or(CommerceError::NoActiveOrder)?;
        if order.lines.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        if order.state == OrderState::ArrangingPayment {
            if let Err(err) = self.cart.load().await {
                log::warn!("Reloading cart failed: {}", err);
            }
            return Err(CommerceError::OrderAlreadyProcessed);
        }

        let store_address = match self.api.store_address().await {
            Ok(address) => address,
            Err(err) => {
                log::warn!("Fetching store address failed: {}", err);
                None
            }
        };

        let mut inner = self.lock();
        let view = &mut inner.view;
        if let Some(address) = &order.shipping_address {
            view.shipping_address = Some(address.clone());
            view.stage = CheckoutStage::AddressSet;
        }
        view.order = Some(order);
        view.store_address = store_address;
        Ok(())
    }

    /// Records a customer field and attaches the customer to the order once
    /// name and a ten-digit phone are both present.
    pub async fn update_contact(
        &self,
        field: ContactField,
        value: &str,
    ) -> Result<(), CommerceError> {
        let Some((full_name, phone)) = self.lock().contact.update(field, value) else {
            return Ok(());
        };

        self.begin("set customer");
        let input = CustomerInput::from_contact(&full_name, &phone, &self.settings.email_domain);
        let result = self.api.set_customer(&input).await;
        if result.is_ok() {
            self.lock().contact.mark_sent((full_name, phone));
        }
        self.finish("set customer", result)
    }

    pub async fn switch_delivery_method(&self, method: DeliveryMethod) -> Result<(), CommerceError> {
        self.begin("switch delivery method");
        let result = match method {
            DeliveryMethod::Pickup => self.choose_pickup().await,
            DeliveryMethod::Delivery => self.choose_delivery().await,
        };
        self.finish("switch delivery method", result)
    }

    async fn choose_pickup(&self) -> Result<(), CommerceError> {
        {
            let mut inner = self.lock();
            inner.view.delivery_method = DeliveryMethod::Pickup;
            inner.view.shipping_methods.clear();
            inner.view.selected_method = None;
        }

        let known = self.lock().view.store_address.clone();
        let store_address = match known {
            Some(address) => address,
            None => self
                .api
                .store_address()
                .await?
                .ok_or(CommerceError::PickupUnavailable)?,
        };

        let methods = self.api.eligible_shipping_methods().await?;
        let pickup = methods
            .into_iter()
            .find(|m| m.code == self.settings.pickup_code)
            .ok_or(CommerceError::PickupUnavailable)?;
        let patch = self.api.set_shipping_method(&pickup.id).await?;
        self.merge_into_order(patch);

        let parsed = parse_label(&store_address);
        let contact = self.contact();
        let stored = self
            .api
            .set_shipping_address(&shipping_address(&parsed, &contact))
            .await?;

        let mut inner = self.lock();
        let view = &mut inner.view;
        view.store_address = Some(store_address);
        view.address = parsed;
        view.shipping_address = Some(stored);
        view.selected_method = Some(pickup.id);
        view.stage = CheckoutStage::ShippingMethodSelected;
        Ok(())
    }

    async fn choose_delivery(&self) -> Result<(), CommerceError> {
        let refetch = {
            let mut inner = self.lock();
            let view = &mut inner.view;
            view.delivery_method = DeliveryMethod::Delivery;
            view.shipping_methods.clear();
            view.selected_method = None;
            view.stage = if view.shipping_address.is_some() {
                CheckoutStage::AddressSet
            } else {
                CheckoutStage::NoAddress
            };
            view.address.is_deliverable()
        };
        if refetch {
            self.load_shipping_methods().await?;
        }
        Ok(())
    }

    /// Persists a resolved address, then refreshes the delivery options.
    pub async fn select_address(&self, address: StructuredAddress) -> Result<(), CommerceError> {
        self.begin("select address");
        let result = self.persist_address(address).await;
        self.finish("select address", result)
    }

    async fn persist_address(&self, address: StructuredAddress) -> Result<(), CommerceError> {
        let input = {
            let mut inner = self.lock();
            inner.contact.merge_from(&address.contact);
            shipping_address(&address.parsed, inner.contact.contact())
        };
        let stored = self.api.set_shipping_address(&input).await?;
        {
            let mut inner = self.lock();
            let view = &mut inner.view;
            view.shipping_address = Some(stored);
            view.address = address.parsed;
            view.stage = CheckoutStage::AddressSet;
        }
        self.load_shipping_methods().await
    }

    /// Fetches delivery options (pickup excluded) and selects the first one.
    pub async fn fetch_shipping_methods(&self) -> Result<(), CommerceError> {
        self.begin("fetch shipping methods");
        let result = self.load_shipping_methods().await;
        self.finish("fetch shipping methods", result)
    }

    async fn load_shipping_methods(&self) -> Result<(), CommerceError> {
        let methods: Vec<ShippingMethod> = self
            .api
            .eligible_shipping_methods()
            .await?
            .into_iter()
            .filter(|m| m.code != self.settings.pickup_code)
            .collect();
        let first = methods.first().map(|m| m.id.clone());
        {
            let mut inner = self.lock();
            inner.view.shipping_methods = methods;
            inner.view.selected_method = None;
            inner.view.stage = CheckoutStage::ShippingMethodsFetched;
        }
        match first {
            Some(id) => self.apply_shipping_method(&id).await,
            None => Ok(()),
        }
    }

    /// Persists the chosen delivery option. Only ids from the fetched delivery
    /// list are accepted.
    pub async fn select_shipping_method(&self, method_id: &str) -> Result<(), CommerceError> {
        self.begin("select shipping method");
        let result = self.apply_shipping_method(method_id).await;
        self.finish("select shipping method", result)
    }

    async fn apply_shipping_method(&self, method_id: &str) -> Result<(), CommerceError> {
        let offered = self
            .lock()
            .view
            .shipping_methods
            .iter()
            .any(|m| m.id == method_id);
        if !offered {
            return Err(CommerceError::Validation(format!(
                "shipping method '{method_id}' is not available"
            )));
        }

        let current = self
            .api
            .active_order()
            .await?
            .ok_or(CommerceError::NoActiveOrder)?;
        {
            let mut inner = self.lock();
            if inner.view.order.is_none() {
                inner.view.order = Some(current);
            }
        }

        let patch = self.api.set_shipping_method(method_id).await?;
        self.merge_into_order(patch);
        let mut inner = self.lock();
        inner.view.selected_method = Some(method_id.to_string());
        inner.view.stage = CheckoutStage::ShippingMethodSelected;
        Ok(())
    }

    fn merge_into_order(&self, patch: OrderPatch) {
        let mut inner = self.lock();
        inner.view.order.get_or_insert_with(Order::default).merge(patch);
    }

    pub fn totals(&self) -> Option<Totals> {
        self.lock().view.order.as_ref().map(Order::totals)
    }

    /// Lists the payment methods the backend accepts for this order.
    pub async fn fetch_payment_methods(&self) -> Result<Vec<PaymentMethod>, CommerceError> {
        self.begin("fetch payment methods");
        let result = self.load_payment_methods().await;
        self.finish("fetch payment methods", result)
    }

    async fn load_payment_methods(&self) -> Result<Vec<PaymentMethod>, CommerceError> {
        let methods: Vec<PaymentMethod> = self
            .api
            .eligible_payment_methods()
            .await?
            .into_iter()
            .filter(|m| m.is_eligible)
            .collect();
        self.lock().view.payment_methods = methods.clone();
        Ok(methods)
    }

    /// Checks `payment_method` against the eligible methods, moves the order
    /// to payment and pays it, then ends the session: the token is dropped
    /// and the local cart forgotten.
    pub async fn place_order(&self, payment_method: &str) -> Result<OrderState, CommerceError> {
        self.begin("place order");
        self.lock().view.loading = true;
        let result = self.pay(payment_method).await;
        self.lock().view.loading = false;
        self.finish("place order", result)
    }

    async fn pay(&self, payment_method: &str) -> Result<OrderState, CommerceError> {
        let eligible = self.load_payment_methods().await?;
        if !eligible.iter().any(|m| m.code == payment_method) {
            return Err(CommerceError::Validation(format!(
                "payment method '{payment_method}' is not available"
            )));
        }

        self.api
            .transition_to_state(OrderState::ArrangingPayment)
            .await?;
        let state = self
            .api
            .add_payment(&PaymentInput {
                method: payment_method.to_string(),
                metadata: json!({}),
            })
            .await?;
        log::info!("Order placed, state {}", state.as_str());

        if let Some(tokens) = &self.tokens {
            tokens.clear();
        }
        self.cart.clear();
        if let Some(order) = self.lock().view.order.as_mut() {
            order.state = state.clone();
        }
        Ok(state)
    }
}
