//! In-memory commerce backend for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::domain::customer::CustomerInput;
use crate::domain::errors::CommerceError;
use crate::domain::order::{
    Order, OrderLine, OrderPatch, OrderState, PaymentInput, PaymentMethod, ShippingAddress,
    ShippingMethod, ShippingMethodRef,
};
use crate::domain::order::fixtures;
use crate::domain::ports::CommerceApi;

pub const PICKUP: &str = "nhan-tai-cua-hang";

#[derive(Default)]
struct FakeState {
    order: Option<Order>,
    calls: Vec<&'static str>,
    next_line: u32,
    discount: i64,
    stock_limit: Option<u32>,
    methods: Vec<ShippingMethod>,
    store_address: Option<String>,
    failures: HashMap<&'static str, CommerceError>,
    customers: Vec<CustomerInput>,
    addresses: Vec<ShippingAddress>,
    selected_methods: Vec<String>,
    payments: Vec<String>,
}

impl FakeState {
    fn record(&mut self, op: &'static str) -> Result<(), CommerceError> {
        self.calls.push(op);
        match self.failures.remove(op) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn order_mut(&mut self) -> &mut Order {
        self.order.get_or_insert_with(|| fixtures::order(vec![]))
    }

    fn recompute(&mut self) {
        let discount = self.discount;
        let order = self.order_mut();
        order.total = order.items_total();
        order.total_with_tax = order.items_total() + order.shipping_with_tax - discount;
    }

    fn missing_line(line_id: &str) -> CommerceError {
        CommerceError::Domain {
            error_code: "ENTITY_NOT_FOUND".to_string(),
            message: format!("No OrderLine with the id '{line_id}' could be found"),
        }
    }
}

#[derive(Default)]
pub struct FakeCommerce {
    state: Mutex<FakeState>,
    adjust_gate: Mutex<Option<oneshot::Receiver<()>>>,
}

impl FakeCommerce {
    pub fn with_order(order: Order) -> Self {
        let fake = Self::default();
        {
            let mut state = fake.state.lock().unwrap();
            state.next_line = order.lines.len() as u32;
            state.order = Some(order);
        }
        fake
    }

    pub fn set_methods(&self, methods: Vec<ShippingMethod>) {
        self.state.lock().unwrap().methods = methods;
    }

    pub fn set_store_address(&self, address: &str) {
        self.state.lock().unwrap().store_address = Some(address.to_string());
    }

    pub fn set_discount(&self, discount: i64) {
        let mut state = self.state.lock().unwrap();
        state.discount = discount;
        state.recompute();
    }

    pub fn set_stock_limit(&self, limit: u32) {
        self.state.lock().unwrap().stock_limit = Some(limit);
    }

    pub fn fail_next(&self, op: &'static str, err: CommerceError) {
        self.state.lock().unwrap().failures.insert(op, err);
    }

    /// The next `adjust_line` computes its answer immediately but only
    /// returns it once the sender fires.
    pub fn hold_next_adjust(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.adjust_gate.lock().unwrap() = Some(rx);
        tx
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, op: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| **c == op)
            .count()
    }

    pub fn order(&self) -> Option<Order> {
        self.state.lock().unwrap().order.clone()
    }

    pub fn customers(&self) -> Vec<CustomerInput> {
        self.state.lock().unwrap().customers.clone()
    }

    pub fn addresses(&self) -> Vec<ShippingAddress> {
        self.state.lock().unwrap().addresses.clone()
    }

    pub fn selected_methods(&self) -> Vec<String> {
        self.state.lock().unwrap().selected_methods.clone()
    }

    pub fn payments(&self) -> Vec<String> {
        self.state.lock().unwrap().payments.clone()
    }
}

pub fn method(id: &str, code: &str, price_with_tax: i64) -> ShippingMethod {
    ShippingMethod {
        id: id.to_string(),
        code: code.to_string(),
        name: format!("Method {code}"),
        description: String::new(),
        price: price_with_tax,
        price_with_tax,
    }
}

#[async_trait]
impl CommerceApi for FakeCommerce {
    async fn active_order(&self) -> Result<Option<Order>, CommerceError> {
        let mut state = self.state.lock().unwrap();
        state.record("active_order")?;
        Ok(state.order.clone())
    }

    async fn transition_to_state(&self, to: OrderState) -> Result<(), CommerceError> {
        let mut state = self.state.lock().unwrap();
        state.record("transition_to_state")?;
        if let Some(order) = state.order.as_mut() {
            order.state = to;
        }
        Ok(())
    }

    async fn add_item(&self, variant_id: &str, quantity: u32) -> Result<Order, CommerceError> {
        let mut state = self.state.lock().unwrap();
        state.record("add_item")?;
        let limit = state.stock_limit;
        state.next_line += 1;
        let next_id = state.next_line.to_string();
        let order = state.order_mut();
        match order
            .lines
            .iter_mut()
            .find(|l| l.product_variant.id == variant_id)
        {
            Some(line) => line.quantity += quantity,
            None => order
                .lines
                .push(fixtures::line(&next_id, variant_id, quantity, 10_000)),
        }
        if let Some(limit) = limit {
            for line in order.lines.iter_mut() {
                line.quantity = line.quantity.min(limit);
            }
        }
        state.recompute();
        Ok(state.order_mut().clone())
    }

    async fn adjust_line(&self, line_id: &str, quantity: u32) -> Result<Order, CommerceError> {
        let answer = {
            let mut state = self.state.lock().unwrap();
            state.record("adjust_line")?;
            let limit = state.stock_limit;
            let order = state.order_mut();
            let Some(line) = order.lines.iter_mut().find(|l| l.id == line_id) else {
                return Err(FakeState::missing_line(line_id));
            };
            line.quantity = limit.map_or(quantity, |l| quantity.min(l));
            order.lines.retain(|l| l.quantity > 0);
            state.recompute();
            state.order_mut().clone()
        };
        let gate = self.adjust_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        Ok(answer)
    }

    async fn remove_line(&self, line_id: &str) -> Result<Order, CommerceError> {
        let mut state = self.state.lock().unwrap();
        state.record("remove_line")?;
        let order = state.order_mut();
        if order.line(line_id).is_none() {
            return Err(FakeState::missing_line(line_id));
        }
        order.lines.retain(|l: &OrderLine| l.id != line_id);
        state.recompute();
        Ok(state.order_mut().clone())
    }

    async fn set_customer(&self, input: &CustomerInput) -> Result<(), CommerceError> {
        let mut state = self.state.lock().unwrap();
        state.record("set_customer")?;
        state.customers.push(input.clone());
        Ok(())
    }

    async fn set_shipping_address(
        &self,
        address: &ShippingAddress,
    ) -> Result<ShippingAddress, CommerceError> {
        let mut state = self.state.lock().unwrap();
        state.record("set_shipping_address")?;
        state.addresses.push(address.clone());
        state.order_mut().shipping_address = Some(address.clone());
        Ok(address.clone())
    }

    async fn eligible_shipping_methods(&self) -> Result<Vec<ShippingMethod>, CommerceError> {
        let mut state = self.state.lock().unwrap();
        state.record("eligible_shipping_methods")?;
        Ok(state.methods.clone())
    }

    async fn set_shipping_method(&self, method_id: &str) -> Result<OrderPatch, CommerceError> {
        let mut state = self.state.lock().unwrap();
        state.record("set_shipping_method")?;
        let Some(method) = state.methods.iter().find(|m| m.id == method_id).cloned() else {
            return Err(CommerceError::Domain {
                error_code: "INELIGIBLE_SHIPPING_METHOD_ERROR".to_string(),
                message: "This Order is not eligible for the selected ShippingMethod".to_string(),
            });
        };
        state.selected_methods.push(method.id.clone());
        let order = state.order_mut();
        order.shipping = method.price;
        order.shipping_with_tax = method.price_with_tax;
        order.shipping_method = Some(ShippingMethodRef {
            id: method.id.clone(),
            name: method.name.clone(),
            description: method.description.clone(),
        });
        state.recompute();
        let order = state.order_mut();
        // The real response selects no line detail worth keeping.
        Ok(OrderPatch {
            id: Some(order.id.clone()),
            total: Some(order.total),
            total_with_tax: Some(order.total_with_tax),
            shipping: Some(order.shipping),
            shipping_with_tax: Some(order.shipping_with_tax),
            shipping_method: order.shipping_method.clone(),
            ..OrderPatch::default()
        })
    }

    async fn eligible_payment_methods(&self) -> Result<Vec<PaymentMethod>, CommerceError> {
        let mut state = self.state.lock().unwrap();
        state.record("eligible_payment_methods")?;
        Ok(vec![PaymentMethod {
            id: "1".to_string(),
            code: "cash".to_string(),
            name: "COD".to_string(),
            description: String::new(),
            is_eligible: true,
        }])
    }

    async fn add_payment(&self, input: &PaymentInput) -> Result<OrderState, CommerceError> {
        let mut state = self.state.lock().unwrap();
        state.record("add_payment")?;
        state.payments.push(input.method.clone());
        let order = state.order_mut();
        order.state = OrderState::PaymentAuthorized;
        Ok(order.state.clone())
    }

    async fn store_address(&self) -> Result<Option<String>, CommerceError> {
        let mut state = self.state.lock().unwrap();
        state.record("store_address")?;
        Ok(state.store_address.clone())
    }
}
