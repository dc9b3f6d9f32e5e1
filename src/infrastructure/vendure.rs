use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::domain::customer::CustomerInput;
use crate::domain::errors::CommerceError;
use crate::domain::order::{
    Order, OrderPatch, OrderState, PaymentInput, PaymentMethod, ShippingAddress, ShippingMethod,
};
use crate::domain::ports::CommerceApi;

use super::documents;
use super::models::{
    AddressDto, AddressInputDto, OrderDto, PaymentMethodDto, ShippingMethodDto,
};
use super::session::SessionClient;

/// [`CommerceApi`] over a Vendure shop API.
pub struct VendureGateway {
    client: SessionClient,
}

impl VendureGateway {
    pub fn new(client: SessionClient) -> Self {
        Self { client }
    }

    pub fn session(&self) -> &SessionClient {
        &self.client
    }

    async fn order_mutation(
        &self,
        operation: &str,
        variables: Value,
        field: &str,
    ) -> Result<Order, CommerceError> {
        let node = self.client.mutate_order(operation, variables, field).await?;
        Ok(decode::<OrderDto>(node)?.into())
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, CommerceError> {
    Ok(serde_json::from_value(value)?)
}

fn take(data: &mut Value, field: &str) -> Value {
    data.get_mut(field).map(Value::take).unwrap_or(Value::Null)
}

#[async_trait]
impl CommerceApi for VendureGateway {
    async fn active_order(&self) -> Result<Option<Order>, CommerceError> {
        let mut data = self.client.send(documents::ACTIVE_ORDER, json!({})).await?;
        let dto: Option<OrderDto> = decode(take(&mut data, "activeOrder"))?;
        Ok(dto.map(Order::from))
    }

    async fn transition_to_state(&self, state: OrderState) -> Result<(), CommerceError> {
        self.client
            .mutate_order(
                documents::TRANSITION_ORDER_TO_STATE,
                json!({ "state": state.as_str() }),
                "transitionOrderToState",
            )
            .await?;
        Ok(())
    }

    async fn add_item(&self, variant_id: &str, quantity: u32) -> Result<Order, CommerceError> {
        self.order_mutation(
            documents::ADD_ITEM_TO_ORDER,
            json!({ "productVariantId": variant_id, "quantity": quantity }),
            "addItemToOrder",
        )
        .await
    }

    async fn adjust_line(&self, line_id: &str, quantity: u32) -> Result<Order, CommerceError> {
        self.order_mutation(
            documents::ADJUST_ORDER_LINE,
            json!({ "orderLineId": line_id, "quantity": quantity }),
            "adjustOrderLine",
        )
        .await
    }

    async fn remove_line(&self, line_id: &str) -> Result<Order, CommerceError> {
        self.order_mutation(
            documents::REMOVE_ORDER_LINE,
            json!({ "orderLineId": line_id }),
            "removeOrderLine",
        )
        .await
    }

    async fn set_customer(&self, input: &CustomerInput) -> Result<(), CommerceError> {
        self.client
            .mutate_order(
                documents::SET_CUSTOMER_FOR_ORDER,
                json!({ "input": input }),
                "setCustomerForOrder",
            )
            .await?;
        Ok(())
    }

    async fn set_shipping_address(
        &self,
        address: &ShippingAddress,
    ) -> Result<ShippingAddress, CommerceError> {
        let mut node = self
            .client
            .mutate_order(
                documents::SET_ORDER_SHIPPING_ADDRESS,
                json!({ "input": AddressInputDto::from(address) }),
                "setOrderShippingAddress",
            )
            .await?;
        let stored: Option<AddressDto> = decode(take(&mut node, "shippingAddress"))?;
        Ok(stored.map(ShippingAddress::from).unwrap_or_else(|| address.clone()))
    }

    async fn eligible_shipping_methods(&self) -> Result<Vec<ShippingMethod>, CommerceError> {
        let mut data = self
            .client
            .send(documents::ELIGIBLE_SHIPPING_METHODS, json!({}))
            .await?;
        let methods: Option<Vec<ShippingMethodDto>> =
            decode(take(&mut data, "eligibleShippingMethods"))?;
        Ok(methods
            .unwrap_or_default()
            .into_iter()
            .map(ShippingMethod::from)
            .collect())
    }

    async fn set_shipping_method(&self, method_id: &str) -> Result<OrderPatch, CommerceError> {
        let node = self
            .client
            .mutate_order(
                documents::SET_ORDER_SHIPPING_METHOD,
                json!({ "shippingMethodId": [method_id] }),
                "setOrderShippingMethod",
            )
            .await?;
        Ok(decode::<OrderDto>(node)?.into())
    }

    async fn eligible_payment_methods(&self) -> Result<Vec<PaymentMethod>, CommerceError> {
        let mut data = self
            .client
            .send(documents::ELIGIBLE_PAYMENT_METHODS, json!({}))
            .await?;
        let methods: Option<Vec<PaymentMethodDto>> =
            decode(take(&mut data, "eligiblePaymentMethods"))?;
        Ok(methods
            .unwrap_or_default()
            .into_iter()
            .map(PaymentMethod::from)
            .collect())
    }

    async fn add_payment(&self, input: &PaymentInput) -> Result<OrderState, CommerceError> {
        let node = self
            .client
            .mutate_order(
                documents::ADD_PAYMENT_TO_ORDER,
                json!({ "input": { "method": input.method, "metadata": input.metadata } }),
                "addPaymentToOrder",
            )
            .await?;
        Ok(node
            .get("state")
            .and_then(Value::as_str)
            .map(OrderState::parse)
            .unwrap_or_default())
    }

    async fn store_address(&self) -> Result<Option<String>, CommerceError> {
        let data = self.client.send(documents::ACTIVE_CHANNEL, json!({})).await?;
        Ok(data
            .pointer("/activeChannel/customFields/storeAddress")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string))
    }
}
