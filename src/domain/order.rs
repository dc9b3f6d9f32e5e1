use serde::Serialize;

/// Lifecycle state of the active order as reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum OrderState {
    #[default]
    AddingItems,
    ArrangingPayment,
    PaymentAuthorized,
    PaymentSettled,
    Other(String),
}

impl OrderState {
    pub fn parse(s: &str) -> Self {
        match s {
            "AddingItems" => OrderState::AddingItems,
            "ArrangingPayment" => OrderState::ArrangingPayment,
            "PaymentAuthorized" => OrderState::PaymentAuthorized,
            "PaymentSettled" => OrderState::PaymentSettled,
            other => OrderState::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            OrderState::AddingItems => "AddingItems",
            OrderState::ArrangingPayment => "ArrangingPayment",
            OrderState::PaymentAuthorized => "PaymentAuthorized",
            OrderState::PaymentSettled => "PaymentSettled",
            OrderState::Other(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub source: String,
    pub preview: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRef {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub featured_asset: Option<Asset>,
}

/// Read-only snapshot of the variant a line refers to. Replaced wholesale on
/// every successful mutation response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductVariant {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub price: i64,
    pub price_with_tax: i64,
    pub currency_code: String,
    pub product: Option<ProductRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    pub id: String,
    pub quantity: u32,
    pub product_variant: ProductVariant,
}

impl OrderLine {
    pub fn line_total_with_tax(&self) -> i64 {
        self.product_variant.price_with_tax * i64::from(self.quantity)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShippingAddress {
    pub full_name: String,
    pub phone_number: String,
    pub street_line1: String,
    pub street_line2: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub country_code: String,
    pub company: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShippingMethod {
    pub id: String,
    pub code: String,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub price_with_tax: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShippingMethodRef {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// A promotion applied to the order by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Discount {
    pub source: String,
    pub description: String,
    pub amount: i64,
    pub amount_with_tax: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub phone_number: Option<String>,
}

/// Client-side cached snapshot of the server-owned active order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Order {
    pub id: String,
    pub code: String,
    pub state: OrderState,
    pub total: i64,
    pub total_with_tax: i64,
    pub currency_code: String,
    pub lines: Vec<OrderLine>,
    pub shipping: i64,
    pub shipping_with_tax: i64,
    pub shipping_address: Option<ShippingAddress>,
    pub shipping_method: Option<ShippingMethodRef>,
    pub customer: Option<Customer>,
    pub discounts: Vec<Discount>,
}

impl Order {
    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn line(&self, line_id: &str) -> Option<&OrderLine> {
        self.lines.iter().find(|l| l.id == line_id)
    }

    pub fn items_total(&self) -> i64 {
        self.lines.iter().map(OrderLine::line_total_with_tax).sum()
    }

    /// Applies a partial order. Fields absent from the patch keep their
    /// current value; in particular an absent or empty line list never erases
    /// the lines already known.
    pub fn merge(&mut self, patch: OrderPatch) {
        if let Some(id) = patch.id {
            self.id = id;
        }
        if let Some(code) = patch.code {
            self.code = code;
        }
        if let Some(state) = patch.state {
            self.state = state;
        }
        if let Some(total) = patch.total {
            self.total = total;
        }
        if let Some(total_with_tax) = patch.total_with_tax {
            self.total_with_tax = total_with_tax;
        }
        if let Some(shipping) = patch.shipping {
            self.shipping = shipping;
        }
        if let Some(shipping_with_tax) = patch.shipping_with_tax {
            self.shipping_with_tax = shipping_with_tax;
        }
        if let Some(method) = patch.shipping_method {
            self.shipping_method = Some(method);
        }
        // Lines from a shipping-method response may lack product detail.
        if let Some(lines) = patch.lines {
            if !lines.is_empty() && self.lines.is_empty() {
                self.lines = lines;
            }
        }
    }

    /// Sum of the applied promotions, as a positive amount.
    pub fn discount_total(&self) -> i64 {
        self.discounts.iter().map(|d| d.amount_with_tax.abs()).sum()
    }

    pub fn totals(&self) -> Totals {
        Totals::compute(self.items_total(), self.shipping_with_tax, self.total_with_tax)
    }
}

/// Partial order as returned by mutations that select only a few fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderPatch {
    pub id: Option<String>,
    pub code: Option<String>,
    pub state: Option<OrderState>,
    pub total: Option<i64>,
    pub total_with_tax: Option<i64>,
    pub shipping: Option<i64>,
    pub shipping_with_tax: Option<i64>,
    pub shipping_method: Option<ShippingMethodRef>,
    pub lines: Option<Vec<OrderLine>>,
}

/// Display-only totals. The grand total is always the server's figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub items_total: i64,
    pub shipping_with_tax: i64,
    pub total_with_tax: i64,
    /// Present only when strictly positive.
    pub discount: Option<i64>,
}

impl Totals {
    pub fn compute(items_total: i64, shipping_with_tax: i64, total_with_tax: i64) -> Self {
        let discount = items_total + shipping_with_tax - total_with_tax;
        Totals {
            items_total,
            shipping_with_tax,
            total_with_tax,
            discount: (discount > 0).then_some(discount),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentMethod {
    pub id: String,
    pub code: String,
    pub name: String,
    pub description: String,
    pub is_eligible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentInput {
    pub method: String,
    pub metadata: serde_json::Value,
}
