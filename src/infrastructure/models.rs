//! Wire shapes of the shop API and their conversions into domain types.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::{Collection, CollectionProducts, Product};
use crate::domain::order::{
    Asset, Customer, Discount, Order, OrderLine, OrderPatch, OrderState, PaymentMethod,
    ProductRef, ProductVariant, ShippingAddress, ShippingMethod, ShippingMethodRef,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub id: String,
    pub code: Option<String>,
    pub state: Option<String>,
    pub total: Option<i64>,
    pub total_with_tax: Option<i64>,
    pub currency_code: Option<String>,
    pub shipping: Option<i64>,
    pub shipping_with_tax: Option<i64>,
    pub lines: Option<Vec<OrderLineDto>>,
    pub shipping_address: Option<AddressDto>,
    pub shipping_method: Option<ShippingMethodRefDto>,
    pub customer: Option<CustomerDto>,
    pub discounts: Option<Vec<DiscountDto>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountDto {
    #[serde(default)]
    pub adjustment_source: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub amount_with_tax: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineDto {
    pub id: String,
    pub quantity: u32,
    pub product_variant: VariantDto,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantDto {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub price_with_tax: i64,
    #[serde(default)]
    pub currency_code: String,
    pub product: Option<ProductDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub featured_asset: Option<AssetDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AssetDto {
    pub id: String,
    pub name: String,
    pub source: String,
    pub preview: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AddressDto {
    pub full_name: Option<String>,
    pub company: Option<String>,
    pub street_line1: Option<String>,
    pub street_line2: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub postal_code: Option<String>,
    pub country_code: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingMethodRefDto {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email_address: String,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingMethodDto {
    pub id: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub price_with_tax: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodDto {
    pub id: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_eligible: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionDto {
    pub id: String,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VariantListDto {
    pub items: Vec<VariantDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionProductsDto {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub product_variants: VariantListDto,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailDto {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub featured_asset: Option<AssetDto>,
    #[serde(default)]
    pub variants: Vec<VariantDto>,
}

/// `CreateAddressInput` variables.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInputDto<'a> {
    pub full_name: &'a str,
    pub company: &'a str,
    pub street_line1: &'a str,
    pub street_line2: &'a str,
    pub city: &'a str,
    pub province: &'a str,
    pub postal_code: &'a str,
    pub country_code: &'a str,
    pub phone_number: &'a str,
}

impl<'a> From<&'a ShippingAddress> for AddressInputDto<'a> {
    fn from(a: &'a ShippingAddress) -> Self {
        AddressInputDto {
            full_name: &a.full_name,
            company: &a.company,
            street_line1: &a.street_line1,
            street_line2: &a.street_line2,
            city: &a.city,
            province: &a.province,
            postal_code: &a.postal_code,
            country_code: &a.country_code,
            phone_number: &a.phone_number,
        }
    }
}

// ── Conversions ──────────────────────────────────────────────────────────────

impl From<AssetDto> for Asset {
    fn from(a: AssetDto) -> Self {
        Asset {
            id: a.id,
            name: a.name,
            source: a.source,
            preview: a.preview,
            width: a.width,
            height: a.height,
        }
    }
}

impl From<ProductDto> for ProductRef {
    fn from(p: ProductDto) -> Self {
        ProductRef {
            id: p.id,
            name: p.name,
            slug: p.slug,
            description: p.description,
            featured_asset: p.featured_asset.map(Asset::from),
        }
    }
}

impl From<VariantDto> for ProductVariant {
    fn from(v: VariantDto) -> Self {
        ProductVariant {
            id: v.id,
            name: v.name,
            sku: v.sku,
            price: v.price,
            price_with_tax: v.price_with_tax,
            currency_code: v.currency_code,
            product: v.product.map(ProductRef::from),
        }
    }
}

impl From<OrderLineDto> for OrderLine {
    fn from(l: OrderLineDto) -> Self {
        OrderLine {
            id: l.id,
            quantity: l.quantity,
            product_variant: l.product_variant.into(),
        }
    }
}

impl From<AddressDto> for ShippingAddress {
    fn from(a: AddressDto) -> Self {
        ShippingAddress {
            full_name: a.full_name.unwrap_or_default(),
            phone_number: a.phone_number.unwrap_or_default(),
            street_line1: a.street_line1.unwrap_or_default(),
            street_line2: a.street_line2.unwrap_or_default(),
            city: a.city.unwrap_or_default(),
            province: a.province.unwrap_or_default(),
            postal_code: a.postal_code.unwrap_or_default(),
            country_code: a.country_code.unwrap_or_default(),
            company: a.company.unwrap_or_default(),
        }
    }
}

impl From<ShippingMethodRefDto> for ShippingMethodRef {
    fn from(m: ShippingMethodRefDto) -> Self {
        ShippingMethodRef {
            id: m.id,
            name: m.name,
            description: m.description,
        }
    }
}

impl From<CustomerDto> for Customer {
    fn from(c: CustomerDto) -> Self {
        Customer {
            id: c.id,
            first_name: c.first_name,
            last_name: c.last_name,
            email_address: c.email_address,
            phone_number: c.phone_number,
        }
    }
}

impl From<OrderDto> for Order {
    fn from(o: OrderDto) -> Self {
        Order {
            id: o.id,
            code: o.code.unwrap_or_default(),
            state: o.state.as_deref().map(OrderState::parse).unwrap_or_default(),
            total: o.total.unwrap_or_default(),
            total_with_tax: o.total_with_tax.unwrap_or_default(),
            currency_code: o.currency_code.unwrap_or_default(),
            lines: o
                .lines
                .unwrap_or_default()
                .into_iter()
                .map(OrderLine::from)
                .collect(),
            shipping: o.shipping.unwrap_or_default(),
            shipping_with_tax: o.shipping_with_tax.unwrap_or_default(),
            shipping_address: o.shipping_address.map(ShippingAddress::from),
            shipping_method: o.shipping_method.map(ShippingMethodRef::from),
            customer: o.customer.map(Customer::from),
            discounts: o
                .discounts
                .unwrap_or_default()
                .into_iter()
                .map(Discount::from)
                .collect(),
        }
    }
}

impl From<OrderDto> for OrderPatch {
    fn from(o: OrderDto) -> Self {
        OrderPatch {
            id: Some(o.id),
            code: o.code,
            state: o.state.as_deref().map(OrderState::parse),
            total: o.total,
            total_with_tax: o.total_with_tax,
            shipping: o.shipping,
            shipping_with_tax: o.shipping_with_tax,
            shipping_method: o.shipping_method.map(ShippingMethodRef::from),
            lines: o
                .lines
                .map(|lines| lines.into_iter().map(OrderLine::from).collect()),
        }
    }
}

impl From<ShippingMethodDto> for ShippingMethod {
    fn from(m: ShippingMethodDto) -> Self {
        ShippingMethod {
            id: m.id,
            code: m.code,
            name: m.name,
            description: m.description,
            price: m.price,
            price_with_tax: m.price_with_tax,
        }
    }
}

impl From<PaymentMethodDto> for PaymentMethod {
    fn from(m: PaymentMethodDto) -> Self {
        PaymentMethod {
            id: m.id,
            code: m.code,
            name: m.name,
            description: m.description,
            is_eligible: m.is_eligible,
        }
    }
}

impl From<DiscountDto> for Discount {
    fn from(d: DiscountDto) -> Self {
        Discount {
            source: d.adjustment_source,
            description: d.description,
            amount: d.amount,
            amount_with_tax: d.amount_with_tax,
        }
    }
}

impl From<CollectionProductsDto> for CollectionProducts {
    fn from(c: CollectionProductsDto) -> Self {
        CollectionProducts {
            id: c.id,
            name: c.name,
            description: c.description,
            variants: c
                .product_variants
                .items
                .into_iter()
                .map(ProductVariant::from)
                .collect(),
        }
    }
}

/// Variants of a product query do not repeat their product; it is filled in
/// so every variant can be shown on its own.
impl From<ProductDetailDto> for Product {
    fn from(p: ProductDetailDto) -> Self {
        let featured_asset = p.featured_asset.map(Asset::from);
        let product_ref = ProductRef {
            id: p.id.clone(),
            name: p.name.clone(),
            slug: p.slug.clone(),
            description: p.description.clone(),
            featured_asset: featured_asset.clone(),
        };
        Product {
            id: p.id,
            name: p.name,
            slug: p.slug,
            description: p.description,
            featured_asset,
            variants: p
                .variants
                .into_iter()
                .map(|v| {
                    let mut variant = ProductVariant::from(v);
                    variant.product.get_or_insert_with(|| product_ref.clone());
                    variant
                })
                .collect(),
        }
    }
}

impl From<CollectionDto> for Collection {
    fn from(c: CollectionDto) -> Self {
        Collection {
            id: c.id,
            name: c.name,
            slug: c.slug,
        }
    }
}
