//! Read-only catalog entities. Variant ids found here are what the cart adds.

use serde::Serialize;

use super::order::{Asset, ProductVariant};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collection {
    pub id: String,
    pub name: String,
    pub slug: String,
}

/// A collection page: the collection and every variant listed in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionProducts {
    pub id: String,
    pub name: String,
    pub description: String,
    pub variants: Vec<ProductVariant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub featured_asset: Option<Asset>,
    pub variants: Vec<ProductVariant>,
}

impl Product {
    pub fn variant(&self, variant_id: &str) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| v.id == variant_id)
    }

    /// Lowest tax-inclusive price among the variants.
    pub fn price_from(&self) -> Option<i64> {
        self.variants.iter().map(|v| v.price_with_tax).min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::fixtures::variant;

    #[test]
    fn price_from_is_cheapest_variant() {
        let product = Product {
            id: "2".to_string(),
            name: "Ca hoi".to_string(),
            slug: "ca-hoi".to_string(),
            description: String::new(),
            featured_asset: None,
            variants: vec![variant("5", 330_000), variant("6", 180_000)],
        };
        assert_eq!(product.price_from(), Some(180_000));
        assert_eq!(product.variant("6").unwrap().price_with_tax, 180_000);
        assert!(product.variant("7").is_none());
    }
}
