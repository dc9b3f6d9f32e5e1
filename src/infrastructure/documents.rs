//! GraphQL documents sent to the shop API.

macro_rules! order_fields {
    () => {
        r#"
        id
        code
        state
        total
        totalWithTax
        currencyCode
        shipping
        shippingWithTax
        lines {
          id
          quantity
          productVariant {
            id
            name
            sku
            price
            priceWithTax
            currencyCode
            product {
              id
              name
              slug
              description
              featuredAsset { id name source preview width height }
            }
          }
        }
        shippingAddress {
          fullName
          company
          streetLine1
          streetLine2
          city
          province
          postalCode
          countryCode
          phoneNumber
        }
        shippingMethod { id name description }
        customer { id firstName lastName emailAddress phoneNumber }
        discounts { adjustmentSource description amount amountWithTax }
        "#
    };
}

pub const ACTIVE_ORDER: &str = concat!(
    "query GetActiveOrder { activeOrder {",
    order_fields!(),
    "} }"
);

pub const ADD_ITEM_TO_ORDER: &str = concat!(
    "mutation AddItemToOrder($productVariantId: ID!, $quantity: Int!) {",
    " addItemToOrder(productVariantId: $productVariantId, quantity: $quantity) {",
    " ... on Order {",
    order_fields!(),
    "} ... on ErrorResult { errorCode message } } }"
);

pub const ADJUST_ORDER_LINE: &str = concat!(
    "mutation AdjustOrderLine($orderLineId: ID!, $quantity: Int!) {",
    " adjustOrderLine(orderLineId: $orderLineId, quantity: $quantity) {",
    " ... on Order {",
    order_fields!(),
    "} ... on ErrorResult { errorCode message } } }"
);

pub const REMOVE_ORDER_LINE: &str = concat!(
    "mutation RemoveOrderLine($orderLineId: ID!) {",
    " removeOrderLine(orderLineId: $orderLineId) {",
    " ... on Order {",
    order_fields!(),
    "} ... on ErrorResult { errorCode message } } }"
);

pub const TRANSITION_ORDER_TO_STATE: &str = r#"
  mutation TransitionOrderToState($state: String!) {
    transitionOrderToState(state: $state) {
      ... on Order { id state }
      ... on ErrorResult { errorCode message }
    }
  }
"#;

pub const SET_CUSTOMER_FOR_ORDER: &str = r#"
  mutation SetCustomerForOrder($input: CreateCustomerInput!) {
    setCustomerForOrder(input: $input) {
      ... on Order {
        id
        customer { id firstName lastName emailAddress phoneNumber }
      }
      ... on ErrorResult { errorCode message }
    }
  }
"#;

pub const SET_ORDER_SHIPPING_ADDRESS: &str = r#"
  mutation SetOrderShippingAddress($input: CreateAddressInput!) {
    setOrderShippingAddress(input: $input) {
      ... on Order {
        id
        shippingAddress {
          fullName
          company
          streetLine1
          streetLine2
          city
          province
          postalCode
          countryCode
          phoneNumber
        }
      }
      ... on ErrorResult { errorCode message }
    }
  }
"#;

pub const ELIGIBLE_SHIPPING_METHODS: &str = r#"
  query GetEligibleShippingMethods {
    eligibleShippingMethods { id code name description price priceWithTax }
  }
"#;

/// Selects only totals and thin lines; merged into the known order.
pub const SET_ORDER_SHIPPING_METHOD: &str = r#"
  mutation SetShippingMethod($shippingMethodId: [ID!]!) {
    setOrderShippingMethod(shippingMethodId: $shippingMethodId) {
      ... on Order {
        id
        code
        state
        total
        totalWithTax
        shipping
        shippingWithTax
        shippingMethod { id name description }
        lines {
          id
          quantity
          productVariant { id name sku price priceWithTax }
        }
      }
      ... on ErrorResult { errorCode message }
    }
  }
"#;

pub const ELIGIBLE_PAYMENT_METHODS: &str = r#"
  query GetEligiblePaymentMethods {
    eligiblePaymentMethods { id code name description isEligible }
  }
"#;

pub const ADD_PAYMENT_TO_ORDER: &str = r#"
  mutation AddPaymentToOrder($input: PaymentInput!) {
    addPaymentToOrder(input: $input) {
      ... on Order { id state }
      ... on ErrorResult { errorCode message }
    }
  }
"#;

pub const ACTIVE_CHANNEL: &str = r#"
  query ActiveChannel {
    activeChannel { id code customFields { storeAddress } }
  }
"#;

pub const COLLECTIONS: &str = r#"
  query GetCollections {
    collections { items { id name slug } }
  }
"#;

pub const COLLECTION_PRODUCTS: &str = r#"
  query GetCollectionWithVariants($slug: String!) {
    collection(slug: $slug) {
      id
      name
      description
      productVariants {
        items {
          id
          name
          priceWithTax
          currencyCode
          product {
            id
            name
            slug
            description
            featuredAsset { id preview source }
          }
        }
      }
    }
  }
"#;

pub const PRODUCT: &str = r#"
  query GetProduct($slug: String!) {
    product(slug: $slug) {
      id
      name
      slug
      description
      featuredAsset { id name source preview width height }
      variants { id sku name price priceWithTax currencyCode }
    }
  }
"#;
