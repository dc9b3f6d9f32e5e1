pub mod address_search;
pub mod cart_store;
pub mod checkout;
pub mod contact;

#[cfg(test)]
pub(crate) mod fake;
