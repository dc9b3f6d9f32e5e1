pub mod address;
pub mod catalog;
pub mod customer;
pub mod errors;
pub mod order;
pub mod ports;
