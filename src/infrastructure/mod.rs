pub mod catalog;
pub mod documents;
pub mod here;
pub mod models;
pub mod session;
pub mod token_store;
pub mod vendure;
