pub mod auth;
pub mod error;
pub mod health;
pub mod orders;
pub mod products;
pub mod shop;
pub mod stock;
