pub mod order_repository;
pub mod product_repository;
pub mod session_repository;
pub mod stock_repository;
pub mod user_repository;
