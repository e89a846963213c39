pub mod order_repository_sqlx;
pub mod product_repository_sqlx;
pub mod session_repository_sqlx;
pub mod stock_repository_sqlx;
pub mod user_repository_sqlx;
