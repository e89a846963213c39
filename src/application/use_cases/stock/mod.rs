pub mod add_incoming;
pub mod adjust_stock;
pub mod get_stock_level;
pub mod list_transactions;
