pub mod create_order;
pub mod get_order;
pub mod list_orders;
pub mod lookup_order;
pub mod update_order_status;
