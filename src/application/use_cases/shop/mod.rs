pub mod get_sale_product;
pub mod list_sale_products;
