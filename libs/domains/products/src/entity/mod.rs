//! SeaORM entities for the `products` and `product_options` tables.

pub mod product;
pub mod product_option;
