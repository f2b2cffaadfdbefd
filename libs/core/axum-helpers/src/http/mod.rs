//! Cross-cutting HTTP layers applied by [`create_router`](crate::server::create_router).

pub mod cors;
pub mod panic;
pub mod security;

pub use cors::cors_layer_from_env;
pub use panic::panic_response;
pub use security::security_headers;
