pub mod configuration;
pub mod domain;
pub mod newsletter_delivery;
pub mod newsletter_pipeline;
pub mod routes;
pub mod startup;
pub mod telegram_client;
pub mod telemetry;
pub mod utils;

pub use routes::build_error_response;
pub use utils::error_chain_fmt;
