mod preview;
mod routes;

pub use preview::*;
pub use routes::*;
