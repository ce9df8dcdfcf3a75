mod health_check;
mod newsletter;
mod webhooks;

pub mod helpers;

pub use health_check::*;
pub use helpers::*;
pub use newsletter::*;
pub use webhooks::*;
