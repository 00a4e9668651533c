mod health;
mod scout;

pub use health::{health_check, home, metrics_handler};
pub use scout::{scout_batch, scout_by_identifier, validate_url};
