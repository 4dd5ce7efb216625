pub mod clock;
pub mod config;
pub mod error;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::ServiceConfig;
pub use error::ServiceError;
pub use types::{format_rfc3339, now_rfc3339, parse_instant};
