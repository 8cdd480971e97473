pub mod types;
pub mod errors;
pub mod telemetry;
pub mod clients;

pub use types::*;
pub use errors::{ClientError, ClientResult};
