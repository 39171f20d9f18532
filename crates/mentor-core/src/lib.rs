//! Research Mentor core: relay configuration and error types.

pub mod config;
pub mod error;

pub use config::{PublicConfig, QueryType, RelayConfig};
pub use error::{Error, Result};
