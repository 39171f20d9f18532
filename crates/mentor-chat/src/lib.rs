//! Chat relay for an Azure-OpenAI-style completion endpoint.
//!
//! Wraps the caller's conversation with the operator system prompt, optionally
//! attaches a search data source for retrieval augmentation, and projects the
//! provider answer down to content plus citations.

pub mod prompts;
pub mod relay;
pub mod types;
pub mod wire;

pub use relay::{ChatRelay, REQUEST_TIMEOUT};
pub use types::*;
