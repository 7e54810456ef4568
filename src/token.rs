//! Token records and the token-endpoint exchange engine.

/// Token-endpoint requests and response normalization.
pub mod exchange;
/// Opaque token record model.
pub mod record;

pub use exchange::*;
pub use record::*;
