//! Provider descriptor data structures and built-in endpoint tables.
//!
//! `descriptor` exposes validated metadata (`ProviderDescriptor`) covering HTTPS-only
//! endpoints and client credentials; `builtin` carries the endpoint tables for the
//! providers this crate knows out of the box.

/// Built-in provider endpoint tables.
pub mod builtin;
/// Descriptor value and builder utilities.
pub mod descriptor;

pub use builtin::*;
pub use descriptor::*;
