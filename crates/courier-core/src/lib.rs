//! courier-core — shared types, node identity, and configuration.
//! All other courier crates depend on this one.

pub mod addr;
pub mod config;
pub mod identity;
pub mod key;

pub use addr::{AddrError, NodeAddr};
pub use config::{ConfigError, CourierConfig};
pub use identity::{IdentityError, Keypair};
pub use key::{KeyError, RecipientKey};
