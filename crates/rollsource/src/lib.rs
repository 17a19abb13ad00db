//! Seeded, cryptographically strong random source for dice rolling.
//!
//! [`RandomSource`] turns a `u64` seed into a ChaCha20 keystream and serves it
//! as little-endian `u64` values. The same nonzero seed always yields the same
//! sequence; a zero seed draws key material from the operating system.
//!
//! Mapping raw values onto a die range is left to the consumer, through
//! [`RandSource`] or the `rand` traits implemented for [`RandomSource`].
//!
//! ## Features
//! - `tracing`: emit spans and events for seeding, refills, and nonce
//!   rotation (enabled by default). Key material is never recorded.
//! - `serde`: serialize [`SourceState`] as raw bytes.

mod config;
mod derive;
mod error;
mod nonce;
mod rand_source;
mod source;
mod state;

pub use crate::config::*;
pub use crate::derive::KEY_LEN;
pub use crate::error::*;
pub use crate::nonce::*;
pub use crate::rand_source::*;
pub use crate::source::*;
pub use crate::state::*;
