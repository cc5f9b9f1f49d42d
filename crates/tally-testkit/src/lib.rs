//! # Tally Testkit
//!
//! Testing utilities for Tally.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Fixed payloads with their expected canonical bytes
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: An issuer, a few funded users, and a ledger
//!
//! ## Golden Vectors
//!
//! ```rust
//! use tally_testkit::vectors::{all_vectors, verify_all_vectors};
//!
//! assert!(verify_all_vectors().is_empty());
//! for vector in all_vectors() {
//!     println!("{}: {}", vector.name, vector.payload().digest().to_hex());
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use tally_testkit::generators::tx_payload;
//!
//! proptest! {
//!     #[test]
//!     fn digest_is_deterministic(payload in tx_payload()) {
//!         prop_assert_eq!(payload.digest(), payload.clone().digest());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use tally_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::funded(&[100, 250]);
//! assert_eq!(fixture.balance_of(1), 250);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_clients, TestFixture};
pub use generators::{send_plan, tx_payload, SendStep};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
