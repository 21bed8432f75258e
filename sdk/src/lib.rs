// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # IOST SDK Core Library
//!
//! Build, hash, sign and submit IOST transactions without a node-side
//! dependency. Everything up to submission is pure computation on owned
//! values; the node is only reached through [`client`].
//!
//! ## Architecture
//!
//! - **config**: Protocol constants and client defaults.
//! - **encoding**: The canonical byte encoder that feeds every hash.
//! - **crypto**: secp256k1 and Ed25519 keys and signatures, SHA3-256,
//!   the Koopman CRC.
//! - **identity**: Account ids, `name@permission` signer ids, accounts.
//! - **transaction**: Actions, amount limits, the three hash levels,
//!   signing and verification, node-reported status types.
//! - **client**: HTTP node client and receipt polling.
//!
//! ## Quick start
//!
//! ```
//! use iost_sdk::crypto::{Algorithm, KeyPair};
//! use iost_sdk::transaction::{ActionArg, Transaction};
//!
//! let admin = KeyPair::generate(Algorithm::Ed25519);
//! let mut tx = Transaction::new();
//! tx.add_action(
//!     "token.iost",
//!     "transfer",
//!     ["iost", "admin", "bob", "10.0", ""].map(ActionArg::from),
//! )
//! .unwrap()
//! .add_amount_limit("iost", "10")
//! .unwrap()
//! .add_publisher_signature("admin", &admin);
//!
//! assert!(tx.verify_self().is_ok());
//! ```

pub mod client;
pub mod config;
pub mod crypto;
pub mod encoding;
pub mod identity;
pub mod transaction;
