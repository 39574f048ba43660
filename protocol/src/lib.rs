// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Graphene Signing - Core Library
//!
//! Builds, cross-checks and signs BitShares (graphene) transactions without
//! the ledger's own client library. The hard part is not the cryptography,
//! it is byte-exactness: a signature is only useful if it covers exactly the
//! bytes the node will hash, so every transaction is serialized locally,
//! compared against the node's own serialization, and only then signed.
//!
//! ## Architecture
//!
//! - **codec** - Varints, little-endian integers, arrays, optionals, time.
//! - **crypto** - Hashes, checksummed base58, secp256k1 keys, canonical
//!   recoverable signatures.
//! - **chain** - Object ids, asset amounts, prices, asset options, memos.
//! - **operations** - The closed registry of supported operations and their
//!   wire schemas.
//! - **transaction** - Assembly, node cross-check, signing, verification.
//! - **node** - Query traits, JSON-RPC plumbing, fee schedules, the symbol
//!   cache and key-to-account authentication.
//! - **config** - Protocol constants and per-network chain parameters.
//!
//! ## Quick tour
//!
//! ```text
//! TransactionBuilder::new().header(..).operation(..).build()?   // Transaction
//! cross_check(tx, &node)?                                       // VerifiedTransaction
//! sign_transaction(&mut verified, &ChainParams::mainnet(), wif)? // &Transaction
//! ```
//!
//! Nothing here performs I/O. Node access goes through the traits in
//! [`node`], and the caller decides how requests travel.

pub mod chain;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod node;
pub mod operations;
pub mod transaction;
