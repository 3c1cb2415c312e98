//! # calcstack core
//!
//! Pure primitives for calcstack: envelopes, signatures, canonicalization,
//! diagnostics and fault records.
//!
//! This crate contains no pipeline logic and no I/O. It is pure computation
//! over the data structures a calculation produces.
//!
//! ## Key Types
//!
//! - [`Envelope`] / [`StackEnvelope`] - traceable `{input, output}` records
//! - [`Signed`] - an envelope extended with [`Signatures`]
//! - [`SigningService`] - Ed25519 signing keyed by owner identity
//! - [`Diagnostics`] - ordered, non-fatal warnings
//! - [`ContentFault`] / [`FaultRecord`] - business-logic failures
//!
//! ## Canonicalization
//!
//! Envelopes are signed over deterministic CBOR. See [`canonical`] module.

pub mod canonical;
pub mod crypto;
pub mod diagnostics;
pub mod envelope;
pub mod error;
pub mod fault;
pub mod schema;
pub mod signing;
pub mod types;

pub use canonical::{canonical_bytes, signing_message};
pub use crypto::{Blake3Hash, Ed25519PublicKey, Ed25519Signature, Keypair};
pub use diagnostics::{Diagnostics, DIAGNOSTICS_DELIMITER, DIAGNOSTICS_HEADER};
pub use envelope::{Envelope, Intermediates, KeyedSignature, Signatures, Signed, StackEnvelope};
pub use error::{CoreError, Result};
pub use fault::{ContentFault, FaultRecord, GENERIC_FAULT_KIND};
pub use schema::{Describe, FieldSpec, FieldType, InputSchema, ResponseSchema};
pub use signing::SigningService;
pub use types::{OwnerId, TraceId};
