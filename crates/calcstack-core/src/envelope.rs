//! Envelopes: the composite records a calculation returns.
//!
//! A rule produces `Signed<Envelope<I, O>>`, a stack produces
//! `Signed<StackEnvelope<I, O>>`. Both envelope shapes are plain generic
//! structs instantiated once per calculation type; nothing is synthesized per
//! call.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::ops::Deref;

use crate::canonical::{canonical_bytes, signing_message};
use crate::crypto::{Blake3Hash, Ed25519PublicKey, Ed25519Signature};
use crate::error::CoreError;
use crate::types::OwnerId;

/// Traceable result of a rule: the input it saw and the output it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<I, O> {
    pub input: I,
    pub output: O,
}

/// Traceable result of a stack, including every recorded sub-calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackEnvelope<I, O> {
    pub input: I,
    #[serde(default)]
    pub intermediates: Intermediates,
    pub output: O,
}

/// Ordered mapping of sub-calculation name to its recorded (signed) envelope.
///
/// Insertion order is the order in which the stack body invoked its
/// dependencies. Entries recorded from stacks carry their own
/// `intermediates`, so the structure nests as deep as the call tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Intermediates(Map<String, Value>);

impl Intermediates {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Record a result. Returns the replaced entry, if any.
    pub fn insert(&mut self, name: impl Into<String>, record: Value) -> Option<Value> {
        self.0.insert(name.into(), record)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Names in invocation order.
    pub fn names(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The intermediates recorded inside a nested stack entry.
    ///
    /// Returns `None` when `name` is absent or was recorded from a rule.
    pub fn nested(&self, name: &str) -> Option<Intermediates> {
        self.0
            .get(name)?
            .get("intermediates")?
            .as_object()
            .map(|m| Intermediates(m.clone()))
    }
}

/// A signature together with the key it was produced with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyedSignature {
    /// Key identifier, `ed25519:<key id>`.
    pub key: String,
    pub value: Ed25519Signature,
}

/// Mapping of signer identity to signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signatures(BTreeMap<OwnerId, KeyedSignature>);

impl Signatures {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, owner: OwnerId, signature: KeyedSignature) {
        self.0.insert(owner, signature);
    }

    pub fn get(&self, owner: &OwnerId) -> Option<&KeyedSignature> {
        self.0.get(owner)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn signers(&self) -> impl Iterator<Item = &OwnerId> {
        self.0.keys()
    }
}

/// An envelope extended with the signatures computed over it.
///
/// Serializes flat: the envelope's fields followed by `signatures`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signed<E> {
    #[serde(flatten)]
    pub envelope: E,
    pub signatures: Signatures,
}

impl<E> Signed<E> {
    pub fn new(envelope: E, signatures: Signatures) -> Self {
        Self {
            envelope,
            signatures,
        }
    }

    pub fn into_envelope(self) -> E {
        self.envelope
    }
}

impl<E: Serialize> Signed<E> {
    /// Verify the signature attributed to `owner` against `public_key`.
    ///
    /// Only the envelope is covered; `signatures` itself is not part of the
    /// signed message.
    pub fn verify(&self, owner: &OwnerId, public_key: &Ed25519PublicKey) -> Result<(), CoreError> {
        let signature = self
            .signatures
            .get(owner)
            .ok_or_else(|| CoreError::MissingSignature(owner.to_string()))?;
        let canonical = canonical_bytes(&self.envelope)?;
        public_key.verify(&signing_message(owner.as_str(), &canonical), &signature.value)
    }

    /// Blake3 digest of the canonical envelope bytes.
    pub fn digest(&self) -> Result<Blake3Hash, CoreError> {
        Ok(Blake3Hash::hash(&canonical_bytes(&self.envelope)?))
    }
}

impl<E> Deref for Signed<E> {
    type Target = E;

    fn deref(&self) -> &E {
        &self.envelope
    }
}
