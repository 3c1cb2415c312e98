//! Signing service: canonical serialization plus Ed25519 signatures
//! attributed to an owner identity.

use serde::Serialize;

use crate::canonical::{canonical_bytes, signing_message};
use crate::crypto::{Blake3Hash, Ed25519PublicKey, Keypair};
use crate::envelope::{KeyedSignature, Signatures, Signed};
use crate::error::CoreError;
use crate::types::OwnerId;

/// Signs envelopes with a single service key on behalf of calculation owners.
#[derive(Debug, Clone)]
pub struct SigningService {
    key_id: String,
    keypair: Keypair,
}

impl SigningService {
    pub fn new(key_id: impl Into<String>, keypair: Keypair) -> Self {
        Self {
            key_id: key_id.into(),
            keypair,
        }
    }

    /// The `ed25519:<key id>` label attached to every signature.
    pub fn key_label(&self) -> String {
        format!("ed25519:{}", self.key_id)
    }

    pub fn public_key(&self) -> Ed25519PublicKey {
        self.keypair.public_key()
    }

    /// Sign the canonical form of `envelope` for `owner`.
    pub fn sign<T: Serialize + ?Sized>(
        &self,
        owner: &OwnerId,
        envelope: &T,
    ) -> Result<KeyedSignature, CoreError> {
        let canonical = canonical_bytes(envelope)?;
        tracing::debug!(
            owner = %owner,
            digest = %Blake3Hash::hash(&canonical),
            "signing envelope"
        );
        Ok(KeyedSignature {
            key: self.key_label(),
            value: self.keypair.sign(&signing_message(owner.as_str(), &canonical)),
        })
    }

    /// Sign `envelope` and attach the result under `signatures`.
    ///
    /// The signature covers the envelope exactly as passed in.
    pub fn attach<E: Serialize>(&self, owner: &OwnerId, envelope: E) -> Result<Signed<E>, CoreError> {
        let signature = self.sign(owner, &envelope)?;
        let mut signatures = Signatures::new();
        signatures.insert(owner.clone(), signature);
        Ok(Signed::new(envelope, signatures))
    }

    /// Verify a signed envelope against this service's key.
    pub fn verify<E: Serialize>(&self, owner: &OwnerId, signed: &Signed<E>) -> Result<(), CoreError> {
        signed.verify(owner, &self.public_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::Envelope;
    use serde_json::json;

    fn service() -> SigningService {
        SigningService::new("test", Keypair::from_seed(&[0x42; 32]))
    }

    fn envelope(z: f64) -> Envelope<serde_json::Value, serde_json::Value> {
        Envelope {
            input: json!({"x": 10.0, "y": 3.0}),
            output: json!({ "z": z }),
        }
    }

    #[test]
    fn test_attach_and_verify() {
        let svc = service();
        let owner = OwnerId::new("Another");
        let signed = svc.attach(&owner, envelope(13.0)).unwrap();

        assert_eq!(signed.signatures.len(), 1);
        assert_eq!(signed.signatures.get(&owner).unwrap().key, "ed25519:test");
        svc.verify(&owner, &signed).unwrap();
    }

    #[test]
    fn test_tampered_envelope_fails() {
        let svc = service();
        let owner = OwnerId::new("Another");
        let mut signed = svc.attach(&owner, envelope(13.0)).unwrap();
        signed.envelope.output = json!({"z": 14.0});

        assert!(matches!(
            svc.verify(&owner, &signed),
            Err(CoreError::InvalidSignature)
        ));
    }

    #[test]
    fn test_wrong_owner_fails() {
        let svc = service();
        let signed = svc.attach(&OwnerId::new("Another"), envelope(1.0)).unwrap();

        assert!(matches!(
            svc.verify(&OwnerId::new("A third"), &signed),
            Err(CoreError::MissingSignature(_))
        ));
    }

    #[test]
    fn test_signing_is_deterministic() {
        let svc = service();
        let owner = OwnerId::new("Another");
        let a = svc.attach(&owner, envelope(5.0)).unwrap();
        let b = svc.attach(&owner, envelope(5.0)).unwrap();
        assert_eq!(a.signatures, b.signatures);
        assert_eq!(a.digest().unwrap(), b.digest().unwrap());
    }

    #[test]
    fn test_unrepresentable_value_fails() {
        let svc = service();
        let result = svc.attach(&OwnerId::new("Another"), envelope(f64::INFINITY));
        assert!(matches!(result, Err(CoreError::NonFiniteFloat(_))));
    }
}
