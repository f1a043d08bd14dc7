//! Ed25519 keystore entries and call signing.
//!
//! A keystore entry is base64 of `flag ‖ secret`, where flag `0x00` selects
//! Ed25519 and the secret is 32 bytes. Entries are checked before the key is
//! used for anything, so a malformed key never reaches the ledger.

use std::env;
use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use client_blockchain_core::{Address, CallDescriptor, TransportError};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::RngCore;

use crate::error::KeyFormatError;

/// Scheme flag of an Ed25519 keystore entry.
pub const ED25519_FLAG: u8 = 0x00;
pub const SECRET_KEY_BYTES: usize = 32;
/// Decoded entry length: flag plus secret.
pub const KEYSTORE_ENTRY_BYTES: usize = 1 + SECRET_KEY_BYTES;

/// Environment variable holding the player's keystore entry.
pub const KEYSTORE_ENV: &str = "SUI_KEYSTORE_ENTRY";

/// Player signing key. The public key doubles as the player's address.
#[derive(Clone)]
pub struct SignerKey {
    signing: SigningKey,
}

impl SignerKey {
    pub fn from_secret(secret: [u8; SECRET_KEY_BYTES]) -> Self {
        Self {
            signing: SigningKey::from_bytes(&secret),
        }
    }

    /// Parses a base64 keystore entry.
    pub fn from_base64(entry: &str) -> Result<Self, KeyFormatError> {
        let bytes = STANDARD
            .decode(entry.trim())
            .map_err(|e| KeyFormatError::Base64(e.to_string()))?;
        if bytes.len() != KEYSTORE_ENTRY_BYTES {
            return Err(KeyFormatError::Length {
                expected: KEYSTORE_ENTRY_BYTES,
                actual: bytes.len(),
            });
        }
        if bytes[0] != ED25519_FLAG {
            return Err(KeyFormatError::Scheme(bytes[0]));
        }

        let mut secret = [0u8; SECRET_KEY_BYTES];
        secret.copy_from_slice(&bytes[1..]);
        Ok(Self::from_secret(secret))
    }

    /// Reads the entry stored in environment variable `var`, usually
    /// [`KEYSTORE_ENV`].
    pub fn from_env(var: &str) -> Result<Self, KeyFormatError> {
        let entry = env::var(var).map_err(|_| KeyFormatError::Missing(var.to_string()))?;
        Self::from_base64(&entry)
    }

    pub fn generate<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        let mut secret = [0u8; SECRET_KEY_BYTES];
        rng.fill_bytes(&mut secret);
        Self::from_secret(secret)
    }

    /// Keystore entry for this key.
    pub fn to_base64(&self) -> String {
        let mut bytes = Vec::with_capacity(KEYSTORE_ENTRY_BYTES);
        bytes.push(ED25519_FLAG);
        bytes.extend_from_slice(self.signing.as_bytes());
        STANDARD.encode(bytes)
    }

    pub fn address(&self) -> Address {
        Address(self.signing.verifying_key().to_bytes())
    }

    /// Sets the sender to this key's address and signs the call.
    pub fn sign(&self, call: CallDescriptor) -> Result<CallDescriptor, TransportError> {
        let mut call = call;
        call.sender = self.address();
        let signature = self.signing.sign(&call.signing_bytes()?);
        Ok(call.with_signature(signature.to_bytes().to_vec()))
    }
}

impl fmt::Debug for SignerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignerKey")
            .field("address", &self.address().to_string())
            .finish_non_exhaustive()
    }
}

/// Checks that `call.signature` is the sender's signature over the call.
pub fn verify_call(call: &CallDescriptor) -> Result<(), String> {
    let key = VerifyingKey::from_bytes(&call.sender.0).map_err(|e| e.to_string())?;
    let signature = Signature::from_slice(&call.signature).map_err(|e| e.to_string())?;
    let message = call.signing_bytes().map_err(|e| e.to_string())?;
    key.verify(&message, &signature).map_err(|e| e.to_string())
}
