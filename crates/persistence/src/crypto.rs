// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Contact-info encryption at rest.
//!
//! Contact details are sealed with AES-256-GCM under a fresh random 96-bit
//! nonce and stored as `nonce || ciphertext || tag` in a single BLOB.

use ring::aead::{AES_256_GCM, Aad, LessSafeKey, NONCE_LEN, Nonce, UnboundKey};
use ring::rand::{SecureRandom, SystemRandom};

use crate::error::PersistenceError;

/// Length of an AES-256 key in bytes.
pub const KEY_LEN: usize = 32;

/// Seals and opens worker contact details.
pub struct ContactCipher {
    key: LessSafeKey,
    rng: SystemRandom,
}

impl std::fmt::Debug for ContactCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactCipher").finish_non_exhaustive()
    }
}

impl ContactCipher {
    /// Builds a cipher from raw key bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not exactly 32 bytes.
    pub fn from_bytes(key: &[u8]) -> Result<Self, PersistenceError> {
        if key.len() != KEY_LEN {
            return Err(PersistenceError::EncryptionError(format!(
                "contact key must be {KEY_LEN} bytes, got {}",
                key.len()
            )));
        }

        let unbound = UnboundKey::new(&AES_256_GCM, key).map_err(|_| {
            PersistenceError::EncryptionError("failed to create AES-256-GCM key".to_string())
        })?;

        Ok(Self {
            key: LessSafeKey::new(unbound),
            rng: SystemRandom::new(),
        })
    }

    /// Builds a cipher from a 64-character hex key.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid hex or decodes to the wrong length.
    pub fn from_hex(hex_key: &str) -> Result<Self, PersistenceError> {
        let bytes: Vec<u8> = hex::decode(hex_key.trim()).map_err(|e| {
            PersistenceError::EncryptionError(format!("contact key is not valid hex: {e}"))
        })?;
        Self::from_bytes(&bytes)
    }

    /// Builds a cipher with a random key that lives only as long as the process.
    ///
    /// # Errors
    ///
    /// Returns an error if the system RNG fails.
    pub fn ephemeral() -> Result<Self, PersistenceError> {
        let rng = SystemRandom::new();
        let mut key = [0u8; KEY_LEN];
        rng.fill(&mut key).map_err(|_| {
            PersistenceError::EncryptionError("failed to generate random key".to_string())
        })?;
        Self::from_bytes(&key)
    }

    /// Encrypts `plaintext`, returning `nonce || ciphertext || tag`.
    ///
    /// # Errors
    ///
    /// Returns an error if nonce generation or encryption fails.
    pub fn seal(&self, plaintext: &str) -> Result<Vec<u8>, PersistenceError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng.fill(&mut nonce_bytes).map_err(|_| {
            PersistenceError::EncryptionError("failed to generate random nonce".to_string())
        })?;

        let mut in_out: Vec<u8> = plaintext.as_bytes().to_vec();
        self.key
            .seal_in_place_append_tag(
                Nonce::assume_unique_for_key(nonce_bytes),
                Aad::empty(),
                &mut in_out,
            )
            .map_err(|_| PersistenceError::EncryptionError("encryption failed".to_string()))?;

        let mut sealed: Vec<u8> = Vec::with_capacity(NONCE_LEN + in_out.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&in_out);
        Ok(sealed)
    }

    /// Decrypts a value produced by [`ContactCipher::seal`].
    ///
    /// # Errors
    ///
    /// Returns an error if the blob is truncated, the key is wrong, the data
    /// was tampered with, or the plaintext is not UTF-8.
    pub fn open(&self, sealed: &[u8]) -> Result<String, PersistenceError> {
        if sealed.len() < NONCE_LEN {
            return Err(PersistenceError::EncryptionError(
                "sealed contact is truncated".to_string(),
            ));
        }

        let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
        let nonce = Nonce::try_assume_unique_for_key(nonce_bytes).map_err(|_| {
            PersistenceError::EncryptionError("sealed contact has a bad nonce".to_string())
        })?;

        let mut in_out: Vec<u8> = ciphertext.to_vec();
        let plaintext: &mut [u8] = self
            .key
            .open_in_place(nonce, Aad::empty(), &mut in_out)
            .map_err(|_| {
                PersistenceError::EncryptionError(
                    "decryption failed: wrong key or corrupted data".to_string(),
                )
            })?;

        String::from_utf8(plaintext.to_vec())
            .map_err(|e| PersistenceError::EncryptionError(format!("contact is not UTF-8: {e}")))
    }
}
