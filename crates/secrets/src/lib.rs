/*
 * SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: LicenseRef-NvidiaProprietary
 *
 * NVIDIA CORPORATION, its affiliates and licensors retain all intellectual
 * property and proprietary rights in and to this material, related
 * documentation and any modifications thereto. Any use, reproduction,
 * disclosure or distribution of this material and related documentation
 * without an express license agreement from NVIDIA CORPORATION or
 * its affiliates is strictly prohibited.
 */

//! Reversible encryption for OLT passwords at rest.
//!
//! The service must replay passwords to the device, so hashing is off the
//! table; instead they are sealed with AES-256-GCM under a key derived from
//! `SESSION_SECRET`. Rotating the secret invalidates every stored password,
//! which is the intended failure mode.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use sha2::{Digest, Sha256};

const NONCE_LEN: usize = 12;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum CipherError {
    #[error("stored ciphertext is malformed")]
    Malformed,
    #[error("decryption failed (wrong key or tampered ciphertext)")]
    Decrypt,
}

/// Seals and opens password strings. Storage format:
/// `base64(nonce || ciphertext)`, fresh random 96-bit nonce per seal.
pub struct PasswordCipher {
    cipher: Aes256Gcm,
}

impl PasswordCipher {
    pub fn from_secret(secret: &str) -> Self {
        let digest = Sha256::digest(secret.as_bytes());
        let key = Key::<Aes256Gcm>::from_slice(&digest);
        Self {
            cipher: Aes256Gcm::new(key),
        }
    }

    pub fn encrypt(&self, plaintext: &str) -> String {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .expect("BUG: AES-GCM encryption of an in-memory buffer cannot fail");
        let mut sealed = nonce.to_vec();
        sealed.extend_from_slice(&ciphertext);
        BASE64.encode(sealed)
    }

    pub fn decrypt(&self, stored: &str) -> Result<String, CipherError> {
        let sealed = BASE64.decode(stored).map_err(|_| CipherError::Malformed)?;
        if sealed.len() <= NONCE_LEN {
            return Err(CipherError::Malformed);
        }
        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| CipherError::Decrypt)?;
        String::from_utf8(plaintext).map_err(|_| CipherError::Malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let cipher = PasswordCipher::from_secret("a-session-secret-of-sufficient-len");
        let sealed = cipher.encrypt("0lt-p4ssw0rd");
        assert_eq!(cipher.decrypt(&sealed).unwrap(), "0lt-p4ssw0rd");
    }

    #[test]
    fn nonces_differ_between_seals() {
        let cipher = PasswordCipher::from_secret("a-session-secret-of-sufficient-len");
        assert_ne!(cipher.encrypt("same"), cipher.encrypt("same"));
    }

    #[test]
    fn wrong_key_fails() {
        let sealer = PasswordCipher::from_secret("a-session-secret-of-sufficient-len");
        let opener = PasswordCipher::from_secret("a-different-secret-of-sufficient-l");
        let sealed = sealer.encrypt("secret");
        assert_eq!(opener.decrypt(&sealed), Err(CipherError::Decrypt));
    }

    #[test]
    fn tampering_is_detected() {
        let cipher = PasswordCipher::from_secret("a-session-secret-of-sufficient-len");
        let sealed = cipher.encrypt("secret");
        let mut bytes = BASE64.decode(&sealed).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let tampered = BASE64.encode(bytes);
        assert_eq!(cipher.decrypt(&tampered), Err(CipherError::Decrypt));
    }

    #[test]
    fn garbage_is_malformed() {
        let cipher = PasswordCipher::from_secret("a-session-secret-of-sufficient-len");
        assert_eq!(cipher.decrypt("not base64!!"), Err(CipherError::Malformed));
        assert_eq!(cipher.decrypt("AAAA"), Err(CipherError::Malformed));
    }
}
