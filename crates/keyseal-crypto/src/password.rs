//! Envelope encryption keyed directly by a password, without a key pair.

use crate::config::KdfConfig;
use crate::envelope;
use crate::error::CryptoError;

/// Encrypt `plaintext` under `password` with the default KDF parameters.
pub fn encrypt_with_password(plaintext: &str, password: &str) -> Result<String, CryptoError> {
    encrypt_with_password_config(plaintext, password, &KdfConfig::default())
}

/// Decrypt an envelope under `password` with the default KDF parameters.
pub fn decrypt_with_password(envelope: &str, password: &str) -> Result<String, CryptoError> {
    decrypt_with_password_config(envelope, password, &KdfConfig::default())
}

/// Recover a private key wrapped by [`crate::KeyPair::encrypt_key`].
pub fn decrypt_key(envelope: &str, password: &str) -> Result<String, CryptoError> {
    decrypt_with_password(envelope, password)
}

pub fn encrypt_with_password_config(
    plaintext: &str,
    password: &str,
    kdf: &KdfConfig,
) -> Result<String, CryptoError> {
    if plaintext.is_empty() {
        return Err(CryptoError::empty_argument("plaintext"));
    }
    if password.is_empty() {
        return Err(CryptoError::empty_argument("password"));
    }
    envelope::seal_text(password, plaintext, kdf)
}

pub fn decrypt_with_password_config(
    envelope: &str,
    password: &str,
    kdf: &KdfConfig,
) -> Result<String, CryptoError> {
    if envelope.is_empty() {
        return Err(CryptoError::empty_argument("envelope"));
    }
    if password.is_empty() {
        return Err(CryptoError::empty_argument("password"));
    }
    envelope::open_text(password, envelope, kdf)
}

pub fn decrypt_key_with_config(
    envelope: &str,
    password: &str,
    kdf: &KdfConfig,
) -> Result<String, CryptoError> {
    decrypt_with_password_config(envelope, password, kdf)
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::{CryptoConfig, CurveKind, KdfDigest};
    use crate::keypair::KeyPair;

    #[test]
    fn hello_world_roundtrip_with_default_parameters() {
        let envelope = encrypt_with_password("hello world", "correct-horse").unwrap();
        assert_eq!(
            decrypt_with_password(&envelope, "correct-horse").unwrap(),
            "hello world"
        );
    }

    #[test]
    fn wrong_password_is_decryption_failure() {
        let envelope = encrypt_with_password("hello world", "correct-horse").unwrap();
        match decrypt_with_password(&envelope, "wrong") {
            Err(CryptoError::DecryptionFailure(_)) => {}
            other => panic!("expected DecryptionFailure, got {other:?}"),
        }
    }

    #[test]
    fn decrypt_key_unwraps_default_keypair() {
        let kp = KeyPair::generate().unwrap();
        let wrapped = kp.encrypt_key("hunter2").unwrap();
        assert_eq!(decrypt_key(&wrapped, "hunter2").unwrap(), kp.private_key());
    }

    #[test]
    fn decrypt_key_unwraps_with_custom_parameters() {
        let config = CryptoConfig {
            curve: CurveKind::Secp256k1,
            kdf: KdfConfig {
                iterations: 25,
                digest: KdfDigest::Sha256,
            },
        };
        let kp = KeyPair::generate_with(config).unwrap();
        let wrapped = kp.encrypt_key("pw").unwrap();
        assert_eq!(
            decrypt_key_with_config(&wrapped, "pw", &config.kdf).unwrap(),
            kp.private_key()
        );
    }

    #[test]
    fn missing_arguments_are_invalid() {
        let kdf = KdfConfig {
            iterations: 10,
            digest: KdfDigest::Sha1,
        };
        for result in [
            encrypt_with_password_config("", "pw", &kdf),
            encrypt_with_password_config("text", "", &kdf),
            decrypt_with_password_config("", "pw", &kdf),
            decrypt_with_password_config("a.b.c", "", &kdf),
            decrypt_key_with_config("", "", &kdf),
        ] {
            assert!(matches!(result, Err(CryptoError::InvalidArgument(_))));
        }
    }

    #[test]
    fn extra_segments_are_corrupted_input() {
        let kdf = KdfConfig {
            iterations: 10,
            digest: KdfDigest::Sha1,
        };
        let envelope = encrypt_with_password_config("text", "pw", &kdf).unwrap();
        let err = decrypt_with_password_config(&format!("{envelope}.extra"), "pw", &kdf)
            .unwrap_err();
        assert!(matches!(err, CryptoError::CorruptedInput(_)));
    }
}
