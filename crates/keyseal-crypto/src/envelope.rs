//! Password-keyed symmetric envelope.
//!
//! An envelope is three standard-base64 segments joined by `.`:
//!
//! ```text
//! B64(ciphertext) "." B64(iv) "." B64(salt)
//! ```
//!
//! The AES-128 key is stretched from the secret with PBKDF2 over a fresh
//! 16-byte salt, and the plaintext is encrypted in CBC mode with PKCS#7
//! padding under a fresh 16-byte IV. There is no authentication tag: a
//! wrong secret is usually, but not always, caught by the padding check.

use std::fmt;
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use rand::rngs::OsRng;
use sha1::Sha1;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::config::{KdfConfig, KdfDigest};
use crate::error::CryptoError;

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

/// Salt length in bytes.
pub const SALT_SIZE: usize = 16;

/// IV length in bytes, one AES block.
pub const IV_SIZE: usize = 16;

/// Derived AES-128 key length in bytes.
pub const KEY_SIZE: usize = 16;

const BLOCK_SIZE: usize = 16;

const SEGMENTS: usize = 3;

/// A decoded envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// AES-128-CBC ciphertext, a multiple of the block size.
    pub ciphertext: Vec<u8>,
    pub iv: [u8; IV_SIZE],
    pub salt: [u8; SALT_SIZE],
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}",
            STANDARD.encode(&self.ciphertext),
            STANDARD.encode(self.iv),
            STANDARD.encode(self.salt)
        )
    }
}

impl FromStr for Envelope {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = s.split('.').collect();
        if segments.len() != SEGMENTS {
            return Err(CryptoError::CorruptedInput(format!(
                "expected {SEGMENTS} segments, found {}",
                segments.len()
            )));
        }

        let ciphertext = decode_segment("ciphertext", segments[0])?;
        let iv = decode_fixed::<IV_SIZE>("iv", segments[1])?;
        // Older writers appended a stray `}` after the salt.
        let salt_text = segments[2].strip_suffix('}').unwrap_or(segments[2]);
        let salt = decode_fixed::<SALT_SIZE>("salt", salt_text)?;

        Ok(Self {
            ciphertext,
            iv,
            salt,
        })
    }
}

fn decode_segment(name: &str, text: &str) -> Result<Vec<u8>, CryptoError> {
    STANDARD
        .decode(text)
        .map_err(|e| CryptoError::CorruptedInput(format!("{name} is not valid base64: {e}")))
}

fn decode_fixed<const N: usize>(name: &str, text: &str) -> Result<[u8; N], CryptoError> {
    let bytes = decode_segment(name, text)?;
    bytes.as_slice().try_into().map_err(|_| {
        CryptoError::CorruptedInput(format!(
            "{name} must be {N} bytes, got {}",
            bytes.len()
        ))
    })
}

/// Stretch `secret` into an AES-128 key with PBKDF2 over `salt`.
fn derive_key(
    secret: &[u8],
    salt: &[u8; SALT_SIZE],
    kdf: &KdfConfig,
) -> Result<Zeroizing<[u8; KEY_SIZE]>, CryptoError> {
    if kdf.iterations == 0 {
        return Err(CryptoError::KeyDerivationFailed(
            "iteration count must be at least 1".into(),
        ));
    }
    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    match kdf.digest {
        KdfDigest::Sha1 => {
            pbkdf2::pbkdf2_hmac::<Sha1>(secret, salt, kdf.iterations, &mut *key);
        }
        KdfDigest::Sha256 => {
            pbkdf2::pbkdf2_hmac::<Sha256>(secret, salt, kdf.iterations, &mut *key);
        }
    }
    Ok(key)
}

/// Encrypt `plaintext` under `secret` with a fresh salt and IV.
pub fn seal(secret: &[u8], plaintext: &[u8], kdf: &KdfConfig) -> Result<Envelope, CryptoError> {
    let mut salt = [0u8; SALT_SIZE];
    let mut iv = [0u8; IV_SIZE];
    OsRng.fill_bytes(&mut salt);
    OsRng.fill_bytes(&mut iv);

    let key = derive_key(secret, &salt, kdf)?;
    let ciphertext = Aes128CbcEnc::new_from_slices(&*key, &iv)
        .map_err(|e| CryptoError::KeyDerivationFailed(e.to_string()))?
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    tracing::trace!(
        plaintext_len = plaintext.len(),
        ciphertext_len = ciphertext.len(),
        "sealed envelope"
    );
    Ok(Envelope {
        ciphertext,
        iv,
        salt,
    })
}

/// Decrypt `envelope` under `secret`.
pub fn open(secret: &[u8], envelope: &Envelope, kdf: &KdfConfig) -> Result<Vec<u8>, CryptoError> {
    let len = envelope.ciphertext.len();
    if len == 0 || len % BLOCK_SIZE != 0 {
        return Err(CryptoError::DecryptionFailure(format!(
            "ciphertext length {len} is not a positive multiple of {BLOCK_SIZE}"
        )));
    }

    let key = derive_key(secret, &envelope.salt, kdf)?;
    Aes128CbcDec::new_from_slices(&*key, &envelope.iv)
        .map_err(|e| CryptoError::KeyDerivationFailed(e.to_string()))?
        .decrypt_padded_vec_mut::<Pkcs7>(&envelope.ciphertext)
        .map_err(|_| CryptoError::DecryptionFailure("invalid padding".into()))
}

/// Text-level seal: returns the envelope string.
pub(crate) fn seal_text(secret: &str, plaintext: &str, kdf: &KdfConfig) -> Result<String, CryptoError> {
    seal(secret.as_bytes(), plaintext.as_bytes(), kdf).map(|e| e.to_string())
}

/// Text-level open: parses the envelope string and returns UTF-8 plaintext.
pub(crate) fn open_text(secret: &str, envelope: &str, kdf: &KdfConfig) -> Result<String, CryptoError> {
    let envelope: Envelope = envelope.parse()?;
    let plaintext = open(secret.as_bytes(), &envelope, kdf)?;
    String::from_utf8(plaintext)
        .map_err(|_| CryptoError::DecryptionFailure("plaintext is not valid UTF-8".into()))
}
