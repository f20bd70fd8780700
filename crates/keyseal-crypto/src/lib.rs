//! keyseal cryptography library
//!
//! Elliptic-curve key pairs with a password-style symmetric envelope on top.
//!
//! ## Crypto primitives
//!
//! - **Curves**: X25519 (default) or secp256k1, chosen by [`CryptoConfig`]
//! - **Key agreement**: ECDH; [`KeyPair::compute_key`] for a peer, the
//!   self-derived [`KeyPair::master_key`] for local use
//! - **Envelope**: PBKDF2-HMAC (100 000 rounds, 16-byte salt) → AES-128-CBC,
//!   encoded as `b64(ciphertext).b64(iv).b64(salt)`. Confidentiality only,
//!   there is no MAC.
//! - **Public keys**: lowercase hex of the curve point encoding

pub mod config;
pub mod curve;
pub mod envelope;
pub mod error;
pub mod keypair;
pub mod password;
pub mod pubkey;

pub use config::{CryptoConfig, CurveKind, KdfConfig, KdfDigest, load_config};
pub use envelope::Envelope;
pub use error::{CryptoError, ErrorKind};
pub use keypair::KeyPair;
pub use password::{decrypt_key, decrypt_with_password, encrypt_with_password};
