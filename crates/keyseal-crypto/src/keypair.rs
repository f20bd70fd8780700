//! Asymmetric key pair with a symmetric envelope on top.
//!
//! A [`KeyPair`] holds a private scalar on the configured curve together
//! with three hex strings computed once at construction:
//!
//! - `public_key`: the point encoding, see [`crate::pubkey`];
//! - `private_key`: the raw scalar;
//! - `master_key`: Diffie-Hellman of the key pair with *its own* public
//!   point. It depends on the private key alone, so anyone holding the
//!   private key can recompute it. It keys [`KeyPair::encrypt`] and
//!   [`KeyPair::decrypt`] for local use.
//!
//! A secret shared with another party comes from [`KeyPair::compute_key`]
//! instead, which runs Diffie-Hellman against the peer's public key.

use zeroize::{Zeroize, Zeroizing};

use crate::config::{CryptoConfig, CurveKind};
use crate::curve::{Curve, SecretScalar};
use crate::envelope;
use crate::error::CryptoError;
use crate::password;
use crate::pubkey;

/// An elliptic-curve key pair.
pub struct KeyPair {
    config: CryptoConfig,
    curve: Curve,
    secret: SecretScalar,
    public_key: String,
    private_key: Zeroizing<String>,
    master_key: Zeroizing<String>,
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("curve", &self.curve.kind())
            .field("public_key", &self.public_key)
            .field("private_key", &"[REDACTED]")
            .field("master_key", &"[REDACTED]")
            .finish()
    }
}

impl KeyPair {
    /// Generate a new random key pair with the default configuration.
    pub fn generate() -> Result<Self, CryptoError> {
        Self::generate_with(CryptoConfig::default())
    }

    /// Generate a new random key pair on the configured curve.
    pub fn generate_with(config: CryptoConfig) -> Result<Self, CryptoError> {
        config.validate()?;
        let curve = Curve::new(config.curve);
        Self::from_secret(config, curve, curve.generate())
    }

    /// Import `imported` (hex private key) if given, otherwise generate.
    pub fn new(imported: Option<&str>) -> Result<Self, CryptoError> {
        Self::new_with(imported, CryptoConfig::default())
    }

    /// Like [`KeyPair::new`] with an explicit configuration.
    pub fn new_with(imported: Option<&str>, config: CryptoConfig) -> Result<Self, CryptoError> {
        match imported {
            Some(hex_key) => Self::from_private_hex(hex_key, config),
            None => Self::generate_with(config),
        }
    }

    /// Reconstruct from a hex-encoded private scalar.
    pub fn from_private_hex(hex_key: &str, config: CryptoConfig) -> Result<Self, CryptoError> {
        if hex_key.is_empty() {
            return Err(CryptoError::empty_argument("private key"));
        }
        config.validate()?;
        let mut bytes = hex::decode(hex_key).map_err(|e| {
            CryptoError::InvalidArgument(format!("private key is not valid hex: {e}"))
        })?;
        let curve = Curve::new(config.curve);
        let secret = curve.secret_from_bytes(&bytes);
        bytes.zeroize();
        Self::from_secret(config, curve, secret?)
    }

    /// Recover a key pair from a private key wrapped with [`KeyPair::encrypt_key`].
    pub fn from_wrapped(
        envelope: &str,
        password: &str,
        config: CryptoConfig,
    ) -> Result<Self, CryptoError> {
        let private_key = Zeroizing::new(password::decrypt_key_with_config(
            envelope,
            password,
            &config.kdf,
        )?);
        Self::from_private_hex(&private_key, config)
    }

    fn from_secret(
        config: CryptoConfig,
        curve: Curve,
        secret: SecretScalar,
    ) -> Result<Self, CryptoError> {
        let public = secret.public_point();
        let public_key = pubkey::encode(&public.to_bytes());
        let private_key = Zeroizing::new(hex::encode(&*secret.to_bytes()));
        let master_key = Zeroizing::new(hex::encode(&*curve.derive(&secret, &public)?));

        tracing::debug!(curve = %curve.kind(), public_key = %public_key, "key pair ready");
        Ok(Self {
            config,
            curve,
            secret,
            public_key,
            private_key,
            master_key,
        })
    }

    /// Hex encoding of the public point.
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Hex encoding of the private scalar. Handle with care.
    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    /// Hex self-derived secret keying [`KeyPair::encrypt`]. Handle with care.
    pub fn master_key(&self) -> &str {
        &self.master_key
    }

    pub const fn curve(&self) -> CurveKind {
        self.curve.kind()
    }

    pub const fn config(&self) -> &CryptoConfig {
        &self.config
    }

    /// Encrypt `plaintext` under the master key.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        if plaintext.is_empty() {
            return Err(CryptoError::empty_argument("plaintext"));
        }
        envelope::seal_text(&self.master_key, plaintext, &self.config.kdf)
    }

    /// Decrypt an envelope produced by [`KeyPair::encrypt`].
    pub fn decrypt(&self, envelope: &str) -> Result<String, CryptoError> {
        if envelope.is_empty() {
            return Err(CryptoError::empty_argument("envelope"));
        }
        envelope::open_text(&self.master_key, envelope, &self.config.kdf)
    }

    /// Wrap the private key under `password` for storage at rest.
    ///
    /// Unwrap with [`password::decrypt_key`].
    pub fn encrypt_key(&self, password: &str) -> Result<String, CryptoError> {
        if password.is_empty() {
            return Err(CryptoError::empty_argument("password"));
        }
        envelope::seal_text(password, &self.private_key, &self.config.kdf)
    }

    /// Diffie-Hellman with a peer's hex-encoded public key.
    ///
    /// Returns the hex shared secret; `a.compute_key(b.public_key())` equals
    /// `b.compute_key(a.public_key())`.
    pub fn compute_key(&self, session_public_key: &str) -> Result<String, CryptoError> {
        if session_public_key.is_empty() {
            return Err(CryptoError::empty_argument("session public key"));
        }
        let bytes = pubkey::decode_strict(session_public_key)?;
        let peer = self.curve.public_from_bytes(&bytes)?;
        let shared = self.curve.derive(&self.secret, &peer)?;
        Ok(hex::encode(&*shared))
    }
}
