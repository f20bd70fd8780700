//! Elliptic-curve key agreement.
//!
//! A [`Curve`] is constructed from the configured [`CurveKind`] and hands out
//! secret scalars and public points for that curve only. Mixing values from
//! two different curves is reported as a [`CryptoError::CurveError`].

use k256::elliptic_curve::sec1::ToEncodedPoint;
use rand::rngs::OsRng;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::{Zeroize, Zeroizing};

use crate::config::CurveKind;
use crate::error::CryptoError;

/// Length of private scalars on both supported curves.
pub const SCALAR_LEN: usize = 32;

/// ECDH engine for a single named curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Curve {
    kind: CurveKind,
}

/// A private scalar on one of the supported curves.
pub enum SecretScalar {
    X25519(StaticSecret),
    Secp256k1(k256::SecretKey),
}

/// A public point on one of the supported curves.
#[derive(Clone, PartialEq, Eq)]
pub enum PublicPoint {
    X25519(PublicKey),
    Secp256k1(k256::PublicKey),
}

impl std::fmt::Debug for SecretScalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretScalar")
            .field("curve", &self.kind())
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl std::fmt::Debug for PublicPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicPoint")
            .field("curve", &self.kind())
            .field("point", &hex::encode(self.to_bytes()))
            .finish()
    }
}

impl Curve {
    pub const fn new(kind: CurveKind) -> Self {
        Self { kind }
    }

    pub const fn kind(&self) -> CurveKind {
        self.kind
    }

    /// Generate a new random private scalar.
    pub fn generate(&self) -> SecretScalar {
        tracing::trace!(curve = %self.kind, "generating key pair");
        match self.kind {
            CurveKind::X25519 => SecretScalar::X25519(StaticSecret::random_from_rng(OsRng)),
            CurveKind::Secp256k1 => SecretScalar::Secp256k1(k256::SecretKey::random(&mut OsRng)),
        }
    }

    /// Load a private scalar from its 32-byte big-endian (secp256k1) or raw
    /// (x25519) encoding.
    pub fn secret_from_bytes(&self, bytes: &[u8]) -> Result<SecretScalar, CryptoError> {
        if bytes.len() != SCALAR_LEN {
            return Err(CryptoError::CurveError(format!(
                "invalid private key length: expected {SCALAR_LEN}, got {}",
                bytes.len()
            )));
        }
        match self.kind {
            CurveKind::X25519 => {
                let mut arr = [0u8; SCALAR_LEN];
                arr.copy_from_slice(bytes);
                let secret = StaticSecret::from(arr);
                arr.zeroize();
                Ok(SecretScalar::X25519(secret))
            }
            CurveKind::Secp256k1 => k256::SecretKey::from_slice(bytes)
                .map(SecretScalar::Secp256k1)
                .map_err(|_| CryptoError::CurveError("private scalar out of range".into())),
        }
    }

    /// Load a peer's public point from its byte encoding.
    ///
    /// x25519 points are the 32-byte u-coordinate; secp256k1 points are SEC1,
    /// compressed or uncompressed.
    pub fn public_from_bytes(&self, bytes: &[u8]) -> Result<PublicPoint, CryptoError> {
        match self.kind {
            CurveKind::X25519 => {
                let arr: [u8; 32] = bytes.try_into().map_err(|_| {
                    CryptoError::CurveError(format!(
                        "invalid x25519 public key length: expected 32, got {}",
                        bytes.len()
                    ))
                })?;
                Ok(PublicPoint::X25519(PublicKey::from(arr)))
            }
            CurveKind::Secp256k1 => k256::PublicKey::from_sec1_bytes(bytes)
                .map(PublicPoint::Secp256k1)
                .map_err(|_| CryptoError::CurveError("point is not on secp256k1".into())),
        }
    }

    /// Diffie-Hellman: multiply `public` by `secret` and return the shared
    /// x-coordinate bytes.
    pub fn derive(
        &self,
        secret: &SecretScalar,
        public: &PublicPoint,
    ) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        match (secret, public) {
            (SecretScalar::X25519(s), PublicPoint::X25519(p)) => {
                let shared = s.diffie_hellman(p);
                if !shared.was_contributory() {
                    return Err(CryptoError::CurveError(
                        "peer public key is a low-order point".into(),
                    ));
                }
                Ok(Zeroizing::new(shared.as_bytes().to_vec()))
            }
            (SecretScalar::Secp256k1(s), PublicPoint::Secp256k1(p)) => {
                let shared = k256::ecdh::diffie_hellman(s.to_nonzero_scalar(), p.as_affine());
                Ok(Zeroizing::new(shared.raw_secret_bytes().to_vec()))
            }
            _ => Err(CryptoError::CurveError(format!(
                "curve mismatch: {} secret with {} public key",
                secret.kind(),
                public.kind()
            ))),
        }
    }
}

impl SecretScalar {
    pub const fn kind(&self) -> CurveKind {
        match self {
            Self::X25519(_) => CurveKind::X25519,
            Self::Secp256k1(_) => CurveKind::Secp256k1,
        }
    }

    /// The public point matching this scalar.
    pub fn public_point(&self) -> PublicPoint {
        match self {
            Self::X25519(s) => PublicPoint::X25519(PublicKey::from(s)),
            Self::Secp256k1(s) => PublicPoint::Secp256k1(s.public_key()),
        }
    }

    /// Raw scalar bytes. Handle with care.
    pub fn to_bytes(&self) -> Zeroizing<Vec<u8>> {
        match self {
            Self::X25519(s) => Zeroizing::new(s.to_bytes().to_vec()),
            Self::Secp256k1(s) => Zeroizing::new(s.to_bytes().to_vec()),
        }
    }
}

impl PublicPoint {
    pub const fn kind(&self) -> CurveKind {
        match self {
            Self::X25519(_) => CurveKind::X25519,
            Self::Secp256k1(_) => CurveKind::Secp256k1,
        }
    }

    /// Byte encoding of the point: raw u-coordinate for x25519, uncompressed
    /// SEC1 for secp256k1.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::X25519(p) => p.as_bytes().to_vec(),
            Self::Secp256k1(p) => p.to_encoded_point(false).as_bytes().to_vec(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const CURVES: [CurveKind; 2] = [CurveKind::X25519, CurveKind::Secp256k1];

    #[test]
    fn shared_secret_is_symmetric() {
        for kind in CURVES {
            let curve = Curve::new(kind);
            let a = curve.generate();
            let b = curve.generate();

            let ab = curve.derive(&a, &b.public_point()).unwrap();
            let ba = curve.derive(&b, &a.public_point()).unwrap();
            assert_eq!(*ab, *ba, "{kind}");
            assert_eq!(ab.len(), 32);
        }
    }

    #[test]
    fn secret_bytes_roundtrip() {
        for kind in CURVES {
            let curve = Curve::new(kind);
            let secret = curve.generate();
            let restored = curve.secret_from_bytes(&secret.to_bytes()).unwrap();
            assert_eq!(restored.public_point(), secret.public_point(), "{kind}");
        }
    }

    #[test]
    fn public_bytes_roundtrip() {
        for kind in CURVES {
            let curve = Curve::new(kind);
            let public = curve.generate().public_point();
            let restored = curve.public_from_bytes(&public.to_bytes()).unwrap();
            assert_eq!(restored, public, "{kind}");
        }
    }

    #[test]
    fn point_encoding_lengths() {
        assert_eq!(Curve::new(CurveKind::X25519).generate().public_point().to_bytes().len(), 32);
        assert_eq!(
            Curve::new(CurveKind::Secp256k1).generate().public_point().to_bytes().len(),
            65
        );
    }

    #[test]
    fn secret_from_bytes_rejects_wrong_length() {
        let err = Curve::new(CurveKind::X25519).secret_from_bytes(&[1u8; 16]).unwrap_err();
        assert!(matches!(err, CryptoError::CurveError(_)));
    }

    #[test]
    fn secp256k1_rejects_zero_scalar() {
        let err = Curve::new(CurveKind::Secp256k1).secret_from_bytes(&[0u8; 32]).unwrap_err();
        assert!(matches!(err, CryptoError::CurveError(_)));
    }

    #[test]
    fn secp256k1_rejects_point_off_curve() {
        let mut bogus = [0u8; 65];
        bogus[0] = 0x04;
        bogus[64] = 0x07;
        let err = Curve::new(CurveKind::Secp256k1).public_from_bytes(&bogus).unwrap_err();
        assert!(matches!(err, CryptoError::CurveError(_)));
    }

    #[test]
    fn x25519_rejects_wrong_point_length() {
        let err = Curve::new(CurveKind::X25519).public_from_bytes(&[9u8; 31]).unwrap_err();
        assert!(matches!(err, CryptoError::CurveError(_)));
    }

    #[test]
    fn x25519_rejects_low_order_point() {
        let curve = Curve::new(CurveKind::X25519);
        let secret = curve.generate();
        let zero = curve.public_from_bytes(&[0u8; 32]).unwrap();
        assert!(matches!(curve.derive(&secret, &zero), Err(CryptoError::CurveError(_))));
    }

    #[test]
    fn derive_rejects_curve_mismatch() {
        let x = Curve::new(CurveKind::X25519);
        let k = Curve::new(CurveKind::Secp256k1);
        let secret = x.generate();
        let public = k.generate().public_point();
        assert!(matches!(x.derive(&secret, &public), Err(CryptoError::CurveError(_))));
    }

    #[test]
    fn debug_redacts_secret() {
        let secret = Curve::new(CurveKind::X25519).generate();
        let out = format!("{secret:?}");
        assert!(out.contains("[REDACTED]"));
        assert!(!out.contains(&hex::encode(&*secret.to_bytes())));
    }
}
