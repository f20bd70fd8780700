//! Configuration resolution for keyseal.
//!
//! Implements hierarchical config resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/keyseal/config.json)
//! 3. Explicit config file (e.g. `--config` on the command line)
//! 4. Environment variables

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CryptoError;

/// PBKDF2 iteration count used when nothing else is configured.
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 100_000;

/// Complete keyseal configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CryptoConfig {
    #[serde(default)]
    pub curve: CurveKind,
    #[serde(default)]
    pub kdf: KdfConfig,
}

/// Elliptic curve used for key generation and agreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CurveKind {
    /// Curve25519 in Montgomery form (X25519).
    #[default]
    X25519,
    /// The SEC2 Koblitz curve secp256k1.
    Secp256k1,
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X25519 => f.write_str("x25519"),
            Self::Secp256k1 => f.write_str("secp256k1"),
        }
    }
}

impl FromStr for CurveKind {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x25519" | "curve25519" => Ok(Self::X25519),
            "secp256k1" | "k256" => Ok(Self::Secp256k1),
            other => Err(CryptoError::Config(format!("unknown curve: {other}"))),
        }
    }
}

/// PRF used inside PBKDF2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum KdfDigest {
    /// HMAC-SHA1. Matches envelopes produced by existing deployments.
    #[default]
    Sha1,
    Sha256,
}

impl FromStr for KdfDigest {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "").as_str() {
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            other => Err(CryptoError::Config(format!("unknown PBKDF2 digest: {other}"))),
        }
    }
}

/// Key-derivation parameters for the symmetric envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdfConfig {
    pub iterations: u32,
    pub digest: KdfDigest,
}

impl Default for KdfConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_PBKDF2_ITERATIONS,
            digest: KdfDigest::Sha1,
        }
    }
}

impl KdfConfig {
    /// Reject parameters PBKDF2 cannot run with.
    pub fn validate(&self) -> Result<(), CryptoError> {
        if self.iterations == 0 {
            return Err(CryptoError::Config(
                "PBKDF2 iteration count must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl CryptoConfig {
    pub fn validate(&self) -> Result<(), CryptoError> {
        self.kdf.validate()
    }
}

/// A config file as written on disk: every field is optional and only the
/// fields present override the layer below.
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigOverlay {
    curve: Option<CurveKind>,
    kdf: Option<KdfOverlay>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct KdfOverlay {
    iterations: Option<u32>,
    digest: Option<KdfDigest>,
}

/// Load configuration with hierarchical resolution.
pub fn load_config(explicit: Option<&Path>) -> Result<CryptoConfig, CryptoError> {
    resolve_config(
        global_config_path().as_deref(),
        explicit,
        |key| std::env::var(key).ok(),
    )
}

/// Resolve defaults, then `global` (skipped if absent on disk), then
/// `explicit`, then environment variables read through `lookup`.
fn resolve_config<F>(
    global: Option<&Path>,
    explicit: Option<&Path>,
    lookup: F,
) -> Result<CryptoConfig, CryptoError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = CryptoConfig::default();

    if let Some(global_path) = global {
        if global_path.exists() {
            merge_config(&mut config, read_overlay(global_path)?);
        }
    }

    if let Some(path) = explicit {
        merge_config(&mut config, read_overlay(path)?);
    }

    apply_env_overrides(&mut config, lookup)?;
    config.validate()?;

    tracing::debug!(curve = %config.curve, iterations = config.kdf.iterations, "configuration resolved");
    Ok(config)
}

/// Get the global config file path.
pub fn global_config_path() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .ok()
            .map(|h| PathBuf::from(h).join(".keyseal").join("config.json"))
    }
    #[cfg(target_os = "macos")]
    {
        std::env::var("HOME")
            .ok()
            .map(|h| PathBuf::from(h).join("Library/Application Support/keyseal/config.json"))
    }
    #[cfg(target_os = "linux")]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| std::env::var("HOME").ok().map(|h| PathBuf::from(h).join(".config")))
            .map(|p| p.join("keyseal").join("config.json"))
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
    {
        None
    }
}

/// Read and parse a single JSON config file, filling absent fields with
/// built-in defaults.
pub fn load_config_file(path: &Path) -> Result<CryptoConfig, CryptoError> {
    let mut config = CryptoConfig::default();
    merge_config(&mut config, read_overlay(path)?);
    Ok(config)
}

fn read_overlay(path: &Path) -> Result<ConfigOverlay, CryptoError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CryptoError::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        CryptoError::SerializationError(format!(
            "Failed to parse config file {}: {}",
            path.display(),
            e
        ))
    })
}

fn merge_config(base: &mut CryptoConfig, overlay: ConfigOverlay) {
    if let Some(curve) = overlay.curve {
        base.curve = curve;
    }
    if let Some(kdf) = overlay.kdf {
        if let Some(iterations) = kdf.iterations {
            base.kdf.iterations = iterations;
        }
        if let Some(digest) = kdf.digest {
            base.kdf.digest = digest;
        }
    }
}

/// Apply `KEYSEAL_*` overrides using `lookup` to read variables.
/// A malformed override is an error, not ignored.
fn apply_env_overrides<F>(config: &mut CryptoConfig, lookup: F) -> Result<(), CryptoError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("KEYSEAL_CURVE") {
        config.curve = val.parse()?;
    }
    if let Some(val) = lookup("KEYSEAL_PBKDF2_ITERATIONS") {
        config.kdf.iterations = val.parse().map_err(|e| {
            CryptoError::Config(format!("KEYSEAL_PBKDF2_ITERATIONS={val}: {e}"))
        })?;
    }
    if let Some(val) = lookup("KEYSEAL_PBKDF2_DIGEST") {
        config.kdf.digest = val.parse()?;
    }
    Ok(())
}
