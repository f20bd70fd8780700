//! Password-wrapped key files.
//!
//! A key file is a small JSON document holding the curve, the public key and
//! the private key wrapped by [`KeyPair::encrypt_key`]. It is written with
//! owner-only permissions and refused on load if group or others have any
//! access to it.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use keyseal_crypto::{CryptoConfig, CurveKind, KeyPair};

/// On-disk key file contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFile {
    pub curve: CurveKind,
    pub public_key: String,
    /// Envelope of the hex private key.
    pub wrapped_private_key: String,
}

impl KeyFile {
    /// Wrap `keypair`'s private key under `password`.
    pub fn wrap(keypair: &KeyPair, password: &str) -> Result<Self> {
        Ok(Self {
            curve: keypair.curve(),
            public_key: keypair.public_key().to_string(),
            wrapped_private_key: keypair.encrypt_key(password)?,
        })
    }

    /// Unwrap into a key pair. The curve comes from the file, the KDF
    /// parameters from `config`.
    pub fn unwrap_keypair(&self, password: &str, config: CryptoConfig) -> Result<KeyPair> {
        let config = CryptoConfig {
            curve: self.curve,
            ..config
        };
        let keypair = KeyPair::from_wrapped(&self.wrapped_private_key, password, config)
            .context("Failed to unwrap private key (wrong password?)")?;
        if keypair.public_key() != self.public_key {
            bail!("Key file is inconsistent: unwrapped key does not match stored public key");
        }
        Ok(keypair)
    }

    /// Save to `path`, creating parent directories, with mode 0600 on Unix.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write key file {}", path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::info!(path = %path.display(), "key file saved");
        Ok(())
    }

    /// Load from `path`.
    ///
    /// On Unix, verifies no group or other permission bits are set before
    /// reading (0600 and 0400 are accepted).
    pub fn load(path: &Path) -> Result<Self> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let metadata = std::fs::metadata(path)
                .with_context(|| format!("Failed to stat key file {}", path.display()))?;
            let mode = metadata.permissions().mode() & 0o777;
            if mode & 0o077 != 0 {
                bail!(
                    "Key file {} has insecure permissions: {mode:o} (expected owner-only, e.g. 600)",
                    path.display()
                );
            }
        }

        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read key file {}", path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse key file {}", path.display()))
    }
}
