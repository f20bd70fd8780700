//! Subcommand implementations.
//!
//! User-facing output uses writeln! to the supplied writer (stdout in the
//! binary), logs go through tracing.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use zeroize::Zeroizing;

use keyseal_crypto::{CryptoConfig, KeyPair, password};

use crate::keyfile::KeyFile;
use crate::prompt::{PasswordSource, read_input};

/// keyseal subcommands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Generate a key pair. Prints the public key.
    Generate {
        /// Write the password-wrapped key to this file. Without it the
        /// private key is printed in clear.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the public key stored in a key file.
    PublicKey {
        #[arg(long)]
        key: PathBuf,
    },
    /// Encrypt text under a key pair's self-derived master key.
    Encrypt {
        #[arg(long)]
        key: PathBuf,
        /// Text to encrypt (read from stdin when omitted).
        text: Option<String>,
    },
    /// Decrypt an envelope produced by `encrypt`.
    Decrypt {
        #[arg(long)]
        key: PathBuf,
        /// Envelope to decrypt (read from stdin when omitted).
        envelope: Option<String>,
    },
    /// Encrypt text under a password.
    EncryptPassword {
        text: Option<String>,
    },
    /// Decrypt an envelope produced by `encrypt-password`.
    DecryptPassword {
        envelope: Option<String>,
    },
    /// Compute the ECDH shared secret with a peer's public key.
    SharedSecret {
        #[arg(long)]
        key: PathBuf,
        /// Peer public key, lowercase hex.
        #[arg(long)]
        peer: String,
    },
}

/// Execute a subcommand.
pub fn run(
    command: Command,
    config: CryptoConfig,
    passwords: &dyn PasswordSource,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Command::Generate { out: path } => generate(path.as_deref(), config, passwords, out),
        Command::PublicKey { key } => {
            let file = KeyFile::load(&key)?;
            writeln!(out, "{}", file.public_key)?;
            Ok(())
        }
        Command::Encrypt { key, text } => {
            let keypair = open_keypair(&key, config, passwords)?;
            let envelope = keypair.encrypt(&read_input(text)?)?;
            writeln!(out, "{envelope}")?;
            Ok(())
        }
        Command::Decrypt { key, envelope } => {
            let keypair = open_keypair(&key, config, passwords)?;
            let plaintext = keypair.decrypt(read_input(envelope)?.trim())?;
            writeln!(out, "{plaintext}")?;
            Ok(())
        }
        Command::EncryptPassword { text } => {
            let text = read_input(text)?;
            let pw = passwords.password("Password", true)?;
            let envelope = password::encrypt_with_password_config(&text, &pw, &config.kdf)?;
            writeln!(out, "{envelope}")?;
            Ok(())
        }
        Command::DecryptPassword { envelope } => {
            let envelope = read_input(envelope)?;
            let pw = passwords.password("Password", false)?;
            let plaintext =
                password::decrypt_with_password_config(envelope.trim(), &pw, &config.kdf)?;
            writeln!(out, "{plaintext}")?;
            Ok(())
        }
        Command::SharedSecret { key, peer } => {
            let keypair = open_keypair(&key, config, passwords)?;
            let shared = Zeroizing::new(keypair.compute_key(peer.trim())?);
            writeln!(out, "{}", shared.as_str())?;
            Ok(())
        }
    }
}

fn generate(
    path: Option<&Path>,
    config: CryptoConfig,
    passwords: &dyn PasswordSource,
    out: &mut dyn Write,
) -> Result<()> {
    let keypair = KeyPair::generate_with(config)?;
    tracing::info!(curve = %keypair.curve(), "generated key pair");

    match path {
        Some(path) => {
            let pw = passwords.password("Password for the new key", true)?;
            KeyFile::wrap(&keypair, &pw)?.save(path)?;
            writeln!(out, "{}", keypair.public_key())?;
        }
        None => {
            tracing::warn!("no --out given, printing private key in clear");
            writeln!(out, "public:  {}", keypair.public_key())?;
            writeln!(out, "private: {}", keypair.private_key())?;
        }
    }
    Ok(())
}

fn open_keypair(
    path: &Path,
    config: CryptoConfig,
    passwords: &dyn PasswordSource,
) -> Result<KeyPair> {
    let file = KeyFile::load(path)?;
    let pw = passwords.password("Key password", false)?;
    file.unwrap_keypair(&pw, config)
        .with_context(|| format!("Failed to open key {}", path.display()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use keyseal_crypto::{CurveKind, KdfConfig, KdfDigest};

    use super::*;
    use crate::prompt::FixedPassword;

    fn fast_config() -> CryptoConfig {
        CryptoConfig {
            curve: CurveKind::X25519,
            kdf: KdfConfig {
                iterations: 10,
                digest: KdfDigest::Sha1,
            },
        }
    }

    fn run_to_string(command: Command, passwords: &dyn PasswordSource) -> Result<String> {
        let mut out = Vec::new();
        run(command, fast_config(), passwords, &mut out)?;
        Ok(String::from_utf8(out).unwrap().trim_end().to_string())
    }

    fn generate_key(dir: &Path, name: &str, pw: &FixedPassword) -> (PathBuf, String) {
        let path = dir.join(name);
        let public = run_to_string(
            Command::Generate {
                out: Some(path.clone()),
            },
            pw,
        )
        .unwrap();
        (path, public)
    }

    #[test]
    fn generate_then_public_key_matches() {
        let dir = tempfile::tempdir().unwrap();
        let pw = FixedPassword("pw".into());
        let (path, public) = generate_key(dir.path(), "a.json", &pw);

        let shown = run_to_string(Command::PublicKey { key: path }, &pw).unwrap();
        assert_eq!(shown, public);
        assert_eq!(public.len(), 64);
    }

    #[test]
    fn generate_without_out_prints_both_keys() {
        let output = run_to_string(
            Command::Generate { out: None },
            &FixedPassword("unused".into()),
        )
        .unwrap();
        assert!(output.contains("public:"));
        assert!(output.contains("private:"));
    }

    #[test]
    fn encrypt_decrypt_with_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let pw = FixedPassword("pw".into());
        let (path, _) = generate_key(dir.path(), "a.json", &pw);

        let envelope = run_to_string(
            Command::Encrypt {
                key: path.clone(),
                text: Some("attack at dawn".into()),
            },
            &pw,
        )
        .unwrap();
        let plaintext = run_to_string(
            Command::Decrypt {
                key: path,
                envelope: Some(envelope),
            },
            &pw,
        )
        .unwrap();
        assert_eq!(plaintext, "attack at dawn");
    }

    #[test]
    fn wrong_key_password_fails() {
        let dir = tempfile::tempdir().unwrap();
        let (path, _) = generate_key(dir.path(), "a.json", &FixedPassword("pw".into()));
        let result = run_to_string(
            Command::Encrypt {
                key: path,
                text: Some("x".into()),
            },
            &FixedPassword("other".into()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn password_envelope_roundtrip() {
        let pw = FixedPassword("correct-horse".into());
        let envelope = run_to_string(
            Command::EncryptPassword {
                text: Some("hello world".into()),
            },
            &pw,
        )
        .unwrap();
        let plaintext = run_to_string(
            Command::DecryptPassword {
                envelope: Some(envelope),
            },
            &pw,
        )
        .unwrap();
        assert_eq!(plaintext, "hello world");
    }

    #[test]
    fn shared_secret_agrees_between_key_files() {
        let dir = tempfile::tempdir().unwrap();
        let pw = FixedPassword("pw".into());
        let (a_path, a_public) = generate_key(dir.path(), "a.json", &pw);
        let (b_path, b_public) = generate_key(dir.path(), "b.json", &pw);

        let ab = run_to_string(
            Command::SharedSecret {
                key: a_path,
                peer: b_public,
            },
            &pw,
        )
        .unwrap();
        let ba = run_to_string(
            Command::SharedSecret {
                key: b_path,
                peer: a_public,
            },
            &pw,
        )
        .unwrap();
        assert_eq!(ab, ba);
        assert_eq!(ab.len(), 64);
    }
}
