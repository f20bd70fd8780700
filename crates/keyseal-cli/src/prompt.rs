//! Password and text input.

use std::io::Read;

use anyhow::{Result, bail};
use dialoguer::Password;
use zeroize::Zeroizing;

/// Environment variable consulted before prompting for a password.
pub const PASSWORD_ENV: &str = "KEYSEAL_PASSWORD";

/// Where command handlers get passwords from.
pub trait PasswordSource {
    /// Obtain a password. `confirm` asks twice when prompting interactively.
    fn password(&self, prompt: &str, confirm: bool) -> Result<Zeroizing<String>>;
}

/// `KEYSEAL_PASSWORD` if set, otherwise a hidden terminal prompt.
#[derive(Debug, Default)]
pub struct EnvOrPrompt {
    pub non_interactive: bool,
}

impl PasswordSource for EnvOrPrompt {
    fn password(&self, prompt: &str, confirm: bool) -> Result<Zeroizing<String>> {
        if let Ok(value) = std::env::var(PASSWORD_ENV) {
            return Ok(Zeroizing::new(value));
        }
        if self.non_interactive {
            bail!("{PASSWORD_ENV} is not set and prompting is disabled");
        }
        let mut input = Password::new().with_prompt(prompt);
        if confirm {
            input = input.with_confirmation("Repeat password", "Passwords do not match");
        }
        Ok(Zeroizing::new(input.interact()?))
    }
}

/// A fixed password, for scripted use and tests.
#[derive(Debug)]
pub struct FixedPassword(pub String);

impl PasswordSource for FixedPassword {
    fn password(&self, _prompt: &str, _confirm: bool) -> Result<Zeroizing<String>> {
        Ok(Zeroizing::new(self.0.clone()))
    }
}

/// Use `arg` if given, otherwise read all of stdin with one trailing newline
/// removed.
pub fn read_input(arg: Option<String>) -> Result<String> {
    if let Some(text) = arg {
        return Ok(text);
    }
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    Ok(trim_newline(buf))
}

fn trim_newline(mut text: String) -> String {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    text
}
