use std::str::FromStr;

use crate::env_or;

/// How stored secrets are compared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SecretScheme {
    Bcrypt,
    /// Legacy rows holding the secret as-is. Compared in constant time.
    Plaintext,
}

impl FromStr for SecretScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bcrypt" => Ok(Self::Bcrypt),
            "plaintext" => Ok(Self::Plaintext),
            other => Err(format!("unknown secret scheme '{}'", other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecretConfig {
    pub scheme: SecretScheme,
    pub bcrypt_cost: u32,
}

impl SecretConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            scheme: env_or("SECRET_SCHEME", SecretScheme::Bcrypt),
            bcrypt_cost: env_or("BCRYPT_COST", 12),
        }
    }
}
