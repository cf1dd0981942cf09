//! Server configuration module.
//!
//! This module provides configuration loading for the auth server from
//! environment variables.
//!
//! # Environment Variables
//!
//! - `AUTH_LISTEN_HOST`: Address to bind (default: `0.0.0.0`)
//! - `AUTH_LISTEN_PORT`: Port to listen on (default: `8080`)
//! - `AUTH_RSA_KEY_BITS`: Signing key modulus size (default: `2048`, minimum `2048`)
//! - `AUTH_HASH_MEMORY_KIB`: Argon2 memory cost in KiB (default: `19456`)
//! - `AUTH_HASH_ITERATIONS`: Argon2 iteration count (default: `2`)
//! - `AUTH_HASH_PARALLELISM`: Argon2 lanes (default: `1`)
//!
//! # Invariants
//!
//! - `listen_port` is always a valid port number (1-65535)
//! - `rsa_key_bits` is always within `MIN_RSA_KEY_BITS..=MAX_RSA_KEY_BITS`
//! - hashing costs are always accepted by Argon2

use std::net::IpAddr;

use crate::auth::HashingParams;

/// Server configuration.
///
/// # Post-conditions
///
/// When constructed via `from_env()` or `from_lookup()`:
/// - `listen_port` is in the valid range (1-65535)
/// - `rsa_key_bits` is a multiple of 8 within the allowed range
/// - `hashing` holds parameters Argon2 accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub listen_host: IpAddr,
    /// Port the HTTP listener binds to.
    pub listen_port: u16,
    /// Modulus size of the process-lifetime signing key.
    pub rsa_key_bits: usize,
    /// Work factor for password hashing.
    pub hashing: HashingParams,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl ServerConfig {
    /// Default port for the server.
    pub const DEFAULT_PORT: u16 = 8080;
    /// Default bind address.
    pub const DEFAULT_HOST: &'static str = "0.0.0.0";
    /// Default signing key size.
    pub const DEFAULT_RSA_KEY_BITS: usize = 2048;
    /// Smallest signing key accepted.
    pub const MIN_RSA_KEY_BITS: usize = 2048;
    /// Largest signing key accepted. Generation time grows steeply past this.
    pub const MAX_RSA_KEY_BITS: usize = 8192;

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is set to a value that fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unset variables fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is set to a value that fails validation.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_host = Self::load_listen_host(&lookup)?;
        let listen_port = Self::load_listen_port(&lookup)?;
        let rsa_key_bits = Self::load_rsa_key_bits(&lookup)?;
        let hashing = Self::load_hashing_params(&lookup)?;

        Ok(Self {
            listen_host,
            listen_port,
            rsa_key_bits,
            hashing,
        })
    }

    fn load_listen_host<F>(lookup: &F) -> Result<IpAddr, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = lookup("AUTH_LISTEN_HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_string());
        value.parse::<IpAddr>().map_err(|_| ConfigError::InvalidValue {
            name: "AUTH_LISTEN_HOST".to_string(),
            message: format!("'{value}' is not a valid IP address"),
        })
    }

    /// Load the listen port.
    ///
    /// Returns the default if not set.
    fn load_listen_port<F>(lookup: &F) -> Result<u16, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup("AUTH_LISTEN_PORT") {
            Some(value) => match value.parse::<u16>() {
                Ok(port) if port > 0 => Ok(port),
                _ => Err(ConfigError::InvalidValue {
                    name: "AUTH_LISTEN_PORT".to_string(),
                    message: format!("'{value}' is not a valid port number (must be 1-65535)"),
                }),
            },
            None => Ok(Self::DEFAULT_PORT),
        }
    }

    fn load_rsa_key_bits<F>(lookup: &F) -> Result<usize, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(value) = lookup("AUTH_RSA_KEY_BITS") else {
            return Ok(Self::DEFAULT_RSA_KEY_BITS);
        };
        let invalid = || ConfigError::InvalidValue {
            name: "AUTH_RSA_KEY_BITS".to_string(),
            message: format!(
                "'{value}' must be a multiple of 8 between {} and {}",
                Self::MIN_RSA_KEY_BITS,
                Self::MAX_RSA_KEY_BITS
            ),
        };
        let bits = value.parse::<usize>().map_err(|_| invalid())?;
        if !(Self::MIN_RSA_KEY_BITS..=Self::MAX_RSA_KEY_BITS).contains(&bits) || bits % 8 != 0 {
            return Err(invalid());
        }
        Ok(bits)
    }

    fn load_hashing_params<F>(lookup: &F) -> Result<HashingParams, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = HashingParams::default();
        let memory_kib = load_u32(lookup, "AUTH_HASH_MEMORY_KIB", defaults.memory_kib)?;
        let iterations = load_u32(lookup, "AUTH_HASH_ITERATIONS", defaults.iterations)?;
        let parallelism = load_u32(lookup, "AUTH_HASH_PARALLELISM", defaults.parallelism)?;

        let params = HashingParams {
            memory_kib,
            iterations,
            parallelism,
        };
        params.validate().map_err(|e| ConfigError::InvalidValue {
            name: "AUTH_HASH_*".to_string(),
            message: e.to_string(),
        })?;
        Ok(params)
    }
}

fn load_u32<F>(lookup: &F, name: &str, default: u32) -> Result<u32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) => value.parse::<u32>().map_err(|_| ConfigError::InvalidValue {
            name: name.to_string(),
            message: format!("'{value}' is not a valid unsigned integer"),
        }),
        None => Ok(default),
    }
}
