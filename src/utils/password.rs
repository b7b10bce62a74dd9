// Adaptive salted credential encoding built on Argon2id.
//
// Hashes carry their own parameters and salt in PHC string format, so
// verification works against hashes produced under older settings and
// `needs_rehash` tells callers when a stored hash should be upgraded.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use thiserror::Error;

/// Errors that can occur while encoding or checking credentials
#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashingError(String),

    #[error("Failed to verify password: {0}")]
    VerificationError(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,

    #[error("Memory cost ({0} KiB) exceeds safe limit ({1} KiB) - risk of out-of-memory error")]
    MemoryCostTooHigh(u32, u32),
}

/// Work-factor settings for the Argon2id encoder
pub struct PasswordConfig {
    /// Memory cost in KiB (default: 19456 = 19 MiB)
    pub memory_cost: u32,
    /// Time cost (iterations, default: 2)
    pub time_cost: u32,
    /// Parallelism factor (default: 1)
    pub parallelism: u32,
    /// Output hash length in bytes (default: 32)
    pub output_length: usize,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        // OWASP recommended minimum parameters for Argon2id
        // https://cheatsheetseries.owasp.org/cheatsheets/Password_Storage_Cheat_Sheet.html
        Self {
            // 19 MiB memory cost, the OWASP floor for GPU/ASIC resistance
            memory_cost: 19456,
            // 2 iterations
            time_cost: 2,
            // Single lane keeps memory-hardness per thread at its maximum
            parallelism: 1,
            // 256-bit output
            output_length: 32,
        }
    }
}

impl PasswordConfig {
    /// Safe memory ceiling derived from the host: 25% of MemAvailable,
    /// falling back to 512 MiB where /proc/meminfo cannot be read.
    fn get_safe_memory_limit() -> u32 {
        match std::fs::read_to_string("/proc/meminfo") {
            Ok(content) => {
                for line in content.lines() {
                    if line.starts_with("MemAvailable:") {
                        if let Some(kb_str) = line.split_whitespace().nth(1) {
                            if let Ok(available_kb) = kb_str.parse::<u32>() {
                                return available_kb / 4;
                            }
                        }
                    }
                }
            },
            Err(_) => {
                return 524_288;
            },
        }

        524_288
    }

    /// Reject memory costs that could take the process down with OOM
    fn validate_memory_cost(&self) -> Result<(), PasswordError> {
        let safe_limit = Self::get_safe_memory_limit();

        if self.memory_cost > safe_limit {
            return Err(PasswordError::MemoryCostTooHigh(
                self.memory_cost,
                safe_limit,
            ));
        }

        Ok(())
    }

    fn build_hasher(&self) -> Result<Argon2<'static>, PasswordError> {
        self.validate_memory_cost()?;

        let params = Params::new(
            self.memory_cost,
            self.time_cost,
            self.parallelism,
            Some(self.output_length),
        )
        .map_err(|e| PasswordError::HashingError(e.to_string()))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Hash a password with the default work factor.
///
/// Returns the hash in PHC string format
/// (`$argon2id$v=19$m=19456,t=2,p=1$<salt>$<hash>`), which embeds the
/// algorithm, parameters and a freshly generated random salt.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    hash_password_with_config(password, &PasswordConfig::default())
}

/// Hash a password with an explicit work factor.
pub fn hash_password_with_config(
    password: &str,
    config: &PasswordConfig,
) -> Result<String, PasswordError> {
    let argon2 = config.build_hasher()?;

    let salt = SaltString::generate(&mut OsRng);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashingError(e.to_string()))?;

    Ok(password_hash.to_string())
}

/// Verify a password against a stored PHC-format hash.
///
/// `Ok(false)` means the password did not match; `Err` is reserved for
/// malformed hashes and encoder failures.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    // Default hasher reads algorithm and params out of the hash itself
    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerificationError(e.to_string())),
    }
}

/// Whether a stored hash was produced under settings other than `config`
/// and should be re-encoded on the next successful verification.
pub fn needs_rehash(hash: &str, config: &PasswordConfig) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    let alg = parsed_hash.algorithm;
    if alg != argon2::Algorithm::Argon2id.ident() {
        return Ok(true);
    }

    for (ident, value) in parsed_hash.params.iter() {
        match ident.as_str() {
            "m" => {
                if let Ok(m) = value.decimal() {
                    if m != config.memory_cost {
                        return Ok(true);
                    }
                }
            },
            "t" => {
                if let Ok(t) = value.decimal() {
                    if t != config.time_cost {
                        return Ok(true);
                    }
                }
            },
            "p" => {
                if let Ok(p) = value.decimal() {
                    if p != config.parallelism {
                        return Ok(true);
                    }
                }
            },
            _ => {},
        }
    }

    Ok(false)
}
