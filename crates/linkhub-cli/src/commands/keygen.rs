//! Signing secret generation.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use clap::Args;

use linkhub_core::config::auth::MIN_SECRET_BYTES;
use linkhub_core::error::AppError;

/// Arguments for the keygen command
#[derive(Debug, Args)]
pub struct KeygenArgs {
    /// Number of random bytes before encoding
    #[arg(long, default_value_t = 48)]
    pub bytes: usize,
}

/// Print a fresh base64 secret for `auth.signing_keys`.
pub fn execute(args: &KeygenArgs) -> Result<(), AppError> {
    if args.bytes < MIN_SECRET_BYTES {
        return Err(AppError::validation(format!(
            "--bytes must be at least {MIN_SECRET_BYTES}"
        )));
    }
    println!("{}", generate_secret(args.bytes));
    Ok(())
}

fn generate_secret(bytes: usize) -> String {
    let raw: Vec<u8> = (0..bytes).map(|_| rand::random::<u8>()).collect();
    STANDARD.encode(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_is_long_enough_for_config_validation() {
        let secret = generate_secret(MIN_SECRET_BYTES);
        assert!(secret.len() >= MIN_SECRET_BYTES);
        assert_ne!(secret, generate_secret(MIN_SECRET_BYTES));
    }

    #[test]
    fn test_rejects_short_secrets() {
        assert!(execute(&KeygenArgs { bytes: 8 }).is_err());
    }
}
