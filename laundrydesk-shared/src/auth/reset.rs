/// Password reset token utilities
///
/// Reset tokens are random credentials handed to the user out of band and
/// presented back to prove ownership of the account. Only the SHA-256 hash of
/// a token is ever stored; see `models::password_reset` for persistence.
///
/// # Token Format
///
/// `ldr_{32 alphanumeric chars}`: prefix plus 32 base62 characters
/// (key space 62^32, roughly 2^190).
///
/// # Example
///
/// ```
/// use laundrydesk_shared::auth::reset::{
///     generate_reset_token, hash_reset_token, validate_reset_token_format,
/// };
///
/// let (token, hash) = generate_reset_token();
/// assert!(token.starts_with("ldr_"));
/// assert!(validate_reset_token_format(&token));
/// assert_eq!(hash, hash_reset_token(&token));
/// ```

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of the random part of the token (characters)
const TOKEN_RANDOM_LENGTH: usize = 32;

/// Reset token prefix
const TOKEN_PREFIX: &str = "ldr_";

/// Total length of a reset token (prefix + random)
pub const RESET_TOKEN_LENGTH: usize = TOKEN_PREFIX.len() + TOKEN_RANDOM_LENGTH;

/// Generates a new reset token
///
/// Returns the plaintext token (to hand to the user) and its SHA-256 hex
/// hash (to store).
pub fn generate_reset_token() -> (String, String) {
    let random_part = generate_random_string(TOKEN_RANDOM_LENGTH);
    let token = format!("{}{}", TOKEN_PREFIX, random_part);
    let hash = hash_reset_token(&token);

    (token, hash)
}

/// Generates a random base62 string (A-Z, a-z, 0-9)
fn generate_random_string(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Hashes a reset token with SHA-256
///
/// Deterministic: the stored hash is looked up by recomputing this over the
/// presented token.
pub fn hash_reset_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Validates reset token format before touching the database
///
/// Checks prefix, length, and that the random part is alphanumeric.
pub fn validate_reset_token_format(token: &str) -> bool {
    if token.len() != RESET_TOKEN_LENGTH {
        return false;
    }

    let Some(random_part) = token.strip_prefix(TOKEN_PREFIX) else {
        return false;
    };

    random_part.chars().all(|c| c.is_ascii_alphanumeric())
}
