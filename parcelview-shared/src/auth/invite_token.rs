/// Invitation token generation and hashing
///
/// Invitation tokens are single-use secrets embedded in the signup link
/// emailed to an invitee. The plaintext token leaves the system exactly
/// once (in that email); only its SHA-256 hash is stored, so a database
/// leak does not leak usable invitations.
///
/// # Token Format
///
/// Tokens follow the pattern `pvi_{40_chars}`:
/// - Prefix: "pvi_" (4 chars)
/// - Random part: 40 alphanumeric chars (base62: [A-Za-z0-9])
///
/// # Example
///
/// ```
/// use parcelview_shared::auth::invite_token::{generate_invite_token, hash_invite_token};
///
/// let (token, hash) = generate_invite_token();
/// assert!(token.starts_with("pvi_"));
/// assert_eq!(token.len(), 44);
/// assert_eq!(hash, hash_invite_token(&token));
/// ```

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of the random part of the token (characters)
const TOKEN_RANDOM_LENGTH: usize = 40;

/// Token prefix
const TOKEN_PREFIX: &str = "pvi_";

/// Total length of an invitation token (prefix + random)
pub const INVITE_TOKEN_LENGTH: usize = TOKEN_PREFIX.len() + TOKEN_RANDOM_LENGTH;

/// Generates a new invitation token
///
/// Returns the plaintext token (for the email link) and its SHA-256 hex
/// digest (for storage). The plaintext is never persisted.
pub fn generate_invite_token() -> (String, String) {
    let random_part = generate_random_string(TOKEN_RANDOM_LENGTH);
    let token = format!("{}{}", TOKEN_PREFIX, random_part);
    let hash = hash_invite_token(&token);

    (token, hash)
}

/// Generates a random alphanumeric string
///
/// Base62 (A-Z, a-z, 0-9) keeps tokens URL-safe.
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

/// Hashes an invitation token using SHA-256
///
/// Returns the lowercase hex digest (64 chars), matching the
/// `invitations.token_hash` column.
pub fn hash_invite_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Validates the format of a client-supplied token before hitting the store
///
/// Cheap rejection of obviously malformed tokens; the real check is the
/// hash lookup.
pub fn validate_token_format(token: &str) -> bool {
    token.len() == INVITE_TOKEN_LENGTH
        && token.starts_with(TOKEN_PREFIX)
        && token[TOKEN_PREFIX.len()..]
            .chars()
            .all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_token_shape() {
        let (token, hash) = generate_invite_token();

        assert!(token.starts_with("pvi_"));
        assert_eq!(token.len(), INVITE_TOKEN_LENGTH);
        assert_eq!(hash.len(), 64); // SHA-256 hex
        assert!(validate_token_format(&token));
    }

    #[test]
    fn test_hash_is_deterministic() {
        let (token, hash) = generate_invite_token();
        assert_eq!(hash, hash_invite_token(&token));
    }

    #[test]
    fn test_tokens_are_unique() {
        let (a, _) = generate_invite_token();
        let (b, _) = generate_invite_token();
        assert_ne!(a, b);
    }

    #[test]
    fn test_format_validation_rejects_garbage() {
        assert!(!validate_token_format(""));
        assert!(!validate_token_format("pvi_short"));
        assert!(!validate_token_format(&format!("xxx_{}", "a".repeat(40))));
        assert!(!validate_token_format(&format!("pvi_{}!", "a".repeat(39))));
    }
}
