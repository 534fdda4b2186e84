use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{rngs::OsRng, RngCore};

const TOKEN_BYTES: usize = 32;

/// Fresh setup token: 256 bits from the OS RNG, URL-safe base64.
pub fn generate() -> String {
    let mut buf = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut buf);
    Base64UrlUnpadded::encode_string(&buf)
}

/// Cheap shape check so garbage never reaches the store.
pub fn is_well_formed(token: &str) -> bool {
    let mut buf = [0u8; TOKEN_BYTES];
    matches!(Base64UrlUnpadded::decode(token, &mut buf), Ok(b) if b.len() == TOKEN_BYTES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_tokens_are_well_formed_and_distinct() {
        let tokens: HashSet<String> = (0..256).map(|_| generate()).collect();
        assert_eq!(tokens.len(), 256);
        for t in &tokens {
            assert_eq!(t.len(), 43);
            assert!(is_well_formed(t), "{t}");
        }
    }

    #[test]
    fn rejects_garbage() {
        assert!(!is_well_formed(""));
        assert!(!is_well_formed("not a token"));
        assert!(!is_well_formed("abc"));
        assert!(!is_well_formed(&"A".repeat(60)));
    }
}
