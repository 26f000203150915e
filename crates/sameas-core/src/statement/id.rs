//! Deterministic statement identifiers.
//!
//! A statement is identified by the SHA-256 of its composite raw identifier
//! `subject|predicate|object` (opaque ids, in that order). The same triple
//! always produces the same id, so producers that never talk to each other
//! agree on it without coordination.

use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Separator used to join subject, predicate, and object into a composite identifier.
pub const RAW_ID_SEP: &str = "|";

/// Prefix of derived statement ids
pub const STATEMENT_ID_PREFIX: &str = "stmt:";

/// Prefix of derived predicate ids
pub const PREDICATE_ID_PREFIX: &str = "pred:";

/// Build the composite raw identifier of a statement.
pub fn raw_identifier(subject_id: &str, predicate_id: &str, object_id: &str) -> String {
    format!(
        "{}{}{}{}{}",
        subject_id, RAW_ID_SEP, predicate_id, RAW_ID_SEP, object_id
    )
}

/// Compute the statement id for a triple of opaque identifiers.
pub fn statement_id(subject_id: &str, predicate_id: &str, object_id: &str) -> String {
    let digest = sha256(raw_identifier(subject_id, predicate_id, object_id).as_bytes());
    format!("{}{}", STATEMENT_ID_PREFIX, hex::encode(digest))
}

/// Compute the opaque id minted for a predicate URI.
pub fn predicate_id(predicate_raw: &str) -> String {
    format!("{}{}", PREDICATE_ID_PREFIX, hex::encode(sha256(predicate_raw.as_bytes())))
}

/// Check that a string can serve as an opaque identifier.
///
/// Identifiers must be non-empty and may contain neither whitespace nor the
/// composite separator, otherwise composite identifiers become ambiguous.
pub fn validate_identifier(value: &str) -> Result<()> {
    if value.is_empty()
        || value.contains(RAW_ID_SEP)
        || value.chars().any(char::is_whitespace)
    {
        return Err(Error::InvalidIdentifier(value.to_string()));
    }
    Ok(())
}

fn sha256(bytes: &[u8]) -> [u8; 32] {
    let mut h = Sha256::new();
    h.update(bytes);
    h.finalize().into()
}

// Lowercase hex, no extra dependency
mod hex {
    const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

    pub fn encode(bytes: [u8; 32]) -> String {
        let mut s = String::with_capacity(64);
        for b in bytes {
            s.push(HEX_CHARS[(b >> 4) as usize] as char);
            s.push(HEX_CHARS[(b & 0x0f) as usize] as char);
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statement_id_is_deterministic() {
        let a = statement_id("s", "p", "o");
        let b = statement_id("s", "p", "o");
        assert_eq!(a, b);
        assert!(a.starts_with(STATEMENT_ID_PREFIX));
        assert_eq!(a.len(), STATEMENT_ID_PREFIX.len() + 64);
    }

    #[test]
    fn statement_id_depends_on_order() {
        assert_ne!(statement_id("s", "p", "o"), statement_id("o", "p", "s"));
    }

    #[test]
    fn known_sha256_vector() {
        // sha256("") = e3b0c442...
        assert_eq!(
            hex::encode(sha256(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn predicate_id_prefix() {
        let id = predicate_id("https://schema.org/name");
        assert!(id.starts_with(PREDICATE_ID_PREFIX));
        assert_ne!(id, predicate_id("https://schema.org/memberOf"));
    }

    #[test]
    fn identifier_validation() {
        assert!(validate_identifier("person:alice").is_ok());
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("a b").is_err());
        assert!(validate_identifier("a|b").is_err());
    }
}
