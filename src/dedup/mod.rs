/*! Near-duplicate detection

Documents are summarized by a [MinHasher] signature of their distinct whitespace tokens,
and queried against a [NearDuplicateIndex] of previously accepted documents.
Accepted documents are inserted under their [content_key].
!*/
pub mod index;
pub mod minhash;

pub use index::{Banding, NearDuplicateIndex};
pub use minhash::{MinHasher, Signature};

use sha2::{Digest, Sha256};

/// Stable content hash of a document's raw text (hex-encoded sha256).
pub fn content_key(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::content_key;

    #[test]
    fn key_is_stable() {
        assert_eq!(content_key("გამარჯობა"), content_key("გამარჯობა"));
        assert_ne!(content_key("გამარჯობა"), content_key("გამარჯობა "));
        assert_eq!(
            content_key(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
