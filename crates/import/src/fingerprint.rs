use sha2::{Digest, Sha256};

pub const FINGERPRINT_SEPARATOR: &str = "|";

/// Canonical identity of a header row: lower-cased headers joined in order.
pub fn fingerprint(headers: &[String]) -> String {
    headers
        .iter()
        .map(|h| h.to_lowercase())
        .collect::<Vec<_>>()
        .join(FINGERPRINT_SEPARATOR)
}

/// Lowercase hex SHA-256 of a fingerprint, for fixed-length store keys.
pub fn fingerprint_digest(fingerprint: &str) -> String {
    let hash: [u8; 32] = Sha256::digest(fingerprint.as_bytes()).into();
    hash.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(h: &[&str]) -> Vec<String> {
        h.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn lowercases_and_joins_in_order() {
        assert_eq!(
            fingerprint(&headers(&["Data Mov", "Descrição", "DÉBITO"])),
            "data mov|descrição|débito"
        );
    }

    #[test]
    fn case_does_not_change_identity_but_order_does() {
        let a = fingerprint(&headers(&["Date", "Amount"]));
        assert_eq!(a, fingerprint(&headers(&["DATE", "amount"])));
        assert_ne!(a, fingerprint(&headers(&["Amount", "Date"])));
    }

    #[test]
    fn empty_headers_give_empty_fingerprint() {
        assert_eq!(fingerprint(&[]), "");
    }

    #[test]
    fn digest_known_vector() {
        assert_eq!(
            fingerprint_digest(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(fingerprint_digest("date|amount").len(), 64);
    }
}
