use regex::Regex;
use std::sync::OnceLock;
use uuid::Uuid;

/// Root for UUID-derived UIDs (ISO/IEC 9834-8, DICOM PS3.5 B.2)
pub const UUID_UID_ROOT: &str = "2.25";

/// Maximum length of a UI value
pub const MAX_UID_LENGTH: usize = 64;

/// Generates a globally unique UID of the form `2.25.<uuid as decimal>`
///
/// # Example
///
/// ```
/// use dicomsplit_core::identity::{generate_uid, is_valid_uid};
///
/// let uid = generate_uid();
/// assert!(uid.starts_with("2.25."));
/// assert!(is_valid_uid(&uid));
/// ```
pub fn generate_uid() -> String {
    format!("{}.{}", UUID_UID_ROOT, Uuid::new_v4().as_u128())
}

/// Generates `n` fresh UIDs
pub fn generate_uids(n: usize) -> Vec<String> {
    (0..n).map(|_| generate_uid()).collect()
}

/// Checks UID syntax: dot-separated numeric components without leading
/// zeros, at most 64 characters
pub fn is_valid_uid(uid: &str) -> bool {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let re = REGEX.get_or_init(|| {
        Regex::new(r"^(0|[1-9][0-9]*)(\.(0|[1-9][0-9]*))*$").expect("Failed to compile regex")
    });
    uid.len() <= MAX_UID_LENGTH && re.is_match(uid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_uids_are_valid_and_unique() {
        let uids = generate_uids(100);
        let unique: HashSet<_> = uids.iter().collect();
        assert_eq!(unique.len(), 100);
        for uid in &uids {
            assert!(is_valid_uid(uid), "{}", uid);
            assert!(uid.len() <= MAX_UID_LENGTH);
        }
    }

    #[test]
    fn test_uid_syntax() {
        assert!(is_valid_uid("1.2.840.10008.5.1.4.1.1.4"));
        assert!(is_valid_uid("2.25.0"));
        assert!(!is_valid_uid(""));
        assert!(!is_valid_uid("1..2"));
        assert!(!is_valid_uid("1.02"));
        assert!(!is_valid_uid("1.2."));
        assert!(!is_valid_uid("1.2.a"));
        assert!(!is_valid_uid(&format!("1.{}", "2".repeat(70))));
    }
}
