use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for Brazilian phone numbers as stored by the intake form:
    /// digits only, 10 (landline) or 11 (mobile) characters.
    /// - Valid: "1132004000", "11999999999"
    /// - Invalid: "(11) 99999-9999", "999", "11 99999 9999"
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\d{10,11}$").unwrap();
}

/// Sanitize an uploaded filename for use inside a storage key.
/// Everything outside [a-zA-Z0-9.-] becomes an underscore.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_regex_valid() {
        assert!(PHONE_REGEX.is_match("1132004000"));
        assert!(PHONE_REGEX.is_match("11999999999"));
    }

    #[test]
    fn test_phone_regex_invalid() {
        assert!(!PHONE_REGEX.is_match("999")); // too short
        assert!(!PHONE_REGEX.is_match("119999999999")); // too long
        assert!(!PHONE_REGEX.is_match("(11) 99999-9999")); // punctuation
        assert!(!PHONE_REGEX.is_match("11 99999 9999")); // spaces
        assert!(!PHONE_REGEX.is_match("")); // empty
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("horta comunitária.pdf"), "horta_comunit_ria.pdf");
        assert_eq!(sanitize_filename("plano-2025.docx"), "plano-2025.docx");
        assert_eq!(sanitize_filename("a/b\\c.png"), "a_b_c.png");
    }
}
