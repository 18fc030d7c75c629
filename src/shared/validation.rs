use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Display names: letters (any script), digits, spaces, dots, apostrophes and hyphens
    /// - Valid: "Siti Rahma", "J. O'Neil", "Anne-Marie", "Budi2"
    /// - Invalid: "<script>", "name;drop", "@home"
    pub static ref DISPLAY_NAME_REGEX: Regex =
        Regex::new(r"^[\p{L}\p{M}0-9 .'\-]+$").unwrap();

    /// Contributor labels additionally allow account-style characters
    /// - Valid: "Warung Bu Tini", "acct#1042", "ops@rt05"
    /// - Invalid: "<b>", "a\nb"
    pub static ref CONTRIBUTOR_LABEL_REGEX: Regex =
        Regex::new(r"^[\p{L}\p{M}0-9 .'@#_\-/]+$").unwrap();
}

/// Trims a form value and drops it when nothing is left
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_regex_valid() {
        assert!(DISPLAY_NAME_REGEX.is_match("Siti Rahma"));
        assert!(DISPLAY_NAME_REGEX.is_match("J. O'Neil"));
        assert!(DISPLAY_NAME_REGEX.is_match("Anne-Marie"));
        assert!(DISPLAY_NAME_REGEX.is_match("José Ñúñez"));
        assert!(DISPLAY_NAME_REGEX.is_match("Budi2"));
    }

    #[test]
    fn test_display_name_regex_invalid() {
        assert!(!DISPLAY_NAME_REGEX.is_match("<script>"));
        assert!(!DISPLAY_NAME_REGEX.is_match("name;drop"));
        assert!(!DISPLAY_NAME_REGEX.is_match("@home"));
        assert!(!DISPLAY_NAME_REGEX.is_match(""));
    }

    #[test]
    fn test_contributor_label_regex() {
        assert!(CONTRIBUTOR_LABEL_REGEX.is_match("Warung Bu Tini"));
        assert!(CONTRIBUTOR_LABEL_REGEX.is_match("acct#1042"));
        assert!(CONTRIBUTOR_LABEL_REGEX.is_match("ops@rt05"));
        assert!(!CONTRIBUTOR_LABEL_REGEX.is_match("<b>"));
        assert!(!CONTRIBUTOR_LABEL_REGEX.is_match("a\nb"));
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  x ".to_string())), Some("x".to_string()));
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(None), None);
    }
}
