//! The selectable target languages, as (display name, ISO code) pairs.

pub const LANGUAGES: [(&str, &str); 10] = [
    ("Kannada", "kn"),
    ("Malayalam", "ml"),
    ("Tamil", "ta"),
    ("Telugu", "te"),
    ("Hindi", "hi"),
    ("Bengali", "bn"),
    ("Gujarati", "gu"),
    ("Marathi", "mr"),
    ("Punjabi", "pa"),
    ("English", "en"),
];

/// Display name for a language code.
pub fn name_for(code: &str) -> Option<&'static str> {
    LANGUAGES
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(name, _)| *name)
}

/// Language code for a display name.
pub fn code_for(name: &str) -> Option<&'static str> {
    LANGUAGES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, code)| *code)
}

pub fn is_supported(code: &str) -> bool {
    name_for(code).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_names_resolve_both_ways() {
        assert_eq!(name_for("hi"), Some("Hindi"));
        assert_eq!(code_for("Hindi"), Some("hi"));
        assert!(is_supported("en"));
        assert!(!is_supported("xx"));
    }
}
