// URL normalization properties.

use launchpad::urls;
use proptest::prelude::*;

#[test]
fn normalization_table() {
    let cases = [
        ("github.com", Some("https://github.com")),
        ("https://github.com", Some("https://github.com")),
        ("localhost:8080", Some("https://localhost:8080")),
        ("127.0.0.1", Some("https://127.0.0.1")),
        ("about:blank", Some("about:blank")),
        ("mailto:me@example.com", Some("mailto:me@example.com")),
        ("foo bar", None),
        ("rustlang", None),
        ("", None),
    ];
    for (input, expected) in cases {
        assert_eq!(urls::normalize(input).as_deref(), expected, "input: {input:?}");
    }
}

proptest! {
    // Normalizing twice yields the same result: whatever normalize accepts,
    // it accepts unchanged.
    #[test]
    fn normalize_is_idempotent(input in ".{0,60}") {
        if let Some(once) = urls::normalize(&input) {
            prop_assert_eq!(urls::normalize(&once), Some(once.clone()));
        }
    }

    // A normalized URL never contains whitespace and always has a scheme
    // separator or a recognized prefix.
    #[test]
    fn normalized_urls_are_well_formed(input in ".{0,60}") {
        if let Some(url) = urls::normalize(&input) {
            prop_assert!(!url.chars().any(char::is_whitespace));
            let lower = url.to_lowercase();
            prop_assert!(
                url.contains("://")
                    || lower.starts_with("about:")
                    || lower.starts_with("mailto:")
                    || lower.starts_with("tel:")
            );
        }
    }
}
