// URL normalization and classification for console input.
//
// The rules mirror what a browser address bar accepts: explicit schemes pass
// through, bare hosts and IPs get `https://`, and anything with whitespace
// or without a dot is not a URL (and falls through to search).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::page::SearchConfig;

static SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://").expect("scheme regex"));
static ABOUT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^about:\S+").expect("about regex"));
static MAILTO_TEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(mailto|tel):\S+").expect("mailto regex"));
static LOCALHOST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^localhost(:\d+)?(/|$)").expect("localhost regex"));
static IPV4: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\d{1,3}\.){3}\d{1,3}(?::\d+)?(/|$)").expect("ipv4 regex"));

/// Normalize free-text input to an absolute URL.
///
/// Returns `None` when the input is not a URL: empty, contains whitespace,
/// or is a bare word without a dot. Idempotent — normalizing an already
/// normalized URL returns it unchanged.
pub fn normalize(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return None;
    }

    if SCHEME.is_match(trimmed) || ABOUT.is_match(trimmed) || MAILTO_TEL.is_match(trimmed) {
        return Some(trimmed.to_string());
    }

    if LOCALHOST.is_match(trimmed) || IPV4.is_match(trimmed) || trimmed.contains('.') {
        return Some(format!("https://{trimmed}"));
    }

    None
}

/// `about:` pages only resolve inside a browser — the console reports them
/// instead of navigating.
pub fn is_about_page(value: &str) -> bool {
    ABOUT.is_match(value.trim())
}

/// Infer a display label from a URL: the host with a leading `www.`
/// stripped, or the URL itself when it has no parsable host.
pub fn infer_label(url: &str) -> String {
    let host = reqwest::Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string));

    match host {
        Some(host) => {
            let stripped = host.strip_prefix("www.").unwrap_or(&host);
            if stripped.is_empty() {
                url.to_string()
            } else {
                stripped.to_string()
            }
        }
        None => url.to_string(),
    }
}

/// Build the default search engine URL for a free-text query.
pub fn search_url(query: &str, search: &SearchConfig) -> Option<String> {
    let (prefix, _label) = search.default_engine()?;
    if prefix.is_empty() {
        return None;
    }
    Some(format!("{prefix}{}", urlencoding::encode(query)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn explicit_schemes_pass_through() {
        assert_eq!(
            normalize("https://example.com/a?b=c").as_deref(),
            Some("https://example.com/a?b=c")
        );
        assert_eq!(normalize("ftp://host"), Some("ftp://host".into()));
        assert_eq!(normalize("about:config"), Some("about:config".into()));
        assert_eq!(
            normalize("mailto:me@example.com"),
            Some("mailto:me@example.com".into())
        );
        assert_eq!(normalize("tel:+15551234"), Some("tel:+15551234".into()));
    }

    #[test]
    fn bare_hosts_get_https() {
        assert_eq!(normalize("github.com"), Some("https://github.com".into()));
        assert_eq!(
            normalize("localhost:3000/admin"),
            Some("https://localhost:3000/admin".into())
        );
        assert_eq!(normalize("localhost"), Some("https://localhost".into()));
        assert_eq!(
            normalize("192.168.0.1:8080"),
            Some("https://192.168.0.1:8080".into())
        );
    }

    #[test]
    fn non_urls_are_rejected() {
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("   "), None);
        assert_eq!(normalize("foo bar"), None);
        assert_eq!(normalize("rustlang"), None);
    }

    #[test]
    fn normalization_is_idempotent() {
        for input in ["github.com", "localhost:9090", "https://a.b/c", "10.0.0.1"] {
            let once = normalize(input).unwrap();
            assert_eq!(normalize(&once).as_deref(), Some(once.as_str()));
        }
    }

    #[test]
    fn about_pages_are_detected() {
        assert!(is_about_page("about:config"));
        assert!(is_about_page("  about:blank"));
        assert!(!is_about_page("about:"));
        assert!(!is_about_page("https://example.com"));
    }

    #[test]
    fn label_strips_www() {
        assert_eq!(infer_label("https://www.new.com"), "new.com");
        assert_eq!(infer_label("https://app.raindrop.io"), "app.raindrop.io");
        assert_eq!(infer_label("mailto:me@example.com"), "mailto:me@example.com");
    }

    #[test]
    fn search_url_encodes_query() {
        let mut engines = BTreeMap::new();
        engines.insert(
            "d".to_string(),
            ("https://duckduckgo.com/?q=".to_string(), "DuckDuckGo".to_string()),
        );
        let search = SearchConfig {
            engines,
            default: "d".to_string(),
        };
        assert_eq!(
            search_url("foo bar", &search).as_deref(),
            Some("https://duckduckgo.com/?q=foo%20bar")
        );
        assert_eq!(search_url("x", &SearchConfig::default()), None);
    }
}
