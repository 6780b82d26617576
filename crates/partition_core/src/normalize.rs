use url::Url;

/// Canonical dedup key for a profile URL.
///
/// - trims surrounding whitespace
/// - defaults the scheme to `https://` when no `://` is present
/// - lower-cases the whole URL (scheme, host and path)
/// - strips trailing slashes from a non-root path
/// - drops query string and fragment
///
/// Input that does not parse, or parses without a host, is returned trimmed but
/// otherwise untouched. Applying the function twice yields the same string as once.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let mut parsed = match Url::parse(&candidate) {
        Ok(url) => url,
        Err(_) => return trimmed.to_string(),
    };
    if parsed.host_str().map_or(true, str::is_empty) {
        return trimmed.to_string();
    }

    let path = parsed.path();
    if path.len() > 1 && path.ends_with('/') {
        let stripped = path.trim_end_matches('/');
        let stripped = if stripped.is_empty() { "/" } else { stripped }.to_string();
        parsed.set_path(&stripped);
    }
    parsed.set_query(None);
    parsed.set_fragment(None);

    // Lower-cased after serialization so parser-produced percent escapes are covered too.
    String::from(parsed).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::normalize_url;

    #[test]
    fn empty_and_blank_inputs_normalize_to_empty() {
        assert_eq!(normalize_url(""), "");
        assert_eq!(normalize_url("   \t"), "");
    }

    #[test]
    fn slash_only_path_collapses_to_root() {
        assert_eq!(normalize_url("https://example.com///"), "https://example.com/");
    }

    #[test]
    fn hostless_url_is_kept_verbatim() {
        assert_eq!(normalize_url("  file:///tmp/list.txt "), "file:///tmp/list.txt");
    }
}
