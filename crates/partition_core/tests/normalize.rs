use partition_core::normalize_url;
use pretty_assertions::assert_eq;

#[test]
fn scheme_host_case_and_trivia_are_ignored() {
    assert_eq!(normalize_url("HTTP://Example.com/A/"), "http://example.com/a");
    assert_eq!(normalize_url("http://example.com/a?x=1#y"), "http://example.com/a");
}

#[test]
fn missing_scheme_defaults_to_https() {
    assert_eq!(normalize_url("  example.com/x "), "https://example.com/x");
    assert_eq!(normalize_url("https://example.com/X/"), "https://example.com/x");
}

#[test]
fn default_port_and_root_path_are_canonical() {
    assert_eq!(normalize_url("https://example.com:443"), "https://example.com/");
    assert_eq!(normalize_url("https://example.com/"), "https://example.com/");
    assert_eq!(normalize_url("https://example.com:8443/p/"), "https://example.com:8443/p");
}

#[test]
fn malformed_input_is_preserved_trimmed() {
    assert_eq!(normalize_url("  not a url  "), "not a url");
    assert_eq!(normalize_url("http://exa mple.com/"), "http://exa mple.com/");
}

#[test]
fn normalization_is_idempotent() {
    let samples = [
        "",
        "   ",
        "example.com",
        "Example.COM/Path/",
        "HTTP://Example.com/A/",
        "https://example.com/a//",
        "https://example.com/a?b=c#d",
        "https://user:pw@Example.com:8080/x/y/?q",
        "instagram.com/Some_User/?hl=en",
        "not a url",
        "file:///tmp/list.txt",
        "https://example.com/caf%C3%A9/",
        "https://bücher.example/Straße",
    ];
    for sample in samples {
        let once = normalize_url(sample);
        assert_eq!(normalize_url(&once), once, "input {sample:?}");
    }
}
