use url::Url;

/// An exact host or a suffix-matchable domain. `"slack.com"` matches
/// `slack.com` itself and any dot-separated sub-host of it; it must never
/// match `evil-slack.com`.
pub type HostPattern = &'static str;

/// True iff the URL's host equals one of `patterns` exactly or is a
/// dot-separated sub-host of one. URLs without a host match nothing.
pub fn host_matches(url: &Url, patterns: &[HostPattern]) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    patterns.iter().any(|pattern| suffix_matches(host, pattern))
}

/// Case-insensitive, label-anchored suffix match. The character preceding the
/// suffix must be a `.` so that `notslack.com` never matches `slack.com`.
fn suffix_matches(host: &str, pattern: &str) -> bool {
    if host.len() < pattern.len() || pattern.is_empty() {
        return false;
    }
    let tail_start = host.len() - pattern.len();
    if !host[tail_start..].eq_ignore_ascii_case(pattern) {
        return false;
    }
    tail_start == 0 || host.as_bytes()[tail_start - 1] == b'.'
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::{host_matches, suffix_matches};

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn exact_host_matches() {
        assert!(host_matches(&url("https://slack.com/signin"), &["slack.com"]));
    }

    #[test]
    fn sub_host_matches() {
        assert!(host_matches(&url("https://aitana.slack.com/"), &["slack.com"]));
        assert!(host_matches(&url("https://a.b.slack.com/"), &["slack.com"]));
    }

    #[test]
    fn partial_label_suffix_does_not_match() {
        assert!(!host_matches(&url("https://evil-slack.com/"), &["slack.com"]));
        assert!(!host_matches(&url("https://notslack.com/"), &["slack.com"]));
    }

    #[test]
    fn unrelated_host_does_not_match() {
        assert!(!host_matches(&url("https://slack.com.attacker.io/"), &["slack.com"]));
    }

    #[test]
    fn matching_ignores_case() {
        // The parser lowercases domain hosts; the raw comparison must not
        // depend on that.
        assert!(suffix_matches("Aitana.Slack.Com", "slack.com"));
    }

    #[test]
    fn hostless_urls_match_nothing() {
        assert!(!host_matches(&url("mailto:someone@slack.com"), &["slack.com"]));
        assert!(!host_matches(&url("data:text/plain,slack.com"), &["slack.com"]));
    }

    #[test]
    fn port_is_ignored_by_host_matching() {
        assert!(host_matches(&url("https://aitana.slack.com:8443/"), &["slack.com"]));
    }
}
