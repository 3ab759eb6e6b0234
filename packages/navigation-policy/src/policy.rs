use tracing::debug;
use url::Url;

use crate::rules::{FEDERATION_PAIRS, INTERNAL_RESOURCES};

/// What a single attempted navigation should do. Derived per request, never
/// stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The navigation proceeds inside the same embedded view.
    StayInternal,
    /// The navigation leaves the app through the OS default browser.
    OpenExternally,
    /// The navigation is dropped entirely.
    Discard,
}

/// Decide what a navigation from `current_url` to `target_url` should do.
///
/// First match wins:
/// 1. either URL unparseable → [`Verdict::Discard`] (fail closed)
/// 2. same origin → [`Verdict::StayInternal`]
/// 3. target is a known internal resource, whatever the current origin →
///    [`Verdict::StayInternal`]
/// 4. current and target sit on opposite sides of a federation pair →
///    [`Verdict::StayInternal`]
/// 5. otherwise [`Verdict::OpenExternally`] for http/https targets,
///    [`Verdict::Discard`] for everything else
///
/// Same-origin and internal-resource checks resolve the common in-service
/// case without scanning the federation table. Pure and deterministic; the
/// caller owns any side effect the verdict implies.
#[must_use]
pub fn decide(current_url: &str, target_url: &str) -> Verdict {
    let (Ok(current), Ok(target)) = (Url::parse(current_url), Url::parse(target_url)) else {
        debug!(current_url, target_url, "unparseable navigation, discarding");
        return Verdict::Discard;
    };

    // Opaque origins (data:, mailto:, ...) never compare equal across two
    // parses, so they cannot satisfy the same-origin check.
    if target.origin() == current.origin() {
        return Verdict::StayInternal;
    }

    if INTERNAL_RESOURCES.iter().any(|resource| resource.matches(&target)) {
        return Verdict::StayInternal;
    }

    if FEDERATION_PAIRS.iter().any(|pair| pair.links(&current, &target)) {
        return Verdict::StayInternal;
    }

    let verdict = match target.scheme() {
        "http" | "https" => Verdict::OpenExternally,
        _ => Verdict::Discard,
    };
    debug!(target_url, ?verdict, "cross-origin navigation");
    verdict
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{decide, Verdict};
    use crate::rules::FEDERATION_PAIRS;

    #[test]
    fn identical_urls_stay_internal() {
        let u = "https://app.slack.com/client/T123/C456";
        assert_eq!(decide(u, u), Verdict::StayInternal);
    }

    #[test]
    fn same_origin_stays_internal_regardless_of_path() {
        assert_eq!(
            decide("https://teams.microsoft.com/v2/", "https://teams.microsoft.com/l/channel/x"),
            Verdict::StayInternal
        );
        assert_eq!(
            decide("https://teams.microsoft.com/", "https://teams.microsoft.com:443/other?q=1#f"),
            Verdict::StayInternal
        );
    }

    #[test]
    fn different_port_is_a_different_origin() {
        assert_eq!(
            decide("https://example.com/", "https://example.com:8443/"),
            Verdict::OpenExternally
        );
    }

    #[test]
    fn unparseable_input_is_discarded() {
        assert_eq!(decide("not a url", "https://slack.com/"), Verdict::Discard);
        assert_eq!(decide("https://slack.com/", "ht!tp://%"), Verdict::Discard);
        assert_eq!(decide("", ""), Verdict::Discard);
    }

    #[test]
    fn every_federation_pair_holds_in_both_directions() {
        for pair in FEDERATION_PAIRS {
            for a in pair.side_a {
                for b in pair.side_b {
                    let service = format!("https://{a}/");
                    let provider = format!("https://{b}/oauth2/authorize?client_id=1");
                    assert_eq!(
                        decide(&service, &provider),
                        Verdict::StayInternal,
                        "{a} -> {b}"
                    );
                    assert_eq!(
                        decide(&provider, &service),
                        Verdict::StayInternal,
                        "{b} -> {a}"
                    );
                }
            }
        }
    }

    #[test]
    fn federation_matches_on_sub_hosts() {
        assert_eq!(
            decide("https://aitana.slack.com/", "https://accounts.google.com/signin"),
            Verdict::StayInternal
        );
        assert_eq!(
            decide("https://chat.eclipse.org/", "https://matrix.eclipse.org/_matrix/client/sso"),
            Verdict::StayInternal
        );
    }

    #[test]
    fn lookalike_domains_do_not_federate() {
        assert_eq!(
            decide("https://evil-slack.com/", "https://accounts.google.com/"),
            Verdict::OpenExternally
        );
    }

    #[test]
    fn internal_resource_wins_over_unrelated_current_origin() {
        assert_eq!(
            decide(
                "https://teams.microsoft.com/",
                "https://files.slack.com/files-pri/T123-F456/download/report.pdf"
            ),
            Verdict::StayInternal
        );
    }

    #[test]
    fn github_login_is_internal_but_repositories_open_externally() {
        assert_eq!(
            decide("https://cliq.zoho.com/", "https://github.com/login?return_to=%2F"),
            Verdict::StayInternal
        );
        assert_eq!(
            decide("https://cliq.zoho.com/", "https://github.com/rust-lang/rust"),
            Verdict::OpenExternally
        );
    }

    #[test]
    fn unknown_web_targets_open_externally() {
        assert_eq!(
            decide("https://aitana.slack.com/", "https://www.external.url.com/"),
            Verdict::OpenExternally
        );
        assert_eq!(
            decide("https://discord.com/channels/1", "http://plain-http.example.org/page"),
            Verdict::OpenExternally
        );
    }

    #[test]
    fn opaque_origins_never_count_as_same_origin() {
        let u = "data:text/html,hello";
        assert_eq!(decide(u, u), Verdict::Discard);
    }

    #[test]
    fn non_web_schemes_are_discarded() {
        assert_eq!(
            decide("https://app.slack.com/", "smb://example.com/share"),
            Verdict::Discard
        );
        assert_eq!(
            decide("https://app.slack.com/", "mailto:someone@example.com"),
            Verdict::Discard
        );
        assert_eq!(
            decide("https://app.slack.com/", "javascript:alert(1)"),
            Verdict::Discard
        );
        assert_eq!(
            decide("https://app.slack.com/", "zoommtg://zoom.us/join?confno=1"),
            Verdict::Discard
        );
    }

    #[test]
    fn decide_is_deterministic() {
        let current = "https://x.com/login";
        let target = "https://twitter.com/?via_twitter_login=true";
        let first = decide(current, target);
        assert_eq!(first, Verdict::StayInternal);
        assert_eq!(decide(current, target), first);
    }
}
