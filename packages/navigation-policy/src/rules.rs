//! The identity-federation rule table.
//!
//! One declarative list of symmetric service↔provider relationships plus a
//! target-only allowlist for service-branded infrastructure, evaluated by a
//! single generic matching routine in [`crate::policy`]. Adding a provider
//! relationship means adding a record here, not another conditional.

use thiserror::Error;
use url::Url;

use crate::origin::{host_matches, HostPattern};

/// A fixed, symmetric trust relationship between a hosted service's domains
/// and one of its authentication/identity providers, or a sibling domain of
/// the same product. Navigation between the two sides stays in the embedded
/// view, in either direction: login round trips go service → provider and
/// then provider → service.
pub struct FederationPair {
    pub side_a: &'static [HostPattern],
    pub side_b: &'static [HostPattern],
}

impl FederationPair {
    /// True iff the two URLs sit on opposite sides of this pair, tried in
    /// both directions.
    pub fn links(&self, current: &Url, target: &Url) -> bool {
        (host_matches(current, self.side_a) && host_matches(target, self.side_b))
            || (host_matches(current, self.side_b) && host_matches(target, self.side_a))
    }
}

/// A target-only rule marking a URL as part of "the current service"
/// regardless of which origin linked to it, e.g. a chat platform's shared
/// file-download host.
pub struct InternalResource {
    pub host: HostPattern,
    /// When set, only paths under this segment-anchored prefix match.
    pub path_prefix: Option<&'static str>,
}

impl InternalResource {
    pub fn matches(&self, target: &Url) -> bool {
        if !host_matches(target, &[self.host]) {
            return false;
        }
        match self.path_prefix {
            None => true,
            Some(prefix) => path_at_segment(target.path(), prefix),
        }
    }
}

/// Segment-anchored path prefix match: `/login` covers `/login` and
/// `/login/oauth`, never `/loginfoo`.
fn path_at_segment(path: &str, prefix: &str) -> bool {
    path.starts_with(prefix)
        && (path.len() == prefix.len() || path.as_bytes()[prefix.len()] == b'/')
}

/// Known service↔identity-provider relationships for the hosted services.
pub static FEDERATION_PAIRS: &[FederationPair] = &[
    // Slack workspaces sign in through Google accounts.
    FederationPair {
        side_a: &["slack.com"],
        side_b: &["accounts.google.com", "accounts.youtube.com"],
    },
    // Google Chat / Gmail chat panes round-trip through the same accounts
    // hosts; the chat origins differ from the accounts origin.
    FederationPair {
        side_a: &["chat.google.com", "mail.google.com"],
        side_b: &["accounts.google.com", "accounts.youtube.com"],
    },
    // Microsoft Teams login, both the work and consumer variants.
    FederationPair {
        side_a: &["teams.microsoft.com", "teams.live.com"],
        side_b: &[
            "login.microsoftonline.com",
            "login.live.com",
            "login.microsoft.com",
            "account.microsoft.com",
        ],
    },
    // Skype for Web authenticates against the Microsoft login hosts.
    FederationPair {
        side_a: &["skype.com"],
        side_b: &["login.live.com", "login.microsoftonline.com"],
    },
    // Gitter offers GitHub, GitLab, and Twitter sign-in.
    FederationPair {
        side_a: &["gitter.im"],
        side_b: &["github.com", "gitlab.com", "twitter.com", "x.com"],
    },
    // Zoom web client single sign-on providers.
    FederationPair {
        side_a: &["zoom.us"],
        side_b: &[
            "accounts.google.com",
            "login.microsoftonline.com",
            "facebook.com",
            "appleid.apple.com",
        ],
    },
    // Zoho Cliq and the Zoho accounts service, per-region domains.
    FederationPair {
        side_a: &["cliq.zoho.com", "cliq.zoho.eu", "cliq.zoho.in"],
        side_b: &["accounts.zoho.com", "accounts.zoho.eu", "accounts.zoho.in"],
    },
    // Eclipse Chat runs on a Matrix homeserver behind the Eclipse SSO.
    FederationPair {
        side_a: &["chat.eclipse.org"],
        side_b: &["matrix.eclipse.org", "accounts.eclipse.org", "auth.eclipse.org"],
    },
    // Element Web against the matrix.org homeserver.
    FederationPair {
        side_a: &["app.element.io"],
        side_b: &["matrix.org"],
    },
    // Sibling domains of the same product after the rebrand; logins bounce
    // between the two with `via_twitter_login` redirects.
    FederationPair {
        side_a: &["twitter.com"],
        side_b: &["x.com", "twimg.com"],
    },
    // Messenger authenticates on the facebook.com origin.
    FederationPair {
        side_a: &["messenger.com"],
        side_b: &["facebook.com"],
    },
    // Discord's login and invite flows span its sibling domains.
    FederationPair {
        side_a: &["discord.com"],
        side_b: &["discordapp.com", "discord.gg"],
    },
    // WhatsApp Web serves session infrastructure from whatsapp.net.
    FederationPair {
        side_a: &["whatsapp.com"],
        side_b: &["whatsapp.net"],
    },
    // Telegram Web resolves t.me deep links inside the app.
    FederationPair {
        side_a: &["telegram.org"],
        side_b: &["t.me"],
    },
];

/// Service-branded infrastructure that stays internal no matter which origin
/// links to it. Hostname-only rules except where a host is shared with
/// unrelated legitimate traffic: plain `github.com` links must keep opening
/// externally, so only its login paths are listed.
pub static INTERNAL_RESOURCES: &[InternalResource] = &[
    InternalResource { host: "files.slack.com", path_prefix: None },
    InternalResource { host: "slack-files.com", path_prefix: None },
    InternalResource { host: "slack-edge.com", path_prefix: None },
    InternalResource { host: "slack-imgs.com", path_prefix: None },
    InternalResource { host: "cdn.discordapp.com", path_prefix: None },
    InternalResource { host: "media.discordapp.net", path_prefix: None },
    InternalResource { host: "attachments.office.net", path_prefix: None },
    InternalResource { host: "statics.teams.cdn.office.net", path_prefix: None },
    InternalResource { host: "whatsapp.net", path_prefix: None },
    InternalResource { host: "telesco.pe", path_prefix: None },
    InternalResource { host: "zohocdn.com", path_prefix: None },
    InternalResource { host: "github.com", path_prefix: Some("/login") },
    InternalResource { host: "github.com", path_prefix: Some("/session") },
    InternalResource { host: "github.com", path_prefix: Some("/sessions") },
];

/// Structural defects in the compiled-in rule table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleTableError {
    #[error("host pattern {0:?} is not a bare lowercase domain")]
    MalformedHostPattern(&'static str),
    #[error("federation pair {0} has an empty side")]
    EmptyFederationSide(usize),
    #[error("path prefix {0:?} does not start with '/'")]
    MalformedPathPrefix(&'static str),
}

/// Audit the rule table. The table is compiled-in data, so a failure here is
/// a programming error caught at startup, not a runtime condition.
pub fn validate() -> Result<(), RuleTableError> {
    for (index, pair) in FEDERATION_PAIRS.iter().enumerate() {
        if pair.side_a.is_empty() || pair.side_b.is_empty() {
            return Err(RuleTableError::EmptyFederationSide(index));
        }
        for pattern in pair.side_a.iter().chain(pair.side_b) {
            check_host_pattern(pattern)?;
        }
    }
    for resource in INTERNAL_RESOURCES {
        check_host_pattern(resource.host)?;
        if let Some(prefix) = resource.path_prefix {
            if !prefix.starts_with('/') || prefix.len() == 1 {
                return Err(RuleTableError::MalformedPathPrefix(prefix));
            }
        }
    }
    Ok(())
}

/// A host pattern is a bare lowercase domain: no scheme, port, path,
/// wildcard syntax, or stray dots.
fn check_host_pattern(pattern: &'static str) -> Result<(), RuleTableError> {
    let well_formed = !pattern.is_empty()
        && !pattern.starts_with('.')
        && !pattern.ends_with('.')
        && pattern
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-');
    if well_formed {
        Ok(())
    } else {
        Err(RuleTableError::MalformedHostPattern(pattern))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use url::Url;

    use super::*;

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn table_passes_audit() {
        assert_eq!(validate(), Ok(()));
    }

    #[test]
    fn pair_links_in_both_directions() {
        let pair = &FEDERATION_PAIRS[0];
        let service = url("https://aitana.slack.com/");
        let provider = url("https://accounts.google.com/o/oauth2/v2/auth");
        assert!(pair.links(&service, &provider));
        assert!(pair.links(&provider, &service));
    }

    #[test]
    fn pair_does_not_link_two_unrelated_urls() {
        let pair = &FEDERATION_PAIRS[0];
        assert!(!pair.links(&url("https://example.com/"), &url("https://accounts.google.com/")));
    }

    #[test]
    fn hostname_only_resource_ignores_path() {
        let resource = InternalResource { host: "files.slack.com", path_prefix: None };
        assert!(resource.matches(&url("https://files.slack.com/anything/at/all")));
        assert!(!resource.matches(&url("https://files.slack.com.evil.io/")));
    }

    #[test]
    fn path_qualified_resource_anchors_on_segments() {
        let resource = InternalResource { host: "github.com", path_prefix: Some("/login") };
        assert!(resource.matches(&url("https://github.com/login")));
        assert!(resource.matches(&url("https://github.com/login/oauth/authorize")));
        assert!(!resource.matches(&url("https://github.com/loginfoo")));
        assert!(!resource.matches(&url("https://github.com/rust-lang/rust")));
    }

    #[test]
    fn audit_rejects_malformed_patterns() {
        assert_eq!(
            check_host_pattern("https://slack.com"),
            Err(RuleTableError::MalformedHostPattern("https://slack.com"))
        );
        assert_eq!(
            check_host_pattern("Slack.com"),
            Err(RuleTableError::MalformedHostPattern("Slack.com"))
        );
        assert_eq!(
            check_host_pattern(".slack.com"),
            Err(RuleTableError::MalformedHostPattern(".slack.com"))
        );
        assert_eq!(check_host_pattern("slack.com"), Ok(()));
    }
}
