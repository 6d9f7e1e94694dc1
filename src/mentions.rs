//! @-mention detection for highlight flagging.
//!
//! The service's conventions: `@all` addresses every channel member,
//! `@jsec` / `@coordinator` / `@member` address a role, anything else is
//! an exact display-name match. Tokens are matched greedily by the
//! server, so "@all hands meeting" still counts as an `@all`.

use once_cell::sync::Lazy;
use regex::Regex;

static MENTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@([A-Za-z0-9_ -]+)").expect("mention regex pattern is valid"));

const ROLES: [&str; 3] = ["jsec", "coordinator", "member"];

/// Whether `content` mentions a user with the given display name and role.
pub fn mentions_user(content: &str, name: &str, role: &str) -> bool {
    for cap in MENTION_RE.captures_iter(content) {
        let token = cap[1].trim();
        let lower = token.to_lowercase();

        if lower == "all" || lower.starts_with("all ") {
            return true;
        }

        let role_hit = ROLES
            .iter()
            .any(|r| *r == role && (lower == *r || lower.starts_with(&format!("{} ", r))));
        if role_hit {
            return true;
        }

        // Greedy token may swallow trailing words; check the name prefix
        if token == name || token.starts_with(&format!("{} ", name)) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_mention() {
        assert!(mentions_user("ping @Asha about the flyer", "Asha", "member"));
        assert!(!mentions_user("ping @Ashani instead", "Asha", "member"));
        assert!(!mentions_user("no mention here", "Asha", "member"));
    }

    #[test]
    fn test_greedy_token_matches_name_prefix() {
        // The regex token is "Asha can you check" but the mention is @Asha
        assert!(mentions_user("@Asha can you check", "Asha", "member"));
    }

    #[test]
    fn test_all_mention() {
        assert!(mentions_user("@all standup in 5", "Rin", "member"));
        assert!(mentions_user("heads up @all", "Rin", "coordinator"));
    }

    #[test]
    fn test_role_mention() {
        assert!(mentions_user("@coordinator please review", "Rin", "coordinator"));
        assert!(!mentions_user("@coordinator please review", "Rin", "member"));
        assert!(mentions_user("@member meeting moved", "Rin", "member"));
    }

    #[test]
    fn test_email_like_text_is_not_a_mention() {
        assert!(!mentions_user("mail rin@example.org please", "Asha", "member"));
    }
}
