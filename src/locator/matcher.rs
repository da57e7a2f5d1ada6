//! Matching a raw locator against a grant

use crate::attributes::AttributeSet;
use crate::permissions::matches;

use super::decoder::decode;

/// Check whether a locator's attributes satisfy a granted resource set
///
/// Resource pass only: a bare locator declares no relationship. A locator
/// that does not decode satisfies nothing but an empty grant.
pub fn locator_authorizes(locator: &str, granted: &AttributeSet) -> bool {
    matches(&decode(locator), granted)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFETTI: &str = "locator://confetti-sites-confetti-cms_local_vendor-confetti-cms-monitor_8609-development-cmd?environment_name=local&environment_stage=development&target=cmd&umbrella_organization=confetti-sites&umbrella_repository=confetti-cms&container_name=image/container";

    fn confetti_grant() -> AttributeSet {
        AttributeSet::from([
            ("environment_name", "local"),
            ("environment_stage", "development"),
            ("target", "cmd"),
            ("umbrella_organization", "confetti-sites"),
            ("umbrella_repository", "confetti-cms"),
            ("container_name", "image/container"),
        ])
    }

    #[test]
    fn test_exact_match() {
        assert!(locator_authorizes(CONFETTI, &confetti_grant()));
    }

    #[test]
    fn test_wildcard_match() {
        let mut granted = confetti_grant();
        granted.insert("environment_name", "*");
        granted.insert("target", "*");
        assert!(locator_authorizes(CONFETTI, &granted));
    }

    #[test]
    fn test_environment_mismatch() {
        let mut granted = confetti_grant();
        granted.insert("environment_name", "production");
        assert!(!locator_authorizes(CONFETTI, &granted));
    }

    #[test]
    fn test_subset_match() {
        let granted = AttributeSet::from([("target", "cmd"), ("umbrella_organization", "confetti-sites")]);
        assert!(locator_authorizes(CONFETTI, &granted));
    }

    #[test]
    fn test_query_overrides_path_fields() {
        let locator = "locator://different-org-different-repo_env-stage-target?environment_name=local&environment_stage=development&target=cmd&umbrella_organization=confetti-sites&umbrella_repository=confetti-cms";
        let granted = AttributeSet::from([
            ("environment_name", "local"),
            ("environment_stage", "development"),
            ("target", "cmd"),
            ("umbrella_organization", "confetti-sites"),
            ("umbrella_repository", "confetti-cms"),
        ]);
        assert!(locator_authorizes(locator, &granted));

        let target_only = "locator://different-org-different-repo_env-stage-target?target=cmd";
        assert!(locator_authorizes(target_only, &AttributeSet::from([("target", "cmd")])));
    }

    #[test]
    fn test_invalid_locator_fails_non_empty_grant() {
        let granted = AttributeSet::from([("environment_name", "local")]);
        assert!(!locator_authorizes("invalid-locator-string", &granted));
    }

    #[test]
    fn test_empty_grant_accepts_any_locator() {
        assert!(locator_authorizes(CONFETTI, &AttributeSet::new()));
        assert!(locator_authorizes("invalid-locator-string", &AttributeSet::new()));
    }
}
