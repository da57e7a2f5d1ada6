//! Set-level matching
//!
//! Applies the field rule to every attribute the granting side constrains.
//! Two independent passes: the resource pass over what is being accessed and
//! the relationship pass over what each party declared about the trust
//! relationship. Authorization needs both.

use crate::attributes::AttributeSet;
use crate::records::{Granted, Requested};

use super::field::{Admits, Pass};

/// Resource pass
///
/// Every attribute present in `granted` must admit the requested value for the
/// same name. An empty `granted` set matches anything.
pub fn matches(requested: &AttributeSet, granted: &AttributeSet) -> bool {
    // identical sets always satisfy the general rule
    if requested == granted {
        return true;
    }
    first_mismatch(requested, granted, Pass::Resource).is_none()
}

/// Relationship pass
///
/// Same shape as [`matches`], except either side may relax a field: a
/// requester declaring `*` accepts whatever the grantor declared, and a
/// grantor declaring `*` accepts the field even when the requester left it
/// undeclared.
pub fn relationship_matches(request_declared: &AttributeSet, grant_declared: &AttributeSet) -> bool {
    first_mismatch(request_declared, grant_declared, Pass::Relationship).is_none()
}

/// Full authorization predicate: both passes must succeed
pub fn authorized(requested: &Requested, granted: &Granted) -> bool {
    matches(&requested.resource, &granted.resource)
        && relationship_matches(&requested.declared, &granted.declared)
}

/// Name of the first granted attribute that rejects the request, if any
///
/// Attributes are visited in name order, so the answer is deterministic.
pub fn first_mismatch<'g>(
    requested: &AttributeSet,
    granted: &'g AttributeSet,
    pass: Pass,
) -> Option<&'g str> {
    granted
        .iter()
        .find(|(name, value)| !Admits::for_requested(requested.get(name), pass).granted(value))
        .map(|(name, _)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requested(resource: AttributeSet, declared: AttributeSet) -> Requested {
        Requested::new(resource).with_declared(declared)
    }

    fn granted(resource: AttributeSet, declared: AttributeSet) -> Granted {
        Granted::new(resource).with_declared(declared)
    }

    #[test]
    fn test_target_wildcard() {
        let req = AttributeSet::from([("target", "cmd")]);
        assert!(matches(&req, &AttributeSet::from([("target", "*")])));
        assert!(!matches(&req, &AttributeSet::from([("target", "all_up")])));
    }

    #[test]
    fn test_empty_grant_matches_anything() {
        let empty = AttributeSet::new();
        assert!(matches(&AttributeSet::from([("target", "cmd")]), &empty));
        assert!(matches(&AttributeSet::new(), &empty));
        assert!(relationship_matches(&AttributeSet::from([("scheme", "image")]), &empty));
    }

    #[test]
    fn test_container_name_exact_and_mismatch() {
        let req = AttributeSet::from([("container_name", "vendor/confetti-cms/image/container")]);
        assert!(matches(
            &req,
            &AttributeSet::from([("container_name", "vendor/confetti-cms/image/container")])
        ));
        assert!(!matches(
            &req,
            &AttributeSet::from([("container_name", "vendor/confetti-cms/different/container")])
        ));
    }

    #[test]
    fn test_mixed_wildcard_and_exact() {
        let req = AttributeSet::from([
            ("container_name", "vendor/confetti-cms/image/container"),
            ("target", "cmd"),
        ]);
        assert!(matches(
            &req,
            &AttributeSet::from([("container_name", "*"), ("target", "cmd")])
        ));
        assert!(!matches(
            &req,
            &AttributeSet::from([("container_name", "*"), ("target", "all_up")])
        ));
    }

    #[test]
    fn test_granted_field_missing_from_request() {
        let req = AttributeSet::from([("target", "cmd")]);
        let grant = AttributeSet::from([("target", "cmd"), ("host", "*")]);
        assert!(!matches(&req, &grant));
        assert_eq!(first_mismatch(&req, &grant, Pass::Resource), Some("host"));
    }

    #[test]
    fn test_extra_requested_fields_are_ignored() {
        let req = AttributeSet::from([("target", "cmd"), ("custom", "x")]);
        assert!(matches(&req, &AttributeSet::from([("target", "cmd")])));
    }

    #[test]
    fn test_identical_sets_with_empty_values() {
        let set = AttributeSet::from([("target", ""), ("host", "*")]);
        assert!(matches(&set, &set.clone()));
    }

    #[test]
    fn test_adding_granted_field_never_widens() {
        let req = AttributeSet::from([("target", "cmd"), ("action", "pull")]);
        let mut grant = AttributeSet::new();
        let mut previous = matches(&req, &grant);
        for (name, value) in [("target", "*"), ("action", "pull"), ("host", "*"), ("scheme", "image")] {
            grant.insert(name, value);
            let now = matches(&req, &grant);
            assert!(previous || !now, "adding {name} turned a non-match into a match");
            previous = now;
        }
        assert!(!previous);
    }

    #[test]
    fn test_relationship_scenarios() {
        assert!(relationship_matches(
            &AttributeSet::from([("scheme", "*")]),
            &AttributeSet::from([("scheme", "image")])
        ));
        assert!(!relationship_matches(
            &AttributeSet::from([("scheme", "image")]),
            &AttributeSet::from([("scheme", "json")])
        ));
        assert!(relationship_matches(
            &AttributeSet::from([("scheme", "image")]),
            &AttributeSet::from([("scheme", "*")])
        ));
    }

    #[test]
    fn test_grantor_wildcard_accepts_undeclared_field() {
        let grant_declared = AttributeSet::from([("scheme", "*")]);
        assert!(relationship_matches(&AttributeSet::new(), &grant_declared));
        assert!(relationship_matches(&AttributeSet::from([("scheme", "")]), &grant_declared));

        // a literal the requester never declared still rejects
        assert!(!relationship_matches(
            &AttributeSet::new(),
            &AttributeSet::from([("scheme", "image")])
        ));

        let req = requested(AttributeSet::from([("target", "cmd")]), AttributeSet::new());
        let any_action = granted(
            AttributeSet::from([("target", "cmd")]),
            AttributeSet::from([("action", "*")]),
        );
        assert!(authorized(&req, &any_action));
    }

    #[test]
    fn test_authorized_requires_both_passes() {
        let req = requested(
            AttributeSet::from([("target", "cmd")]),
            AttributeSet::from([("action", "pull")]),
        );

        let pull = granted(
            AttributeSet::from([("target", "*")]),
            AttributeSet::from([("action", "pull")]),
        );
        assert!(authorized(&req, &pull));

        let push = granted(
            AttributeSet::from([("target", "*")]),
            AttributeSet::from([("action", "push")]),
        );
        assert!(!authorized(&req, &push));

        let other_target = granted(
            AttributeSet::from([("target", "all_up")]),
            AttributeSet::from([("action", "pull")]),
        );
        assert!(!authorized(&req, &other_target));
    }
}
