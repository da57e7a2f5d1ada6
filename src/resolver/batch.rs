//! Batch resolution
//!
//! Full pairwise scans between an outer list and a candidate source. A
//! candidate is kept when at least one outer item authorizes it, and is kept
//! once, in candidate order. No ranking between several matching grants.

use futures::{pin_mut, Stream, StreamExt};

use crate::attributes::AttributeSet;
use crate::core::GrantResult;
use crate::permissions::{authorized, matches};
use crate::records::{Granted, Requested};

/// Grants among `candidates` that authorize at least one of `requested`
pub fn resolve_grants_for<I>(requested: &[Requested], candidates: I) -> Vec<Granted>
where
    I: IntoIterator<Item = Granted>,
{
    filter_candidates(requested, candidates, |req, grant| authorized(req, grant))
}

/// Requests among `candidates` authorized by at least one of `granted`
pub fn resolve_requests_for<I>(granted: &[Granted], candidates: I) -> Vec<Requested>
where
    I: IntoIterator<Item = Requested>,
{
    filter_candidates(granted, candidates, |grant, req| authorized(req, grant))
}

/// Resource-only variant for callers holding bare attribute sets
///
/// Returns the requested sets satisfied by at least one granted set.
pub fn filter_matching_requests(
    requested: &[AttributeSet],
    granted: &[AttributeSet],
) -> Vec<AttributeSet> {
    filter_candidates(granted, requested.iter().cloned(), |grant, req| {
        matches(req, grant)
    })
}

/// Stream form of [`resolve_grants_for`]; stops at the first source error
pub async fn resolve_grants_from_stream<S>(
    requested: &[Requested],
    candidates: S,
) -> GrantResult<Vec<Granted>>
where
    S: Stream<Item = GrantResult<Granted>>,
{
    filter_stream(requested, candidates, |req, grant| authorized(req, grant)).await
}

/// Stream form of [`resolve_requests_for`]; stops at the first source error
pub async fn resolve_requests_from_stream<S>(
    granted: &[Granted],
    candidates: S,
) -> GrantResult<Vec<Requested>>
where
    S: Stream<Item = GrantResult<Requested>>,
{
    filter_stream(granted, candidates, |grant, req| authorized(req, grant)).await
}

fn filter_candidates<O, C, I, F>(outer: &[O], candidates: I, admits: F) -> Vec<C>
where
    I: IntoIterator<Item = C>,
    F: Fn(&O, &C) -> bool,
{
    candidates
        .into_iter()
        .filter(|candidate| outer.iter().any(|item| admits(item, candidate)))
        .collect()
}

async fn filter_stream<O, C, S, F>(outer: &[O], candidates: S, admits: F) -> GrantResult<Vec<C>>
where
    S: Stream<Item = GrantResult<C>>,
    F: Fn(&O, &C) -> bool,
{
    pin_mut!(candidates);
    let mut matching = Vec::new();
    while let Some(candidate) = candidates.next().await {
        let candidate = candidate?;
        if outer.iter().any(|item| admits(item, &candidate)) {
            matching.push(candidate);
        }
    }
    Ok(matching)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GrantError;
    use futures::stream;

    fn request(target: &str) -> Requested {
        Requested::new(AttributeSet::from([("target", target)]))
    }

    fn grant(target: &str) -> Granted {
        Granted::new(AttributeSet::from([("target", target)]))
    }

    #[test]
    fn test_wildcard_grant_returned_once() {
        let requested = vec![request("cmd"), request("all_up")];
        let result = resolve_grants_for(&requested, vec![grant("*")]);
        assert_eq!(result, vec![grant("*")]);
    }

    #[test]
    fn test_all_matching_grants_kept_in_order() {
        let requested = vec![request("cmd")];
        let candidates = vec![grant("*"), grant("web"), grant("cmd")];
        let result = resolve_grants_for(&requested, candidates);
        assert_eq!(result, vec![grant("*"), grant("cmd")]);
    }

    #[test]
    fn test_no_requests_match_nothing() {
        let result = resolve_grants_for(&[], vec![grant("*"), Granted::default()]);
        assert!(result.is_empty());
    }

    #[test]
    fn test_relationship_filters_grants() {
        let requested = vec![request("cmd").with_declared(AttributeSet::from([("action", "pull")]))];
        let push = grant("cmd").with_declared(AttributeSet::from([("action", "push")]));
        let any = grant("cmd").with_declared(AttributeSet::from([("action", "*")]));

        let result = resolve_grants_for(&requested, vec![push, any.clone()]);
        assert_eq!(result, vec![any]);
    }

    #[test]
    fn test_resolve_requests_for() {
        let granted = vec![grant("cmd"), grant("web")];
        let candidates = vec![request("cmd"), request("all_up"), request("web")];
        let result = resolve_requests_for(&granted, candidates);
        assert_eq!(result, vec![request("cmd"), request("web")]);
    }

    #[test]
    fn test_filter_matching_requests() {
        let requested = vec![
            AttributeSet::from([("action", "write"), ("container_name", "image")]),
            AttributeSet::from([("action", "read"), ("target", "cmd")]),
        ];
        let granted = vec![
            AttributeSet::from([("action", "read"), ("container_name", "image")]),
            AttributeSet::from([("action", "read"), ("target", "cmd")]),
        ];

        let result = filter_matching_requests(&requested, &granted);
        assert_eq!(result, vec![requested[1].clone()]);
    }

    #[tokio::test]
    async fn test_stream_resolution() {
        let requested = vec![request("cmd")];
        let candidates = stream::iter(vec![Ok(grant("*")), Ok(grant("web"))]);
        let result = resolve_grants_from_stream(&requested, candidates).await.unwrap();
        assert_eq!(result, vec![grant("*")]);

        let granted = vec![grant("*")];
        let candidates = stream::iter(vec![Ok(request("cmd")), Ok(request(""))]);
        let result = resolve_requests_from_stream(&granted, candidates).await.unwrap();
        assert_eq!(result, vec![request("cmd")]);
    }

    #[tokio::test]
    async fn test_stream_error_is_returned() {
        let requested = vec![request("cmd")];
        let candidates = stream::iter(vec![Ok(grant("*")), Err(GrantError::store("connection lost"))]);
        let result = resolve_grants_from_stream(&requested, candidates).await;
        assert!(matches!(result, Err(GrantError::Store(_))));
    }
}
