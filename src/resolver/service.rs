//! Store-backed resolver
//!
//! The entry point front ends call: submit records, then ask which grants
//! cover a set of requests (or the reverse). Candidates come from the store on
//! every call; nothing is cached.

use std::sync::Arc;

use crate::attributes::AttributeSet;
use crate::config::ResolverConfig;
use crate::core::GrantResult;
use crate::locator::{decode, decode_strict, fill_requested};
use crate::permissions::matches;
use crate::records::{Granted, Requested};
use crate::store::RecordStore;

use super::batch::{resolve_grants_for, resolve_requests_for};

/// Resolves requests against the grants held by a [`RecordStore`]
pub struct GrantResolver<S: RecordStore> {
    store: Arc<S>,
    strict_locators: bool,
}

impl<S: RecordStore> GrantResolver<S> {
    /// Create a resolver with permissive locator decoding
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            strict_locators: false,
        }
    }

    /// Create a resolver honoring the configuration
    pub fn from_config(store: Arc<S>, config: &ResolverConfig) -> Self {
        Self::new(store).with_strict_locators(config.strict_locators)
    }

    /// Set strict locator decoding
    pub fn with_strict_locators(mut self, strict: bool) -> Self {
        self.strict_locators = strict;
        self
    }

    /// Get the store reference
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn is_strict(&self) -> bool {
        self.strict_locators
    }

    /// Record a grant
    pub async fn submit_granted(&self, granted: Granted) -> GrantResult<String> {
        let key = self.store.save_granted(granted).await?;
        tracing::info!("[GrantResolver] Granted {} ({})", key, self.store.name());
        Ok(key)
    }

    /// Record a request
    pub async fn submit_requested(&self, requested: Requested) -> GrantResult<String> {
        let key = self.store.save_requested(requested).await?;
        tracing::info!("[GrantResolver] Requested {} ({})", key, self.store.name());
        Ok(key)
    }

    /// Stored grants authorizing at least one of `requested`
    pub async fn grants_for(&self, requested: &[Requested]) -> GrantResult<Vec<Granted>> {
        if requested.is_empty() {
            return Ok(Vec::new());
        }

        let candidates = self.store.granted().await?;
        let total = candidates.len();
        let matching = resolve_grants_for(requested, candidates);

        tracing::debug!(
            "[GrantResolver] {} of {} grants match {} request(s)",
            matching.len(),
            total,
            requested.len()
        );
        Ok(matching)
    }

    /// Stored requests authorized by at least one of `granted`
    pub async fn requests_for(&self, granted: &[Granted]) -> GrantResult<Vec<Requested>> {
        if granted.is_empty() {
            return Ok(Vec::new());
        }

        let candidates = self.store.requested().await?;
        let total = candidates.len();
        let matching = resolve_requests_for(granted, candidates);

        tracing::debug!(
            "[GrantResolver] {} of {} requests satisfied by {} grant(s)",
            matching.len(),
            total,
            granted.len()
        );
        Ok(matching)
    }

    /// Stored grants covering a `//host/container?query` locator
    ///
    /// `declared` is the caller's claim about the relationship it needs.
    pub async fn grants_for_locator(
        &self,
        locator: &str,
        declared: AttributeSet,
    ) -> GrantResult<Vec<Granted>> {
        let requested = fill_requested(locator, Requested::default().with_declared(declared))?;
        self.grants_for(&[requested]).await
    }

    /// Whether any stored grant's resource side covers a `locator://` string
    ///
    /// In strict mode an undecodable locator is an error; otherwise it decodes
    /// to an empty set and only empty grants cover it.
    pub async fn locator_authorized(&self, locator: &str) -> GrantResult<bool> {
        let attributes = if self.strict_locators {
            decode_strict(locator).inspect_err(|e| {
                tracing::warn!("[GrantResolver] Rejected locator: {}", e);
            })?
        } else {
            decode(locator)
        };

        let granted = self.store.granted().await?;
        Ok(granted
            .iter()
            .any(|grant| matches(&attributes, &grant.resource)))
    }
}
