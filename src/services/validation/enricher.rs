//! Pass-through claims attached to an `Allow` decision.
//!
//! The identity platform persists whatever extra claims the connector returns
//! on success (including `extension_*` custom attributes). Deployments plug in
//! their own logic through `ClaimsEnricher`.

use std::collections::BTreeMap;

use super::claims::SignUpClaims;

pub trait ClaimsEnricher: Send + Sync {
    fn enrich(&self, claims: &SignUpClaims) -> BTreeMap<String, String>;
}

/// Returns the same configured claims for every successful sign-up.
#[derive(Debug, Clone, Default)]
pub struct StaticClaims {
    claims: BTreeMap<String, String>,
}

impl StaticClaims {
    pub fn new(claims: BTreeMap<String, String>) -> Self {
        Self { claims }
    }
}

impl ClaimsEnricher for StaticClaims {
    fn enrich(&self, _claims: &SignUpClaims) -> BTreeMap<String, String> {
        self.claims.clone()
    }
}
