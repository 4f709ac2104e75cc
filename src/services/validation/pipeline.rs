//! Ordered sign-up checks.
//!
//! Checks run in a fixed order and the first failure is the answer:
//!
//! 1. usable request body
//! 2. `email` present and containing `@`
//! 3. email domain on the allow-list
//! 4. secondary claim (`displayName` or `jobTitle`) long enough
//!
//! When all pass the decision is `Allow`, with whatever pass-through claims
//! the configured `ClaimsEnricher` returns.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::claims::{ClaimValue, DISPLAY_NAME, JOB_TITLE, SignUpClaims};
use super::decision::{Decision, MalformedInput, Reason, Rejection};
use super::enricher::ClaimsEnricher;

const INVALID_INPUT_MESSAGE: &str = "There was a problem with your request.";
const EMAIL_MANDATORY_MESSAGE: &str = "Email is mandatory.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecondaryClaim {
    #[default]
    DisplayName,
    JobTitle,
}

impl SecondaryClaim {
    pub fn key(&self) -> &'static str {
        match self {
            SecondaryClaim::DisplayName => DISPLAY_NAME,
            SecondaryClaim::JobTitle => JOB_TITLE,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            SecondaryClaim::DisplayName => "Display Name",
            SecondaryClaim::JobTitle => "Job Title",
        }
    }

    fn value<'a>(&self, claims: &'a SignUpClaims) -> &'a ClaimValue {
        match self {
            SecondaryClaim::DisplayName => &claims.display_name,
            SecondaryClaim::JobTitle => &claims.job_title,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown secondary claim: {0}")]
pub struct UnknownSecondaryClaim(String);

impl FromStr for SecondaryClaim {
    type Err = UnknownSecondaryClaim;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "displayname" => Ok(SecondaryClaim::DisplayName),
            "jobtitle" => Ok(SecondaryClaim::JobTitle),
            _ => Err(UnknownSecondaryClaim(s.to_string())),
        }
    }
}

impl fmt::Display for SecondaryClaim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondaryClaimPolicy {
    pub claim: SecondaryClaim,
    /// When false the claim is only checked if it was sent.
    pub required: bool,
    /// Minimum length in characters.
    pub min_length: usize,
}

impl Default for SecondaryClaimPolicy {
    fn default() -> Self {
        Self {
            claim: SecondaryClaim::DisplayName,
            required: true,
            min_length: 5,
        }
    }
}

impl SecondaryClaimPolicy {
    fn rejection(&self, reason: Reason) -> Rejection {
        Rejection::new(
            reason,
            format!(
                "Please provide a {} with at least {} characters.",
                self.claim.label(),
                self.min_length
            ),
        )
    }

    fn check(&self, claims: &SignUpClaims) -> Result<(), Rejection> {
        match self.claim.value(claims) {
            ClaimValue::Absent if !self.required => Ok(()),
            ClaimValue::Absent | ClaimValue::WrongType => Err(self.rejection(Reason::ClaimMissing)),
            ClaimValue::Present(s) if s.is_empty() && self.required => {
                Err(self.rejection(Reason::ClaimMissing))
            }
            // Counted in Unicode scalar values, not UTF-16 units: "😀😀😀" is 3.
            ClaimValue::Present(s) if s.chars().count() < self.min_length => {
                Err(self.rejection(Reason::ClaimTooShort))
            }
            ClaimValue::Present(_) => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// Lower-cased, exact match.
    pub allowed_domains: Vec<String>,
    /// Shown in the domain rejection message.
    pub organization: String,
    pub secondary: SecondaryClaimPolicy,
}

impl ValidationPolicy {
    fn domain_rejection(&self) -> Rejection {
        Rejection::new(
            Reason::DomainNotAllowed,
            format!(
                "You must have an account from '{}' to register as an external user for {}.",
                self.allowed_domains.join(", "),
                self.organization
            ),
        )
    }
}

#[derive(Clone)]
pub struct ValidationPipeline {
    policy: ValidationPolicy,
    malformed_input: MalformedInput,
    enricher: Arc<dyn ClaimsEnricher>,
}

impl ValidationPipeline {
    /// `malformed_input` is the action used when the body is unusable; it
    /// differs between response contracts.
    pub fn new(
        policy: ValidationPolicy,
        malformed_input: MalformedInput,
        enricher: Arc<dyn ClaimsEnricher>,
    ) -> Self {
        Self {
            policy,
            malformed_input,
            enricher,
        }
    }

    /// `None` means the request body could not be used.
    pub fn evaluate(&self, claims: Option<&SignUpClaims>) -> Decision {
        let Some(claims) = claims else {
            tracing::info!("missing or unreadable input");
            let rejection = Rejection::new(Reason::InvalidInput, INVALID_INPUT_MESSAGE);
            return match self.malformed_input {
                MalformedInput::ValidationError => Decision::invalid(rejection),
                MalformedInput::ShowBlockPage => Decision::block(rejection),
            };
        };

        tracing::info!(language = claims.language(), "current language");

        match self.run_checks(claims) {
            Ok(()) => Decision::allow(self.enricher.enrich(claims)),
            Err(rejection) => {
                tracing::info!(reason = rejection.reason.code(), "sign-up rejected");
                Decision::invalid(rejection)
            }
        }
    }

    fn run_checks(&self, claims: &SignUpClaims) -> Result<(), Rejection> {
        let email = check_email(&claims.email)?;
        self.check_domain(email)?;
        self.policy.secondary.check(claims)
    }

    fn check_domain(&self, email: &str) -> Result<(), Rejection> {
        let domain = email
            .split_once('@')
            .map_or("", |(_, domain)| domain)
            .to_lowercase();

        if self.policy.allowed_domains.iter().any(|d| *d == domain) {
            Ok(())
        } else {
            tracing::debug!(domain = %domain, "email domain not on allow-list");
            Err(self.policy.domain_rejection())
        }
    }
}

fn check_email(email: &ClaimValue) -> Result<&str, Rejection> {
    email
        .non_empty()
        .filter(|e| e.contains('@'))
        .ok_or_else(|| Rejection::new(Reason::EmailMandatory, EMAIL_MANDATORY_MESSAGE))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::services::validation::decision::Action;
    use crate::services::validation::enricher::StaticClaims;

    #[derive(Default)]
    struct CountingEnricher {
        calls: AtomicUsize,
    }

    impl ClaimsEnricher for CountingEnricher {
        fn enrich(&self, _claims: &SignUpClaims) -> BTreeMap<String, String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            BTreeMap::new()
        }
    }

    fn policy(secondary: SecondaryClaimPolicy) -> ValidationPolicy {
        ValidationPolicy {
            allowed_domains: vec!["fabrikam.com".into(), "contoso.com".into()],
            organization: "Contoso".into(),
            secondary,
        }
    }

    fn pipeline(secondary: SecondaryClaimPolicy) -> ValidationPipeline {
        ValidationPipeline::new(
            policy(secondary),
            MalformedInput::ValidationError,
            Arc::new(StaticClaims::default()),
        )
    }

    fn claims(json: &str) -> SignUpClaims {
        SignUpClaims::parse(json.as_bytes()).unwrap()
    }

    #[test]
    fn allowed_domain_passes() {
        let decision = pipeline(SecondaryClaimPolicy::default())
            .evaluate(Some(&claims(r#"{"email":"a@fabrikam.com","displayName":"Alice Smith"}"#)));
        assert!(decision.is_allowed());
        assert_eq!(decision.message(), None);
    }

    #[test]
    fn domain_match_ignores_case() {
        let decision = pipeline(SecondaryClaimPolicy::default())
            .evaluate(Some(&claims(r#"{"email":"a@CONTOSO.Com","displayName":"Alice Smith"}"#)));
        assert!(decision.is_allowed());
    }

    #[test]
    fn foreign_domain_lists_every_allowed_domain() {
        let decision = pipeline(SecondaryClaimPolicy::default())
            .evaluate(Some(&claims(r#"{"email":"a@evil.com","displayName":"Alice Smith"}"#)));

        assert_eq!(decision.action(), Action::ValidationError);
        assert_eq!(decision.reason(), Some(Reason::DomainNotAllowed));
        let message = decision.message().unwrap();
        assert!(message.contains("fabrikam.com, contoso.com"), "{message}");
    }

    #[test]
    fn no_suffix_or_subdomain_matching() {
        let p = pipeline(SecondaryClaimPolicy::default());
        for email in ["a@sub.fabrikam.com", "a@fabrikam.com.evil", "a@notfabrikam.com"] {
            let body = format!(r#"{{"email":"{email}","displayName":"Alice Smith"}}"#);
            assert_eq!(
                p.evaluate(Some(&claims(&body))).reason(),
                Some(Reason::DomainNotAllowed),
                "{email}"
            );
        }
    }

    #[test]
    fn domain_is_everything_after_first_at() {
        let decision = pipeline(SecondaryClaimPolicy::default())
            .evaluate(Some(&claims(r#"{"email":"a@b@fabrikam.com","displayName":"Alice Smith"}"#)));
        assert_eq!(decision.reason(), Some(Reason::DomainNotAllowed));
    }

    #[test]
    fn missing_email_stops_before_later_checks() {
        let enricher = Arc::new(CountingEnricher::default());
        let p = ValidationPipeline::new(
            policy(SecondaryClaimPolicy::default()),
            MalformedInput::ValidationError,
            enricher.clone(),
        );

        // Domain and display name would both fail too; email wins.
        let decision = p.evaluate(Some(&claims(r#"{"displayName":"x"}"#)));
        assert_eq!(decision.action(), Action::ValidationError);
        assert_eq!(decision.reason(), Some(Reason::EmailMandatory));
        assert_eq!(decision.message(), Some("Email is mandatory."));
        assert_eq!(enricher.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn email_must_be_a_non_empty_string_with_at() {
        let p = pipeline(SecondaryClaimPolicy::default());
        for body in [
            r#"{"email":""}"#,
            r#"{"email":"no-at-sign"}"#,
            r#"{"email":null}"#,
            r#"{"email":12}"#,
            r#"{"email":["a@fabrikam.com"]}"#,
        ] {
            assert_eq!(
                p.evaluate(Some(&claims(body))).reason(),
                Some(Reason::EmailMandatory),
                "{body}"
            );
        }
    }

    #[test]
    fn domain_failure_wins_over_secondary_claim() {
        let decision = pipeline(SecondaryClaimPolicy::default())
            .evaluate(Some(&claims(r#"{"email":"a@evil.com"}"#)));
        assert_eq!(decision.reason(), Some(Reason::DomainNotAllowed));
    }

    #[test]
    fn short_secondary_claim_is_rejected() {
        let decision = pipeline(SecondaryClaimPolicy::default())
            .evaluate(Some(&claims(r#"{"email":"a@fabrikam.com","displayName":"Al"}"#)));

        assert_eq!(decision.action(), Action::ValidationError);
        assert_eq!(decision.reason(), Some(Reason::ClaimTooShort));
        assert_eq!(
            decision.message(),
            Some("Please provide a Display Name with at least 5 characters.")
        );
    }

    #[test]
    fn length_is_counted_in_characters() {
        // Five characters, more than five bytes.
        let decision = pipeline(SecondaryClaimPolicy::default())
            .evaluate(Some(&claims(r#"{"email":"a@fabrikam.com","displayName":"Zoë Ö"}"#)));
        assert!(decision.is_allowed());
    }

    #[test]
    fn astral_characters_count_once_each() {
        let p = pipeline(SecondaryClaimPolicy::default());

        // Three characters (six UTF-16 units) stay below the minimum of five.
        let decision =
            p.evaluate(Some(&claims(r#"{"email":"a@fabrikam.com","displayName":"😀😀😀"}"#)));
        assert_eq!(decision.reason(), Some(Reason::ClaimTooShort));

        let decision =
            p.evaluate(Some(&claims(r#"{"email":"a@fabrikam.com","displayName":"😀😀😀😀😀"}"#)));
        assert!(decision.is_allowed());
    }

    #[test]
    fn required_secondary_claim_must_be_sent() {
        let p = pipeline(SecondaryClaimPolicy::default());
        for body in [
            r#"{"email":"a@fabrikam.com"}"#,
            r#"{"email":"a@fabrikam.com","displayName":""}"#,
            r#"{"email":"a@fabrikam.com","displayName":null}"#,
            r#"{"email":"a@fabrikam.com","displayName":123456}"#,
        ] {
            assert_eq!(
                p.evaluate(Some(&claims(body))).reason(),
                Some(Reason::ClaimMissing),
                "{body}"
            );
        }
    }

    #[test]
    fn optional_secondary_claim_checked_only_when_sent() {
        let p = pipeline(SecondaryClaimPolicy {
            claim: SecondaryClaim::JobTitle,
            required: false,
            min_length: 3,
        });

        assert!(p.evaluate(Some(&claims(r#"{"email":"a@fabrikam.com"}"#))).is_allowed());
        assert!(
            p.evaluate(Some(&claims(r#"{"email":"a@fabrikam.com","jobTitle":"CTO"}"#)))
                .is_allowed()
        );

        let decision = p.evaluate(Some(&claims(r#"{"email":"a@fabrikam.com","jobTitle":"QA"}"#)));
        assert_eq!(decision.reason(), Some(Reason::ClaimTooShort));
        assert_eq!(
            decision.message(),
            Some("Please provide a Job Title with at least 3 characters.")
        );

        // displayName is not the configured claim, so it is ignored.
        assert!(
            p.evaluate(Some(&claims(r#"{"email":"a@fabrikam.com","displayName":"x"}"#)))
                .is_allowed()
        );
    }

    #[test]
    fn missing_input_uses_configured_action() {
        let block = ValidationPipeline::new(
            policy(SecondaryClaimPolicy::default()),
            MalformedInput::ShowBlockPage,
            Arc::new(StaticClaims::default()),
        );
        let decision = block.evaluate(None);
        assert_eq!(decision.action(), Action::ShowBlockPage);
        assert_eq!(decision.reason(), Some(Reason::InvalidInput));
        assert_eq!(decision.message(), Some("There was a problem with your request."));

        let invalid = pipeline(SecondaryClaimPolicy::default()).evaluate(None);
        assert_eq!(invalid.action(), Action::ValidationError);
        assert_eq!(invalid.reason(), Some(Reason::InvalidInput));
    }

    #[test]
    fn success_carries_enriched_claims() {
        let mut extra = BTreeMap::new();
        extra.insert("jobTitle".to_string(), "returned by connector".to_string());
        let p = ValidationPipeline::new(
            policy(SecondaryClaimPolicy::default()),
            MalformedInput::ValidationError,
            Arc::new(StaticClaims::new(extra.clone())),
        );

        let decision = p.evaluate(Some(&claims(
            r#"{"email":"a@fabrikam.com","displayName":"Alice Smith","ui_locales":"fr-FR"}"#,
        )));
        assert!(decision.is_allowed());
        assert_eq!(decision.claims(), &extra);

        let rejected = p.evaluate(Some(&claims(r#"{"email":"a@evil.com"}"#)));
        assert!(rejected.claims().is_empty());
    }

    #[test]
    fn locale_never_changes_the_outcome() {
        let p = pipeline(SecondaryClaimPolicy::default());
        let base = r#""email":"a@fabrikam.com","displayName":"Alice Smith""#;
        for locale in [r#""ui_locales":"ja-JP""#, r#""ui_locales":"""#, r#""ui_locales":5"#] {
            let body = format!("{{{base},{locale}}}");
            assert!(p.evaluate(Some(&claims(&body))).is_allowed(), "{body}");
        }
    }

    #[test]
    fn secondary_claim_names_parse() {
        assert_eq!("displayName".parse::<SecondaryClaim>().unwrap(), SecondaryClaim::DisplayName);
        assert_eq!("jobtitle".parse::<SecondaryClaim>().unwrap(), SecondaryClaim::JobTitle);
        assert!("surname".parse::<SecondaryClaim>().is_err());
    }
}
