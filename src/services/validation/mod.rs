pub mod claims;
pub mod decision;
pub mod enricher;
pub mod pipeline;

pub use claims::{ClaimValue, SignUpClaims};
pub use decision::{Action, Decision, MalformedInput, Reason, Rejection};
pub use enricher::{ClaimsEnricher, StaticClaims};
pub use pipeline::{SecondaryClaim, SecondaryClaimPolicy, ValidationPipeline, ValidationPolicy};
