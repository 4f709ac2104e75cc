/*
 * Responsibility
 * - POST /signup-validation
 * - body は生の bytes で受ける (Json extractor の rejection を使わず、
 *   不正な入力も pipeline の Decision として返すため)
 * - body サイズ超過だけは AppError (413 + JSON error body)
 * - Decision → 契約ごとの JSON + HTTP status
 */
use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::StatusCode,
};

use crate::error::AppError;
use crate::services::response::ResponseEnvelope;
use crate::services::validation::SignUpClaims;
use crate::state::AppState;

pub async fn validate_signup(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<ResponseEnvelope>), AppError> {
    let claims = match body {
        Ok(body) => SignUpClaims::parse(&body),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            tracing::warn!(limit = state.max_body_bytes, "request body too large");
            return Err(AppError::PayloadTooLarge {
                limit: state.max_body_bytes,
            });
        }
        Err(rejection) => {
            // Unreadable body is the same as no input.
            tracing::warn!(error = %rejection, "failed to read request body");
            None
        }
    };

    if let Some(claims) = &claims {
        tracing::debug!(
            email_present = !claims.email.is_absent(),
            other_claims = claims.other_claims,
            "sign-up claims received"
        );
    }

    let decision = state.pipeline.evaluate(claims.as_ref());
    let status = state.encoder.status_code(&decision);

    tracing::info!(
        action = ?decision.action(),
        status = status.as_u16(),
        "sign-up validation completed"
    );

    Ok((status, Json(state.encoder.encode(&decision))))
}
