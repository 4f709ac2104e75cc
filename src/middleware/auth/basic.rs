//! HTTP Basic 認証 (AccessGuard) を handler の前に掛ける middleware
//!
//! - 認証 OK: そのまま handler へ
//! - 認証 NG: 401 (body なし)。pipeline は実行されない
//! - 認証情報が未設定: 全て通す (AccessGuard 側の判断)

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::state::AppState;

/// 例：
/// ```ignore
/// let v1 = Router::new().route("/signup-validation", post(validate_signup));
/// let v1 = middleware::auth::basic::apply(v1, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, basic_auth_middleware))
}

async fn basic_auth_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if !state.guard.authorize(req.headers()) {
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(req).await)
}
